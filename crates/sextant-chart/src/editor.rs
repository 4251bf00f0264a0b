//! Seam for external property editors.
//!
//! Double clicks produce [`EditorRequest`]s. The canvas forwards them to the
//! installed editor after dispatch; the editor later calls back with a
//! finished record, e.g. through
//! [`Canvas::apply_series_options`](crate::canvas::Canvas::apply_series_options).

use crate::element::EditorRequest;

/// Opaque UI that edits element properties.
pub trait PropertyEditor {
    fn open(&mut self, request: EditorRequest);
}

impl<F> PropertyEditor for F
where
    F: FnMut(EditorRequest),
{
    fn open(&mut self, request: EditorRequest) {
        self(request)
    }
}
