//! Mock property editor.

use std::sync::Arc;

use parking_lot::Mutex;
use sextant_chart::{EditorRequest, PropertyEditor};

/// Keeps every editor request. Clones share the same log, so a test can hand
/// one clone to the canvas and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct RecordingEditor {
    requests: Arc<Mutex<Vec<EditorRequest>>>,
}

impl RecordingEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<EditorRequest> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

impl PropertyEditor for RecordingEditor {
    fn open(&mut self, request: EditorRequest) {
        self.requests.lock().push(request);
    }
}
