//! Error types for the chart engine.

use crate::element::ElementId;

/// Errors surfaced synchronously by chart setters and series mutation.
///
/// Numeric problems met while painting (degenerate ranges, zero-width boxes)
/// are not represented here; they are repaired in place.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChartError {
    /// Unknown display mode name.
    #[error("invalid display mode: {0:?}")]
    InvalidDisplayMode(String),

    /// Unknown marker type name.
    #[error("invalid marker type: {0:?}")]
    InvalidMarker(String),

    /// Color string could not be parsed.
    #[error("invalid color: {0:?}")]
    InvalidColor(String),

    /// A numeric style field was out of range.
    #[error("invalid value {value} for {field}")]
    InvalidStyle { field: &'static str, value: f32 },

    /// A sample was appended out of order.
    #[error("sample x = {x} is less than the current maximum x = {max_x}")]
    SeriesOrdering { x: f64, max_x: f64 },

    /// No element with this id is on the canvas.
    #[error("unknown element {0:?}")]
    UnknownElement(ElementId),

    /// The element exists but is not of the requested kind.
    #[error("element {id:?} is not a {expected} element")]
    WrongElementKind { id: ElementId, expected: &'static str },
}

impl ChartError {
    /// Whether this error comes from rejecting a configuration value.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidDisplayMode(_)
                | Self::InvalidMarker(_)
                | Self::InvalidColor(_)
                | Self::InvalidStyle { .. }
        )
    }
}

/// Result type for chart operations.
pub type ChartResult<T> = Result<T, ChartError>;
