//! Mock draw surface for testing.
//!
//! Records every draw call without rasterizing anything, so tests can assert
//! on what a paint pass produced.

use parking_lot::Mutex;
use sextant_chart::{Color, DrawSurface, EstimatedMetrics, Rect, Stroke, TextMetrics, TextStyle};
use sextant_core::math::Vec2;

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    StrokeRect { rect: Rect, stroke: Stroke },
    FillRect { rect: Rect, color: Color },
    Polyline { points: Vec<Vec2>, stroke: Stroke },
    Polygon { points: Vec<Vec2>, color: Color },
    Text { text: String, position: Vec2, style: TextStyle },
}

/// Mock implementation of [`DrawSurface`].
///
/// Drawing methods take `&self`, so calls are recorded behind a
/// [`parking_lot::Mutex`]. Text is measured with [`EstimatedMetrics`], the
/// same rule axes use by default, so layouts match between the two.
///
/// # Example
///
/// ```rust
/// use sextant_chart::{Canvas, CanvasConfig, Rect, TextLabel};
/// use sextant_test_utils::RecordingSurface;
///
/// let mut canvas = Canvas::new(CanvasConfig::default(), 200.0, 100.0);
/// canvas.add_text(TextLabel::new("hello"), Rect::UNIT);
///
/// let surface = RecordingSurface::new();
/// canvas.paint(&surface);
/// assert_eq!(surface.texts(), vec!["hello".to_string()]);
/// ```
#[derive(Debug, Default)]
pub struct RecordingSurface {
    calls: Mutex<Vec<DrawCall>>,
    metrics: EstimatedMetrics,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all recorded calls.
    pub fn calls(&self) -> Vec<DrawCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Clear recorded calls (useful between paint passes).
    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    /// Every string drawn, in order.
    pub fn texts(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                DrawCall::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Every polyline drawn, in order.
    pub fn polylines(&self) -> Vec<Vec<Vec2>> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                DrawCall::Polyline { points, .. } => Some(points.clone()),
                _ => None,
            })
            .collect()
    }

    /// Filled rectangles drawn in `color`.
    pub fn filled_rects(&self, color: Color) -> Vec<Rect> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                DrawCall::FillRect { rect, color: c } if *c == color => Some(*rect),
                _ => None,
            })
            .collect()
    }

    pub fn count_polylines(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, DrawCall::Polyline { .. }))
            .count()
    }

    pub fn count_texts(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, DrawCall::Text { .. }))
            .count()
    }
}

impl TextMetrics for RecordingSurface {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        self.metrics.text_width(text, font_size)
    }

    fn text_height(&self, font_size: f32) -> f32 {
        self.metrics.text_height(font_size)
    }
}

impl DrawSurface for RecordingSurface {
    fn stroke_rect(&self, rect: Rect, stroke: Stroke) {
        self.calls.lock().push(DrawCall::StrokeRect { rect, stroke });
    }

    fn fill_rect(&self, rect: Rect, color: Color) {
        self.calls.lock().push(DrawCall::FillRect { rect, color });
    }

    fn stroke_polyline(&self, points: &[Vec2], stroke: Stroke) {
        self.calls.lock().push(DrawCall::Polyline {
            points: points.to_vec(),
            stroke,
        });
    }

    fn fill_polygon(&self, points: &[Vec2], color: Color) {
        self.calls.lock().push(DrawCall::Polygon {
            points: points.to_vec(),
            color,
        });
    }

    fn draw_text(&self, text: &str, position: Vec2, style: TextStyle) {
        self.calls.lock().push(DrawCall::Text {
            text: text.to_string(),
            position,
            style,
        });
    }
}
