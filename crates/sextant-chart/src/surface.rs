//! Drawing backend abstraction.
//!
//! The engine never rasterises anything itself. Everything it paints goes
//! through [`DrawSurface`], and label layout asks [`TextMetrics`] how large a
//! string will be. Both traits are object safe and take `&self`, so a backend
//! that needs to mutate state (a recording mock, a command buffer) uses
//! interior mutability.

use sextant_core::math::Vec2;

use crate::color::Color;
use crate::rect::Rect;

/// Font metrics used by label layout.
pub trait TextMetrics {
    /// Advance width of `text` in device pixels.
    fn text_width(&self, text: &str, font_size: f32) -> f32;

    /// Line height in device pixels.
    fn text_height(&self, font_size: f32) -> f32;
}

/// Metrics from fixed per-character advances: `0.6 × font_size` per char,
/// `1.2 × font_size` line height. Used for layout until a backend supplies
/// real font metrics, and by deterministic tests.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EstimatedMetrics;

impl EstimatedMetrics {
    pub const ADVANCE: f32 = 0.6;
    pub const LINE_HEIGHT: f32 = 1.2;
}

impl TextMetrics for EstimatedMetrics {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars().count() as f32 * font_size * Self::ADVANCE
    }

    fn text_height(&self, font_size: f32) -> f32 {
        font_size * Self::LINE_HEIGHT
    }
}

/// Line style for stroked primitives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
    pub dashed: bool,
}

impl Stroke {
    pub const fn new(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            dashed: false,
        }
    }

    pub fn dashed(mut self) -> Self {
        self.dashed = true;
        self
    }
}

impl Default for Stroke {
    fn default() -> Self {
        Self::new(Color::BLACK, 1.0)
    }
}

/// Which point of the text box `draw_text`'s position refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    #[default]
    TopLeft,
    TopCenter,
    CenterLeft,
    CenterRight,
    Center,
}

impl TextAnchor {
    /// Top-left corner of a `size` box anchored at `position`.
    pub fn top_left(self, position: Vec2, size: Vec2) -> Vec2 {
        match self {
            TextAnchor::TopLeft => position,
            TextAnchor::TopCenter => position - Vec2::new(size.x / 2.0, 0.0),
            TextAnchor::CenterLeft => position - Vec2::new(0.0, size.y / 2.0),
            TextAnchor::CenterRight => position - Vec2::new(size.x, size.y / 2.0),
            TextAnchor::Center => position - size / 2.0,
        }
    }
}

/// Text appearance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub color: Color,
    pub font_size: f32,
    /// Rotated 90° counter-clockwise, reading bottom to top.
    pub vertical: bool,
    pub anchor: TextAnchor,
}

impl TextStyle {
    pub fn new(color: Color, font_size: f32) -> Self {
        Self {
            color,
            font_size,
            vertical: false,
            anchor: TextAnchor::TopLeft,
        }
    }

    pub fn with_anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn with_vertical(mut self, vertical: bool) -> Self {
        self.vertical = vertical;
        self
    }
}

/// Primitive drawing operations in device space (origin top-left, y down).
pub trait DrawSurface: TextMetrics {
    fn stroke_rect(&self, rect: Rect, stroke: Stroke);

    fn fill_rect(&self, rect: Rect, color: Color);

    fn stroke_polyline(&self, points: &[Vec2], stroke: Stroke);

    /// Fill a closed polygon (marker shapes).
    fn fill_polygon(&self, points: &[Vec2], color: Color);

    fn draw_text(&self, text: &str, position: Vec2, style: TextStyle);

    fn stroke_line(&self, from: Vec2, to: Vec2, stroke: Stroke) {
        self.stroke_polyline(&[from, to], stroke);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimated_metrics() {
        let metrics = EstimatedMetrics;
        assert!((metrics.text_width("abcde", 10.0) - 30.0).abs() < 1e-4);
        assert!((metrics.text_height(10.0) - 12.0).abs() < 1e-4);
    }

    #[test]
    fn test_anchor_offsets() {
        let size = Vec2::new(20.0, 10.0);
        let p = Vec2::new(100.0, 50.0);
        assert_eq!(TextAnchor::TopLeft.top_left(p, size), p);
        assert_eq!(TextAnchor::TopCenter.top_left(p, size), Vec2::new(90.0, 50.0));
        assert_eq!(TextAnchor::CenterRight.top_left(p, size), Vec2::new(80.0, 45.0));
        assert_eq!(TextAnchor::Center.top_left(p, size), Vec2::new(90.0, 45.0));
    }
}
