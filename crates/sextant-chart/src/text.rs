//! Free-standing text labels.

use sextant_core::math::Vec2;

use crate::color::Color;
use crate::element::{CanvasContext, EditorRequest, EditorTarget, ElementBehavior, ElementFrame};
use crate::surface::{DrawSurface, Stroke, TextAnchor, TextStyle};

/// A text element, horizontal or reading bottom to top.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    text: String,
    color: Color,
    /// Falls back to the canvas font size.
    font_size: Option<f32>,
    vertical: bool,
}

impl TextLabel {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: Color::BLACK,
            font_size: None,
            vertical: false,
        }
    }

    /// Rotated label, typically an axis title.
    pub fn vertical(text: impl Into<String>) -> Self {
        Self {
            vertical: true,
            ..Self::new(text)
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn is_vertical(&self) -> bool {
        self.vertical
    }
}

impl ElementBehavior for TextLabel {
    fn paint(&mut self, frame: &ElementFrame, surface: &dyn DrawSurface, ctx: &CanvasContext) {
        let rect = frame.device_rect();
        let style = TextStyle::new(self.color, self.font_size.unwrap_or(ctx.font_size()))
            .with_anchor(TextAnchor::Center)
            .with_vertical(self.vertical);
        surface.draw_text(&self.text, rect.center(), style);
        if frame.selected {
            surface.stroke_rect(rect, Stroke::new(ctx.selection_color(), 1.0).dashed());
        }
    }

    fn double_clicked(
        &mut self,
        frame: &ElementFrame,
        _count: u32,
        point: Vec2,
        ctx: &mut CanvasContext,
    ) {
        ctx.request_editor(EditorRequest {
            element: frame.id,
            position: point,
            target: EditorTarget::Text(self.text.clone()),
        });
    }
}
