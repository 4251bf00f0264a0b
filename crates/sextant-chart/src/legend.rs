//! Series legend.

use sextant_core::math::Vec2;

use crate::binding::{DisplayMode, MarkerKind};
use crate::color::Color;
use crate::element::{CanvasContext, EditorRequest, EditorTarget, ElementBehavior, ElementFrame};
use crate::rect::Rect;
use crate::surface::{DrawSurface, Stroke, TextAnchor, TextMetrics, TextStyle};

/// One legend row.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub name: String,
    pub color: Color,
    pub marker: MarkerKind,
    pub mode: DisplayMode,
}

const SWATCH_WIDTH: f32 = 18.0;
const ROW_GAP: f32 = 4.0;
const PADDING: f32 = 6.0;

/// Lists every series on the canvas. The canvas refreshes the entries when
/// series are added, removed or restyled.
#[derive(Debug, Clone, Default)]
pub struct Legend {
    entries: Vec<LegendEntry>,
    font_size: Option<f32>,
}

impl Legend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn entries(&self) -> &[LegendEntry] {
        &self.entries
    }

    pub fn set_entries(&mut self, entries: Vec<LegendEntry>) {
        self.entries = entries;
    }

    /// Device size needed to show every entry.
    pub fn preferred_size(&self, metrics: &dyn TextMetrics, default_font: f32) -> Vec2 {
        let font = self.font_size.unwrap_or(default_font);
        let row = metrics.text_height(font);
        let widest = self
            .entries
            .iter()
            .map(|e| metrics.text_width(&e.name, font))
            .fold(0.0f32, f32::max);
        let rows = self.entries.len() as f32;
        Vec2::new(
            PADDING * 2.0 + SWATCH_WIDTH + ROW_GAP + widest,
            PADDING * 2.0 + rows * row + (rows - 1.0).max(0.0) * ROW_GAP,
        )
    }
}

fn paint_swatch(surface: &dyn DrawSurface, entry: &LegendEntry, slot: Rect) {
    let mid = slot.center();
    match entry.mode {
        DisplayMode::Boxes => surface.fill_rect(slot.inset(2.0), entry.color),
        DisplayMode::Points => entry.marker.paint(surface, mid, slot.height * 0.6, entry.color),
        DisplayMode::Lines | DisplayMode::PointsAndLines => {
            surface.stroke_line(
                Vec2::new(slot.x, mid.y),
                Vec2::new(slot.right(), mid.y),
                Stroke::new(entry.color, 2.0),
            );
            if entry.mode == DisplayMode::PointsAndLines {
                entry.marker.paint(surface, mid, slot.height * 0.6, entry.color);
            }
        }
    }
}

impl ElementBehavior for Legend {
    fn paint(&mut self, frame: &ElementFrame, surface: &dyn DrawSurface, ctx: &CanvasContext) {
        let rect = frame.device_rect();
        let font = self.font_size.unwrap_or(ctx.font_size());
        let row = surface.text_height(font);

        surface.fill_rect(rect, ctx.background());
        let border = if frame.selected {
            Stroke::new(ctx.selection_color(), 2.0)
        } else {
            Stroke::new(ctx.background().contrasting(), 1.0)
        };
        surface.stroke_rect(rect, border);

        let text_style = TextStyle::new(ctx.background().contrasting(), font)
            .with_anchor(TextAnchor::CenterLeft);
        let mut y = rect.y + PADDING;
        for entry in &self.entries {
            let slot = Rect::new(rect.x + PADDING, y, SWATCH_WIDTH, row);
            paint_swatch(surface, entry, slot);
            surface.draw_text(
                &entry.name,
                Vec2::new(slot.right() + ROW_GAP, slot.center().y),
                text_style,
            );
            y += row + ROW_GAP;
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
            target: EditorTarget::Legend,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::EstimatedMetrics;

    #[test]
    fn test_preferred_size_grows_with_entries() {
        let mut legend = Legend::new();
        let empty = legend.preferred_size(&EstimatedMetrics, 10.0);
        legend.set_entries(vec![
            LegendEntry {
                name: "alpha".into(),
                color: Color::RED,
                marker: MarkerKind::Circle,
                mode: DisplayMode::Lines,
            },
            LegendEntry {
                name: "beta-longer".into(),
                color: Color::BLUE,
                marker: MarkerKind::Square,
                mode: DisplayMode::Boxes,
            },
        ]);
        let full = legend.preferred_size(&EstimatedMetrics, 10.0);
        assert!(full.x > empty.x);
        assert!(full.y > empty.y);
    }
}
