//! Live readout of the data coordinates under the pointer.

use sextant_core::math::{DVec2, Vec2};

use crate::axes::SharedAxes;
use crate::color::Color;
use crate::element::{CanvasContext, ElementBehavior, ElementFrame};
use crate::surface::{DrawSurface, Stroke, TextAnchor, TextStyle};

/// Follows raw pointer motion over one axes' graph area.
#[derive(Debug)]
pub struct PositionIndicator {
    axes: SharedAxes,
    pointer: Option<Vec2>,
    crosshair: bool,
    color: Color,
}

impl PositionIndicator {
    pub fn new(axes: SharedAxes) -> Self {
        Self {
            axes,
            pointer: None,
            crosshair: true,
            color: Color::GRAY,
        }
    }

    pub fn with_crosshair(mut self, crosshair: bool) -> Self {
        self.crosshair = crosshair;
        self
    }

    pub fn axes(&self) -> &SharedAxes {
        &self.axes
    }

    /// Data coordinates under the pointer, `None` outside the graph area.
    pub fn data_position(&self) -> Option<DVec2> {
        let pointer = self.pointer?;
        Some(self.axes.borrow().device_to_data(pointer))
    }

    /// Text shown by the readout.
    pub fn readout(&self) -> Option<String> {
        let position = self.data_position()?;
        let format = self.axes.borrow().label_format();
        Some(format!(
            "x = {}, y = {}",
            format.format(position.x),
            format.format(position.y)
        ))
    }
}

impl ElementBehavior for PositionIndicator {
    fn paint(&mut self, frame: &ElementFrame, surface: &dyn DrawSurface, ctx: &CanvasContext) {
        let (Some(pointer), Some(text)) = (self.pointer, self.readout()) else {
            return;
        };
        if self.crosshair {
            let area = self.axes.borrow().graph_area();
            let stroke = Stroke::new(self.color, 1.0).dashed();
            surface.stroke_line(
                Vec2::new(area.left, pointer.y),
                Vec2::new(area.right(), pointer.y),
                stroke,
            );
            surface.stroke_line(
                Vec2::new(pointer.x, area.top),
                Vec2::new(pointer.x, area.bottom()),
                stroke,
            );
        }
        let rect = frame.device_rect();
        surface.draw_text(
            &text,
            rect.position(),
            TextStyle::new(ctx.background().contrasting(), ctx.font_size())
                .with_anchor(TextAnchor::TopLeft),
        );
    }

    /// The readout never intercepts clicks meant for the chart beneath it.
    fn hit_test(&self, _frame: &ElementFrame, _point: Vec2, _ctx: &CanvasContext) -> bool {
        false
    }

    fn on_pointer_move(&mut self, _frame: &ElementFrame, point: Vec2, ctx: &mut CanvasContext) {
        let inside = self.axes.borrow().graph_area().contains(point);
        let pointer = inside.then_some(point);
        if pointer != self.pointer {
            self.pointer = pointer;
            ctx.request_repaint();
        }
    }

    fn on_pointer_drag(&mut self, frame: &ElementFrame, point: Vec2, ctx: &mut CanvasContext) {
        self.on_pointer_move(frame, point, ctx);
    }
}
