//! Canvas and axes configuration.

use std::time::Duration;

use crate::color::Color;
use crate::error::{ChartError, ChartResult};

/// Default delay before accumulated clicks are dispatched.
pub const DEFAULT_DOUBLE_CLICK_DELAY: Duration = Duration::from_millis(200);

/// Interaction and appearance settings for a [`Canvas`](crate::canvas::Canvas).
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasConfig {
    /// Accumulate clicks on a timer so that clicks on different elements can
    /// form one double click. When off, the host's native click count is used.
    pub multi_select_double_click: bool,
    /// Timer delay for the mode above.
    pub double_click_delay: Duration,
    /// Pointer travel in pixels before a press turns into a drag.
    pub drag_threshold: f32,
    /// Drag on empty space draws a selection rectangle.
    pub rect_selection: bool,
    /// Keep the finished selection rectangle visible until the next click.
    pub preserve_selection_rect: bool,
    /// Half-size in pixels of the hit box used for series hit tests.
    pub hit_tolerance: f32,
    pub background: Color,
    pub selection_color: Color,
    pub font_size: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            multi_select_double_click: false,
            double_click_delay: DEFAULT_DOUBLE_CLICK_DELAY,
            drag_threshold: 3.0,
            rect_selection: true,
            preserve_selection_rect: false,
            hit_tolerance: 4.0,
            background: Color::WHITE,
            selection_color: Color::rgb(0.2, 0.45, 0.9),
            font_size: 12.0,
        }
    }
}

impl CanvasConfig {
    pub fn with_multi_select_double_click(mut self, enabled: bool) -> Self {
        self.multi_select_double_click = enabled;
        self
    }

    pub fn with_double_click_delay(mut self, delay: Duration) -> Self {
        self.double_click_delay = delay;
        self
    }

    pub fn with_drag_threshold(mut self, threshold: f32) -> Self {
        self.drag_threshold = threshold;
        self
    }

    pub fn with_rect_selection(mut self, enabled: bool) -> Self {
        self.rect_selection = enabled;
        self
    }

    pub fn with_preserve_selection_rect(mut self, preserve: bool) -> Self {
        self.preserve_selection_rect = preserve;
        self
    }

    pub fn with_hit_tolerance(mut self, tolerance: f32) -> Self {
        self.hit_tolerance = tolerance;
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    /// Reject values that would make interaction or layout meaningless.
    pub fn validate(&self) -> ChartResult<()> {
        positive_or_zero("drag_threshold", self.drag_threshold)?;
        positive_or_zero("hit_tolerance", self.hit_tolerance)?;
        positive("font_size", self.font_size)
    }
}

/// Appearance of an axes element.
#[derive(Debug, Clone, PartialEq)]
pub struct AxesStyle {
    pub tick_length: f32,
    pub minor_tick_length: f32,
    /// Gap between tick end and label.
    pub label_gap: f32,
    /// Outer padding between the element edge and the labels.
    pub padding: f32,
    pub font_size: f32,
    pub axis_color: Color,
    pub grid_color: Color,
    pub label_color: Color,
    pub selection_color: Color,
    pub line_width: f32,
    pub minor_ticks: bool,
}

impl Default for AxesStyle {
    fn default() -> Self {
        Self {
            tick_length: 6.0,
            minor_tick_length: 3.0,
            label_gap: 3.0,
            padding: 4.0,
            font_size: 12.0,
            axis_color: Color::BLACK,
            grid_color: Color::rgb(0.85, 0.85, 0.85),
            label_color: Color::BLACK,
            selection_color: Color::rgba(0.2, 0.45, 0.9, 0.25),
            line_width: 1.0,
            minor_ticks: true,
        }
    }
}

impl AxesStyle {
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    pub fn with_tick_length(mut self, length: f32) -> Self {
        self.tick_length = length;
        self
    }

    pub fn with_minor_ticks(mut self, minor: bool) -> Self {
        self.minor_ticks = minor;
        self
    }

    pub fn with_grid_color(mut self, color: Color) -> Self {
        self.grid_color = color;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        positive_or_zero("tick_length", self.tick_length)?;
        positive_or_zero("padding", self.padding)?;
        positive("font_size", self.font_size)?;
        positive("line_width", self.line_width)
    }
}

fn positive(field: &'static str, value: f32) -> ChartResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ChartError::InvalidStyle { field, value })
    }
}

fn positive_or_zero(field: &'static str, value: f32) -> ChartResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ChartError::InvalidStyle { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CanvasConfig::default();
        assert!(!config.multi_select_double_click);
        assert_eq!(config.double_click_delay, Duration::from_millis(200));
        assert!(config.validate().is_ok());
        assert!(AxesStyle::default().validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let config = CanvasConfig::default().with_font_size(0.0);
        assert_eq!(
            config.validate(),
            Err(ChartError::InvalidStyle {
                field: "font_size",
                value: 0.0
            })
        );
        let style = AxesStyle::default().with_tick_length(f32::NAN);
        assert!(style.validate().is_err());
    }
}
