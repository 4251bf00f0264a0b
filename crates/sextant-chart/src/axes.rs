//! The coordinate engine.
//!
//! Three spaces are in play:
//!
//! - **data space**: domain values, any sign, possibly auto-fitted
//! - **bounds space**: `[0,1]²` relative to the canvas, independent of pixels
//! - **device space**: pixels, origin top-left, y growing downward
//!
//! [`Axes`] owns the data range and the graph area (the device rectangle the
//! data range is mapped onto). The graph area depends on label sizes, so it is
//! computed lazily from the current text metrics and dropped whenever an input
//! changes.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use sextant_core::math::{DVec2, Vec2};
use sextant_core::profiling::profile_function;

use crate::config::AxesStyle;
use crate::element::{
    CanvasContext, EditorRequest, EditorTarget, ElementBehavior, ElementFrame,
};
use crate::error::ChartResult;
use crate::format::LabelFormat;
use crate::range::{TickKind, TickWalk, WalkedTick, normalize_range, rational_tick_spacing};
use crate::rect::Rect;
use crate::series::DataExtents;
use crate::surface::{DrawSurface, EstimatedMetrics, Stroke, TextAnchor, TextMetrics, TextStyle};

/// Axes shared between the axes element and the series drawn on it.
pub type SharedAxes = Rc<RefCell<Axes>>;

bitflags::bitflags! {
    /// Data range edges that follow the bound series instead of the explicit
    /// bounds.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AutoFit: u8 {
        const MIN_X = 0b0001;
        const MAX_X = 0b0010;
        const MIN_Y = 0b0100;
        const MAX_Y = 0b1000;
        const X = Self::MIN_X.bits() | Self::MAX_X.bits();
        const Y = Self::MIN_Y.bits() | Self::MAX_Y.bits();
    }
}

/// One of the two axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisTarget {
    X,
    Y,
}

/// Device rectangle the data range maps onto.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphArea {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl GraphArea {
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.left, self.top, self.width, self.height)
    }

    pub fn contains(&self, point: Vec2) -> bool {
        self.rect().contains(point)
    }
}

/// A graduation on one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    /// Device coordinate along the axis (x for the x axis, y for the y axis).
    pub position: f32,
    pub value: f64,
    pub kind: TickKind,
    /// Present on major ticks only.
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AxisTicks {
    pub x: Vec<Tick>,
    pub y: Vec<Tick>,
}

pub struct Axes {
    explicit_x: (f64, f64),
    explicit_y: (f64, f64),
    x: (f64, f64),
    y: (f64, f64),
    auto_fit: AutoFit,
    x_tick: f64,
    y_tick: f64,
    rational_ticks: bool,
    x_grid: bool,
    y_grid: bool,
    x_title: Option<String>,
    y_title: Option<String>,
    style: AxesStyle,
    format: LabelFormat,
    viewport: Rect,
    device_size: Vec2,
    metrics: Rc<dyn TextMetrics>,
    area: Cell<Option<GraphArea>>,
    range_selection: bool,
    range_anchor: Option<f32>,
    range: Option<(f64, f64)>,
    revision: u64,
}

impl fmt::Debug for Axes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Axes")
            .field("x", &self.x)
            .field("y", &self.y)
            .field("auto_fit", &self.auto_fit)
            .field("x_tick", &self.x_tick)
            .field("y_tick", &self.y_tick)
            .field("viewport", &self.viewport)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

impl Default for Axes {
    fn default() -> Self {
        Self::new()
    }
}

impl Axes {
    /// Unit data range, rational ticks, no grid, estimated font metrics.
    pub fn new() -> Self {
        let mut axes = Self {
            explicit_x: (0.0, 1.0),
            explicit_y: (0.0, 1.0),
            x: (0.0, 1.0),
            y: (0.0, 1.0),
            auto_fit: AutoFit::empty(),
            x_tick: 0.25,
            y_tick: 0.25,
            rational_ticks: true,
            x_grid: false,
            y_grid: false,
            x_title: None,
            y_title: None,
            style: AxesStyle::default(),
            format: LabelFormat::default(),
            viewport: Rect::UNIT,
            device_size: Vec2::ONE,
            metrics: Rc::new(EstimatedMetrics),
            area: Cell::new(None),
            range_selection: false,
            range_anchor: None,
            range: None,
            revision: 0,
        };
        axes.set_rational_ticks();
        axes
    }

    pub fn with_data_bounds(mut self, x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        self.set_data_bounds(x_min, x_max, y_min, y_max);
        self
    }

    pub fn with_auto_fit(mut self, auto_fit: AutoFit) -> Self {
        self.set_auto_fit(auto_fit);
        self
    }

    pub fn with_grid(mut self, x: bool, y: bool) -> Self {
        self.set_grid(x, y);
        self
    }

    pub fn with_titles(mut self, x: Option<&str>, y: Option<&str>) -> Self {
        self.set_titles(x, y);
        self
    }

    /// Invalid styles are logged and ignored; use [`set_style`](Self::set_style)
    /// to get the error.
    pub fn with_style(mut self, style: AxesStyle) -> Self {
        if let Err(err) = self.set_style(style) {
            tracing::warn!(%err, "axes style rejected");
        }
        self
    }

    pub fn with_metrics(mut self, metrics: Rc<dyn TextMetrics>) -> Self {
        self.set_metrics(metrics);
        self
    }

    pub fn with_range_selection(mut self, enabled: bool) -> Self {
        self.range_selection = enabled;
        self
    }

    /// Wrap into a [`SharedAxes`].
    pub fn shared(self) -> SharedAxes {
        Rc::new(RefCell::new(self))
    }

    fn invalidate(&mut self) {
        self.area.set(None);
        self.revision += 1;
    }

    /// Counter bumped whenever the data range or graph geometry may have
    /// moved.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Store explicit bounds. Reversed, non-finite or degenerate ranges are
    /// normalized.
    pub fn set_data_bounds(&mut self, x_min: f64, x_max: f64, y_min: f64, y_max: f64) {
        self.explicit_x = normalize_range(x_min, x_max);
        self.explicit_y = normalize_range(y_min, y_max);
        self.x = self.explicit_x;
        self.y = self.explicit_y;
        if self.rational_ticks {
            self.recompute_ticks();
        }
        tracing::debug!(x = ?self.x, y = ?self.y, "axes data bounds set");
        self.invalidate();
    }

    pub fn x_range(&self) -> (f64, f64) {
        self.x
    }

    pub fn y_range(&self) -> (f64, f64) {
        self.y
    }

    pub fn auto_fit(&self) -> AutoFit {
        self.auto_fit
    }

    pub fn set_auto_fit(&mut self, auto_fit: AutoFit) {
        self.auto_fit = auto_fit;
    }

    /// Move auto-fitted edges to `extents`; pinned edges keep their explicit
    /// value. Returns whether the range changed.
    pub fn fit_to(&mut self, extents: Option<DataExtents>) -> bool {
        let Some(extents) = extents else {
            return false;
        };
        if self.auto_fit.is_empty() {
            return false;
        }

        let pick = |flag: AutoFit, fitted: f64, explicit: f64| {
            if self.auto_fit.contains(flag) { fitted } else { explicit }
        };
        let x = normalize_range(
            pick(AutoFit::MIN_X, extents.x_min, self.explicit_x.0),
            pick(AutoFit::MAX_X, extents.x_max, self.explicit_x.1),
        );
        let y = normalize_range(
            pick(AutoFit::MIN_Y, extents.y_min, self.explicit_y.0),
            pick(AutoFit::MAX_Y, extents.y_max, self.explicit_y.1),
        );

        if x == self.x && y == self.y {
            return false;
        }
        self.x = x;
        self.y = y;
        if self.rational_ticks {
            self.recompute_ticks();
        }
        tracing::debug!(x = ?self.x, y = ?self.y, "axes auto-fitted");
        self.invalidate();
        true
    }

    /// Pick "nice" spacings for both axes and keep doing so as the range
    /// changes.
    pub fn set_rational_ticks(&mut self) {
        self.rational_ticks = true;
        self.recompute_ticks();
        self.invalidate();
    }

    fn recompute_ticks(&mut self) {
        self.x_tick = rational_tick_spacing(self.x.0, self.x.1);
        self.y_tick = rational_tick_spacing(self.y.0, self.y.1);
    }

    /// Fixed spacings. An invalid spacing falls back to the rational one for
    /// that axis.
    pub fn set_tick_spacing(&mut self, x: f64, y: f64) {
        self.rational_ticks = false;
        self.x_tick = valid_spacing(x, self.x);
        self.y_tick = valid_spacing(y, self.y);
        self.invalidate();
    }

    pub fn x_tick_spacing(&self) -> f64 {
        self.x_tick
    }

    pub fn y_tick_spacing(&self) -> f64 {
        self.y_tick
    }

    pub fn set_grid(&mut self, x: bool, y: bool) {
        self.x_grid = x;
        self.y_grid = y;
    }

    pub fn grid(&self) -> (bool, bool) {
        (self.x_grid, self.y_grid)
    }

    pub fn set_titles(&mut self, x: Option<&str>, y: Option<&str>) {
        self.x_title = x.map(str::to_owned);
        self.y_title = y.map(str::to_owned);
        self.invalidate();
    }

    pub fn style(&self) -> &AxesStyle {
        &self.style
    }

    pub fn set_style(&mut self, style: AxesStyle) -> ChartResult<()> {
        style.validate()?;
        self.style = style;
        self.invalidate();
        Ok(())
    }

    pub fn set_metrics(&mut self, metrics: Rc<dyn TextMetrics>) {
        self.metrics = metrics;
        self.invalidate();
    }

    pub fn label_format(&self) -> LabelFormat {
        self.format
    }

    /// Device rectangle of the owning element and the canvas size. No-op when
    /// nothing changed.
    pub fn set_viewport(&mut self, viewport: Rect, device_size: Vec2) {
        if self.viewport == viewport && self.device_size == device_size {
            return;
        }
        self.viewport = viewport;
        self.device_size = device_size;
        self.invalidate();
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn device_size(&self) -> Vec2 {
        self.device_size
    }

    /// Graph area, recomputed if any input changed since the last call.
    pub fn graph_area(&self) -> GraphArea {
        if let Some(area) = self.area.get() {
            return area;
        }
        profile_function!();
        let area = self.compute_layout();
        tracing::trace!(?area, "axes layout");
        self.area.set(Some(area));
        area
    }

    fn compute_layout(&self) -> GraphArea {
        let style = &self.style;
        let font = style.font_size;
        let text_height = self.metrics.text_height(font);

        let widest = |range: (f64, f64), spacing: f64| {
            label_values(range, spacing)
                .map(|v| self.metrics.text_width(&self.format.format(v), font))
                .fold(0.0f32, f32::max)
        };
        let widest_y = widest(self.y, self.y_tick);
        let widest_x = widest(self.x, self.x_tick);

        let mut left_margin = style.padding + widest_y + style.label_gap + style.tick_length;
        if self.y_title.is_some() {
            left_margin += text_height + style.label_gap;
        }
        let mut bottom_margin = style.padding + text_height + style.label_gap + style.tick_length;
        if self.x_title.is_some() {
            bottom_margin += text_height + style.label_gap;
        }
        let top_margin = style.padding + text_height / 2.0;
        let right_margin = style.padding + widest_x / 2.0;

        GraphArea {
            left: self.viewport.x + left_margin,
            top: self.viewport.y + top_margin,
            width: (self.viewport.width - left_margin - right_margin).max(1.0),
            height: (self.viewport.height - top_margin - bottom_margin).max(1.0),
        }
    }

    pub fn data_to_device_x(&self, x: f64) -> f32 {
        let area = self.graph_area();
        let (lo, hi) = self.x;
        (area.left as f64 + (x - lo) / (hi - lo) * area.width as f64) as f32
    }

    pub fn data_to_device_y(&self, y: f64) -> f32 {
        let area = self.graph_area();
        let (lo, hi) = self.y;
        (area.bottom() as f64 - (y - lo) / (hi - lo) * area.height as f64) as f32
    }

    pub fn device_to_data_x(&self, px: f32) -> f64 {
        let area = self.graph_area();
        let (lo, hi) = self.x;
        lo + (px - area.left) as f64 / area.width as f64 * (hi - lo)
    }

    pub fn device_to_data_y(&self, py: f32) -> f64 {
        let area = self.graph_area();
        let (lo, hi) = self.y;
        lo + (area.bottom() - py) as f64 / area.height as f64 * (hi - lo)
    }

    pub fn data_to_device(&self, point: DVec2) -> Vec2 {
        Vec2::new(self.data_to_device_x(point.x), self.data_to_device_y(point.y))
    }

    pub fn device_to_data(&self, point: Vec2) -> DVec2 {
        DVec2::new(self.device_to_data_x(point.x), self.device_to_data_y(point.y))
    }

    pub fn data_to_bounds(&self, point: DVec2) -> Vec2 {
        let device = self.data_to_device(point);
        Vec2::new(
            ratio(device.x, self.device_size.x),
            ratio(device.y, self.device_size.y),
        )
    }

    pub fn bounds_to_data(&self, point: Vec2) -> DVec2 {
        self.device_to_data(point * self.device_size)
    }

    /// Device x distance covered by `dx` data units.
    pub fn data_width_to_device(&self, dx: f64) -> f32 {
        let (lo, hi) = self.x;
        (dx / (hi - lo) * self.graph_area().width as f64) as f32
    }

    /// Major and minor ticks for both axes, anchored at data zero (or the
    /// nearest graph edge when zero is out of range).
    pub fn ticks(&self) -> AxisTicks {
        let area = self.graph_area();
        let minor = self.style.minor_ticks;

        let x_anchor = 0f64.clamp(self.x.0, self.x.1);
        let x_walk = TickWalk {
            anchor: (self.data_to_device_x(x_anchor) - area.left) as f64,
            step: self.data_width_to_device(self.x_tick) as f64,
            lo: 0.0,
            hi: area.width as f64,
            minor,
        };
        let x = x_walk
            .walk()
            .into_iter()
            .map(|t| self.tick(area.left + t.position as f32, x_anchor, self.x_tick, t))
            .collect();

        // Walk upward from the bottom edge so positive values go up.
        let y_anchor = 0f64.clamp(self.y.0, self.y.1);
        let y_step = self.y_tick / (self.y.1 - self.y.0) * area.height as f64;
        let y_walk = TickWalk {
            anchor: (area.bottom() - self.data_to_device_y(y_anchor)) as f64,
            step: y_step,
            lo: 0.0,
            hi: area.height as f64,
            minor,
        };
        let y = y_walk
            .walk()
            .into_iter()
            .map(|t| self.tick(area.bottom() - t.position as f32, y_anchor, self.y_tick, t))
            .collect();

        AxisTicks { x, y }
    }

    fn tick(&self, position: f32, anchor: f64, spacing: f64, walked: WalkedTick) -> Tick {
        let value = anchor + walked.steps * spacing;
        Tick {
            position,
            value,
            kind: walked.kind,
            label: (walked.kind == TickKind::Major).then(|| self.format.format(value)),
        }
    }

    /// Gridline segments for the axes whose grid flag is set.
    pub fn gridlines(&self) -> Vec<(Vec2, Vec2)> {
        if !self.x_grid && !self.y_grid {
            return Vec::new();
        }
        let area = self.graph_area();
        let ticks = self.ticks();
        let mut lines = Vec::new();
        if self.x_grid {
            lines.extend(ticks.x.iter().filter(|t| t.kind == TickKind::Major).map(|t| {
                (
                    Vec2::new(t.position, area.top),
                    Vec2::new(t.position, area.bottom()),
                )
            }));
        }
        if self.y_grid {
            lines.extend(ticks.y.iter().filter(|t| t.kind == TickKind::Major).map(|t| {
                (
                    Vec2::new(area.left, t.position),
                    Vec2::new(area.right(), t.position),
                )
            }));
        }
        lines
    }

    /// Device bands of the x and y axes: the tick and label strip below and
    /// left of the graph area, overlapping it by the tick length.
    pub fn axis_bands(&self) -> (Rect, Rect) {
        let area = self.graph_area();
        let slack = self.style.tick_length.max(1.0);
        let x_band = Rect::from_corners(
            Vec2::new(area.left, area.bottom() - slack),
            Vec2::new(area.right(), self.viewport.bottom()),
        );
        let y_band = Rect::from_corners(
            Vec2::new(self.viewport.x, area.top),
            Vec2::new(area.left + slack, area.bottom()),
        );
        (x_band, y_band)
    }

    /// Which axis, if any, a device point is near.
    pub fn axis_hit(&self, point: Vec2) -> Option<AxisTarget> {
        let (x_band, y_band) = self.axis_bands();
        if x_band.contains(point) {
            Some(AxisTarget::X)
        } else if y_band.contains(point) {
            Some(AxisTarget::Y)
        } else {
            None
        }
    }

    pub fn range_selection_enabled(&self) -> bool {
        self.range_selection
    }

    pub fn set_range_selection(&mut self, enabled: bool) {
        self.range_selection = enabled;
        if !enabled {
            self.clear_range_selection();
        }
    }

    /// Start a range selection at a bounds-space x.
    pub fn begin_range_selection(&mut self, bounds_x: f32) {
        self.range_anchor = Some(bounds_x);
        let x = self.bounds_x_to_data(bounds_x);
        self.range = Some((x, x));
    }

    /// Extend the selection to a bounds-space x. The pair stays sorted
    /// whichever way the pointer moves.
    pub fn update_range_selection(&mut self, bounds_x: f32) {
        let Some(anchor) = self.range_anchor else {
            return;
        };
        let a = self.bounds_x_to_data(anchor);
        let b = self.bounds_x_to_data(bounds_x);
        self.range = Some((a.min(b), a.max(b)));
    }

    /// Finish the selection. A zero-width selection counts as a click and
    /// clears it.
    pub fn end_range_selection(&mut self, bounds_x: f32) {
        self.update_range_selection(bounds_x);
        self.range_anchor = None;
        if let Some((lo, hi)) = self.range
            && hi <= lo
        {
            self.range = None;
        }
        tracing::debug!(range = ?self.range, "range selection finished");
    }

    pub fn clear_range_selection(&mut self) {
        self.range_anchor = None;
        self.range = None;
    }

    pub fn is_range_dragging(&self) -> bool {
        self.range_anchor.is_some()
    }

    /// Selected data-space `[left, right]`, `(0, 0)` when nothing is selected.
    pub fn selected_range(&self) -> (f64, f64) {
        self.range.unwrap_or((0.0, 0.0))
    }

    /// Device x of the left and right selection markers.
    pub fn range_markers(&self) -> Option<(f32, f32)> {
        let (lo, hi) = self.range?;
        Some((self.data_to_device_x(lo), self.data_to_device_x(hi)))
    }

    fn bounds_x_to_data(&self, bounds_x: f32) -> f64 {
        let x = self.device_to_data_x(bounds_x * self.device_size.x);
        x.clamp(self.x.0, self.x.1)
    }
}

fn ratio(value: f32, extent: f32) -> f32 {
    if extent > 0.0 { value / extent } else { 0.0 }
}

fn valid_spacing(spacing: f64, range: (f64, f64)) -> f64 {
    if spacing.is_finite() && spacing > 0.0 {
        spacing
    } else {
        tracing::warn!(spacing, "invalid tick spacing replaced with rational spacing");
        rational_tick_spacing(range.0, range.1)
    }
}

/// Major tick values across a data range, used to size labels.
fn label_values(range: (f64, f64), spacing: f64) -> impl Iterator<Item = f64> {
    let anchor = 0f64.clamp(range.0, range.1);
    TickWalk {
        anchor,
        step: spacing,
        lo: range.0,
        hi: range.1,
        minor: false,
    }
    .walk()
    .into_iter()
    .map(move |t| anchor + t.steps * spacing)
}

/// The axes as a canvas element: painting, the axis selection cycle and
/// pointer-driven range selection.
#[derive(Debug)]
pub struct AxesElement {
    axes: SharedAxes,
    selected_axis: Option<AxisTarget>,
}

impl AxesElement {
    pub fn new(axes: SharedAxes) -> Self {
        Self {
            axes,
            selected_axis: None,
        }
    }

    pub fn axes(&self) -> &SharedAxes {
        &self.axes
    }

    pub fn selected_axis(&self) -> Option<AxisTarget> {
        self.selected_axis
    }

    /// None → X → Y → None.
    pub fn cycle_selection(&mut self) -> Option<AxisTarget> {
        self.selected_axis = match self.selected_axis {
            None => Some(AxisTarget::X),
            Some(AxisTarget::X) => Some(AxisTarget::Y),
            Some(AxisTarget::Y) => None,
        };
        tracing::debug!(selected = ?self.selected_axis, "axis selection cycled");
        self.selected_axis
    }

    pub fn clear_selection(&mut self) {
        self.selected_axis = None;
    }

    fn paint_axes(&self, axes: &Axes, surface: &dyn DrawSurface, ctx: &CanvasContext) {
        let style = axes.style();
        let area = axes.graph_area();
        let ticks = axes.ticks();
        let text_height = surface.text_height(style.font_size);

        if let Some((left, right)) = axes.range_markers() {
            let band = Rect::from_corners(
                Vec2::new(left, area.top),
                Vec2::new(right, area.bottom()),
            );
            surface.fill_rect(band, style.selection_color);
            let marker = Stroke::new(ctx.selection_color(), style.line_width);
            surface.stroke_line(Vec2::new(left, area.top), Vec2::new(left, area.bottom()), marker);
            surface.stroke_line(Vec2::new(right, area.top), Vec2::new(right, area.bottom()), marker);
        }

        let grid = Stroke::new(style.grid_color, style.line_width);
        for (from, to) in axes.gridlines() {
            surface.stroke_line(from, to, grid);
        }

        let axis_stroke = |target| {
            if self.selected_axis == Some(target) {
                Stroke::new(ctx.selection_color(), style.line_width * 2.5)
            } else {
                Stroke::new(style.axis_color, style.line_width)
            }
        };
        surface.stroke_line(
            Vec2::new(area.left, area.bottom()),
            Vec2::new(area.right(), area.bottom()),
            axis_stroke(AxisTarget::X),
        );
        surface.stroke_line(
            Vec2::new(area.left, area.top),
            Vec2::new(area.left, area.bottom()),
            axis_stroke(AxisTarget::Y),
        );

        let tick_stroke = Stroke::new(style.axis_color, style.line_width);
        let label_style = TextStyle::new(style.label_color, style.font_size);
        for tick in &ticks.x {
            let length = tick_length(style, tick.kind);
            surface.stroke_line(
                Vec2::new(tick.position, area.bottom()),
                Vec2::new(tick.position, area.bottom() + length),
                tick_stroke,
            );
            if let Some(label) = &tick.label {
                surface.draw_text(
                    label,
                    Vec2::new(tick.position, area.bottom() + style.tick_length + style.label_gap),
                    label_style.with_anchor(TextAnchor::TopCenter),
                );
            }
        }
        for tick in &ticks.y {
            let length = tick_length(style, tick.kind);
            surface.stroke_line(
                Vec2::new(area.left - length, tick.position),
                Vec2::new(area.left, tick.position),
                tick_stroke,
            );
            if let Some(label) = &tick.label {
                surface.draw_text(
                    label,
                    Vec2::new(area.left - style.tick_length - style.label_gap, tick.position),
                    label_style.with_anchor(TextAnchor::CenterRight),
                );
            }
        }

        if let Some(title) = &axes.x_title {
            let y = area.bottom() + style.tick_length + style.label_gap * 2.0 + text_height;
            surface.draw_text(
                title,
                Vec2::new(area.left + area.width / 2.0, y),
                label_style.with_anchor(TextAnchor::TopCenter),
            );
        }
        if let Some(title) = &axes.y_title {
            let viewport = axes.viewport();
            surface.draw_text(
                title,
                Vec2::new(viewport.x + style.padding, area.top + area.height / 2.0),
                label_style
                    .with_anchor(TextAnchor::CenterLeft)
                    .with_vertical(true),
            );
        }
    }
}

fn tick_length(style: &AxesStyle, kind: TickKind) -> f32 {
    match kind {
        TickKind::Major => style.tick_length,
        TickKind::Minor => style.minor_tick_length,
    }
}

impl ElementBehavior for AxesElement {
    fn paint(&mut self, _frame: &ElementFrame, surface: &dyn DrawSurface, ctx: &CanvasContext) {
        profile_function!();
        let axes = self.axes.borrow();
        self.paint_axes(&axes, surface, ctx);
    }

    /// Caught only by a rectangle that touches an axis band or encloses the
    /// whole graph area.
    fn intersects_rect(&self, _frame: &ElementFrame, rect: &Rect, _ctx: &CanvasContext) -> bool {
        let axes = self.axes.borrow();
        let (x_band, y_band) = axes.axis_bands();
        rect.intersects(&x_band)
            || rect.intersects(&y_band)
            || rect.contains_rect(&axes.graph_area().rect())
    }

    fn clicked(&mut self, _frame: &ElementFrame, _point: Vec2, ctx: &mut CanvasContext) -> bool {
        let selected = self.cycle_selection().is_some();
        ctx.request_repaint();
        selected
    }

    fn un_clicked(&mut self, _frame: &ElementFrame, ctx: &mut CanvasContext) {
        if self.selected_axis.take().is_some() {
            ctx.request_repaint();
        }
    }

    fn double_clicked(
        &mut self,
        frame: &ElementFrame,
        _count: u32,
        point: Vec2,
        ctx: &mut CanvasContext,
    ) {
        let target = self
            .selected_axis
            .or_else(|| self.axes.borrow().axis_hit(point))
            .unwrap_or(AxisTarget::X);
        ctx.request_editor(EditorRequest {
            element: frame.id,
            position: point,
            target: EditorTarget::Axis(target),
        });
    }

    fn on_pointer_down(&mut self, frame: &ElementFrame, point: Vec2, ctx: &mut CanvasContext) -> bool {
        let mut axes = self.axes.borrow_mut();
        if !axes.range_selection_enabled() || !axes.graph_area().contains(point) {
            return false;
        }
        axes.begin_range_selection(frame.to_bounds(point).x);
        ctx.request_repaint();
        true
    }

    fn on_pointer_drag(&mut self, frame: &ElementFrame, point: Vec2, ctx: &mut CanvasContext) {
        let mut axes = self.axes.borrow_mut();
        if axes.is_range_dragging() {
            axes.update_range_selection(frame.to_bounds(point).x);
            ctx.request_repaint();
        }
    }

    fn on_pointer_up(&mut self, frame: &ElementFrame, point: Vec2, ctx: &mut CanvasContext) {
        let mut axes = self.axes.borrow_mut();
        if axes.is_range_dragging() {
            axes.end_range_selection(frame.to_bounds(point).x);
            ctx.request_repaint();
        }
    }

    fn set_scale(&mut self, frame: &ElementFrame, _ctx: &CanvasContext) {
        self.axes
            .borrow_mut()
            .set_viewport(frame.device_rect(), frame.device_size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axes_800x600(x: (f64, f64), y: (f64, f64)) -> Axes {
        let mut axes = Axes::new().with_data_bounds(x.0, x.1, y.0, y.1);
        axes.set_viewport(Rect::new(0.0, 0.0, 800.0, 600.0), Vec2::new(800.0, 600.0));
        axes
    }

    #[test]
    fn test_round_trip_inside_graph_area() {
        let axes = axes_800x600((-3.0, 17.0), (-14.0, 10.0));
        let area = axes.graph_area();
        for i in 0..=10 {
            for j in 0..=10 {
                let p = Vec2::new(
                    area.left + area.width * i as f32 / 10.0,
                    area.top + area.height * j as f32 / 10.0,
                );
                let back = axes.data_to_device(axes.device_to_data(p));
                assert!((back - p).length() < 1e-3, "{p:?} -> {back:?}");
            }
        }
    }

    #[test]
    fn test_y_grows_downward_in_device_space() {
        let axes = axes_800x600((0.0, 1.0), (0.0, 10.0));
        let area = axes.graph_area();
        assert!((axes.data_to_device_y(0.0) - area.bottom()).abs() < 1e-3);
        assert!((axes.data_to_device_y(10.0) - area.top).abs() < 1e-3);
        assert!((axes.data_to_device_x(0.0) - area.left).abs() < 1e-3);
    }

    #[test]
    fn test_bounds_round_trip() {
        let axes = axes_800x600((0.0, 100.0), (-1.0, 1.0));
        let data = DVec2::new(42.0, 0.5);
        let back = axes.bounds_to_data(axes.data_to_bounds(data));
        assert!((back - data).length() < 1e-3);
    }

    #[test]
    fn test_degenerate_bounds_are_normalized() {
        let axes = axes_800x600((3.0, 3.0), (0.0, 0.0));
        assert_eq!(axes.x_range(), (1.5, 4.5));
        assert_eq!(axes.y_range(), (0.0, 0.001));
        assert!(axes.data_to_device_x(3.0).is_finite());
    }

    #[test]
    fn test_extreme_bounds_stay_finite() {
        let axes = axes_800x600((-1.7e308, 1.7e308), (0.0, 1.0));
        assert_eq!(axes.x_range(), (-8.5e307, 8.5e307));
        assert!(axes.data_to_device_x(0.0).is_finite());
        assert!(axes.x_tick_spacing().is_finite());
    }

    #[test]
    fn test_rational_ticks_for_negative_range() {
        let axes = axes_800x600((0.0, 1.0), (-14.0, 10.0));
        assert_eq!(axes.y_tick_spacing(), 5.0);
    }

    #[test]
    fn test_ticks_anchor_at_zero() {
        let axes = axes_800x600((-14.0, 10.0), (0.0, 1.0));
        let ticks = axes.ticks();
        let mut majors: Vec<f64> = ticks
            .x
            .iter()
            .filter(|t| t.kind == TickKind::Major)
            .map(|t| t.value)
            .collect();
        majors.sort_by(f64::total_cmp);
        assert_eq!(majors, vec![-10.0, -5.0, 0.0, 5.0, 10.0]);

        let zero = ticks.x.iter().find(|t| t.value == 0.0).unwrap();
        assert!((zero.position - axes.data_to_device_x(0.0)).abs() < 1e-3);
        assert_eq!(zero.label.as_deref(), Some("0"));
        assert!(ticks.x.iter().any(|t| t.kind == TickKind::Minor && t.label.is_none()));
    }

    #[test]
    fn test_y_ticks_positive_values_go_up() {
        let axes = axes_800x600((0.0, 1.0), (-14.0, 10.0));
        let ticks = axes.ticks();
        let five = ticks.y.iter().find(|t| t.value == 5.0).unwrap();
        let minus_five = ticks.y.iter().find(|t| t.value == -5.0).unwrap();
        assert!(five.position < minus_five.position);
        assert!((five.position - axes.data_to_device_y(5.0)).abs() < 1e-2);
    }

    #[test]
    fn test_ticks_anchor_clamps_to_edge() {
        let axes = axes_800x600((100.0, 101.7), (0.0, 1.0));
        let ticks = axes.ticks();
        let first = ticks
            .x
            .iter()
            .find(|t| t.kind == TickKind::Major && t.value == 100.0)
            .unwrap();
        assert!((first.position - axes.graph_area().left).abs() < 1e-3);
    }

    #[test]
    fn test_layout_reserves_label_space() {
        let axes = axes_800x600((0.0, 1.0), (-10000.0, 10000.0));
        let area = axes.graph_area();
        let style = AxesStyle::default();
        // "-10000" at 12px, 0.6 em per char.
        let label = 6.0 * 12.0 * 0.6;
        let expected = style.padding + label + style.label_gap + style.tick_length;
        assert!((area.left - expected).abs() < 1e-3);
        assert!(area.width > 0.0 && area.height > 0.0);
    }

    #[test]
    fn test_degenerate_viewport_keeps_positive_area() {
        let mut axes = Axes::new();
        axes.set_viewport(Rect::new(10.0, 10.0, 0.0, 0.0), Vec2::new(100.0, 100.0));
        let area = axes.graph_area();
        assert_eq!(area.width, 1.0);
        assert_eq!(area.height, 1.0);
        assert!(axes.device_to_data_x(50.0).is_finite());
    }

    #[test]
    fn test_revision_tracks_changes() {
        let mut axes = axes_800x600((0.0, 1.0), (0.0, 1.0));
        let before = axes.revision();
        axes.set_viewport(Rect::new(0.0, 0.0, 800.0, 600.0), Vec2::new(800.0, 600.0));
        assert_eq!(axes.revision(), before);
        axes.set_data_bounds(0.0, 2.0, 0.0, 1.0);
        assert!(axes.revision() > before);
    }

    #[test]
    fn test_fit_to_keeps_pinned_edges() {
        let mut axes = axes_800x600((0.0, 10.0), (0.0, 10.0)).with_auto_fit(AutoFit::MAX_X | AutoFit::Y);
        let changed = axes.fit_to(Some(DataExtents {
            x_min: 2.0,
            x_max: 50.0,
            y_min: -3.0,
            y_max: 4.0,
        }));
        assert!(changed);
        assert_eq!(axes.x_range(), (0.0, 50.0));
        assert_eq!(axes.y_range(), (-3.0, 4.0));
        assert!(!axes.fit_to(None));
    }

    #[test]
    fn test_range_selection_sorted_and_cleared() {
        let mut axes = axes_800x600((0.0, 100.0), (0.0, 1.0));
        assert_eq!(axes.selected_range(), (0.0, 0.0));
        let area = axes.graph_area();
        let to_bounds = |px: f32| px / 800.0;

        axes.begin_range_selection(to_bounds(area.left + area.width * 0.75));
        axes.update_range_selection(to_bounds(area.left + area.width * 0.25));
        axes.end_range_selection(to_bounds(area.left + area.width * 0.25));
        let (lo, hi) = axes.selected_range();
        assert!((lo - 25.0).abs() < 1e-3 && (hi - 75.0).abs() < 1e-3);
        let (left, right) = axes.range_markers().unwrap();
        assert!(left < right);

        axes.clear_range_selection();
        assert_eq!(axes.selected_range(), (0.0, 0.0));
    }

    #[test]
    fn test_axis_hit_regions() {
        let axes = axes_800x600((0.0, 1.0), (0.0, 1.0));
        let area = axes.graph_area();
        assert_eq!(
            axes.axis_hit(Vec2::new(area.left + 50.0, area.bottom() + 5.0)),
            Some(AxisTarget::X)
        );
        assert_eq!(
            axes.axis_hit(Vec2::new(area.left - 5.0, area.top + 50.0)),
            Some(AxisTarget::Y)
        );
        assert_eq!(axes.axis_hit(area.rect().center()), None);
    }

    #[test]
    fn test_selection_cycle() {
        let mut element = AxesElement::new(Axes::new().shared());
        assert_eq!(element.cycle_selection(), Some(AxisTarget::X));
        assert_eq!(element.cycle_selection(), Some(AxisTarget::Y));
        assert_eq!(element.cycle_selection(), None);
    }

    #[test]
    fn test_invalid_style_is_rejected() {
        let mut axes = Axes::new();
        let revision = axes.revision();
        let bad = AxesStyle::default().with_font_size(-1.0);
        assert!(axes.set_style(bad).is_err());
        assert_eq!(axes.revision(), revision);
        assert_eq!(axes.style().font_size, AxesStyle::default().font_size);
    }
}
