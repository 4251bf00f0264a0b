//! Series bindings: a [`Series`] drawn on an [`Axes`].
//!
//! The binding turns samples into bounds-space geometry, caches it until the
//! axes, the series or the canvas size move, and answers hit tests.

use std::fmt;
use std::str::FromStr;

use sextant_core::math::{DVec2, Vec2};
use sextant_core::profiling::profile_function;

use crate::axes::{Axes, SharedAxes};
use crate::cache::{CacheKey, GeometryDirty, SeriesGeometry};
use crate::color::Color;
use crate::element::{CanvasContext, EditorRequest, EditorTarget, ElementBehavior, ElementFrame};
use crate::error::{ChartError, ChartResult};
use crate::legend::LegendEntry;
use crate::rect::Rect;
use crate::series::{Series, SharedSeries};
use crate::surface::{DrawSurface, Stroke};

/// How a series is drawn. Exactly one mode is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DisplayMode {
    #[default]
    Lines,
    Points,
    PointsAndLines,
    /// Bars from the zero line (or the nearest visible edge) to each sample.
    Boxes,
}

impl DisplayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayMode::Lines => "lines",
            DisplayMode::Points => "points",
            DisplayMode::PointsAndLines => "points_and_lines",
            DisplayMode::Boxes => "boxes",
        }
    }

    pub fn draws_lines(&self) -> bool {
        matches!(self, DisplayMode::Lines | DisplayMode::PointsAndLines)
    }

    pub fn draws_markers(&self) -> bool {
        matches!(self, DisplayMode::Points | DisplayMode::PointsAndLines)
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisplayMode {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lines" | "line" => Ok(DisplayMode::Lines),
            "points" | "point" => Ok(DisplayMode::Points),
            "points_and_lines" | "points+lines" | "pointsandlines" => {
                Ok(DisplayMode::PointsAndLines)
            }
            "boxes" | "box" | "bars" => Ok(DisplayMode::Boxes),
            _ => Err(ChartError::InvalidDisplayMode(s.to_owned())),
        }
    }
}

/// Marker shape for point modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MarkerKind {
    #[default]
    Square,
    Circle,
    Triangle,
    Diamond,
    Cross,
}

const CIRCLE_SEGMENTS: usize = 12;

impl MarkerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerKind::Square => "square",
            MarkerKind::Circle => "circle",
            MarkerKind::Triangle => "triangle",
            MarkerKind::Diamond => "diamond",
            MarkerKind::Cross => "cross",
        }
    }

    /// Filled outline centered on `center`. Empty for [`MarkerKind::Cross`],
    /// which is stroked.
    pub fn outline(&self, center: Vec2, size: f32) -> Vec<Vec2> {
        let h = size / 2.0;
        let offsets: Vec<Vec2> = match self {
            MarkerKind::Square => vec![
                Vec2::new(-h, -h),
                Vec2::new(h, -h),
                Vec2::new(h, h),
                Vec2::new(-h, h),
            ],
            MarkerKind::Circle => (0..CIRCLE_SEGMENTS)
                .map(|i| {
                    let angle = i as f32 / CIRCLE_SEGMENTS as f32 * std::f32::consts::TAU;
                    Vec2::new(angle.cos(), angle.sin()) * h
                })
                .collect(),
            MarkerKind::Triangle => vec![Vec2::new(0.0, -h), Vec2::new(h, h), Vec2::new(-h, h)],
            MarkerKind::Diamond => vec![
                Vec2::new(0.0, -h),
                Vec2::new(h, 0.0),
                Vec2::new(0.0, h),
                Vec2::new(-h, 0.0),
            ],
            MarkerKind::Cross => Vec::new(),
        };
        offsets.into_iter().map(|o| center + o).collect()
    }

    pub fn paint(&self, surface: &dyn DrawSurface, center: Vec2, size: f32, color: Color) {
        if *self == MarkerKind::Cross {
            let h = size / 2.0;
            let stroke = Stroke::new(color, 1.0);
            surface.stroke_line(center - Vec2::splat(h), center + Vec2::splat(h), stroke);
            surface.stroke_line(center + Vec2::new(-h, h), center + Vec2::new(h, -h), stroke);
        } else {
            surface.fill_polygon(&self.outline(center, size), color);
        }
    }
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarkerKind {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "square" => Ok(MarkerKind::Square),
            "circle" => Ok(MarkerKind::Circle),
            "triangle" => Ok(MarkerKind::Triangle),
            "diamond" => Ok(MarkerKind::Diamond),
            "cross" | "x" => Ok(MarkerKind::Cross),
            _ => Err(ChartError::InvalidMarker(s.to_owned())),
        }
    }
}

/// The record a property editor hands back; applied all at once.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesOptions {
    pub name: String,
    pub display_mode: DisplayMode,
    pub line_color: Color,
    pub line_width: f32,
    pub marker_type: MarkerKind,
    pub marker_size: f32,
}

impl SeriesOptions {
    /// Build from the string form editors usually produce.
    pub fn parse(
        name: &str,
        display_mode: &str,
        line_color: &str,
        line_width: f32,
        marker_type: &str,
        marker_size: f32,
    ) -> ChartResult<Self> {
        let options = Self {
            name: name.to_owned(),
            display_mode: display_mode.parse()?,
            line_color: line_color.parse()?,
            line_width,
            marker_type: marker_type.parse()?,
            marker_size,
        };
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> ChartResult<()> {
        for (field, value) in [("line_width", self.line_width), ("marker_size", self.marker_size)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ChartError::InvalidStyle { field, value });
            }
        }
        Ok(())
    }
}

/// `offset_k = k - (n - 1) / 2` for `k` in `0..n`: symmetric around zero,
/// half-integers when `n` is even.
pub fn box_offsets(n: usize) -> impl Iterator<Item = f32> {
    let center = (n as f32 - 1.0) / 2.0;
    (0..n).map(move |k| k as f32 - center)
}

/// A series drawn on an axes.
#[derive(Debug)]
pub struct SeriesBinding {
    series: SharedSeries,
    axes: SharedAxes,
    mode: DisplayMode,
    marker: MarkerKind,
    marker_size: f32,
    line_color: Color,
    line_width: f32,
    box_divisor: u32,
    box_offset: f32,
    geometry: SeriesGeometry,
}

impl SeriesBinding {
    pub fn new(series: SharedSeries, axes: SharedAxes) -> Self {
        Self {
            series,
            axes,
            mode: DisplayMode::Lines,
            marker: MarkerKind::Square,
            marker_size: 6.0,
            line_color: Color::BLACK,
            line_width: 1.0,
            box_divisor: 1,
            box_offset: 0.0,
            geometry: SeriesGeometry::new(),
        }
    }

    pub fn with_mode(mut self, mode: DisplayMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.line_color = color;
        self
    }

    pub fn with_marker(mut self, marker: MarkerKind, size: f32) -> Self {
        self.marker = marker;
        self.marker_size = size;
        self
    }

    pub fn with_line_width(mut self, width: f32) -> Self {
        self.line_width = width;
        self
    }

    pub fn series(&self) -> &SharedSeries {
        &self.series
    }

    pub fn axes(&self) -> &SharedAxes {
        &self.axes
    }

    /// Whether this binding draws on `axes`.
    pub fn shares_axes(&self, axes: &SharedAxes) -> bool {
        std::rc::Rc::ptr_eq(&self.axes, axes)
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.mode
    }

    /// Returns whether the mode changed. Z placement and sibling box layout
    /// are the canvas's job, see
    /// [`Canvas::set_display_mode`](crate::canvas::Canvas::set_display_mode).
    pub fn set_display_mode(&mut self, mode: DisplayMode) -> bool {
        if self.mode == mode {
            return false;
        }
        self.mode = mode;
        if mode != DisplayMode::Boxes {
            self.set_box_layout(1, 0.0);
        }
        self.geometry.invalidate(GeometryDirty::LAYOUT);
        true
    }

    pub fn line_color(&self) -> Color {
        self.line_color
    }

    pub fn marker(&self) -> MarkerKind {
        self.marker
    }

    /// `(divisor, offset)` used to place boxes side by side.
    pub fn box_layout(&self) -> (u32, f32) {
        (self.box_divisor, self.box_offset)
    }

    pub fn set_box_layout(&mut self, divisor: u32, offset: f32) {
        let divisor = divisor.max(1);
        if (divisor, offset) != (self.box_divisor, self.box_offset) {
            self.box_divisor = divisor;
            self.box_offset = offset;
            self.geometry.invalidate(GeometryDirty::LAYOUT);
        }
    }

    /// Current options as an editor would display them.
    pub fn options(&self) -> SeriesOptions {
        SeriesOptions {
            name: self.series.borrow().name().to_owned(),
            display_mode: self.mode,
            line_color: self.line_color,
            line_width: self.line_width,
            marker_type: self.marker,
            marker_size: self.marker_size,
        }
    }

    /// Validate and apply a finished options record. Nothing changes on error.
    /// Returns whether the display mode changed.
    pub fn apply_options(&mut self, options: &SeriesOptions) -> ChartResult<bool> {
        options.validate()?;
        {
            let mut series = self.series.borrow_mut();
            if series.name() != options.name {
                series.set_name(options.name.clone());
            }
        }
        self.line_color = options.line_color;
        self.line_width = options.line_width;
        self.marker = options.marker_type;
        self.marker_size = options.marker_size;
        self.geometry.invalidate(GeometryDirty::STYLE);
        Ok(self.set_display_mode(options.display_mode))
    }

    pub fn legend_entry(&self) -> LegendEntry {
        LegendEntry {
            name: self.series.borrow().name().to_owned(),
            color: self.line_color,
            marker: self.marker,
            mode: self.mode,
        }
    }

    pub fn geometry(&self) -> &SeriesGeometry {
        &self.geometry
    }

    fn cache_key(&self) -> CacheKey {
        let axes = self.axes.borrow();
        CacheKey {
            axes_revision: axes.revision(),
            series_revision: self.series.borrow().revision(),
            device_size: axes.device_size(),
            box_divisor: self.box_divisor,
            box_offset: self.box_offset,
            mode: self.mode,
        }
    }

    pub fn is_dirty(&self) -> bool {
        !self.geometry.is_valid(&self.cache_key())
    }

    /// What moved since the cached geometry was built.
    pub fn stale_reasons(&self) -> GeometryDirty {
        self.geometry.staleness(&self.cache_key())
    }

    /// Rebuild cached geometry if stale. Returns whether it rebuilt.
    pub fn rebuild_if_dirty(&mut self) -> bool {
        let key = self.cache_key();
        let stale = self.geometry.staleness(&key);
        if !stale.needs_rebuild() {
            if stale.is_style_only() {
                tracing::trace!("style-only change, geometry kept");
                self.geometry.clear_style();
            }
            return false;
        }
        profile_function!();

        let series = self.series.borrow();
        let axes = self.axes.borrow();
        let points: Vec<Vec2> = series
            .samples()
            .iter()
            .map(|s| axes.data_to_bounds(DVec2::new(s.x, s.y)))
            .collect();

        let boxes = if self.mode == DisplayMode::Boxes {
            let size = axes.device_size();
            let width = self.box_width(&axes, &series);
            (0..series.len())
                .filter_map(|i| self.box_rect(&axes, &series, i, width))
                .map(|r| to_bounds_rect(r, size))
                .collect()
        } else {
            Vec::new()
        };

        tracing::trace!(
            series = series.name(),
            points = points.len(),
            boxes = boxes.len(),
            ?stale,
            "series geometry rebuilt"
        );
        drop(series);
        drop(axes);
        self.geometry.store(key, points, boxes);
        true
    }

    /// Device width of one box. Falls back to one pixel when the computed
    /// width is unusable.
    pub fn box_width_px(&self) -> f32 {
        self.box_width(&self.axes.borrow(), &self.series.borrow())
    }

    fn box_width(&self, axes: &Axes, series: &Series) -> f32 {
        let (lo, hi) = axes.x_range();
        let raw = match series.sample_spacing() {
            Some(spacing) => axes.data_width_to_device(spacing),
            None => axes.graph_area().width / series.visible_count(lo, hi).max(1) as f32,
        };
        let width = raw / self.box_divisor.max(1) as f32;
        if width.is_finite() && width > 0.0 {
            width
        } else {
            tracing::warn!(width, "unusable box width replaced with 1px");
            1.0
        }
    }

    fn box_rect(&self, axes: &Axes, series: &Series, index: usize, width: f32) -> Option<Rect> {
        let sample = series.get(index)?;
        let (y_lo, y_hi) = axes.y_range();
        let center = axes.data_to_device_x(sample.x) + self.box_offset * width;
        let base = axes.data_to_device_y(0f64.clamp(y_lo, y_hi));
        let top = axes.data_to_device_y(sample.y);
        Some(Rect::from_corners(
            Vec2::new(center - width / 2.0, base),
            Vec2::new(center + width / 2.0, top),
        ))
    }

    /// Device rectangle of the box drawn for sample `index`.
    pub fn box_rect_device(&self, index: usize) -> Option<Rect> {
        let axes = self.axes.borrow();
        let series = self.series.borrow();
        let width = self.box_width(&axes, &series);
        self.box_rect(&axes, &series, index, width)
    }

    /// Whether a device point touches the drawn series, within `tolerance`
    /// pixels in both directions.
    pub fn hit_test_point(&self, point: Vec2, tolerance: f32) -> bool {
        let series = self.series.borrow();
        let axes = self.axes.borrow();
        let n = series.len();
        if n == 0 {
            return false;
        }
        let area = axes.graph_area().rect().inset(-tolerance);
        if !area.contains(point) {
            return false;
        }

        // Boxes reach sideways by their own width and offset as well.
        let box_width = match self.mode {
            DisplayMode::Boxes => self.box_width(&axes, &series),
            _ => 0.0,
        };
        let reach = tolerance + box_width * (self.box_offset.abs() + 0.5);
        let a = series.index_for_x_val(axes.device_to_data_x(point.x - reach));
        let b = series.index_for_x_val(axes.device_to_data_x(point.x + reach));
        let (first, last) = (a.min(b), a.max(b));
        let window = first.saturating_sub(1)..=(last + 1).min(n - 1);
        let device = |i: usize| {
            let s = series.samples()[i];
            axes.data_to_device(DVec2::new(s.x, s.y))
        };
        let near = |q: Vec2| {
            let d = (q - point).abs();
            d.x <= tolerance && d.y <= tolerance
        };

        match self.mode {
            DisplayMode::Boxes => window
                .filter_map(|i| self.box_rect(&axes, &series, i, box_width))
                .any(|r| r.contains(point)),
            DisplayMode::Points => window.map(device).any(near),
            DisplayMode::Lines | DisplayMode::PointsAndLines => {
                if n == 1 {
                    return near(device(0));
                }
                let mut segments = first.saturating_sub(1)..=(last + 1).min(n - 2);
                segments.any(|i| near(closest_on_segment(device(i), device(i + 1), point)))
                    || (self.mode == DisplayMode::PointsAndLines && window.map(device).any(near))
            }
        }
    }
}

fn closest_on_segment(a: Vec2, b: Vec2, p: Vec2) -> Vec2 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 <= f32::EPSILON {
        return a;
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    a + ab * t
}

fn to_bounds_rect(rect: Rect, device_size: Vec2) -> Rect {
    let inv = Vec2::new(
        if device_size.x > 0.0 { 1.0 / device_size.x } else { 0.0 },
        if device_size.y > 0.0 { 1.0 / device_size.y } else { 0.0 },
    );
    rect.scale(inv)
}

impl ElementBehavior for SeriesBinding {
    fn paint(&mut self, frame: &ElementFrame, surface: &dyn DrawSurface, ctx: &CanvasContext) {
        profile_function!();
        self.rebuild_if_dirty();
        let size = frame.device_size;
        let points: Vec<Vec2> = self.geometry.points.iter().map(|p| *p * size).collect();
        let stroke = Stroke::new(self.line_color, self.line_width);

        if self.mode == DisplayMode::Boxes {
            for rect in &self.geometry.boxes {
                let rect = rect.scale(size);
                surface.fill_rect(rect, self.line_color);
                if frame.selected {
                    surface.stroke_rect(rect, Stroke::new(ctx.selection_color(), 2.0));
                }
            }
            return;
        }

        if self.mode.draws_lines() && points.len() >= 2 {
            if frame.selected {
                let halo = Stroke::new(ctx.selection_color(), self.line_width + 3.0);
                surface.stroke_polyline(&points, halo);
            }
            surface.stroke_polyline(&points, stroke);
        }
        if self.mode.draws_markers() {
            for p in &points {
                self.marker.paint(surface, *p, self.marker_size, self.line_color);
            }
        }
        if frame.selected {
            // Vertex handles, thinned out on long series.
            let stride = (points.len() / 32).max(1);
            for p in points.iter().step_by(stride) {
                let handle = Rect::new(p.x - 2.5, p.y - 2.5, 5.0, 5.0);
                surface.stroke_rect(handle, Stroke::new(ctx.selection_color(), 1.0));
            }
        }
    }

    fn hit_test(&self, _frame: &ElementFrame, point: Vec2, ctx: &CanvasContext) -> bool {
        self.hit_test_point(point, ctx.hit_tolerance())
    }

    fn intersects_rect(&self, _frame: &ElementFrame, rect: &Rect, _ctx: &CanvasContext) -> bool {
        if self.mode == DisplayMode::Boxes {
            let series_len = self.series.borrow().len();
            return (0..series_len)
                .filter_map(|i| self.box_rect_device(i))
                .any(|b| b.intersects(rect));
        }
        let series = self.series.borrow();
        let axes = self.axes.borrow();
        series
            .samples()
            .iter()
            .any(|s| rect.contains(axes.data_to_device(DVec2::new(s.x, s.y))))
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
            target: EditorTarget::Series(self.options()),
        });
    }
}
