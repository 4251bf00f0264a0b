//! Positioned, selectable chart elements.
//!
//! An [`Element`] pairs the placement state every element shares (bounds,
//! z-position, selection and mobility flags, device scale) with an
//! [`ElementKind`] that supplies the actual behavior. Elements never hold a
//! pointer to their canvas; the canvas lends them a [`CanvasContext`] for the
//! duration of each callback.

use std::fmt;

use sextant_core::math::Vec2;

use crate::axes::{AxesElement, AxisTarget};
use crate::binding::{SeriesBinding, SeriesOptions};
use crate::color::Color;
use crate::config::CanvasConfig;
use crate::indicator::PositionIndicator;
use crate::legend::Legend;
use crate::rect::Rect;
use crate::surface::DrawSurface;
use crate::text::TextLabel;

/// Stable handle to an element on a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ElementId(pub u32);

impl ElementId {
    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What an external property editor should show.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorTarget {
    /// Current options of a series binding.
    Series(SeriesOptions),
    /// One axis of an axes element.
    Axis(AxisTarget),
    /// A text label's content.
    Text(String),
    Legend,
}

/// "Open an editor for element E at device position P."
#[derive(Debug, Clone, PartialEq)]
pub struct EditorRequest {
    pub element: ElementId,
    pub position: Vec2,
    pub target: EditorTarget,
}

/// Canvas state lent to element callbacks.
#[derive(Debug, Clone)]
pub struct CanvasContext {
    background: Color,
    selection_color: Color,
    device_size: Vec2,
    font_size: f32,
    hit_tolerance: f32,
    repaint: bool,
    editor_requests: Vec<EditorRequest>,
}

impl CanvasContext {
    pub fn new(config: &CanvasConfig, device_size: Vec2) -> Self {
        Self {
            background: config.background,
            selection_color: config.selection_color,
            device_size,
            font_size: config.font_size,
            hit_tolerance: config.hit_tolerance,
            repaint: true,
            editor_requests: Vec::new(),
        }
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn selection_color(&self) -> Color {
        self.selection_color
    }

    pub fn device_size(&self) -> Vec2 {
        self.device_size
    }

    pub(crate) fn set_device_size(&mut self, size: Vec2) {
        self.device_size = size;
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    /// Half-size of the series hit box in pixels.
    pub fn hit_tolerance(&self) -> f32 {
        self.hit_tolerance
    }

    /// Ask the host for a repaint. Requests coalesce.
    pub fn request_repaint(&mut self) {
        self.repaint = true;
    }

    pub fn needs_repaint(&self) -> bool {
        self.repaint
    }

    pub(crate) fn take_repaint(&mut self) -> bool {
        std::mem::take(&mut self.repaint)
    }

    pub fn request_editor(&mut self, request: EditorRequest) {
        self.editor_requests.push(request);
    }

    pub(crate) fn take_editor_requests(&mut self) -> Vec<EditorRequest> {
        std::mem::take(&mut self.editor_requests)
    }
}

/// Placement state shared by every element kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementFrame {
    pub id: ElementId,
    /// Position relative to the canvas, nominally within `[0,1]²`.
    pub bounds: Rect,
    pub z: i32,
    pub selected: bool,
    /// Canvas size in pixels as of the last `set_scale`.
    pub device_size: Vec2,
}

impl ElementFrame {
    /// Bounds in device pixels.
    pub fn device_rect(&self) -> Rect {
        self.bounds.scale(self.device_size)
    }

    pub fn to_device(&self, bounds_point: Vec2) -> Vec2 {
        bounds_point * self.device_size
    }

    /// Device point to bounds space. A zero-sized canvas maps everything to
    /// the origin.
    pub fn to_bounds(&self, device_point: Vec2) -> Vec2 {
        Vec2::new(
            safe_ratio(device_point.x, self.device_size.x),
            safe_ratio(device_point.y, self.device_size.y),
        )
    }
}

fn safe_ratio(value: f32, extent: f32) -> f32 {
    if extent > 0.0 && extent.is_finite() {
        value / extent
    } else {
        0.0
    }
}

/// Capabilities every element kind provides.
///
/// Points are device pixels. Defaults treat the element as its device
/// rectangle and ignore interaction.
pub trait ElementBehavior {
    fn paint(&mut self, frame: &ElementFrame, surface: &dyn DrawSurface, ctx: &CanvasContext);

    fn hit_test(&self, frame: &ElementFrame, point: Vec2, _ctx: &CanvasContext) -> bool {
        frame.device_rect().contains(point)
    }

    /// Whether a device-space selection rectangle catches this element.
    fn intersects_rect(&self, frame: &ElementFrame, rect: &Rect, _ctx: &CanvasContext) -> bool {
        frame.device_rect().intersects(rect)
    }

    /// Single click inside the element. Returns whether it stays selected.
    fn clicked(&mut self, _frame: &ElementFrame, _point: Vec2, _ctx: &mut CanvasContext) -> bool {
        true
    }

    /// A click landed somewhere else.
    fn un_clicked(&mut self, _frame: &ElementFrame, _ctx: &mut CanvasContext) {}

    fn double_clicked(
        &mut self,
        _frame: &ElementFrame,
        _count: u32,
        _point: Vec2,
        _ctx: &mut CanvasContext,
    ) {
    }

    /// Raw pointer press, only delivered to registered elements. Returning
    /// `true` captures the gesture so it neither moves elements nor draws a
    /// selection rectangle.
    fn on_pointer_down(
        &mut self,
        _frame: &ElementFrame,
        _point: Vec2,
        _ctx: &mut CanvasContext,
    ) -> bool {
        false
    }

    fn on_pointer_move(&mut self, _frame: &ElementFrame, _point: Vec2, _ctx: &mut CanvasContext) {}

    fn on_pointer_drag(&mut self, _frame: &ElementFrame, _point: Vec2, _ctx: &mut CanvasContext) {}

    fn on_pointer_up(&mut self, _frame: &ElementFrame, _point: Vec2, _ctx: &mut CanvasContext) {}

    /// The canvas size or the element bounds changed.
    fn set_scale(&mut self, _frame: &ElementFrame, _ctx: &CanvasContext) {}
}

/// The closed set of element kinds.
#[derive(Debug)]
pub enum ElementKind {
    Text(TextLabel),
    Axes(AxesElement),
    Series(SeriesBinding),
    Legend(Legend),
    PositionIndicator(PositionIndicator),
}

macro_rules! dispatch {
    ($kind:expr, $inner:ident => $body:expr) => {
        match $kind {
            ElementKind::Text($inner) => $body,
            ElementKind::Axes($inner) => $body,
            ElementKind::Series($inner) => $body,
            ElementKind::Legend($inner) => $body,
            ElementKind::PositionIndicator($inner) => $body,
        }
    };
}

impl ElementKind {
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Text(_) => "text",
            ElementKind::Axes(_) => "axes",
            ElementKind::Series(_) => "series",
            ElementKind::Legend(_) => "legend",
            ElementKind::PositionIndicator(_) => "position indicator",
        }
    }

    pub fn as_axes(&self) -> Option<&AxesElement> {
        match self {
            ElementKind::Axes(axes) => Some(axes),
            _ => None,
        }
    }

    pub fn as_axes_mut(&mut self) -> Option<&mut AxesElement> {
        match self {
            ElementKind::Axes(axes) => Some(axes),
            _ => None,
        }
    }

    pub fn as_series(&self) -> Option<&SeriesBinding> {
        match self {
            ElementKind::Series(binding) => Some(binding),
            _ => None,
        }
    }

    pub fn as_series_mut(&mut self) -> Option<&mut SeriesBinding> {
        match self {
            ElementKind::Series(binding) => Some(binding),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextLabel> {
        match self {
            ElementKind::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_legend_mut(&mut self) -> Option<&mut Legend> {
        match self {
            ElementKind::Legend(legend) => Some(legend),
            _ => None,
        }
    }

    pub fn as_indicator(&self) -> Option<&PositionIndicator> {
        match self {
            ElementKind::PositionIndicator(indicator) => Some(indicator),
            _ => None,
        }
    }
}

impl ElementBehavior for ElementKind {
    fn paint(&mut self, frame: &ElementFrame, surface: &dyn DrawSurface, ctx: &CanvasContext) {
        dispatch!(self, inner => inner.paint(frame, surface, ctx))
    }

    fn hit_test(&self, frame: &ElementFrame, point: Vec2, ctx: &CanvasContext) -> bool {
        dispatch!(self, inner => inner.hit_test(frame, point, ctx))
    }

    fn intersects_rect(&self, frame: &ElementFrame, rect: &Rect, ctx: &CanvasContext) -> bool {
        dispatch!(self, inner => inner.intersects_rect(frame, rect, ctx))
    }

    fn clicked(&mut self, frame: &ElementFrame, point: Vec2, ctx: &mut CanvasContext) -> bool {
        dispatch!(self, inner => inner.clicked(frame, point, ctx))
    }

    fn un_clicked(&mut self, frame: &ElementFrame, ctx: &mut CanvasContext) {
        dispatch!(self, inner => inner.un_clicked(frame, ctx))
    }

    fn double_clicked(
        &mut self,
        frame: &ElementFrame,
        count: u32,
        point: Vec2,
        ctx: &mut CanvasContext,
    ) {
        dispatch!(self, inner => inner.double_clicked(frame, count, point, ctx))
    }

    fn on_pointer_down(&mut self, frame: &ElementFrame, point: Vec2, ctx: &mut CanvasContext) -> bool {
        dispatch!(self, inner => inner.on_pointer_down(frame, point, ctx))
    }

    fn on_pointer_move(&mut self, frame: &ElementFrame, point: Vec2, ctx: &mut CanvasContext) {
        dispatch!(self, inner => inner.on_pointer_move(frame, point, ctx))
    }

    fn on_pointer_drag(&mut self, frame: &ElementFrame, point: Vec2, ctx: &mut CanvasContext) {
        dispatch!(self, inner => inner.on_pointer_drag(frame, point, ctx))
    }

    fn on_pointer_up(&mut self, frame: &ElementFrame, point: Vec2, ctx: &mut CanvasContext) {
        dispatch!(self, inner => inner.on_pointer_up(frame, point, ctx))
    }

    fn set_scale(&mut self, frame: &ElementFrame, ctx: &CanvasContext) {
        dispatch!(self, inner => inner.set_scale(frame, ctx))
    }
}

/// A chart element: shared placement state plus its kind.
#[derive(Debug)]
pub struct Element {
    frame: ElementFrame,
    mobile: bool,
    consumes_clicks: bool,
    pub(crate) sequence: u64,
    kind: ElementKind,
}

impl Element {
    /// New element covering the whole canvas at z 0, not mobile, consuming
    /// clicks. The id is assigned when it joins an
    /// [`ElementList`](crate::element_list::ElementList).
    pub fn new(kind: ElementKind) -> Self {
        Self {
            frame: ElementFrame {
                id: ElementId::default(),
                bounds: Rect::UNIT,
                z: 0,
                selected: false,
                device_size: Vec2::ONE,
            },
            mobile: false,
            consumes_clicks: true,
            sequence: 0,
            kind,
        }
    }

    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.frame.bounds = bounds;
        self
    }

    pub fn with_z(mut self, z: i32) -> Self {
        self.frame.z = z;
        self
    }

    pub fn with_mobile(mut self, mobile: bool) -> Self {
        self.mobile = mobile;
        self
    }

    pub fn with_consumes_clicks(mut self, consumes: bool) -> Self {
        self.consumes_clicks = consumes;
        self
    }

    pub fn id(&self) -> ElementId {
        self.frame.id
    }

    pub(crate) fn set_id(&mut self, id: ElementId) {
        self.frame.id = id;
    }

    pub fn frame(&self) -> &ElementFrame {
        &self.frame
    }

    pub fn bounds(&self) -> Rect {
        self.frame.bounds
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.frame.bounds = bounds;
    }

    pub fn z(&self) -> i32 {
        self.frame.z
    }

    /// Use [`ElementList::set_z`](crate::element_list::ElementList::set_z) for
    /// elements already in a list so it knows to re-sort.
    pub(crate) fn set_z(&mut self, z: i32) {
        self.frame.z = z;
    }

    pub fn is_selected(&self) -> bool {
        self.frame.selected
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.frame.selected = selected;
    }

    pub fn is_mobile(&self) -> bool {
        self.mobile
    }

    pub fn set_mobile(&mut self, mobile: bool) {
        self.mobile = mobile;
    }

    pub fn consumes_clicks(&self) -> bool {
        self.consumes_clicks
    }

    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut ElementKind {
        &mut self.kind
    }

    pub fn device_rect(&self) -> Rect {
        self.frame.device_rect()
    }

    /// Record the canvas size and let the kind react. Repeated calls are
    /// harmless; the last one wins.
    pub fn set_scale(&mut self, device_size: Vec2, ctx: &CanvasContext) {
        self.frame.device_size = device_size;
        self.kind.set_scale(&self.frame, ctx);
    }

    /// Shift by a bounds-space delta.
    pub fn translate(&mut self, delta: Vec2, ctx: &CanvasContext) {
        self.frame.bounds = self.frame.bounds.translate(delta);
        self.kind.set_scale(&self.frame, ctx);
    }

    pub fn paint(&mut self, surface: &dyn DrawSurface, ctx: &CanvasContext) {
        self.kind.paint(&self.frame, surface, ctx);
    }

    pub fn hit_test(&self, point: Vec2, ctx: &CanvasContext) -> bool {
        self.kind.hit_test(&self.frame, point, ctx)
    }

    pub fn intersects_rect(&self, rect: &Rect, ctx: &CanvasContext) -> bool {
        self.kind.intersects_rect(&self.frame, rect, ctx)
    }

    pub fn clicked(&mut self, point: Vec2, ctx: &mut CanvasContext) {
        let keep = self.kind.clicked(&self.frame, point, ctx);
        self.frame.selected = keep;
    }

    pub fn un_clicked(&mut self, ctx: &mut CanvasContext) {
        self.frame.selected = false;
        self.kind.un_clicked(&self.frame, ctx);
    }

    pub fn double_clicked(&mut self, count: u32, point: Vec2, ctx: &mut CanvasContext) {
        self.frame.selected = true;
        self.kind.double_clicked(&self.frame, count, point, ctx);
    }

    pub fn on_pointer_down(&mut self, point: Vec2, ctx: &mut CanvasContext) -> bool {
        self.kind.on_pointer_down(&self.frame, point, ctx)
    }

    pub fn on_pointer_move(&mut self, point: Vec2, ctx: &mut CanvasContext) {
        self.kind.on_pointer_move(&self.frame, point, ctx);
    }

    pub fn on_pointer_drag(&mut self, point: Vec2, ctx: &mut CanvasContext) {
        self.kind.on_pointer_drag(&self.frame, point, ctx);
    }

    pub fn on_pointer_up(&mut self, point: Vec2, ctx: &mut CanvasContext) {
        self.kind.on_pointer_up(&self.frame, point, ctx);
    }
}
