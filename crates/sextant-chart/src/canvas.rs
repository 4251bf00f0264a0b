//! The chart root.
//!
//! A [`Canvas`] owns every element, translates host events into element
//! callbacks and paints. Interaction runs as one canvas-wide state machine:
//!
//! ```text
//! Idle ──down──▶ PotentialDrag ──move > threshold──▶ Dragging ──up──▶ Idle
//!                     │
//!                     └──up──▶ ClickPending ──timer──▶ Idle   (multi-select mode)
//!                          └─▶ Idle, click dispatched at once  (otherwise)
//! ```
//!
//! Time is passed in by the host. A canvas never reads the clock itself, so
//! the host drives the click timer with [`Canvas::next_deadline`] and
//! [`Canvas::poll_timers`] on its own event loop.

use std::fmt;
use std::rc::Rc;
use std::time::Instant;

use sextant_core::alloc::HashSet;
use sextant_core::math::Vec2;
use sextant_core::profiling::{new_frame, profile_function, profile_scope};

use crate::axes::{Axes, AxesElement, SharedAxes};
use crate::binding::{DisplayMode, SeriesBinding, SeriesOptions, box_offsets};
use crate::color::SERIES_PALETTE;
use crate::config::CanvasConfig;
use crate::editor::PropertyEditor;
use crate::element::{CanvasContext, Element, ElementId, ElementKind};
use crate::element_list::ElementList;
use crate::error::{ChartError, ChartResult};
use crate::event::{CanvasEvent, HandleStatus, Key, PointerButton};
use crate::indicator::PositionIndicator;
use crate::legend::Legend;
use crate::rect::Rect;
use crate::series::{DataExtents, SharedSeries};
use crate::surface::{DrawSurface, EstimatedMetrics, Stroke, TextMetrics};
use crate::text::TextLabel;
use crate::timer::ClickTimer;

/// Default z layers, bottom to top.
pub const Z_AXES: i32 = 0;
pub const Z_BOXES: i32 = 10;
pub const Z_LINES: i32 = 20;
pub const Z_LEGEND: i32 = 30;
pub const Z_TEXT: i32 = 40;
pub const Z_INDICATOR: i32 = 50;

/// Where the pointer state machine currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// Pressed, not yet moved past the drag threshold.
    PotentialDrag,
    Dragging,
    /// Released without moving; waiting for the click timer.
    ClickPending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragMode {
    Undecided,
    /// Selected mobile elements follow the pointer.
    Move,
    /// A selection rectangle grows from the anchor.
    Rect,
    /// A raw-pointer element claimed the gesture.
    Captured,
    Inert,
}

#[derive(Debug, Clone)]
struct Gesture {
    anchor: Vec2,
    last: Vec2,
    movers: Vec<ElementId>,
    captured: bool,
    mode: DragMode,
}

pub struct Canvas {
    config: CanvasConfig,
    elements: ElementList,
    ctx: CanvasContext,
    raw_pointer: HashSet<ElementId>,
    state: InteractionState,
    gesture: Option<Gesture>,
    selection_rect: Option<Rect>,
    timer: ClickTimer,
    editor: Option<Box<dyn PropertyEditor>>,
    metrics: Rc<dyn TextMetrics>,
}

impl fmt::Debug for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canvas")
            .field("config", &self.config)
            .field("elements", &self.elements.len())
            .field("device_size", &self.ctx.device_size())
            .field("state", &self.state)
            .field("selection_rect", &self.selection_rect)
            .finish_non_exhaustive()
    }
}

impl Canvas {
    pub fn new(config: CanvasConfig, width: f32, height: f32) -> Self {
        let size = Vec2::new(width.max(0.0), height.max(0.0));
        Self {
            ctx: CanvasContext::new(&config, size),
            timer: ClickTimer::new(config.double_click_delay),
            config,
            elements: ElementList::new(),
            raw_pointer: HashSet::new(),
            state: InteractionState::Idle,
            gesture: None,
            selection_rect: None,
            editor: None,
            metrics: Rc::new(EstimatedMetrics),
        }
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Replace the configuration. Invalid values are rejected and leave the
    /// current configuration in place.
    pub fn set_config(&mut self, config: CanvasConfig) -> ChartResult<()> {
        config.validate()?;
        self.ctx = CanvasContext::new(&config, self.ctx.device_size());
        self.timer.set_delay(config.double_click_delay);
        self.config = config;
        tracing::debug!(config = ?self.config, "canvas reconfigured");
        Ok(())
    }

    pub fn device_size(&self) -> Vec2 {
        self.ctx.device_size()
    }

    pub fn context(&self) -> &CanvasContext {
        &self.ctx
    }

    /// Font metrics used for axes layout. Should match the draw surface.
    pub fn set_metrics(&mut self, metrics: Rc<dyn TextMetrics>) {
        for element in self.elements.iter() {
            if let Some(axes) = element.kind().as_axes() {
                axes.axes().borrow_mut().set_metrics(metrics.clone());
            }
        }
        self.metrics = metrics;
        self.ctx.request_repaint();
    }

    pub fn set_editor(&mut self, editor: impl PropertyEditor + 'static) {
        self.editor = Some(Box::new(editor));
    }

    pub fn elements(&self) -> &ElementList {
        &self.elements
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn interaction_state(&self) -> InteractionState {
        self.state
    }

    /// Current (or preserved) selection rectangle in device pixels.
    pub fn selection_rect(&self) -> Option<Rect> {
        self.selection_rect
    }

    /// Whether anything changed since the last [`paint`](Self::paint).
    pub fn needs_repaint(&self) -> bool {
        self.ctx.needs_repaint()
    }

    /// Add any element. It is scaled to the current canvas size right away.
    pub fn add_element(&mut self, mut element: Element) -> ElementId {
        element.set_scale(self.ctx.device_size(), &self.ctx);
        let id = self.elements.insert(element);
        tracing::debug!(%id, "element added");
        self.ctx.request_repaint();
        id
    }

    /// Add an axes element covering `bounds`.
    pub fn add_axes(&mut self, mut axes: Axes, bounds: Rect) -> ElementId {
        axes.set_metrics(self.metrics.clone());
        let range_selection = axes.range_selection_enabled();
        let element = Element::new(ElementKind::Axes(AxesElement::new(axes.shared())))
            .with_bounds(bounds)
            .with_z(Z_AXES);
        let id = self.add_element(element);
        if range_selection {
            self.raw_pointer.insert(id);
        }
        id
    }

    pub fn axes(&self, id: ElementId) -> ChartResult<SharedAxes> {
        self.elements
            .get(id)
            .ok_or(ChartError::UnknownElement(id))?
            .kind()
            .as_axes()
            .map(|a| a.axes().clone())
            .ok_or(ChartError::WrongElementKind {
                id,
                expected: "axes",
            })
    }

    /// Turn pointer range selection on or off for an axes element.
    pub fn set_range_selection(&mut self, axes_id: ElementId, enabled: bool) -> ChartResult<()> {
        self.axes(axes_id)?.borrow_mut().set_range_selection(enabled);
        if enabled {
            self.raw_pointer.insert(axes_id);
        } else {
            self.raw_pointer.remove(&axes_id);
        }
        self.ctx.request_repaint();
        Ok(())
    }

    /// Draw `series` on the axes element `axes_id`.
    pub fn add_series(
        &mut self,
        axes_id: ElementId,
        series: SharedSeries,
        mode: DisplayMode,
    ) -> ChartResult<ElementId> {
        let axes = self.axes(axes_id)?;
        let bounds = self
            .elements
            .get(axes_id)
            .map(Element::bounds)
            .unwrap_or(Rect::UNIT);
        let color_index = self.binding_ids().len() % SERIES_PALETTE.len();
        let binding = SeriesBinding::new(series, axes.clone())
            .with_mode(mode)
            .with_color(SERIES_PALETTE[color_index]);
        let element = Element::new(ElementKind::Series(binding))
            .with_bounds(bounds)
            .with_z(layer_for(mode));
        let id = self.add_element(element);
        if mode == DisplayMode::Boxes {
            self.layout_boxes(&axes);
        }
        self.refresh_legends();
        Ok(id)
    }

    pub fn binding(&self, id: ElementId) -> ChartResult<&SeriesBinding> {
        self.elements
            .get(id)
            .ok_or(ChartError::UnknownElement(id))?
            .kind()
            .as_series()
            .ok_or(ChartError::WrongElementKind {
                id,
                expected: "series",
            })
    }

    fn binding_mut(&mut self, id: ElementId) -> ChartResult<&mut SeriesBinding> {
        self.elements
            .get_mut(id)
            .ok_or(ChartError::UnknownElement(id))?
            .kind_mut()
            .as_series_mut()
            .ok_or(ChartError::WrongElementKind {
                id,
                expected: "series",
            })
    }

    pub fn add_text(&mut self, label: TextLabel, bounds: Rect) -> ElementId {
        let element = Element::new(ElementKind::Text(label))
            .with_bounds(bounds)
            .with_z(Z_TEXT)
            .with_mobile(true);
        self.add_element(element)
    }

    pub fn add_legend(&mut self, bounds: Rect) -> ElementId {
        let element = Element::new(ElementKind::Legend(Legend::new()))
            .with_bounds(bounds)
            .with_z(Z_LEGEND)
            .with_mobile(true);
        let id = self.add_element(element);
        self.refresh_legends();
        id
    }

    /// Add a coordinate readout for the axes element `axes_id`. It receives
    /// raw pointer events and never consumes clicks.
    pub fn add_position_indicator(
        &mut self,
        axes_id: ElementId,
        bounds: Rect,
    ) -> ChartResult<ElementId> {
        let axes = self.axes(axes_id)?;
        let element = Element::new(ElementKind::PositionIndicator(PositionIndicator::new(axes)))
            .with_bounds(bounds)
            .with_z(Z_INDICATOR)
            .with_consumes_clicks(false);
        let id = self.add_element(element);
        self.raw_pointer.insert(id);
        Ok(id)
    }

    /// Remove an element. Removing an axes element also removes the series
    /// and indicators drawn on it.
    pub fn remove(&mut self, id: ElementId) -> ChartResult<Element> {
        let element = self
            .elements
            .remove(id)
            .ok_or(ChartError::UnknownElement(id))?;
        self.raw_pointer.remove(&id);
        if let Some(gesture) = self.gesture.as_mut() {
            gesture.movers.retain(|m| *m != id);
        }
        tracing::debug!(%id, kind = element.kind().name(), "element removed");

        match element.kind() {
            ElementKind::Axes(axes) => {
                let dependents: Vec<ElementId> = self
                    .elements
                    .iter()
                    .filter(|e| match e.kind() {
                        ElementKind::Series(b) => b.shares_axes(axes.axes()),
                        ElementKind::PositionIndicator(p) => Rc::ptr_eq(p.axes(), axes.axes()),
                        _ => false,
                    })
                    .map(Element::id)
                    .collect();
                for dependent in dependents {
                    self.remove(dependent)?;
                }
            }
            ElementKind::Series(binding) => {
                let axes = binding.axes().clone();
                self.layout_boxes(&axes);
                self.refresh_legends();
            }
            _ => {}
        }
        self.ctx.request_repaint();
        Ok(element)
    }

    /// Switch a binding's display mode. BOXES series sit below line and point
    /// series, and every BOXES sibling on the same axes is laid out again.
    pub fn set_display_mode(&mut self, id: ElementId, mode: DisplayMode) -> ChartResult<()> {
        let binding = self.binding_mut(id)?;
        if binding.set_display_mode(mode) {
            let axes = binding.axes().clone();
            self.elements.set_z(id, layer_for(mode));
            self.layout_boxes(&axes);
            self.refresh_legends();
            self.ctx.request_repaint();
        }
        Ok(())
    }

    /// Apply a finished options record from a property editor.
    pub fn apply_series_options(&mut self, id: ElementId, options: &SeriesOptions) -> ChartResult<()> {
        let binding = self.binding_mut(id)?;
        let mode_changed = binding.apply_options(options)?;
        let axes = binding.axes().clone();
        if mode_changed {
            self.elements.set_z(id, layer_for(options.display_mode));
            self.layout_boxes(&axes);
        }
        self.refresh_legends();
        self.ctx.request_repaint();
        Ok(())
    }

    /// Give the N BOXES series on `axes` divisor N and symmetric offsets so
    /// their boxes tile side by side around each x.
    pub fn layout_boxes(&mut self, axes: &SharedAxes) {
        let mut boxed: Vec<(u64, ElementId)> = self
            .elements
            .iter()
            .filter_map(|e| {
                let binding = e.kind().as_series()?;
                (binding.shares_axes(axes) && binding.display_mode() == DisplayMode::Boxes)
                    .then_some((e.sequence, e.id()))
            })
            .collect();
        boxed.sort_unstable();

        let divisor = boxed.len() as u32;
        for ((_, id), offset) in boxed.iter().zip(box_offsets(boxed.len())) {
            if let Ok(binding) = self.binding_mut(*id) {
                binding.set_box_layout(divisor, offset);
            }
        }
        tracing::debug!(count = divisor, "box layout");
    }

    fn binding_ids(&self) -> Vec<ElementId> {
        let mut ids: Vec<(u64, ElementId)> = self
            .elements
            .iter()
            .filter(|e| e.kind().as_series().is_some())
            .map(|e| (e.sequence, e.id()))
            .collect();
        ids.sort_unstable();
        ids.into_iter().map(|(_, id)| id).collect()
    }

    fn refresh_legends(&mut self) {
        let entries: Vec<_> = self
            .binding_ids()
            .into_iter()
            .filter_map(|id| self.binding(id).ok().map(SeriesBinding::legend_entry))
            .collect();
        for element in self.elements.iter_mut() {
            if let Some(legend) = element.kind_mut().as_legend_mut() {
                legend.set_entries(entries.clone());
            }
        }
    }

    /// Deliver raw pointer events to this element.
    pub fn register_raw_pointer(&mut self, id: ElementId) -> ChartResult<()> {
        if !self.elements.contains(id) {
            return Err(ChartError::UnknownElement(id));
        }
        self.raw_pointer.insert(id);
        Ok(())
    }

    pub fn unregister_raw_pointer(&mut self, id: ElementId) -> bool {
        self.raw_pointer.remove(&id)
    }

    pub fn select(&mut self, id: ElementId, selected: bool) -> ChartResult<()> {
        let element = self
            .elements
            .get_mut(id)
            .ok_or(ChartError::UnknownElement(id))?;
        element.set_selected(selected);
        self.ctx.request_repaint();
        Ok(())
    }

    /// Selected elements, topmost first.
    pub fn selected_ids(&mut self) -> Vec<ElementId> {
        self.elements
            .top_down()
            .filter(|e| e.is_selected())
            .map(Element::id)
            .collect()
    }

    /// Earliest instant at which [`poll_timers`](Self::poll_timers) has work.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    /// Fire the click timer if it expired. Returns whether clicks were
    /// dispatched.
    pub fn poll_timers(&mut self, now: Instant) -> bool {
        let Some(pending) = self.timer.poll(now) else {
            return false;
        };
        if self.state == InteractionState::ClickPending {
            self.state = InteractionState::Idle;
        }
        self.dispatch_click(pending.count, pending.position, &pending.positions);
        true
    }

    /// Feed one host event.
    pub fn handle_event(&mut self, event: &CanvasEvent, now: Instant) -> HandleStatus {
        self.poll_timers(now);
        match *event {
            CanvasEvent::PointerDown {
                position,
                button: PointerButton::Primary,
                ..
            } => self.pointer_down(position),
            CanvasEvent::PointerMoved { position } => self.pointer_moved(position),
            CanvasEvent::PointerUp {
                position,
                button: PointerButton::Primary,
                click_count,
            } => self.pointer_up(position, click_count, now),
            CanvasEvent::PointerDown { .. } | CanvasEvent::PointerUp { .. } => {
                HandleStatus::ignored()
            }
            CanvasEvent::Resized { width, height } => {
                self.resize(width, height);
                HandleStatus::handled()
            }
            CanvasEvent::Key(input) => match input.key {
                Key::Escape => {
                    self.clear_selections();
                    HandleStatus::consumed()
                }
                Key::Delete | Key::Backspace => self.delete_selected(),
                Key::Character(_) | Key::Other => HandleStatus::ignored(),
            },
        }
    }

    /// Record the new device size and rescale every element. Repeated or
    /// out-of-order calls are fine; the last one wins.
    pub fn resize(&mut self, width: f32, height: f32) {
        let size = Vec2::new(width.max(0.0), height.max(0.0));
        self.ctx.set_device_size(size);
        for element in self.elements.iter_mut() {
            element.set_scale(size, &self.ctx);
        }
        tracing::debug!(width = size.x, height = size.y, "canvas resized");
        self.ctx.request_repaint();
    }

    fn raw_ids(&mut self) -> Vec<ElementId> {
        let raw = &self.raw_pointer;
        self.elements
            .top_down()
            .map(Element::id)
            .filter(|id| raw.contains(id))
            .collect()
    }

    fn pointer_down(&mut self, position: Vec2) -> HandleStatus {
        let ctx = &self.ctx;
        let grabs_selection = self
            .elements
            .top_down()
            .find(|e| e.hit_test(position, ctx))
            .is_some_and(|e| e.is_selected() && e.is_mobile());
        let movers: Vec<ElementId> = if grabs_selection {
            self.elements
                .iter()
                .filter(|e| e.is_selected() && e.is_mobile())
                .map(Element::id)
                .collect()
        } else {
            Vec::new()
        };

        // A press on the moving selection is not offered for capture.
        let mut captured = false;
        if movers.is_empty() {
            for id in self.raw_ids() {
                if let Some(element) = self.elements.get_mut(id) {
                    captured |= element.on_pointer_down(position, &mut self.ctx);
                }
            }
        }

        self.gesture = Some(Gesture {
            anchor: position,
            last: position,
            movers,
            captured,
            mode: DragMode::Undecided,
        });
        self.state = InteractionState::PotentialDrag;
        tracing::debug!(?position, captured, "pointer down");

        if captured {
            HandleStatus::consumed()
        } else {
            HandleStatus::handled()
        }
    }

    fn pointer_moved(&mut self, position: Vec2) -> HandleStatus {
        let raw = self.raw_ids();
        let dragging = self.gesture.is_some();
        for id in &raw {
            if let Some(element) = self.elements.get_mut(*id) {
                element.on_pointer_move(position, &mut self.ctx);
                if dragging {
                    element.on_pointer_drag(position, &mut self.ctx);
                }
            }
        }

        let Some(gesture) = self.gesture.as_mut() else {
            return if raw.is_empty() {
                HandleStatus::ignored()
            } else {
                HandleStatus::handled()
            };
        };

        if self.state == InteractionState::PotentialDrag
            && (position - gesture.anchor).length() > self.config.drag_threshold
        {
            gesture.mode = if gesture.captured {
                DragMode::Captured
            } else if !gesture.movers.is_empty() {
                DragMode::Move
            } else if self.config.rect_selection {
                DragMode::Rect
            } else {
                DragMode::Inert
            };
            self.state = InteractionState::Dragging;
            tracing::debug!(mode = ?gesture.mode, "drag started");
        }

        if self.state == InteractionState::Dragging {
            match gesture.mode {
                DragMode::Move => {
                    let size = self.ctx.device_size();
                    let delta = position - gesture.last;
                    let delta = Vec2::new(
                        if size.x > 0.0 { delta.x / size.x } else { 0.0 },
                        if size.y > 0.0 { delta.y / size.y } else { 0.0 },
                    );
                    for id in &gesture.movers {
                        if let Some(element) = self.elements.get_mut(*id) {
                            element.translate(delta, &self.ctx);
                        }
                    }
                    self.ctx.request_repaint();
                }
                DragMode::Rect => {
                    self.selection_rect = Some(Rect::from_corners(gesture.anchor, position));
                    self.ctx.request_repaint();
                }
                DragMode::Captured | DragMode::Inert | DragMode::Undecided => {}
            }
        }
        gesture.last = position;
        HandleStatus::consumed()
    }

    fn pointer_up(&mut self, position: Vec2, click_count: u32, now: Instant) -> HandleStatus {
        for id in self.raw_ids() {
            if let Some(element) = self.elements.get_mut(id) {
                element.on_pointer_up(position, &mut self.ctx);
            }
        }

        let Some(gesture) = self.gesture.take() else {
            return HandleStatus::ignored();
        };

        match self.state {
            InteractionState::PotentialDrag => {
                if self.config.multi_select_double_click {
                    self.timer.register(position, now);
                    self.state = InteractionState::ClickPending;
                } else {
                    self.state = InteractionState::Idle;
                    self.dispatch_click(click_count.max(1), position, &[position]);
                }
            }
            InteractionState::Dragging => {
                if gesture.mode == DragMode::Rect {
                    self.finish_rect_selection(Rect::from_corners(gesture.anchor, position));
                }
                self.state = if self.timer.is_armed() {
                    InteractionState::ClickPending
                } else {
                    InteractionState::Idle
                };
                tracing::debug!(mode = ?gesture.mode, "drag finished");
            }
            InteractionState::Idle | InteractionState::ClickPending => {}
        }
        HandleStatus::consumed()
    }

    fn finish_rect_selection(&mut self, rect: Rect) {
        let ctx = &self.ctx;
        let mut selected = 0usize;
        for element in self.elements.iter_mut() {
            let hit = element.intersects_rect(&rect, ctx);
            element.set_selected(hit);
            selected += usize::from(hit);
        }
        self.selection_rect = self.config.preserve_selection_rect.then_some(rect);
        self.ctx.request_repaint();
        tracing::debug!(?rect, selected, "rectangle selection finished");
    }

    /// Deliver a resolved click.
    ///
    /// Elements are walked top-down. Every element containing a click position
    /// is notified until one that consumes clicks stops propagation; elements
    /// containing no click position are un-clicked. In multi-select mode a
    /// double click also reaches every element that was already selected.
    fn dispatch_click(&mut self, count: u32, position: Vec2, positions: &[Vec2]) {
        profile_function!();
        tracing::debug!(count, ?position, "dispatching click");
        if self.selection_rect.take().is_some() {
            self.ctx.request_repaint();
        }

        let order = self.elements.ids_top_down();
        let mut targets: Vec<ElementId> = Vec::new();
        let mut touched: HashSet<ElementId> = HashSet::new();
        {
            profile_scope!("click_hit_test");
            for point in positions {
                let mut stopped = false;
                for id in &order {
                    let Some(element) = self.elements.get(*id) else {
                        continue;
                    };
                    if !element.hit_test(*point, &self.ctx) {
                        continue;
                    }
                    touched.insert(*id);
                    if !stopped {
                        if !targets.contains(id) {
                            targets.push(*id);
                        }
                        stopped = element.consumes_clicks();
                    }
                }
            }
        }

        let multi = count > 1 && self.config.multi_select_double_click;
        if multi {
            for id in &order {
                let selected = self.elements.get(*id).is_some_and(Element::is_selected);
                if selected && !targets.contains(id) {
                    targets.push(*id);
                }
            }
        }

        for id in &order {
            let Some(element) = self.elements.get_mut(*id) else {
                continue;
            };
            if targets.contains(id) {
                if count > 1 {
                    element.double_clicked(count, position, &mut self.ctx);
                } else {
                    element.clicked(position, &mut self.ctx);
                }
            } else if !touched.contains(id) {
                element.un_clicked(&mut self.ctx);
            }
        }

        self.ctx.request_repaint();
        self.forward_editor_requests();
    }

    fn forward_editor_requests(&mut self) {
        let requests = self.ctx.take_editor_requests();
        if requests.is_empty() {
            return;
        }
        match self.editor.as_mut() {
            Some(editor) => {
                for request in requests {
                    tracing::debug!(element = %request.element, "opening property editor");
                    editor.open(request);
                }
            }
            None => tracing::debug!(count = requests.len(), "no property editor installed"),
        }
    }

    /// Deselect everything and drop pending clicks, the selection rectangle
    /// and axis range selections.
    pub fn clear_selections(&mut self) {
        for element in self.elements.iter_mut() {
            if let Some(axes) = element.kind().as_axes() {
                axes.axes().borrow_mut().clear_range_selection();
            }
            element.un_clicked(&mut self.ctx);
        }
        self.selection_rect = None;
        self.timer.cancel();
        if self.state == InteractionState::ClickPending {
            self.state = InteractionState::Idle;
        }
        self.ctx.request_repaint();
    }

    fn delete_selected(&mut self) -> HandleStatus {
        let doomed: Vec<ElementId> = self
            .elements
            .iter()
            .filter(|e| e.is_selected() && e.kind().as_axes().is_none())
            .map(Element::id)
            .collect();
        if doomed.is_empty() {
            return HandleStatus::ignored();
        }
        for id in doomed {
            // An earlier removal may have cascaded to this one.
            if self.elements.contains(id) {
                let _ = self.remove(id);
            }
        }
        HandleStatus::consumed()
    }

    fn refit_axes(&mut self) {
        let axes: Vec<SharedAxes> = self
            .elements
            .iter()
            .filter_map(|e| e.kind().as_axes())
            .map(|a| a.axes().clone())
            .filter(|a| !a.borrow().auto_fit().is_empty())
            .collect();
        for shared in axes {
            let extents = self
                .elements
                .iter()
                .filter_map(|e| e.kind().as_series())
                .filter(|b| b.shares_axes(&shared))
                .filter_map(|b| b.series().borrow().extents())
                .reduce(DataExtents::union);
            shared.borrow_mut().fit_to(extents);
        }
    }

    /// Paint everything bottom-up. Scale is re-applied, auto-fitted axes are
    /// refitted and stale series geometry is rebuilt first, so nothing is
    /// drawn against an outdated device size.
    pub fn paint(&mut self, surface: &dyn DrawSurface) {
        new_frame();
        profile_function!();
        let size = self.ctx.device_size();
        for element in self.elements.iter_mut() {
            element.set_scale(size, &self.ctx);
        }
        self.refit_axes();

        let mut rebuilt = 0usize;
        for element in self.elements.iter_mut() {
            if let Some(binding) = element.kind_mut().as_series_mut() {
                rebuilt += usize::from(binding.rebuild_if_dirty());
            }
        }
        tracing::trace!(rebuilt, "series geometry checked");

        surface.fill_rect(Rect::new(0.0, 0.0, size.x, size.y), self.ctx.background());
        for element in self.elements.bottom_up_mut() {
            element.paint(surface, &self.ctx);
        }

        if let Some(rect) = self.selection_rect {
            let color = self.ctx.selection_color();
            surface.fill_rect(rect, color.with_alpha(0.15));
            surface.stroke_rect(rect, Stroke::new(color, 1.0).dashed());
        }
        self.ctx.take_repaint();
    }
}

fn layer_for(mode: DisplayMode) -> i32 {
    match mode {
        DisplayMode::Boxes => Z_BOXES,
        DisplayMode::Lines | DisplayMode::Points | DisplayMode::PointsAndLines => Z_LINES,
    }
}
