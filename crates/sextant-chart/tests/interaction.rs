//! Pointer and keyboard interaction tests.
//!
//! Every test passes explicit instants, so click timing is deterministic.

use std::time::{Duration, Instant};

use sextant_core::math::{DVec2, Vec2};
use sextant_chart::{
    Axes, Canvas, CanvasConfig, CanvasEvent, DisplayMode, EditorTarget, ElementId, HandleStatus,
    InteractionState, Key, KeyInput, PointerButton, Rect, Series, TextLabel,
};
use sextant_test_utils::{RecordingEditor, init_test_logging};

const LEFT: Vec2 = Vec2::new(50.0, 50.0);
const RIGHT: Vec2 = Vec2::new(150.0, 50.0);

fn two_labels(config: CanvasConfig) -> (Canvas, ElementId, ElementId, RecordingEditor) {
    init_test_logging();
    let mut canvas = Canvas::new(config, 200.0, 200.0);
    let left = canvas.add_text(TextLabel::new("left"), Rect::new(0.0, 0.0, 0.5, 0.5));
    let right = canvas.add_text(TextLabel::new("right"), Rect::new(0.5, 0.0, 0.5, 0.5));
    let editor = RecordingEditor::new();
    canvas.set_editor(editor.clone());
    (canvas, left, right, editor)
}

fn click(canvas: &mut Canvas, position: Vec2, now: Instant) {
    canvas.handle_event(&CanvasEvent::press(position), now);
    canvas.handle_event(&CanvasEvent::release(position), now);
}

fn drag(canvas: &mut Canvas, from: Vec2, to: Vec2, now: Instant) {
    canvas.handle_event(&CanvasEvent::press(from), now);
    canvas.handle_event(&CanvasEvent::moved(from.lerp(to, 0.5)), now);
    canvas.handle_event(&CanvasEvent::moved(to), now);
    canvas.handle_event(&CanvasEvent::release(to), now);
}

// ====================
// Clicks
// ====================

#[test]
fn test_quick_clicks_stay_single_without_multi_mode() {
    let (mut canvas, left, right, editor) = two_labels(CanvasConfig::default());
    let now = Instant::now();

    click(&mut canvas, LEFT, now);
    assert_eq!(canvas.selected_ids(), vec![left]);
    click(&mut canvas, RIGHT, now + Duration::from_millis(30));
    assert_eq!(canvas.selected_ids(), vec![right]);

    assert!(canvas.next_deadline().is_none());
    assert_eq!(editor.request_count(), 0);
}

#[test]
fn test_native_double_click_without_multi_mode() {
    let (mut canvas, left, _, editor) = two_labels(CanvasConfig::default());
    let now = Instant::now();
    click(&mut canvas, LEFT, now);
    canvas.handle_event(&CanvasEvent::press(LEFT), now);
    canvas.handle_event(
        &CanvasEvent::PointerUp {
            position: LEFT,
            button: PointerButton::Primary,
            click_count: 2,
        },
        now,
    );

    let requests = editor.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].element, left);
}

#[test]
fn test_multi_mode_double_click_reaches_both_elements() {
    let config = CanvasConfig::default().with_multi_select_double_click(true);
    let (mut canvas, left, right, editor) = two_labels(config);
    let start = Instant::now();

    click(&mut canvas, LEFT, start);
    click(&mut canvas, RIGHT, start + Duration::from_millis(80));
    assert_eq!(canvas.interaction_state(), InteractionState::ClickPending);
    assert_eq!(editor.request_count(), 0);

    let deadline = canvas.next_deadline().unwrap();
    assert_eq!(deadline, start + Duration::from_millis(280));
    assert!(canvas.poll_timers(deadline));

    let mut requests = editor.requests();
    requests.sort_by_key(|r| r.element);
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].element, left);
    assert_eq!(requests[1].element, right);
    assert!(requests.iter().all(|r| r.position == RIGHT));

    let mut selected = canvas.selected_ids();
    selected.sort();
    assert_eq!(selected, vec![left, right]);
}

#[test]
fn test_multi_mode_timer_fires_from_later_events() {
    let config = CanvasConfig::default().with_multi_select_double_click(true);
    let (mut canvas, left, _, _) = two_labels(config);
    let start = Instant::now();
    click(&mut canvas, LEFT, start);

    let later = start + Duration::from_secs(1);
    let status = canvas.handle_event(&CanvasEvent::moved(Vec2::new(5.0, 190.0)), later);
    assert_eq!(status, HandleStatus::ignored());
    assert_eq!(canvas.selected_ids(), vec![left]);
    assert_eq!(canvas.interaction_state(), InteractionState::Idle);
}

#[test]
fn test_highest_z_receives_click() {
    let mut canvas = Canvas::new(CanvasConfig::default(), 200.0, 200.0);
    let axes = canvas.add_axes(Axes::new(), Rect::UNIT);
    let label = canvas.add_text(TextLabel::new("title"), Rect::new(0.25, 0.25, 0.5, 0.5));

    click(&mut canvas, Vec2::new(100.0, 100.0), Instant::now());
    assert_eq!(canvas.selected_ids(), vec![label]);
    assert!(!canvas.element(axes).unwrap().is_selected());
}

#[test]
fn test_double_click_on_series_opens_series_editor() {
    let mut canvas = Canvas::new(CanvasConfig::default(), 400.0, 300.0);
    let editor = RecordingEditor::new();
    canvas.set_editor(editor.clone());
    let axes = canvas.add_axes(Axes::new().with_data_bounds(0.0, 10.0, 0.0, 10.0), Rect::UNIT);
    let series = Series::from_samples("flat", [(0.0, 5.0), (10.0, 5.0)])
        .unwrap()
        .shared();
    let line = canvas.add_series(axes, series, DisplayMode::Lines).unwrap();

    let on_line = canvas.axes(axes).unwrap().borrow().data_to_device(DVec2::new(5.0, 5.0));
    let now = Instant::now();
    click(&mut canvas, on_line, now);
    assert_eq!(canvas.selected_ids(), vec![line]);

    canvas.handle_event(&CanvasEvent::press(on_line), now);
    canvas.handle_event(
        &CanvasEvent::PointerUp {
            position: on_line,
            button: PointerButton::Primary,
            click_count: 2,
        },
        now,
    );
    let requests = editor.requests();
    assert_eq!(requests.len(), 1);
    match &requests[0].target {
        EditorTarget::Series(options) => {
            assert_eq!(options.name, "flat");
            assert_eq!(options.display_mode, DisplayMode::Lines);
        }
        other => panic!("unexpected editor target {other:?}"),
    }
}

// ====================
// Drags
// ====================

#[test]
fn test_drag_moves_every_selected_mobile_element() {
    let (mut canvas, left, right, _) = two_labels(CanvasConfig::default());
    canvas.select(left, true).unwrap();
    canvas.select(right, true).unwrap();

    drag(&mut canvas, LEFT, LEFT + Vec2::new(0.0, 40.0), Instant::now());

    for id in [left, right] {
        let bounds = canvas.element(id).unwrap().bounds();
        assert!((bounds.y - 0.2).abs() < 1e-6, "{id}: {bounds:?}");
    }
    assert_eq!(canvas.interaction_state(), InteractionState::Idle);
}

#[test]
fn test_drag_on_unselected_element_draws_selection_rect() {
    let (mut canvas, left, right, _) = two_labels(CanvasConfig::default());
    let now = Instant::now();
    canvas.handle_event(&CanvasEvent::press(Vec2::new(10.0, 10.0)), now);
    canvas.handle_event(&CanvasEvent::moved(Vec2::new(60.0, 60.0)), now);
    assert_eq!(canvas.selection_rect(), Some(Rect::new(10.0, 10.0, 50.0, 50.0)));
    canvas.handle_event(&CanvasEvent::release(Vec2::new(60.0, 60.0)), now);

    assert_eq!(canvas.selected_ids(), vec![left]);
    assert!(!canvas.element(right).unwrap().is_selected());
    assert!(canvas.selection_rect().is_none());
    assert_eq!(canvas.element(left).unwrap().bounds(), Rect::new(0.0, 0.0, 0.5, 0.5));
}

#[test]
fn test_rect_selection_catches_axes_only_at_its_bands() {
    init_test_logging();
    let mut canvas = Canvas::new(CanvasConfig::default(), 400.0, 300.0);
    let axes_id = canvas.add_axes(Axes::new().with_data_bounds(0.0, 10.0, 0.0, 10.0), Rect::UNIT);
    let label = canvas.add_text(TextLabel::new("note"), Rect::new(0.45, 0.45, 0.1, 0.1));
    let area = canvas.axes(axes_id).unwrap().borrow().graph_area();

    drag(&mut canvas, Vec2::new(170.0, 125.0), Vec2::new(230.0, 175.0), Instant::now());
    assert_eq!(canvas.selected_ids(), vec![label]);

    let from = Vec2::new(area.left + 20.0, area.bottom() - 20.0);
    drag(&mut canvas, from, from + Vec2::new(30.0, 30.0), Instant::now());
    assert_eq!(canvas.selected_ids(), vec![axes_id]);

    let inner = Vec2::new(area.left + 40.0, area.top + 5.0);
    drag(&mut canvas, inner, inner + Vec2::new(60.0, 20.0), Instant::now());
    assert!(canvas.selected_ids().is_empty());
}

#[test]
fn test_rect_selection_can_be_disabled() {
    let config = CanvasConfig::default().with_rect_selection(false);
    let (mut canvas, _, _, _) = two_labels(config);
    drag(&mut canvas, Vec2::new(10.0, 10.0), Vec2::new(190.0, 190.0), Instant::now());
    assert!(canvas.selection_rect().is_none());
    assert!(canvas.selected_ids().is_empty());
}

#[test]
fn test_axes_range_selection_captures_drag() {
    let mut canvas = Canvas::new(CanvasConfig::default(), 400.0, 300.0);
    let axes_id = canvas.add_axes(
        Axes::new()
            .with_data_bounds(0.0, 10.0, 0.0, 10.0)
            .with_range_selection(true),
        Rect::UNIT,
    );
    let axes = canvas.axes(axes_id).unwrap();
    let from = axes.borrow().data_to_device(DVec2::new(2.0, 5.0));
    let to = axes.borrow().data_to_device(DVec2::new(6.0, 5.0));

    drag(&mut canvas, to, from, Instant::now());

    let (lo, hi) = axes.borrow().selected_range();
    assert!((lo - 2.0).abs() < 1e-3 && (hi - 6.0).abs() < 1e-3, "({lo}, {hi})");
    assert!(canvas.selection_rect().is_none());

    canvas.handle_event(&CanvasEvent::Key(KeyInput::new(Key::Escape)), Instant::now());
    assert_eq!(axes.borrow().selected_range(), (0.0, 0.0));
}

#[test]
fn test_selected_legend_drags_over_range_selecting_axes() {
    init_test_logging();
    let mut canvas = Canvas::new(CanvasConfig::default(), 400.0, 300.0);
    let axes_id = canvas.add_axes(
        Axes::new()
            .with_data_bounds(0.0, 10.0, 0.0, 10.0)
            .with_range_selection(true),
        Rect::UNIT,
    );
    let legend = canvas.add_legend(Rect::new(0.4, 0.3, 0.2, 0.2));
    canvas.select(legend, true).unwrap();

    drag(&mut canvas, Vec2::new(200.0, 120.0), Vec2::new(260.0, 160.0), Instant::now());

    let bounds = canvas.element(legend).unwrap().bounds();
    assert!((bounds.x - 0.55).abs() < 1e-5, "{bounds:?}");
    assert!((bounds.y - (0.3 + 40.0 / 300.0)).abs() < 1e-5, "{bounds:?}");
    let axes = canvas.axes(axes_id).unwrap();
    assert_eq!(axes.borrow().selected_range(), (0.0, 0.0));
    assert!(!axes.borrow().is_range_dragging());
}

#[test]
fn test_position_indicator_follows_pointer_without_taking_clicks() {
    let mut canvas = Canvas::new(CanvasConfig::default(), 400.0, 300.0);
    let axes_id = canvas.add_axes(Axes::new().with_data_bounds(0.0, 10.0, 0.0, 10.0), Rect::UNIT);
    let indicator = canvas
        .add_position_indicator(axes_id, Rect::new(0.0, 0.0, 0.5, 0.1))
        .unwrap();
    let over = canvas
        .axes(axes_id)
        .unwrap()
        .borrow()
        .data_to_device(DVec2::new(4.0, 5.0));

    let status = canvas.handle_event(&CanvasEvent::moved(over), Instant::now());
    assert!(status.is_handled());
    let readout = canvas
        .element(indicator)
        .unwrap()
        .kind()
        .as_indicator()
        .unwrap()
        .data_position()
        .unwrap();
    assert!((readout.x - 4.0).abs() < 1e-3 && (readout.y - 5.0).abs() < 1e-3);

    click(&mut canvas, over, Instant::now());
    assert_eq!(canvas.selected_ids(), vec![axes_id]);
}

// ====================
// Keys
// ====================

#[test]
fn test_delete_keeps_axes() {
    let mut canvas = Canvas::new(CanvasConfig::default(), 400.0, 300.0);
    let axes = canvas.add_axes(Axes::new(), Rect::UNIT);
    let line = canvas
        .add_series(axes, Series::new("s").shared(), DisplayMode::Lines)
        .unwrap();
    canvas.select(axes, true).unwrap();
    canvas.select(line, true).unwrap();

    let status = canvas.handle_event(&CanvasEvent::Key(Key::Backspace.into()), Instant::now());
    assert!(status.is_consumed());
    assert!(canvas.element(axes).is_some());
    assert!(canvas.element(line).is_none());

    let status = canvas.handle_event(&CanvasEvent::Key(Key::Character('q').into()), Instant::now());
    assert_eq!(status, HandleStatus::ignored());
}
