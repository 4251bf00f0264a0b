//! Paint pass tests against a recording surface.

use std::time::Instant;

use sextant_chart::{
    AutoFit, Axes, Canvas, CanvasConfig, CanvasEvent, DisplayMode, Rect, Series, TextLabel,
};
use sextant_core::math::Vec2;
use sextant_test_utils::{DrawCall, RecordingSurface};

fn chart() -> (Canvas, Series) {
    let canvas = Canvas::new(CanvasConfig::default(), 640.0, 480.0);
    let series = Series::from_samples("signal", [(0.0, 1.0), (1.0, 2.0), (2.0, 1.5), (4.0, 3.0)])
        .unwrap();
    (canvas, series)
}

#[test]
fn test_paint_draws_background_first() {
    let (mut canvas, _) = chart();
    let surface = RecordingSurface::new();
    canvas.paint(&surface);

    let calls = surface.calls();
    assert_eq!(
        calls.first(),
        Some(&DrawCall::FillRect {
            rect: Rect::new(0.0, 0.0, 640.0, 480.0),
            color: canvas.config().background,
        })
    );
}

#[test]
fn test_paint_draws_tick_labels_and_series() {
    let (mut canvas, series) = chart();
    let axes = canvas.add_axes(Axes::new().with_data_bounds(0.0, 4.0, 0.0, 3.0), Rect::UNIT);
    canvas
        .add_series(axes, series.shared(), DisplayMode::Lines)
        .unwrap();

    let surface = RecordingSurface::new();
    canvas.paint(&surface);

    let texts = surface.texts();
    assert!(texts.iter().any(|t| t == "0"), "{texts:?}");
    assert!(texts.iter().any(|t| t == "4"), "{texts:?}");

    let line = surface
        .polylines()
        .into_iter()
        .find(|points| points.len() == 4)
        .expect("series polyline");
    let shared = canvas.axes(axes).unwrap();
    let area = shared.borrow().graph_area();
    assert!((line[0].x - area.left).abs() < 1e-3);
    assert!((line[3].x - area.right()).abs() < 1e-3);
    assert!(line[3].y < line[0].y);
}

#[test]
fn test_auto_fit_tracks_appended_samples() {
    let (mut canvas, series) = chart();
    let axes = canvas.add_axes(Axes::new().with_auto_fit(AutoFit::all()), Rect::UNIT);
    let series = series.shared();
    canvas
        .add_series(axes, series.clone(), DisplayMode::Points)
        .unwrap();

    let surface = RecordingSurface::new();
    canvas.paint(&surface);
    assert_eq!(canvas.axes(axes).unwrap().borrow().x_range(), (0.0, 4.0));

    series.borrow_mut().append(10.0, -2.0).unwrap();
    canvas.paint(&surface);
    let shared = canvas.axes(axes).unwrap();
    assert_eq!(shared.borrow().x_range(), (0.0, 10.0));
    assert_eq!(shared.borrow().y_range(), (-2.0, 3.0));
}

#[test]
fn test_resize_rescales_elements() {
    let (mut canvas, _) = chart();
    let label = canvas.add_text(TextLabel::new("caption"), Rect::new(0.5, 0.5, 0.5, 0.5));
    canvas.handle_event(
        &CanvasEvent::Resized {
            width: 200.0,
            height: 100.0,
        },
        Instant::now(),
    );
    assert!(canvas.needs_repaint());
    assert_eq!(
        canvas.element(label).unwrap().device_rect(),
        Rect::new(100.0, 50.0, 100.0, 50.0)
    );

    let surface = RecordingSurface::new();
    canvas.paint(&surface);
    assert!(!canvas.needs_repaint());
    assert!(surface.calls().iter().any(|call| matches!(
        call,
        DrawCall::Text { text, position, .. }
            if text == "caption" && *position == Vec2::new(150.0, 75.0)
    )));
}

#[test]
fn test_legend_lists_series_in_order() {
    let (mut canvas, series) = chart();
    let axes = canvas.add_axes(Axes::new(), Rect::UNIT);
    canvas.add_legend(Rect::new(0.7, 0.05, 0.25, 0.2));
    canvas
        .add_series(axes, series.shared(), DisplayMode::Lines)
        .unwrap();
    canvas
        .add_series(axes, Series::new("baseline").shared(), DisplayMode::Boxes)
        .unwrap();

    let surface = RecordingSurface::new();
    canvas.paint(&surface);
    let texts = surface.texts();
    let signal = texts.iter().position(|t| t == "signal").unwrap();
    let baseline = texts.iter().position(|t| t == "baseline").unwrap();
    assert!(signal < baseline);
}
