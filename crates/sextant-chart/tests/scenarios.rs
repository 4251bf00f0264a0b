//! End-to-end chart scenarios.
//!
//! These tests drive the public API the way a host application would and
//! check series lookup, tick placement and box layout.

use sextant_chart::{Axes, Canvas, CanvasConfig, ChartError, DisplayMode, Rect, Series};

fn irregular() -> Series {
    Series::from_samples("irregular", [(0.0, 1.0), (1.0, 2.0), (3.0, 0.1), (5.0, -14.0), (8.0, 3.0)])
        .unwrap()
}

fn is_nice(spacing: f64) -> bool {
    let exp = spacing.log10().floor();
    let mantissa = spacing / 10f64.powf(exp);
    [1.0, 2.0, 2.5, 5.0, 10.0]
        .iter()
        .any(|m| (mantissa - m).abs() < 1e-9)
}

// ====================
// Series
// ====================

#[test]
fn test_index_for_x_between_samples() {
    let series = irregular();
    assert_eq!(series.index_for_x_val(4.0), 2);
    let bracket = (series.get(2).unwrap(), series.get(3).unwrap());
    assert!(bracket.0.x <= 4.0 && 4.0 < bracket.1.x);
}

#[test]
fn test_index_matches_bisection() {
    let series = irregular();
    for x in [-1.0, 0.0, 0.5, 2.9, 3.0, 4.999, 5.0, 7.0, 8.0, 100.0] {
        assert_eq!(series.index_for_x_val(x), series.bisect_index(x), "x = {x}");
    }
}

#[test]
fn test_out_of_order_append_is_rejected() {
    let mut series = irregular();
    let err = series.append(7.0, 1.0).unwrap_err();
    assert!(matches!(err, ChartError::SeriesOrdering { .. }));
    assert_eq!(series.len(), 5);
    assert_eq!(series.x_max(), Some(8.0));
}

// ====================
// Ticks
// ====================

#[test]
fn test_rational_ticks_are_nice() {
    let mut axes = Axes::new().with_data_bounds(0.0, 1.0, -14.0, 10.0);
    axes.set_rational_ticks();
    assert!(is_nice(axes.y_tick_spacing()), "{}", axes.y_tick_spacing());
    assert_eq!(axes.y_tick_spacing(), 5.0);

    for (lo, hi) in [(0.0, 1.0), (-3.3, 7.7), (1e-4, 9e-4), (0.0, 12345.0), (-1e6, 1e6)] {
        axes.set_data_bounds(lo, hi, lo, hi);
        axes.set_rational_ticks();
        assert!(is_nice(axes.x_tick_spacing()), "[{lo}, {hi}] -> {}", axes.x_tick_spacing());
    }
}

#[test]
fn test_rational_ticks_are_deterministic() {
    let mut a = Axes::new().with_data_bounds(-2.7, 31.4, 0.0, 1.0);
    let mut b = Axes::new().with_data_bounds(-2.7, 31.4, 0.0, 1.0);
    a.set_rational_ticks();
    b.set_rational_ticks();
    assert_eq!(a.x_tick_spacing(), b.x_tick_spacing());
}

// ====================
// Box layout
// ====================

#[test]
fn test_three_box_series_tile_without_overlap() {
    let mut canvas = Canvas::new(CanvasConfig::default(), 600.0, 400.0);
    let axes = canvas.add_axes(Axes::new().with_data_bounds(-1.0, 5.0, 0.0, 10.0), Rect::UNIT);

    let ids: Vec<_> = (0..3)
        .map(|k| {
            let series = Series::from_samples(format!("s{k}"), (0..5).map(|i| (i as f64, 5.0)))
                .unwrap()
                .with_sample_spacing(1.0)
                .shared();
            canvas.add_series(axes, series, DisplayMode::Boxes).unwrap()
        })
        .collect();

    let offsets: Vec<f32> = ids
        .iter()
        .map(|id| canvas.binding(*id).unwrap().box_layout().1)
        .collect();
    assert_eq!(offsets, vec![-1.0, 0.0, 1.0]);

    let shared = canvas.axes(axes).unwrap();
    let tick_x = shared.borrow().data_to_device_x(2.0);
    let full_width = shared.borrow().data_width_to_device(1.0);

    let boxes: Vec<Rect> = ids
        .iter()
        .map(|id| canvas.binding(*id).unwrap().box_rect_device(2).unwrap())
        .collect();
    for b in &boxes {
        assert!((b.width - full_width / 3.0).abs() < 1e-3);
    }
    for pair in boxes.windows(2) {
        assert!(pair[0].right() <= pair[1].x + 1e-3, "{pair:?}");
    }
    assert!((boxes[1].center().x - tick_x).abs() < 1e-3);
    assert!((tick_x - boxes[0].center().x - (boxes[2].center().x - tick_x)).abs() < 1e-3);
}

#[test]
fn test_box_layout_follows_removal() {
    let mut canvas = Canvas::new(CanvasConfig::default(), 600.0, 400.0);
    let axes = canvas.add_axes(Axes::new(), Rect::UNIT);
    let a = canvas
        .add_series(axes, Series::new("a").shared(), DisplayMode::Boxes)
        .unwrap();
    let b = canvas
        .add_series(axes, Series::new("b").shared(), DisplayMode::Boxes)
        .unwrap();
    assert_eq!(canvas.binding(b).unwrap().box_layout(), (2, 0.5));

    canvas.remove(a).unwrap();
    assert_eq!(canvas.binding(b).unwrap().box_layout(), (1, 0.0));
}
