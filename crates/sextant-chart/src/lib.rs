//! Sextant Chart - Interactive 2D charting
//!
//! This crate provides:
//! - Ordered numeric series with fast x lookup
//! - Axes with data/device transforms and "nice" tick placement
//! - Series bindings drawn as lines, points or side-by-side boxes
//! - A canvas of z-ordered elements with click, drag and rectangle selection
//!
//! Drawing goes through the [`DrawSurface`] trait, so any 2D backend can be
//! plugged in.
//!
//! # Example
//!
//! ```
//! use std::time::Instant;
//! use sextant_chart::*;
//!
//! let mut canvas = Canvas::new(CanvasConfig::default(), 640.0, 480.0);
//! let axes = canvas.add_axes(
//!     Axes::new().with_data_bounds(-14.0, 10.0, 0.0, 100.0),
//!     Rect::UNIT,
//! );
//!
//! let series = Series::from_samples("load", [(0.0, 10.0), (1.0, 40.0), (2.0, 25.0)])
//!     .unwrap()
//!     .shared();
//! let line = canvas.add_series(axes, series, DisplayMode::Lines).unwrap();
//!
//! let status = canvas.handle_event(&CanvasEvent::Resized { width: 800.0, height: 600.0 }, Instant::now());
//! assert!(status.is_handled());
//! assert_eq!(canvas.binding(line).unwrap().display_mode(), DisplayMode::Lines);
//! ```

// Values and formatting
mod color;
mod error;
mod format;
mod range;
mod rect;

// Data
mod series;

// Drawing
mod cache;
mod surface;

// Elements
mod axes;
mod binding;
mod element;
mod element_list;
mod indicator;
mod legend;
mod text;

// Interaction
mod canvas;
mod config;
mod editor;
mod event;
mod timer;

pub use axes::{AutoFit, AxisTarget, AxisTicks, Axes, AxesElement, GraphArea, SharedAxes, Tick};
pub use binding::{DisplayMode, MarkerKind, SeriesBinding, SeriesOptions, box_offsets};
pub use cache::{CacheKey, GeometryDirty, SeriesGeometry};
pub use canvas::{
    Canvas, InteractionState, Z_AXES, Z_BOXES, Z_INDICATOR, Z_LEGEND, Z_LINES, Z_TEXT,
};
pub use color::{Color, SERIES_PALETTE};
pub use config::{AxesStyle, CanvasConfig, DEFAULT_DOUBLE_CLICK_DELAY};
pub use editor::PropertyEditor;
pub use element::{
    CanvasContext, EditorRequest, EditorTarget, Element, ElementBehavior, ElementFrame, ElementId,
    ElementKind,
};
pub use element_list::ElementList;
pub use error::{ChartError, ChartResult};
pub use event::{CanvasEvent, HandleStatus, Key, KeyInput, PointerButton};
pub use format::{LabelFormat, format_fixed, format_label, format_scientific, round_half_up};
pub use indicator::PositionIndicator;
pub use legend::{Legend, LegendEntry};
pub use range::{TickKind, TickWalk, WalkedTick, normalize_range, rational_tick_spacing};
pub use rect::Rect;
pub use series::{DataExtents, Sample, Series, SharedSeries};
pub use surface::{DrawSurface, EstimatedMetrics, Stroke, TextAnchor, TextMetrics, TextStyle};
pub use text::TextLabel;
pub use timer::{ClickTimer, PendingClick};
