//! Test utilities for Sextant.
//!
//! - [`RecordingSurface`]: a [`DrawSurface`] that records draw calls instead
//!   of rasterizing them
//! - [`RecordingEditor`]: a [`PropertyEditor`] that keeps every request
//! - [`init_test_logging`]: `tracing` output for test runs

mod recording_editor;
mod recording_surface;

pub use recording_editor::RecordingEditor;
pub use recording_surface::{DrawCall, RecordingSurface};

pub use sextant_chart::{DrawSurface, PropertyEditor};

/// Install a `tracing` subscriber for test runs. `RUST_LOG` overrides the
/// default of debug output for the chart crate.
pub fn init_test_logging() {
    sextant_core::logging::init_with_filter("sextant_chart=debug");
}
