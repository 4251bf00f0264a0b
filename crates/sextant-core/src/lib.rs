//! Sextant Core
//!
//! Ambient utilities shared by the Sextant crates: logging setup, profiling
//! hooks, math re-exports and hash collections.

pub mod alloc;
pub mod logging;
pub mod math;
pub mod profiling;
