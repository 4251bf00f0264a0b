//! Math types used across Sextant.
//!
//! Device-space coordinates are `f32` (`Vec2`), data-space values are `f64`.
//! This module re-exports [`glam`] so downstream crates agree on one vector
//! type. `glam` is built with its `mint` feature, so host toolkit points
//! convert with `.into()`.
//!
//! ```
//! use sextant_core::math::Vec2;
//!
//! let cursor = Vec2::new(120.0, 48.0);
//! let moved = cursor + Vec2::new(3.0, -2.0);
//! assert_eq!(moved, Vec2::new(123.0, 46.0));
//! ```
//!
//! [`glam`]: https://docs.rs/glam

pub use glam::{DVec2, Vec2};
