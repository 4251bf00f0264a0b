//! Cached series geometry and its invalidation.

use sextant_core::math::Vec2;

use crate::binding::DisplayMode;
use crate::rect::Rect;

bitflags::bitflags! {
    /// Reasons cached geometry may be stale.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct GeometryDirty: u8 {
        /// Samples were appended, cleared or replaced.
        const DATA = 0b0000_0001;
        /// Axes data bounds or graph area moved.
        const AXES = 0b0000_0010;
        /// Canvas device size changed.
        const DEVICE = 0b0000_0100;
        /// Colors, widths or markers changed.
        const STYLE = 0b0000_1000;
        /// Display mode or box layout changed.
        const LAYOUT = 0b0001_0000;
    }
}

impl GeometryDirty {
    /// Whether point or box positions have to be recomputed.
    pub fn needs_rebuild(&self) -> bool {
        self.intersects(Self::DATA | Self::AXES | Self::DEVICE | Self::LAYOUT)
    }

    /// Only cosmetic state changed.
    pub fn is_style_only(&self) -> bool {
        *self == Self::STYLE
    }
}

/// Inputs the cached geometry was computed from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheKey {
    pub axes_revision: u64,
    pub series_revision: u64,
    pub device_size: Vec2,
    pub box_divisor: u32,
    pub box_offset: f32,
    pub mode: DisplayMode,
}

/// Bounds-space geometry for one series binding.
#[derive(Debug, Clone)]
pub struct SeriesGeometry {
    /// Sample positions in bounds space, one per sample.
    pub points: Vec<Vec2>,
    /// One box per sample in BOXES mode, bounds space.
    pub boxes: Vec<Rect>,
    key: Option<CacheKey>,
    dirty: GeometryDirty,
    rebuilds: u64,
}

impl Default for SeriesGeometry {
    fn default() -> Self {
        Self::new()
    }
}

impl SeriesGeometry {
    pub fn new() -> Self {
        Self {
            points: Vec::new(),
            boxes: Vec::new(),
            key: None,
            dirty: GeometryDirty::all(),
            rebuilds: 0,
        }
    }

    pub fn dirty_flags(&self) -> GeometryDirty {
        self.dirty
    }

    pub fn invalidate(&mut self, flags: GeometryDirty) {
        self.dirty |= flags;
    }

    /// Why geometry cached so far would be stale for `key`: flags raised
    /// explicitly plus whatever differs from the key it was built from.
    pub fn staleness(&self, key: &CacheKey) -> GeometryDirty {
        let mut flags = self.dirty;
        let Some(built) = self.key.as_ref() else {
            return flags | GeometryDirty::all().difference(GeometryDirty::STYLE);
        };
        if built.series_revision != key.series_revision {
            flags |= GeometryDirty::DATA;
        }
        if built.axes_revision != key.axes_revision {
            flags |= GeometryDirty::AXES;
        }
        if built.device_size != key.device_size {
            flags |= GeometryDirty::DEVICE;
        }
        if built.mode != key.mode
            || built.box_divisor != key.box_divisor
            || built.box_offset != key.box_offset
        {
            flags |= GeometryDirty::LAYOUT;
        }
        flags
    }

    /// Whether the cache matches `key` and carries no structural dirt.
    pub fn is_valid(&self, key: &CacheKey) -> bool {
        !self.staleness(key).needs_rebuild()
    }

    /// Store freshly computed geometry.
    pub fn store(&mut self, key: CacheKey, points: Vec<Vec2>, boxes: Vec<Rect>) {
        self.points = points;
        self.boxes = boxes;
        self.key = Some(key);
        self.dirty = GeometryDirty::empty();
        self.rebuilds += 1;
    }

    /// Clear cosmetic dirt without touching positions.
    pub fn clear_style(&mut self) {
        self.dirty.remove(GeometryDirty::STYLE);
    }

    /// Number of rebuilds so far.
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }
}
