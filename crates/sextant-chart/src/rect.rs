//! Rectangular bounds utility shared by every coordinate space.

use sextant_core::math::Vec2;

/// Axis-aligned rectangle.
///
/// Used both for normalized element bounds (`[0,1]²`) and for device-space
/// pixel rectangles.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X position (left)
    pub x: f32,
    /// Y position (top)
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    /// The unit square, the full extent of bounds space.
    pub const UNIT: Rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 1.0,
        height: 1.0,
    };

    /// Create a new rect.
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create the rect spanned by two corners, in any order.
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        let min = a.min(b);
        let max = a.max(b);
        Self::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }

    /// Get the position as a Vec2.
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Get the size as a Vec2.
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Get the center point.
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Get the right edge.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Get the bottom edge.
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Inset the rect by a padding amount.
    pub fn inset(&self, padding: f32) -> Self {
        Self {
            x: self.x + padding,
            y: self.y + padding,
            width: (self.width - padding * 2.0).max(0.0),
            height: (self.height - padding * 2.0).max(0.0),
        }
    }

    /// Check if a point is inside the rect (edges inclusive).
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }

    /// Check whether `other` lies entirely inside this rect.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        self.contains(other.position()) && self.contains(Vec2::new(other.right(), other.bottom()))
    }

    /// Check whether two rects overlap (touching edges count).
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.right()
            && other.x <= self.right()
            && self.y <= other.bottom()
            && other.y <= self.bottom()
    }

    /// Return the rect moved by `delta`.
    pub fn translate(&self, delta: Vec2) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y, self.width, self.height)
    }

    /// Scale every component, mapping bounds space to device space.
    pub fn scale(&self, factor: Vec2) -> Self {
        Self::new(
            self.x * factor.x,
            self.y * factor.y,
            self.width * factor.x,
            self.height * factor.y,
        )
    }

    /// Make width and height non-negative by moving the origin.
    pub fn normalized(&self) -> Self {
        Self::from_corners(self.position(), self.position() + self.size())
    }

    /// True when the rect has no area.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}
