//! Geometry primitives.
//!
//! Positions and sizes are [`glam::Vec2`] values (re-exported as
//! [`Vector2f`]); [`Rect`] is an axis-aligned rectangle built from them.

use serde::{Deserialize, Serialize};

/// A 2D vector of `f32`, used for positions, sizes and offsets.
pub type Vector2f = glam::Vec2;

/// An axis-aligned rectangle defined by origin and size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner.
    pub origin: Vector2f,
    /// Width and height.
    pub size: Vector2f,
}

impl Rect {
    /// Empty rectangle at origin.
    pub const ZERO: Self = Self {
        origin: Vector2f::ZERO,
        size: Vector2f::ZERO,
    };

    /// Create a new rectangle from origin and size components.
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Vector2f::new(x, y),
            size: Vector2f::new(width, height),
        }
    }

    /// Create a rectangle from an origin and a size.
    #[inline]
    pub const fn from_origin_size(origin: Vector2f, size: Vector2f) -> Self {
        Self { origin, size }
    }

    /// Left edge x coordinate.
    #[inline]
    pub fn left(&self) -> f32 {
        self.origin.x
    }

    /// Top edge y coordinate.
    #[inline]
    pub fn top(&self) -> f32 {
        self.origin.y
    }

    /// Right edge x coordinate.
    #[inline]
    pub fn right(&self) -> f32 {
        self.origin.x + self.size.x
    }

    /// Bottom edge y coordinate.
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size.y
    }

    /// Bottom-right corner.
    #[inline]
    pub fn bottom_right(&self) -> Vector2f {
        self.origin + self.size
    }

    /// Check if the rectangle has no area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Check if a point is inside the rectangle (right/bottom edges excluded).
    #[inline]
    pub fn contains(&self, point: Vector2f) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }

    /// Compute the intersection of two rectangles.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if left < right && top < bottom {
            Some(Rect::new(left, top, right - left, bottom - top))
        } else {
            None
        }
    }

    /// Offset the rectangle by a vector.
    #[inline]
    pub fn translate(&self, offset: Vector2f) -> Rect {
        Rect {
            origin: self.origin + offset,
            size: self.size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_excludes_far_edges() {
        let rect = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(rect.contains(Vector2f::new(10.0, 10.0)));
        assert!(rect.contains(Vector2f::new(29.9, 29.9)));
        assert!(!rect.contains(Vector2f::new(30.0, 15.0)));
        assert!(!rect.contains(Vector2f::new(9.9, 15.0)));
    }

    #[test]
    fn test_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(a.intersect(&b), Some(Rect::new(5.0, 5.0, 5.0, 5.0)));
        assert_eq!(a.intersect(&Rect::new(20.0, 0.0, 5.0, 5.0)), None);
    }

    #[test]
    fn test_translate() {
        let rect = Rect::new(1.0, 2.0, 3.0, 4.0).translate(Vector2f::new(10.0, 20.0));
        assert_eq!(rect.origin, Vector2f::new(11.0, 22.0));
        assert_eq!(rect.bottom_right(), Vector2f::new(14.0, 26.0));
    }
}
