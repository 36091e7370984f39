//! Geometric types for surface coordinates
//!
//! All coordinates are integer pixels in the captured image's space, with the
//! origin at the image's top-left corner.

use std::num::NonZeroU32;

/// A pointer position in surface pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset this point by the given delta
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn to_f32(self) -> (f32, f32) {
        (self.x as f32, self.y as f32)
    }
}

/// Axis-aligned rectangle with exclusive right/bottom edges
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    /// Create a new rectangle from coordinates
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Normalized rectangle spanning two arbitrary corner points
    pub fn from_points(a: Point, b: Point) -> Self {
        Self::new(a.x, a.y, b.x, b.y).normalized()
    }

    /// Square of side `size` centered on `center`
    pub fn centered(center: Point, size: i32) -> Self {
        let half = size / 2;
        Self::new(
            center.x - half,
            center.y - half,
            center.x - half + size,
            center.y - half + size,
        )
    }

    /// Swap edges so that width and height are non-negative
    pub fn normalized(self) -> Self {
        Self {
            left: self.left.min(self.right),
            top: self.top.min(self.bottom),
            right: self.left.max(self.right),
            bottom: self.top.max(self.bottom),
        }
    }

    pub fn is_normalized(&self) -> bool {
        self.left <= self.right && self.top <= self.bottom
    }

    /// A rectangle with zero width or height means "no selection"
    pub fn is_valid(&self) -> bool {
        self.dimensions().is_some()
    }

    /// Calculate the intersection of two rectangles
    pub fn intersect(&self, other: Rect) -> Option<Rect> {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right.min(other.right);
        let bottom = self.bottom.min(other.bottom);
        if left < right && top < bottom {
            Some(Rect {
                left,
                top,
                right,
                bottom,
            })
        } else {
            None
        }
    }

    /// Translate the rectangle by the given offset
    pub fn translate(&self, x: i32, y: i32) -> Rect {
        Rect {
            left: self.left + x,
            top: self.top + y,
            right: self.right + x,
            bottom: self.bottom + y,
        }
    }

    /// Get the width of the rectangle
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    /// Get the height of the rectangle
    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub fn top_right(&self) -> Point {
        Point::new(self.right, self.top)
    }

    pub fn bottom_left(&self) -> Point {
        Point::new(self.left, self.bottom)
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(self.right, self.bottom)
    }

    /// Convert to dimensions (NonZeroU32 width and height)
    pub fn dimensions(self) -> Option<RectDimension> {
        let width = NonZeroU32::new((self.width()).unsigned_abs())?;
        let height = NonZeroU32::new((self.height()).unsigned_abs())?;
        Some(RectDimension { width, height })
    }

    /// Check if this rectangle contains a point
    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }

    pub fn contains(&self, point: Point) -> bool {
        self.contains_point(point.x, point.y)
    }
}

/// Non-zero dimensions of a rectangle
#[derive(Clone, Copy, Debug)]
pub struct RectDimension {
    pub width: NonZeroU32,
    pub height: NonZeroU32,
}

impl RectDimension {
    /// Get the width as u32
    pub fn width(&self) -> u32 {
        self.width.get()
    }

    /// Get the height as u32
    pub fn height(&self) -> u32 {
        self.height.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points_normalizes() {
        let r = Rect::from_points(Point::new(60, 40), Point::new(10, 10));
        assert_eq!(r, Rect::new(10, 10, 60, 40));
        assert_eq!((r.width(), r.height()), (50, 30));
    }

    #[test]
    fn test_zero_size_is_invalid() {
        assert!(!Rect::default().is_valid());
        assert!(!Rect::new(5, 5, 5, 40).is_valid());
        assert!(Rect::new(5, 5, 6, 6).is_valid());
    }

    #[test]
    fn test_centered_square_is_half_open() {
        let sq = Rect::centered(Point::new(0, 0), 20);
        assert!(sq.contains_point(-10, -10));
        assert!(sq.contains_point(9, 9));
        assert!(!sq.contains_point(10, 0));
    }
}
