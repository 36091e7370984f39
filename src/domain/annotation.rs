//! Annotation tools and shapes drawn on the captured image

use super::geometry::{Point, Rect};

/// Active toolbar tool; exactly one at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Selection mode: press/drag creates, moves or resizes the selection
    #[default]
    None,
    Pen,
    Rectangle,
    Ellipse,
    Line,
    Arrow,
    Text,
}

impl Tool {
    /// Shape produced by a drag gesture with this tool, if it is a shape tool
    pub fn shape_kind(self) -> Option<ShapeKind> {
        match self {
            Tool::Rectangle => Some(ShapeKind::Rectangle),
            Tool::Ellipse => Some(ShapeKind::Ellipse),
            Tool::Line => Some(ShapeKind::Line),
            Tool::Arrow => Some(ShapeKind::Arrow),
            Tool::None | Tool::Pen | Tool::Text => None,
        }
    }

    /// Whether the scroll wheel adjusts the stroke width for this tool
    pub fn uses_stroke_width(self) -> bool {
        !matches!(self, Tool::None | Tool::Text)
    }
}

/// Shapes committed atomically at the end of a drag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Rectangle,
    Ellipse,
    Line,
    Arrow,
}

/// A shape spanning an anchor point and an end point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    pub kind: ShapeKind,
    pub anchor: Point,
    pub end: Point,
}

impl Shape {
    pub fn new(kind: ShapeKind, anchor: Point, end: Point) -> Self {
        Self { kind, anchor, end }
    }

    /// Normalized bounding box of anchor and end
    pub fn bounds(&self) -> Rect {
        Rect::from_points(self.anchor, self.end)
    }

    /// Zero-area boxes and zero-length lines draw nothing
    pub fn is_degenerate(&self) -> bool {
        match self.kind {
            ShapeKind::Rectangle | ShapeKind::Ellipse => !self.bounds().is_valid(),
            ShapeKind::Line | ShapeKind::Arrow => self.anchor == self.end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_tools() {
        assert_eq!(Tool::Arrow.shape_kind(), Some(ShapeKind::Arrow));
        assert_eq!(Tool::Pen.shape_kind(), None);
        assert!(Tool::Pen.uses_stroke_width());
        assert!(!Tool::Text.uses_stroke_width());
        assert!(!Tool::None.uses_stroke_width());
    }

    #[test]
    fn test_degenerate_shapes() {
        let p = Point::new(5, 5);
        assert!(Shape::new(ShapeKind::Line, p, p).is_degenerate());
        assert!(Shape::new(ShapeKind::Rectangle, p, Point::new(5, 40)).is_degenerate());
        assert!(!Shape::new(ShapeKind::Line, p, Point::new(5, 40)).is_degenerate());
        assert!(!Shape::new(ShapeKind::Ellipse, p, Point::new(9, 40)).is_degenerate());
    }
}
