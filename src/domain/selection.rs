//! Selection handle types

use super::geometry::{Point, Rect};

/// Side length of the square grab area around each handle
pub const HANDLE_GRAB_SIZE: i32 = 20;

/// One of the eight resize handles of a selection rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlePosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Top,
    Bottom,
    Left,
    Right,
}

impl HandlePosition {
    /// Hit-testing order: corners first, then edges
    pub const ALL: [HandlePosition; 8] = [
        HandlePosition::TopLeft,
        HandlePosition::TopRight,
        HandlePosition::BottomLeft,
        HandlePosition::BottomRight,
        HandlePosition::Top,
        HandlePosition::Bottom,
        HandlePosition::Left,
        HandlePosition::Right,
    ];

    /// Where this handle sits on the given rectangle
    pub fn anchor(self, rect: &Rect) -> Point {
        let mid_x = rect.left + rect.width() / 2;
        let mid_y = rect.top + rect.height() / 2;
        match self {
            HandlePosition::TopLeft => rect.top_left(),
            HandlePosition::TopRight => rect.top_right(),
            HandlePosition::BottomLeft => rect.bottom_left(),
            HandlePosition::BottomRight => rect.bottom_right(),
            HandlePosition::Top => Point::new(mid_x, rect.top),
            HandlePosition::Bottom => Point::new(mid_x, rect.bottom),
            HandlePosition::Left => Point::new(rect.left, mid_y),
            HandlePosition::Right => Point::new(rect.right, mid_y),
        }
    }

    /// Grab area for this handle on the given rectangle
    pub fn grab_area(self, rect: &Rect) -> Rect {
        Rect::centered(self.anchor(rect), HANDLE_GRAB_SIZE)
    }

    /// Handle on the opposite horizontal side (Left <-> Right)
    pub fn mirrored_horizontally(self) -> Self {
        match self {
            HandlePosition::TopLeft => HandlePosition::TopRight,
            HandlePosition::TopRight => HandlePosition::TopLeft,
            HandlePosition::BottomLeft => HandlePosition::BottomRight,
            HandlePosition::BottomRight => HandlePosition::BottomLeft,
            HandlePosition::Left => HandlePosition::Right,
            HandlePosition::Right => HandlePosition::Left,
            other => other,
        }
    }

    /// Handle on the opposite vertical side (Top <-> Bottom)
    pub fn mirrored_vertically(self) -> Self {
        match self {
            HandlePosition::TopLeft => HandlePosition::BottomLeft,
            HandlePosition::BottomLeft => HandlePosition::TopLeft,
            HandlePosition::TopRight => HandlePosition::BottomRight,
            HandlePosition::BottomRight => HandlePosition::TopRight,
            HandlePosition::Top => HandlePosition::Bottom,
            HandlePosition::Bottom => HandlePosition::Top,
            other => other,
        }
    }
}

/// Eight handle anchors derived from a rectangle, in hit-testing order
pub fn handle_set(rect: &Rect) -> [(HandlePosition, Point); 8] {
    HandlePosition::ALL.map(|h| (h, h.anchor(rect)))
}

/// Result of hit-testing a pointer position against the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// Pointer is over a resize handle
    Handle(HandlePosition),
    /// Pointer is inside the selection, away from handles
    Moving,
    /// Pointer is outside; a press starts a new selection
    None,
}

/// Pointer shape the host should show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorShape {
    #[default]
    Arrow,
    Crosshair,
    /// North-west / south-east diagonal resize
    ResizeNwSe,
    /// North-east / south-west diagonal resize
    ResizeNeSw,
    ResizeVertical,
    ResizeHorizontal,
}

impl From<HitTarget> for CursorShape {
    fn from(hit: HitTarget) -> Self {
        match hit {
            HitTarget::Handle(HandlePosition::TopLeft | HandlePosition::BottomRight) => {
                CursorShape::ResizeNwSe
            }
            HitTarget::Handle(HandlePosition::TopRight | HandlePosition::BottomLeft) => {
                CursorShape::ResizeNeSw
            }
            HitTarget::Handle(HandlePosition::Top | HandlePosition::Bottom) => {
                CursorShape::ResizeVertical
            }
            HitTarget::Handle(HandlePosition::Left | HandlePosition::Right) => {
                CursorShape::ResizeHorizontal
            }
            HitTarget::Moving | HitTarget::None => CursorShape::Arrow,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_anchors() {
        let r = Rect::new(10, 20, 110, 80);
        let set = handle_set(&r);
        assert_eq!(set[0], (HandlePosition::TopLeft, Point::new(10, 20)));
        assert_eq!(set[3], (HandlePosition::BottomRight, Point::new(110, 80)));
        assert_eq!(set[4], (HandlePosition::Top, Point::new(60, 20)));
        assert_eq!(set[7], (HandlePosition::Right, Point::new(110, 50)));
    }

    #[test]
    fn test_mirroring_is_involutive() {
        for h in HandlePosition::ALL {
            assert_eq!(h.mirrored_horizontally().mirrored_horizontally(), h);
            assert_eq!(h.mirrored_vertically().mirrored_vertically(), h);
        }
    }
}
