//! Selection engine: create, move and resize the selection rectangle
//!
//! The rectangle is kept normalized after every mutation. A zero-size
//! rectangle means "no selection yet".

use crate::domain::{HandlePosition, HitTarget, Point, Rect};
use crate::render::geometry::selection::LABEL_OFFSET;

/// Human-readable selection size shown next to the rectangle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeLabel {
    pub text: String,
    pub position: Point,
}

impl SizeLabel {
    fn for_rect(rect: &Rect) -> Option<Self> {
        let dims = rect.dimensions()?;
        Some(Self {
            text: format!("{}x{}", dims.width(), dims.height()),
            position: rect.top_right().offset(LABEL_OFFSET.0, LABEL_OFFSET.1),
        })
    }
}

/// Pointer gesture currently driving the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Gesture {
    #[default]
    Idle,
    Creating {
        origin: Point,
    },
    /// Pointer offset from the rectangle's top-left corner
    Moving {
        grab: (i32, i32),
    },
    Resizing(HandlePosition),
}

#[derive(Debug, Default)]
pub struct SelectionEngine {
    rect: Rect,
    gesture: Gesture,
    label: Option<SizeLabel>,
}

impl SelectionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn is_valid(&self) -> bool {
        self.rect.is_valid()
    }

    pub fn size_label(&self) -> Option<&SizeLabel> {
        self.label.as_ref()
    }

    /// True between a press and its release
    pub fn is_dragging(&self) -> bool {
        self.gesture != Gesture::Idle
    }

    /// Classify a pointer position: handles first (corners, then edges), then
    /// the interior
    pub fn hit_test(&self, point: Point) -> HitTarget {
        if !self.rect.is_valid() {
            return HitTarget::None;
        }
        for handle in HandlePosition::ALL {
            if handle.grab_area(&self.rect).contains(point) {
                return HitTarget::Handle(handle);
            }
        }
        if self.rect.contains(point) {
            HitTarget::Moving
        } else {
            HitTarget::None
        }
    }

    /// Start a fresh selection anchored at `point`
    pub fn begin_selection(&mut self, point: Point) {
        self.rect = Rect::new(point.x, point.y, point.x, point.y);
        self.gesture = Gesture::Creating { origin: point };
        self.geometry_changed();
    }

    /// Stretch the selection being created to `point`
    pub fn update_selection(&mut self, point: Point) {
        if let Gesture::Creating { origin } = self.gesture {
            self.rect = Rect::from_points(origin, point);
            self.geometry_changed();
        }
    }

    /// Translate the selection by a delta
    pub fn move_selection(&mut self, dx: i32, dy: i32) {
        self.rect = self.rect.translate(dx, dy);
        self.geometry_changed();
    }

    /// Move the edges controlled by `handle` to `point`, then re-normalize
    ///
    /// Returns the handle now under the pointer: dragging past the opposite
    /// edge flips the rectangle and the handle with it.
    pub fn resize_selection(&mut self, handle: HandlePosition, point: Point) -> HandlePosition {
        let mut r = self.rect;
        match handle {
            HandlePosition::TopLeft => {
                r.left = point.x;
                r.top = point.y;
            }
            HandlePosition::TopRight => {
                r.right = point.x;
                r.top = point.y;
            }
            HandlePosition::BottomLeft => {
                r.left = point.x;
                r.bottom = point.y;
            }
            HandlePosition::BottomRight => {
                r.right = point.x;
                r.bottom = point.y;
            }
            HandlePosition::Top => r.top = point.y,
            HandlePosition::Bottom => r.bottom = point.y,
            HandlePosition::Left => r.left = point.x,
            HandlePosition::Right => r.right = point.x,
        }

        let mut active = handle;
        if r.left > r.right {
            active = active.mirrored_horizontally();
        }
        if r.top > r.bottom {
            active = active.mirrored_vertically();
        }
        self.rect = r.normalized();
        if let Gesture::Resizing(current) = &mut self.gesture {
            *current = active;
        }
        self.geometry_changed();
        active
    }

    /// Pointer pressed in selection mode
    pub fn press(&mut self, point: Point) -> HitTarget {
        let hit = self.hit_test(point);
        match hit {
            HitTarget::Handle(handle) => self.gesture = Gesture::Resizing(handle),
            HitTarget::Moving => {
                self.gesture = Gesture::Moving {
                    grab: (point.x - self.rect.left, point.y - self.rect.top),
                }
            }
            HitTarget::None => self.begin_selection(point),
        }
        log::debug!("Selection press at {point:?}: {hit:?}");
        hit
    }

    /// Pointer moved; returns true if the rectangle changed
    pub fn drag(&mut self, point: Point) -> bool {
        let before = self.rect;
        match self.gesture {
            Gesture::Idle => return false,
            Gesture::Creating { .. } => self.update_selection(point),
            Gesture::Moving { grab } => {
                let dx = point.x - grab.0 - self.rect.left;
                let dy = point.y - grab.1 - self.rect.top;
                self.move_selection(dx, dy);
            }
            Gesture::Resizing(handle) => {
                self.resize_selection(handle, point);
            }
        }
        self.rect != before
    }

    pub fn release(&mut self) {
        if self.gesture != Gesture::Idle {
            log::debug!("Selection settled at {:?}", self.rect);
        }
        self.gesture = Gesture::Idle;
    }

    fn geometry_changed(&mut self) {
        self.label = SizeLabel::for_rect(&self.rect);
    }
}
