//! Drawing state machine for pen and shape tools
//!
//! - Pen strokes are composited into the layer segment by segment
//! - Shapes show a preview while dragging and commit once on release
//! - One undo snapshot per gesture, taken before its first mutation

use crate::canvas::{AnnotationLayer, History};
use crate::config::ShapeColor;
use crate::domain::{Point, Shape, Tool};
use crate::render::image::{segment_patch, shape_patch};

pub const MIN_STROKE_WIDTH: u32 = 1;
pub const MAX_STROKE_WIDTH: u32 = 20;
/// Wheel delta corresponding to one notch
pub const SCROLL_STEP: i32 = 120;

/// Whole notches in a wheel delta, truncated toward zero
pub fn scroll_notches(delta: i32) -> i32 {
    delta / SCROLL_STEP
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawState {
    #[default]
    Idle,
    /// Pen gesture in progress
    Drawing { last: Point },
    /// Shape gesture in progress; the shape is only a preview
    ShapeDrawing(Shape),
}

#[derive(Debug)]
pub struct DrawingMachine {
    state: DrawState,
    stroke_width: u32,
}

impl Default for DrawingMachine {
    fn default() -> Self {
        Self::new(5)
    }
}

impl DrawingMachine {
    pub fn new(stroke_width: u32) -> Self {
        Self {
            state: DrawState::Idle,
            stroke_width: stroke_width.clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH),
        }
    }

    pub fn state(&self) -> DrawState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != DrawState::Idle
    }

    pub fn stroke_width(&self) -> u32 {
        self.stroke_width
    }

    /// Shape to draw as a live preview, if a shape gesture is in progress
    pub fn preview(&self) -> Option<Shape> {
        match self.state {
            DrawState::ShapeDrawing(shape) => Some(shape),
            _ => None,
        }
    }

    /// Start a gesture; returns true if a redraw is needed
    pub fn pointer_down(
        &mut self,
        tool: Tool,
        point: Point,
        layer: &AnnotationLayer,
        history: &mut History,
    ) -> bool {
        if tool == Tool::Pen {
            history.push(layer);
            self.state = DrawState::Drawing { last: point };
            return true;
        }
        match tool.shape_kind() {
            Some(kind) => {
                self.state = DrawState::ShapeDrawing(Shape::new(kind, point, point));
                true
            }
            None => false,
        }
    }

    /// Continue a gesture; returns true if a redraw is needed
    pub fn pointer_move(
        &mut self,
        point: Point,
        color: ShapeColor,
        layer: &mut AnnotationLayer,
    ) -> bool {
        match &mut self.state {
            DrawState::Idle => false,
            DrawState::Drawing { last } => {
                if *last == point {
                    return false;
                }
                if let Some(patch) = segment_patch(*last, point, color, self.stroke_width as f32) {
                    layer.commit(&patch);
                }
                *last = point;
                true
            }
            DrawState::ShapeDrawing(shape) => {
                shape.end = point;
                true
            }
        }
    }

    /// Finish a gesture, committing any shape; returns true if a redraw is needed
    pub fn pointer_up(
        &mut self,
        point: Point,
        color: ShapeColor,
        layer: &mut AnnotationLayer,
        history: &mut History,
    ) -> bool {
        match std::mem::take(&mut self.state) {
            DrawState::Idle => false,
            DrawState::Drawing { .. } => true,
            DrawState::ShapeDrawing(mut shape) => {
                shape.end = point;
                commit_shape(&shape, color, self.stroke_width as f32, layer, history);
                true
            }
        }
    }

    /// Apply wheel notches to the stroke width, clamped to the allowed range
    pub fn adjust_stroke_width(&mut self, notches: i32) -> bool {
        let width = (self.stroke_width as i32 + notches)
            .clamp(MIN_STROKE_WIDTH as i32, MAX_STROKE_WIDTH as i32) as u32;
        let changed = width != self.stroke_width;
        self.stroke_width = width;
        changed
    }

    /// Drop any in-progress gesture without committing
    pub fn cancel(&mut self) {
        self.state = DrawState::Idle;
    }
}

/// Push an undo snapshot and write `shape` into the layer
///
/// Degenerate shapes write nothing and leave the history untouched.
pub fn commit_shape(
    shape: &Shape,
    color: ShapeColor,
    width: f32,
    layer: &mut AnnotationLayer,
    history: &mut History,
) -> bool {
    let Some(patch) = shape_patch(shape, color, width) else {
        log::debug!("Skipping degenerate {:?}", shape.kind);
        return false;
    };
    history.push(layer);
    layer.commit(&patch)
}
