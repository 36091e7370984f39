//! Message types exchanged between the host and the surface
//!
//! This module contains:
//! - Input events delivered by the host window
//! - Editor events emitted by the toolbar
//! - Surface events sent back to the host

use crate::config::ShapeColor;
use crate::domain::{Point, Tool};

// ============================================================================
// Input Types
// ============================================================================

/// Keys the surface reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Escape,
    Enter,
    Backspace,
    /// Text produced by a key press
    Character(String),
}

/// Modifier state at the time of a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub control: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers { control: false };

    pub const CTRL: Modifiers = Modifiers { control: true };

    pub fn control(self) -> bool {
        self.control
    }
}

/// Pointer, wheel and keyboard input in surface coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    PointerPressed(Point),
    PointerMoved(Point),
    PointerReleased(Point),
    /// Raw wheel delta; 120 per notch
    Scrolled(i32),
    KeyPressed(Key, Modifiers),
}

// ============================================================================
// Editor Types
// ============================================================================

/// Events from the toolbar/editor collaborator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditorEvent {
    ToolChanged(Tool),
    ColorChanged(ShapeColor),
    SaveRequested,
    CopyRequested,
    PublishRequested,
    CloseRequested,
}

// ============================================================================
// Surface Notifications
// ============================================================================

/// Notifications from the surface to its owning window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// State changed; paint at the next frame
    RedrawRequested,
    /// The surface dropped back to selection mode; deselect the toolbar
    ToolsReset,
    /// The surface closed; sent exactly once
    Closed,
}

/// What a key press asks the surface to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Undo,
    Copy,
    /// Finalize the open text session
    CommitText,
    /// Return to selection mode
    ResetTool,
    Close,
    InsertText(String),
    Newline,
    Backspace,
}
