//! Host-facing messages and keyboard handling
//!
//! This module contains:
//! - Input, editor and surface event types
//! - Keyboard shortcut mapping

pub mod messages;
pub mod shortcuts;

pub use messages::{EditorEvent, InputEvent, Key, KeyAction, Modifiers, SurfaceEvent};
pub use shortcuts::handle_key_event;
