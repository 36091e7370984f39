use crate::domain::Tool;
use crate::session::messages::{Key, KeyAction, Modifiers};

/// Map a key press to a surface action given the active tool and whether a
/// text session is open
pub fn handle_key_event(
    key: &Key,
    modifiers: Modifiers,
    tool: Tool,
    text_open: bool,
) -> Option<KeyAction> {
    // Typing goes to the text field, shortcuts included
    let editing = text_open && tool == Tool::Text;

    match key {
        // Undo/copy shortcuts
        Key::Character(c) if c.eq_ignore_ascii_case("z") && modifiers.control() && !editing => {
            Some(KeyAction::Undo)
        }
        Key::Character(c) if c.eq_ignore_ascii_case("c") && modifiers.control() && !editing => {
            Some(KeyAction::Copy)
        }
        // Escape unwinds one level: text session, then tool, then the surface
        Key::Escape if text_open => Some(KeyAction::CommitText),
        Key::Escape if tool != Tool::None => Some(KeyAction::ResetTool),
        Key::Escape => Some(KeyAction::Close),
        // Text editing
        Key::Enter if editing => Some(KeyAction::Newline),
        Key::Backspace if editing => Some(KeyAction::Backspace),
        Key::Character(c) if editing && !modifiers.control() && !c.is_empty() => {
            Some(KeyAction::InsertText(c.clone()))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ch(c: &str) -> Key {
        Key::Character(c.to_string())
    }

    #[test]
    fn test_escape_unwinds() {
        assert_eq!(
            handle_key_event(&Key::Escape, Modifiers::NONE, Tool::Text, true),
            Some(KeyAction::CommitText)
        );
        assert_eq!(
            handle_key_event(&Key::Escape, Modifiers::NONE, Tool::Pen, false),
            Some(KeyAction::ResetTool)
        );
        // A session left open across a tool switch is still committed first
        assert_eq!(
            handle_key_event(&Key::Escape, Modifiers::NONE, Tool::Pen, true),
            Some(KeyAction::CommitText)
        );
        assert_eq!(
            handle_key_event(&Key::Escape, Modifiers::NONE, Tool::None, false),
            Some(KeyAction::Close)
        );
    }

    #[test]
    fn test_shortcuts() {
        assert_eq!(
            handle_key_event(&ch("z"), Modifiers::CTRL, Tool::Pen, false),
            Some(KeyAction::Undo)
        );
        assert_eq!(
            handle_key_event(&ch("c"), Modifiers::CTRL, Tool::None, false),
            Some(KeyAction::Copy)
        );
        assert_eq!(handle_key_event(&ch("z"), Modifiers::NONE, Tool::Pen, false), None);
    }

    #[test]
    fn test_typing_only_while_editing() {
        assert_eq!(
            handle_key_event(&ch("H"), Modifiers::NONE, Tool::Text, true),
            Some(KeyAction::InsertText("H".to_string()))
        );
        assert_eq!(
            handle_key_event(&Key::Enter, Modifiers::NONE, Tool::Text, true),
            Some(KeyAction::Newline)
        );
        assert_eq!(handle_key_event(&ch("H"), Modifiers::NONE, Tool::Text, false), None);
        assert_eq!(handle_key_event(&Key::Backspace, Modifiers::NONE, Tool::Pen, false), None);
    }
}
