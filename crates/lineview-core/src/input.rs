//! Input events consumed by the viewport.

/// Non-character keys the viewport reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// Caret one line up.
    Up,
    /// Caret one line down.
    Down,
    /// Caret one char left.
    Left,
    /// Caret one char right.
    Right,
    /// Caret to line start.
    Home,
    /// Caret to line end.
    End,
    /// Caret one page up.
    PageUp,
    /// Caret one page down.
    PageDown,
    /// Split the line.
    Enter,
    /// Delete left.
    Backspace,
    /// Delete right.
    Delete,
    /// Insert a tab (or spaces).
    Tab,
}

impl KeyCode {
    /// Whether this key only moves the caret.
    pub fn is_navigation(self) -> bool {
        matches!(
            self,
            KeyCode::Up
                | KeyCode::Down
                | KeyCode::Left
                | KeyCode::Right
                | KeyCode::Home
                | KeyCode::End
                | KeyCode::PageUp
                | KeyCode::PageDown
        )
    }
}

/// A mouse click in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseClick {
    /// X in viewport space.
    pub x: f64,
    /// Y in viewport space.
    pub y: f64,
    /// 1 for single click, 2 for double click, ...
    pub click_count: u32,
}

/// Scroll wheel movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollEvent {
    /// Discrete wheel ticks; positive scrolls towards the end of the document.
    pub ticks: i32,
}

/// Input delivered to [`EditorViewport::handle_input`](crate::EditorViewport::handle_input).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A key was pressed.
    KeyPressed(KeyCode),
    /// A key produced a character.
    KeyTyped(char),
    /// The mouse was clicked.
    MouseClicked(MouseClick),
    /// The wheel was scrolled.
    Scrolled(ScrollEvent),
}

/// What handling an event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// The event was not consumed.
    Ignored,
    /// Only the caret moved.
    Navigated,
    /// The text changed.
    Edited,
    /// Only the scroll position changed.
    Scrolled,
}

impl InputOutcome {
    /// Whether the event was consumed.
    pub fn is_consumed(self) -> bool {
        self != InputOutcome::Ignored
    }
}
