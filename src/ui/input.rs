// Translate crossterm input into bar events

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::bar::{Button, Phase, PointerEvent};

fn button(button: MouseButton) -> Button {
    match button {
        MouseButton::Left => Button::Left,
        MouseButton::Right => Button::Right,
        MouseButton::Middle => Button::Middle,
    }
}

/// Scrolling counts as a press of the matching wheel button
pub fn pointer_event(mouse: &MouseEvent) -> PointerEvent {
    let (button, phase) = match mouse.kind {
        MouseEventKind::Down(b) => (Some(button(b)), Phase::Press),
        MouseEventKind::Up(b) => (Some(button(b)), Phase::Release),
        MouseEventKind::Drag(b) => (Some(button(b)), Phase::Drag),
        MouseEventKind::Moved => (None, Phase::Motion),
        MouseEventKind::ScrollUp => (Some(Button::WheelUp), Phase::Press),
        MouseEventKind::ScrollDown => (Some(Button::WheelDown), Phase::Press),
        MouseEventKind::ScrollLeft => (Some(Button::WheelLeft), Phase::Press),
        MouseEventKind::ScrollRight => (Some(Button::WheelRight), Phase::Press),
    };

    PointerEvent {
        column: mouse.column,
        row: mouse.row,
        button,
        phase,
    }
}

/// Ctrl+C; raw mode swallows the SIGINT the terminal would send
pub fn is_quit(key: &KeyEvent) -> bool {
    key.kind == KeyEventKind::Press
        && key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
}
