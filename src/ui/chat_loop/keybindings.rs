//! Key handling for the chat screen.
//!
//! Keys are translated into a [`KeyOutcome`] without touching any state so
//! the mapping can be tested on its own. The event loop applies outcomes.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Edits applied to the input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOp {
    Insert(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Quit,
    Submit,
    ToggleMode,
    RequestClear,
    ConfirmClear,
    CancelClear,
    ScrollUp(u16),
    ScrollDown(u16),
    PageUp,
    PageDown,
    Edit(EditOp),
    Ignored,
}

pub fn map_key(key: &KeyEvent, clear_pending: bool) -> KeyOutcome {
    if key.kind == KeyEventKind::Release {
        return KeyOutcome::Ignored;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C')) {
        return KeyOutcome::Quit;
    }

    if clear_pending {
        return match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => KeyOutcome::ConfirmClear,
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => KeyOutcome::CancelClear,
            _ => KeyOutcome::Ignored,
        };
    }

    match key.code {
        KeyCode::Esc => KeyOutcome::Quit,
        KeyCode::Enter => KeyOutcome::Submit,
        KeyCode::Char('f') | KeyCode::Char('F') if ctrl => KeyOutcome::ToggleMode,
        KeyCode::Char('l') | KeyCode::Char('L') if ctrl => KeyOutcome::RequestClear,
        KeyCode::Char(_) if ctrl => KeyOutcome::Ignored,
        KeyCode::Char(c) => KeyOutcome::Edit(EditOp::Insert(c)),
        KeyCode::Backspace => KeyOutcome::Edit(EditOp::Backspace),
        KeyCode::Delete => KeyOutcome::Edit(EditOp::Delete),
        KeyCode::Left => KeyOutcome::Edit(EditOp::Left),
        KeyCode::Right => KeyOutcome::Edit(EditOp::Right),
        KeyCode::Home => KeyOutcome::Edit(EditOp::Home),
        KeyCode::End => KeyOutcome::Edit(EditOp::End),
        KeyCode::Up => KeyOutcome::ScrollUp(1),
        KeyCode::Down => KeyOutcome::ScrollDown(1),
        KeyCode::PageUp => KeyOutcome::PageUp,
        KeyCode::PageDown => KeyOutcome::PageDown,
        _ => KeyOutcome::Ignored,
    }
}
