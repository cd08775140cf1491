use crossterm::event::{KeyCode, KeyEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    None,
    Quit,
    ToggleHelp,
    Dismiss,
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    HoldCursor,
    HoldIndex(usize),
    Roll,
}

pub fn map_key(key: KeyEvent) -> InputAction {
    match key.code {
        KeyCode::Esc => InputAction::Dismiss,
        KeyCode::Left | KeyCode::Char('h') => InputAction::MoveLeft,
        KeyCode::Right | KeyCode::Char('l') => InputAction::MoveRight,
        KeyCode::Up | KeyCode::Char('k') => InputAction::MoveUp,
        KeyCode::Down | KeyCode::Char('j') => InputAction::MoveDown,
        KeyCode::Char(' ') => InputAction::HoldCursor,
        KeyCode::Enter | KeyCode::Char('r') => InputAction::Roll,
        KeyCode::Char('q') => InputAction::Quit,
        KeyCode::Char('?') => InputAction::ToggleHelp,
        // 1..9 select dice one to nine, 0 selects the tenth.
        KeyCode::Char(digit @ '0'..='9') => {
            let value = digit.to_digit(10).unwrap_or(0) as usize;
            InputAction::HoldIndex(if value == 0 { 9 } else { value - 1 })
        }
        _ => InputAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn maps_basic_actions() {
        assert_eq!(map_key(key(KeyCode::Char('r'))), InputAction::Roll);
        assert_eq!(map_key(key(KeyCode::Enter)), InputAction::Roll);
        assert_eq!(map_key(key(KeyCode::Char(' '))), InputAction::HoldCursor);
        assert_eq!(map_key(key(KeyCode::Char('q'))), InputAction::Quit);
        assert_eq!(map_key(key(KeyCode::Tab)), InputAction::None);
    }

    #[test]
    fn digits_address_dice() {
        assert_eq!(map_key(key(KeyCode::Char('1'))), InputAction::HoldIndex(0));
        assert_eq!(map_key(key(KeyCode::Char('9'))), InputAction::HoldIndex(8));
        assert_eq!(map_key(key(KeyCode::Char('0'))), InputAction::HoldIndex(9));
    }
}
