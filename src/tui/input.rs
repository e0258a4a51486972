use crossterm::event::{KeyCode, KeyEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Move(Direction),
    Activate,
    GoBack,
    GoToRoot,
    FitView,
    SetDepth(u8),
    ToggleShowAll,
    ToggleLearned,
    ZoomIn,
    ZoomOut,
    NextTopic,
    ToggleHelp,
    Quit,
    Noop,
}

pub fn action_for_key(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Up => Action::Move(Direction::Up),
        KeyCode::Down => Action::Move(Direction::Down),
        KeyCode::Left => Action::Move(Direction::Left),
        KeyCode::Right => Action::Move(Direction::Right),
        KeyCode::Char('k') => Action::Move(Direction::Up),
        KeyCode::Char('j') => Action::Move(Direction::Down),
        KeyCode::Char('h') => Action::Move(Direction::Left),
        KeyCode::Char('l') => Action::Move(Direction::Right),
        KeyCode::Enter | KeyCode::Char(' ') => Action::Activate,
        KeyCode::Backspace | KeyCode::Char('b') => Action::GoBack,
        KeyCode::Home | KeyCode::Char('g') => Action::GoToRoot,
        KeyCode::Esc => Action::FitView,
        KeyCode::Char('1') => Action::SetDepth(1),
        KeyCode::Char('2') => Action::SetDepth(2),
        KeyCode::Char('3') => Action::SetDepth(3),
        KeyCode::Char('a') => Action::ToggleShowAll,
        KeyCode::Char('x') => Action::ToggleLearned,
        KeyCode::Char('+') | KeyCode::Char('=') => Action::ZoomIn,
        KeyCode::Char('-') => Action::ZoomOut,
        KeyCode::Tab => Action::NextTopic,
        KeyCode::Char('?') => Action::ToggleHelp,
        KeyCode::Char('q') => Action::Quit,
        _ => Action::Noop,
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
    fn arrows_and_vim_keys_map_to_moves() {
        assert_eq!(action_for_key(key(KeyCode::Up)), Action::Move(Direction::Up));
        assert_eq!(
            action_for_key(key(KeyCode::Char('j'))),
            Action::Move(Direction::Down)
        );
        assert_eq!(
            action_for_key(key(KeyCode::Char('h'))),
            Action::Move(Direction::Left)
        );
    }

    #[test]
    fn activation_keys_map_to_activate() {
        assert_eq!(action_for_key(key(KeyCode::Enter)), Action::Activate);
        assert_eq!(action_for_key(key(KeyCode::Char(' '))), Action::Activate);
    }

    #[test]
    fn escape_requests_fit_view_not_focus() {
        assert_eq!(action_for_key(key(KeyCode::Esc)), Action::FitView);
    }

    #[test]
    fn home_goes_to_root_and_digits_set_depth() {
        assert_eq!(action_for_key(key(KeyCode::Home)), Action::GoToRoot);
        assert_eq!(action_for_key(key(KeyCode::Char('2'))), Action::SetDepth(2));
    }

    #[test]
    fn unmapped_keys_are_noops() {
        assert_eq!(action_for_key(key(KeyCode::Char('Z'))), Action::Noop);
        assert_eq!(action_for_key(key(KeyCode::F(5))), Action::Noop);
    }
}
