use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    Quit,
    DismissError,
    MoveUp,
    MoveDown,
    Toggle,
    Collapse,
    Refresh,
    LoadMore,
    QuickSelect(usize),
    None,
}

/// Captures the UI state needed to interpret a key press.
#[derive(Debug, Clone, Default)]
pub struct InputContext {
    pub has_error: bool,
    pub is_loading: bool,
}

pub fn map_key(key: KeyEvent, ctx: &InputContext) -> Action {
    if key.kind != KeyEventKind::Press {
        return Action::None;
    }

    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Esc => {
            if ctx.has_error {
                Action::DismissError
            } else {
                Action::Quit
            }
        }
        KeyCode::Up | KeyCode::Char('k') => Action::MoveUp,
        KeyCode::Down | KeyCode::Char('j') => Action::MoveDown,
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l' | ' ') => Action::Toggle,
        KeyCode::Left | KeyCode::Char('h') => Action::Collapse,
        KeyCode::Char('r') if !ctx.is_loading => Action::Refresh,
        KeyCode::Char('m') if !ctx.is_loading => Action::LoadMore,
        KeyCode::Char(c) if c.is_ascii_digit() && c != '0' => {
            Action::QuickSelect((c as u8 - b'0') as usize)
        }
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn press_with(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn release(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        }
    }

    fn ctx() -> InputContext {
        InputContext::default()
    }

    fn ctx_error() -> InputContext {
        InputContext {
            has_error: true,
            ..Default::default()
        }
    }

    fn ctx_loading() -> InputContext {
        InputContext {
            is_loading: true,
            ..Default::default()
        }
    }

    #[test]
    fn quit_on_q() {
        assert_eq!(map_key(press(KeyCode::Char('q')), &ctx()), Action::Quit);
    }

    #[test]
    fn esc_quits_without_error() {
        assert_eq!(map_key(press(KeyCode::Esc), &ctx()), Action::Quit);
    }

    #[test]
    fn esc_dismisses_error_when_present() {
        assert_eq!(map_key(press(KeyCode::Esc), &ctx_error()), Action::DismissError);
    }

    #[test]
    fn ctrl_c_quits() {
        assert_eq!(
            map_key(press_with(KeyCode::Char('c'), KeyModifiers::CONTROL), &ctx()),
            Action::Quit
        );
    }

    #[test]
    fn move_keys() {
        assert_eq!(map_key(press(KeyCode::Up), &ctx()), Action::MoveUp);
        assert_eq!(map_key(press(KeyCode::Char('k')), &ctx()), Action::MoveUp);
        assert_eq!(map_key(press(KeyCode::Down), &ctx()), Action::MoveDown);
        assert_eq!(map_key(press(KeyCode::Char('j')), &ctx()), Action::MoveDown);
    }

    #[test]
    fn toggle_enter() {
        assert_eq!(map_key(press(KeyCode::Enter), &ctx()), Action::Toggle);
    }

    #[test]
    fn toggle_space() {
        assert_eq!(map_key(press(KeyCode::Char(' ')), &ctx()), Action::Toggle);
    }

    #[test]
    fn toggle_right_and_l() {
        assert_eq!(map_key(press(KeyCode::Right), &ctx()), Action::Toggle);
        assert_eq!(map_key(press(KeyCode::Char('l')), &ctx()), Action::Toggle);
    }

    #[test]
    fn collapse_left_and_h() {
        assert_eq!(map_key(press(KeyCode::Left), &ctx()), Action::Collapse);
        assert_eq!(map_key(press(KeyCode::Char('h')), &ctx()), Action::Collapse);
    }

    #[test]
    fn refresh_r() {
        assert_eq!(map_key(press(KeyCode::Char('r')), &ctx()), Action::Refresh);
    }

    #[test]
    fn refresh_blocked_while_loading() {
        assert_eq!(map_key(press(KeyCode::Char('r')), &ctx_loading()), Action::None);
    }

    #[test]
    fn load_more_m() {
        assert_eq!(map_key(press(KeyCode::Char('m')), &ctx()), Action::LoadMore);
    }

    #[test]
    fn load_more_blocked_while_loading() {
        assert_eq!(map_key(press(KeyCode::Char('m')), &ctx_loading()), Action::None);
    }

    #[test]
    fn quick_select_digits_1_to_9() {
        for d in 1..=9u8 {
            let c = (b'0' + d) as char;
            assert_eq!(
                map_key(press(KeyCode::Char(c)), &ctx()),
                Action::QuickSelect(d as usize)
            );
        }
    }

    #[test]
    fn digit_zero_returns_none() {
        assert_eq!(map_key(press(KeyCode::Char('0')), &ctx()), Action::None);
    }

    #[test]
    fn unbound_key_returns_none() {
        assert_eq!(map_key(press(KeyCode::Char('z')), &ctx()), Action::None);
    }

    #[test]
    fn non_press_event_filtered() {
        assert_eq!(map_key(release(KeyCode::Char('q')), &ctx()), Action::None);
    }
}
