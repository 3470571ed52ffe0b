use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerAction {
    Quit,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    Top,
    Bottom,
    NextSection,
    PrevSection,
    ShowHelp,
    HideHelp,
}

pub fn handle_key_event(key: KeyEvent, show_help: bool) -> Option<PagerAction> {
    // If help is showing, any key closes it
    if show_help {
        return Some(PagerAction::HideHelp);
    }

    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => Some(PagerAction::Quit),
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(PagerAction::Quit),

        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Some(PagerAction::ScrollDown),
        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Some(PagerAction::ScrollUp),
        (KeyCode::PageDown, _) | (KeyCode::Char(' '), _) => Some(PagerAction::PageDown),
        (KeyCode::PageUp, _) => Some(PagerAction::PageUp),
        (KeyCode::Char('g'), _) | (KeyCode::Home, _) => Some(PagerAction::Top),
        (KeyCode::Char('G'), _) | (KeyCode::End, _) => Some(PagerAction::Bottom),
        (KeyCode::Char('n'), _) => Some(PagerAction::NextSection),
        (KeyCode::Char('p'), _) => Some(PagerAction::PrevSection),

        (KeyCode::Char('?'), _) => Some(PagerAction::ShowHelp),

        _ => None,
    }
}
