mod handler;
mod ui;

use std::io;
use std::time::Duration;

use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::*;

use crate::error::Result;

pub use handler::{handle_key_event, PagerAction};

/// Leading marker of a source header line.
pub const HEADER_MARK: &str = "🍵";
/// Leading marker of an item line.
pub const ITEM_MARK: &str = "•";

/// Lines shown above and below the scrolling area.
const CHROME_HEIGHT: u16 = 4;

/// Scroll state of the digest viewer.
pub struct Pager {
    pub title: String,
    pub lines: Vec<String>,
    pub scroll: usize,
    pub show_help: bool,
}

impl Pager {
    pub fn new(title: &str, text: &str) -> Self {
        Self {
            title: title.to_string(),
            lines: text.lines().map(str::to_string).collect(),
            scroll: 0,
            show_help: false,
        }
    }

    fn max_scroll(&self) -> usize {
        self.lines.len().saturating_sub(1)
    }

    fn section_starts(&self) -> impl Iterator<Item = usize> + '_ {
        self.lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.starts_with(HEADER_MARK))
            .map(|(i, _)| i)
    }

    /// Applies `action`; returns true when the pager should close.
    pub fn apply(&mut self, action: PagerAction, page: usize) -> bool {
        let page = page.max(1);
        match action {
            PagerAction::Quit => return true,
            PagerAction::ScrollUp => self.scroll = self.scroll.saturating_sub(1),
            PagerAction::ScrollDown => self.scroll = (self.scroll + 1).min(self.max_scroll()),
            PagerAction::PageUp => self.scroll = self.scroll.saturating_sub(page),
            PagerAction::PageDown => self.scroll = (self.scroll + page).min(self.max_scroll()),
            PagerAction::Top => self.scroll = 0,
            PagerAction::Bottom => self.scroll = self.max_scroll(),
            PagerAction::NextSection => {
                let current = self.scroll;
                let next = self.section_starts().find(|&i| i > current);
                if let Some(next) = next {
                    self.scroll = next;
                }
            }
            PagerAction::PrevSection => {
                let current = self.scroll;
                let prev = self.section_starts().filter(|&i| i < current).last();
                self.scroll = prev.unwrap_or(0);
            }
            PagerAction::ShowHelp => self.show_help = true,
            PagerAction::HideHelp => self.show_help = false,
        }
        false
    }
}

/// Shows `text` full screen until the user quits.
pub fn run_pager(title: &str, text: &str) -> Result<()> {
    let mut pager = Pager::new(title, text);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut pager);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_loop<B: Backend>(terminal: &mut Terminal<B>, pager: &mut Pager) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::draw(frame, pager))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(action) = handle_key_event(key, pager.show_help) {
                    let page = terminal.size()?.height.saturating_sub(CHROME_HEIGHT) as usize;
                    if pager.apply(action, page) {
                        return Ok(());
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pager() -> Pager {
        let text = format!(
            "\n{h} One\n{i} a\n  https://a\n\n{h} Two\n{i} b\n  https://b\n",
            h = HEADER_MARK,
            i = ITEM_MARK
        );
        Pager::new("Digest", &text)
    }

    #[test]
    fn scrolling_is_clamped() {
        let mut pager = pager();
        pager.apply(PagerAction::ScrollUp, 10);
        assert_eq!(pager.scroll, 0);

        pager.apply(PagerAction::PageDown, 100);
        assert_eq!(pager.scroll, pager.lines.len() - 1);

        pager.apply(PagerAction::ScrollDown, 10);
        assert_eq!(pager.scroll, pager.lines.len() - 1);

        pager.apply(PagerAction::Top, 10);
        assert_eq!(pager.scroll, 0);
    }

    #[test]
    fn section_jumps_land_on_headers() {
        let mut pager = pager();
        pager.apply(PagerAction::NextSection, 10);
        assert_eq!(pager.scroll, 1);
        pager.apply(PagerAction::NextSection, 10);
        assert_eq!(pager.scroll, 5);
        pager.apply(PagerAction::NextSection, 10);
        assert_eq!(pager.scroll, 5);
        pager.apply(PagerAction::PrevSection, 10);
        assert_eq!(pager.scroll, 1);
        pager.apply(PagerAction::PrevSection, 10);
        assert_eq!(pager.scroll, 0);
    }

    #[test]
    fn quit_and_help() {
        let mut pager = pager();
        assert!(!pager.apply(PagerAction::ShowHelp, 10));
        assert!(pager.show_help);
        assert!(!pager.apply(PagerAction::HideHelp, 10));
        assert!(!pager.show_help);
        assert!(pager.apply(PagerAction::Quit, 10));
    }

    #[test]
    fn empty_text_never_scrolls() {
        let mut pager = Pager::new("Digest", "");
        pager.apply(PagerAction::Bottom, 10);
        assert_eq!(pager.scroll, 0);
    }
}
