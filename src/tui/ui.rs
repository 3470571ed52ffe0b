use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::{Pager, HEADER_MARK, ITEM_MARK};

pub fn draw(frame: &mut Frame, pager: &Pager) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(0),    // Digest body
            Constraint::Length(1), // Status line
        ])
        .split(frame.area());

    render_header(frame, pager, chunks[0]);
    render_body(frame, pager, chunks[1]);
    render_status(frame, pager, chunks[2]);

    if pager.show_help {
        render_help(frame);
    }
}

fn render_header(frame: &mut Frame, pager: &Pager, area: Rect) {
    let sections = pager
        .lines
        .iter()
        .filter(|l| l.starts_with(HEADER_MARK))
        .count();
    let items = pager.lines.iter().filter(|l| l.starts_with(ITEM_MARK)).count();

    let block = Block::default()
        .title(format!(" {} ", pager.title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let stats = format!(" {} Sources | {} Items", sections, items);
    let paragraph = Paragraph::new(stats).style(Style::default().fg(Color::White));
    frame.render_widget(paragraph, inner);
}

fn render_body(frame: &mut Frame, pager: &Pager, area: Rect) {
    let lines: Vec<Line> = pager
        .lines
        .iter()
        .skip(pager.scroll)
        .map(|line| Line::styled(line.as_str(), line_style(line)))
        .collect();

    let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::LEFT));
    frame.render_widget(paragraph, area);
}

fn line_style(line: &str) -> Style {
    if line.starts_with(HEADER_MARK) {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else if line.starts_with(ITEM_MARK) {
        Style::default().fg(Color::White)
    } else if line.trim_start().starts_with("http") {
        Style::default().fg(Color::Blue)
    } else {
        Style::default().fg(Color::Gray)
    }
}

fn render_status(frame: &mut Frame, pager: &Pager, area: Rect) {
    let position = if pager.lines.is_empty() {
        "empty".to_string()
    } else {
        format!("{}/{}", pager.scroll + 1, pager.lines.len())
    };
    let status = format!("j/k:scroll  n/p:section  g/G:top/bottom  ?:help  q:quit  [{position}]");

    let paragraph = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

fn render_help(frame: &mut Frame) {
    let area = centered_rect(50, 50, frame.area());

    let help_text = [
        "",
        " Navigation:",
        "   j / ↓        Scroll down",
        "   k / ↑        Scroll up",
        "   Space/PgDn   Page down",
        "   PgUp         Page up",
        "   n / p        Next / previous source",
        "   g / G        Top / bottom",
        "",
        " General:",
        "   ?            Toggle this help",
        "   q / Esc      Quit",
        "",
        " Press any key to close",
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(help_text.join("\n"))
        .block(block)
        .style(Style::default().fg(Color::White));

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn draws_visible_lines_from_scroll_offset() {
        let text = format!("{} One\n{} first\n  https://a\n", HEADER_MARK, ITEM_MARK);
        let mut pager = Pager::new("Digest 2024-01-02", &text);
        pager.scroll = 1;

        let mut terminal = Terminal::new(TestBackend::new(60, 10)).unwrap();
        terminal.draw(|frame| draw(frame, &pager)).unwrap();

        let buffer = terminal.backend().buffer();
        let rendered: String = (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n");

        assert!(rendered.contains("Digest 2024-01-02"));
        assert!(rendered.contains("first"));
        assert!(rendered.contains("1 Sources | 1 Items"));
        assert!(!rendered.contains("One"));
    }

    #[test]
    fn styles_by_line_kind() {
        assert_eq!(line_style(&format!("{} x", HEADER_MARK)).fg, Some(Color::Cyan));
        assert_eq!(line_style("  https://a").fg, Some(Color::Blue));
        assert_eq!(line_style("    summary").fg, Some(Color::Gray));
    }
}
