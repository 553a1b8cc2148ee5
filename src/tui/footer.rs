use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::AppState;

pub fn render(f: &mut Frame, area: Rect, state: &AppState) {
    let narrow = area.width < crate::app::NARROW_WIDTH_THRESHOLD;

    // The announcement line takes over the footer while live, mirroring an
    // assistive-technology live region.
    let line = if let Some(message) = state.announcer.message() {
        Line::from(vec![
            Span::styled("» ", Style::default().fg(Color::Yellow)),
            Span::styled(message.to_string(), Style::default().fg(Color::Yellow)),
        ])
    } else {
        let hints: &[(&str, &str)] = if narrow {
            &[
                ("j/k", "nav"),
                ("⏎", "details"),
                ("m", "more"),
                ("r", "refresh"),
                ("q", "quit"),
            ]
        } else {
            &[
                ("↑↓/jk", "navigate"),
                ("⏎/Space", "toggle details"),
                ("h", "collapse"),
                ("m", "load more"),
                ("r", "refresh"),
                ("q", "quit"),
            ]
        };
        let mut spans: Vec<Span> = Vec::new();
        for (i, (key, desc)) in hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(*key, Style::default().fg(Color::Cyan)));
            spans.push(Span::styled(
                format!(" {}", desc),
                Style::default().fg(Color::DarkGray),
            ));
        }
        Line::from(spans)
    };

    let footer = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(footer, area);
}
