use crate::constants::{WELCOME_SUBTITLE, WELCOME_TITLE};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

/// Shown until the first question is sent.
pub fn draw_welcome(f: &mut Frame<'_>, area: Rect) {
    let top_padding = area.height.saturating_sub(3) / 2;
    let mut lines = vec![Line::default(); top_padding as usize];
    lines.push(Line::from(Span::styled(
        WELCOME_TITLE,
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        WELCOME_SUBTITLE,
        Style::default().fg(Color::DarkGray),
    )));

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, area);
}
