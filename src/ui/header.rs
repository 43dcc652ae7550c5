use crate::app::{App, ServerStatus};
use crate::constants::APP_TITLE;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn draw_header(f: &mut Frame<'_>, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::Rgb(40, 40, 40)));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    let title = Paragraph::new(Line::from(vec![
        Span::styled("✦ ", Style::default().fg(Color::LightMagenta)),
        Span::styled(
            APP_TITLE,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
    ]))
    .alignment(Alignment::Left);
    f.render_widget(title, chunks[0]);

    let (dot_color, label) = match &app.server_status {
        ServerStatus::Unknown => (Color::DarkGray, "checking server".to_string()),
        ServerStatus::Healthy => (Color::Green, "server online".to_string()),
        ServerStatus::Unhealthy(reason) => (Color::Red, format!("server unavailable: {}", reason)),
    };
    let status = Paragraph::new(Line::from(vec![
        Span::styled("● ", Style::default().fg(dot_color)),
        Span::styled(label, Style::default().fg(Color::DarkGray)),
    ]))
    .alignment(Alignment::Right);
    f.render_widget(status, chunks[1]);
}
