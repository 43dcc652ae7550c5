use crate::app::{App, AppState};
use crate::constants::FOOTER_HINT;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

/// Draws the footer with dynamic instructions
pub fn draw_footer(f: &mut Frame<'_>, area: Rect, app: &App) {
    let instructions = match app.state {
        AppState::QuitConfirm => "Press 'y' to confirm quit or 'n' to cancel.".to_string(),
        _ if app.chat.is_streaming() => "Esc to stop. PgUp/PgDn to scroll.".to_string(),
        _ => format!(
            "{}  Tab: select code  Ctrl-Y: copy  Ctrl-C: quit",
            FOOTER_HINT
        ),
    };

    let footer = Paragraph::new(instructions)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);

    f.render_widget(footer, area);
}
