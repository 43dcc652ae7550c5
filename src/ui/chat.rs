use crate::app::App;
use crate::chat_message::MessageView;
use crate::constants::INPUT_PLACEHOLDER;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::time::Instant;
use unicode_width::UnicodeWidthStr;

const INPUT_PROMPT: &str = "→ ";

/// Draws the conversation and keeps `app.scroll` inside the rendered range.
pub fn draw_messages(f: &mut Frame<'_>, area: Rect, app: &mut App) {
    let now = Instant::now();
    let conversation = app.chat.conversation();
    let streaming = conversation.is_streaming();
    let last = conversation.messages().len().saturating_sub(1);
    let width = area.width.saturating_sub(2);

    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut snippet_number = 0;
    for (index, message) in conversation.messages().iter().enumerate() {
        let view = MessageView::new(message, index, &app.snippets, now)
            .streaming(streaming && index == last, app.frame);
        lines.extend(view.render(width, &mut snippet_number));
        lines.push(Line::default());
    }

    app.page_height = area.height;
    let total = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    let max_scroll = total.saturating_sub(area.height);
    if app.follow_latest {
        app.scroll = max_scroll;
    } else if app.scroll >= max_scroll {
        // Scrolled back down to the end; resume following.
        app.scroll = max_scroll;
        app.follow_latest = true;
    }

    let messages = Paragraph::new(lines)
        .block(Block::default().borders(Borders::LEFT | Borders::RIGHT).border_style(
            Style::default().fg(Color::Rgb(40, 40, 40)),
        ))
        .scroll((app.scroll, 0));

    f.render_widget(messages, area);
}

pub fn draw_input(f: &mut Frame<'_>, area: Rect, app: &App) {
    let streaming = app.chat.is_streaming();
    let input = app.chat.conversation().input();

    let border_color = if streaming {
        Color::DarkGray
    } else {
        Color::Rgb(90, 90, 200)
    };

    let text = if input.is_empty() {
        let hint = if streaming {
            "Waiting for the assistant..."
        } else {
            INPUT_PLACEHOLDER
        };
        Line::from(vec![
            Span::styled(INPUT_PROMPT, Style::default().fg(border_color)),
            Span::styled(
                hint,
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ),
        ])
    } else {
        Line::from(vec![
            Span::styled(INPUT_PROMPT, Style::default().fg(border_color)),
            Span::styled(input.to_string(), Style::default().fg(Color::White)),
        ])
    };

    // Keep the cursor cell after the last character inside the box.
    let inner_width = area.width.saturating_sub(2);
    let content_width =
        u16::try_from(INPUT_PROMPT.width() + input.width()).unwrap_or(u16::MAX);
    let hscroll = content_width
        .saturating_add(1)
        .saturating_sub(inner_width);

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color)),
        )
        .scroll((0, hscroll));
    f.render_widget(paragraph, area);

    if !streaming {
        let offset = content_width.saturating_sub(hscroll);
        let max_x = area.x.saturating_add(inner_width);
        let x = area.x.saturating_add(1).saturating_add(offset).min(max_x);
        f.set_cursor_position((x, area.y.saturating_add(1)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_app;
    use crate::conversation::ConversationEvent;
    use ratatui::{backend::TestBackend, Terminal};

    fn long_answer(app: &mut App) {
        "question".chars().for_each(|c| app.chat.push_char(c));
        app.submit();
        let answer = (1..=40).map(|n| format!("line {}", n)).collect::<Vec<_>>().join("\n\n");
        app.on_conversation_event(ConversationEvent::ResponseReceived { request: 1, answer });
        app.on_conversation_event(ConversationEvent::RevealFinish { request: 1 });
    }

    #[tokio::test]
    async fn test_follow_latest_scrolls_to_bottom() {
        let (mut app, _rx, _clipboard) = test_app();
        long_answer(&mut app);
        let mut terminal = Terminal::new(TestBackend::new(60, 10)).unwrap();

        terminal
            .draw(|f| draw_messages(f, f.area(), &mut app))
            .unwrap();

        assert!(app.scroll > 0);
        assert!(app.follow_latest);
    }

    #[tokio::test]
    async fn test_draw_records_page_height() {
        let (mut app, _rx, _clipboard) = test_app();
        long_answer(&mut app);
        let mut terminal = Terminal::new(TestBackend::new(60, 10)).unwrap();

        terminal
            .draw(|f| draw_messages(f, f.area(), &mut app))
            .unwrap();

        assert_eq!(app.page_height, 10);
    }

    #[tokio::test]
    async fn test_long_input_keeps_tail_and_cursor_visible() {
        let (mut app, _rx, _clipboard) = test_app();
        "a".repeat(99).chars().for_each(|c| app.chat.push_char(c));
        app.chat.push_char('z');
        let mut terminal = Terminal::new(TestBackend::new(80, 3)).unwrap();

        terminal.draw(|f| draw_input(f, f.area(), &app)).unwrap();

        let buffer = terminal.backend().buffer();
        assert_eq!(buffer[(77, 1)].symbol(), "z");
        assert_eq!(buffer[(1, 1)].symbol(), "a");
        assert_eq!(terminal.get_cursor_position().unwrap().x, 78);
    }

    #[tokio::test]
    async fn test_huge_input_clamps_cursor_to_right_edge() {
        let (mut app, _rx, _clipboard) = test_app();
        "x".repeat(65_534).chars().for_each(|c| app.chat.push_char(c));
        let mut terminal = Terminal::new(TestBackend::new(80, 3)).unwrap();

        terminal.draw(|f| draw_input(f, f.area(), &app)).unwrap();

        let cursor = terminal.get_cursor_position().unwrap();
        assert_eq!((cursor.x, cursor.y), (78, 1));
    }

    #[tokio::test]
    async fn test_short_input_is_not_scrolled() {
        let (mut app, _rx, _clipboard) = test_app();
        "hi".chars().for_each(|c| app.chat.push_char(c));
        let mut terminal = Terminal::new(TestBackend::new(80, 3)).unwrap();

        terminal.draw(|f| draw_input(f, f.area(), &app)).unwrap();

        let buffer = terminal.backend().buffer();
        assert_eq!(buffer[(1, 1)].symbol(), "→");
        assert_eq!(buffer[(3, 1)].symbol(), "h");
        assert_eq!(terminal.get_cursor_position().unwrap().x, 5);
    }

    #[tokio::test]
    async fn test_manual_scroll_is_kept() {
        let (mut app, _rx, _clipboard) = test_app();
        long_answer(&mut app);
        let mut terminal = Terminal::new(TestBackend::new(60, 10)).unwrap();
        terminal
            .draw(|f| draw_messages(f, f.area(), &mut app))
            .unwrap();
        let bottom = app.scroll;

        app.scroll_up();
        app.scroll_up();
        terminal
            .draw(|f| draw_messages(f, f.area(), &mut app))
            .unwrap();

        assert_eq!(app.scroll, bottom - 2);
        assert!(!app.follow_latest);
    }
}
