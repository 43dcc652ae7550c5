use crate::code_snippet::{SnippetId, SnippetManager};
use crate::constants::{CANCELLED_MESSAGE, ERROR_MESSAGE};
use crate::models::{Message, Role};
use crate::segment::{segment, RenderedPart};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use std::time::Instant;
use textwrap::wrap;

/// Renders one conversation entry into terminal lines.
pub struct MessageView<'a> {
    message: &'a Message,
    index: usize,
    streaming: bool,
    snippets: &'a SnippetManager,
    now: Instant,
    frame: usize,
}

impl<'a> MessageView<'a> {
    pub fn new(
        message: &'a Message,
        index: usize,
        snippets: &'a SnippetManager,
        now: Instant,
    ) -> Self {
        Self {
            message,
            index,
            streaming: false,
            snippets,
            now,
            frame: 0,
        }
    }

    /// Marks this entry as the one currently being streamed.
    pub fn streaming(mut self, streaming: bool, frame: usize) -> Self {
        self.streaming = streaming;
        self.frame = frame;
        self
    }

    /// `snippet_number` is the running 1-based number of code blocks across
    /// the conversation; it is advanced past this message's blocks.
    pub fn render(&self, width: u16, snippet_number: &mut usize) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        let style = self.base_style();

        self.render_header(&mut lines, style);

        for (part_index, part) in segment(self.message.content()).into_iter().enumerate() {
            match part {
                RenderedPart::Text(text) => self.render_text(&mut lines, text, width, style),
                RenderedPart::Code { language, content } => {
                    *snippet_number += 1;
                    let id = SnippetId {
                        message: self.index,
                        part: part_index,
                    };
                    self.render_code(&mut lines, id, *snippet_number, language, content, style);
                }
            }
        }

        if self.streaming {
            self.render_streaming_dots(&mut lines, style);
        }

        lines.push(Line::from(Span::styled("╰─".to_string(), style)));
        lines
    }

    fn base_style(&self) -> Style {
        let content = self.message.content();
        match self.message.role() {
            Role::User => Style::default().fg(Color::Rgb(255, 223, 128)),
            Role::Assistant if content == ERROR_MESSAGE => {
                Style::default().fg(Color::Red).add_modifier(Modifier::DIM)
            }
            Role::Assistant if content == CANCELLED_MESSAGE => {
                Style::default().fg(Color::DarkGray)
            }
            Role::Assistant => Style::default().fg(Color::Rgb(144, 238, 144)),
        }
    }

    fn render_header(&self, lines: &mut Vec<Line<'static>>, style: Style) {
        let (icon, name) = match self.message.role() {
            Role::User => ("●", "You"),
            Role::Assistant => ("◆", "Assistant"),
        };
        let timestamp = self.message.timestamp().format("%H:%M").to_string();

        lines.push(Line::from(vec![
            Span::styled("┌─ ".to_string(), style),
            Span::styled(format!("{} {}", icon, name), style.add_modifier(Modifier::BOLD)),
            Span::styled(format!("  {}", timestamp), style.add_modifier(Modifier::DIM)),
        ]));
    }

    fn render_text(&self, lines: &mut Vec<Line<'static>>, text: &str, width: u16, style: Style) {
        let text = text.trim_matches('\n');
        if text.is_empty() {
            return;
        }

        let wrap_width = (width as usize).saturating_sub(4).max(1);
        for wrapped_line in wrap(text, wrap_width) {
            lines.push(Line::from(vec![
                Span::styled("│ ".to_string(), style),
                Span::styled(wrapped_line.to_string(), Style::default().fg(Color::White)),
            ]));
        }
    }

    fn render_code(
        &self,
        lines: &mut Vec<Line<'static>>,
        id: SnippetId,
        number: usize,
        language: &str,
        content: &str,
        style: Style,
    ) {
        let focused = self.snippets.focused() == Some(id);
        let bar_style = if focused {
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let badge = if self.snippets.is_copied(id, self.now) {
            Span::styled(
                "✓ copied".to_string(),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(
                format!("[{}] copy", number),
                Style::default().fg(Color::DarkGray),
            )
        };

        lines.push(Line::from(vec![
            Span::styled("│ ".to_string(), style),
            Span::styled("┌ ".to_string(), bar_style),
            Span::styled(language.to_string(), Style::default().fg(Color::Gray)),
            Span::raw("  "),
            badge,
        ]));

        let code_style = Style::default().fg(Color::Rgb(209, 154, 102));
        for code_line in content.lines() {
            lines.push(Line::from(vec![
                Span::styled("│ ".to_string(), style),
                Span::styled("▎ ".to_string(), bar_style),
                Span::styled(code_line.to_string(), code_style),
            ]));
        }
    }

    fn render_streaming_dots(&self, lines: &mut Vec<Line<'static>>, style: Style) {
        let mut spans = vec![Span::styled("│ ".to_string(), style)];
        for dot in 0..3 {
            let dot_style = if dot == self.frame % 3 {
                Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Blue).add_modifier(Modifier::DIM)
            };
            spans.push(Span::styled("● ".to_string(), dot_style));
        }
        lines.push(Line::from(spans));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::{Conversation, ConversationEvent};

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn answered(answer: &str) -> Conversation {
        let mut conversation = Conversation::new();
        conversation.set_input("question");
        conversation.apply(ConversationEvent::Submit);
        conversation.apply(ConversationEvent::ResponseReceived {
            request: 1,
            answer: answer.to_string(),
        });
        conversation.apply(ConversationEvent::RevealFinish { request: 1 });
        conversation
    }

    #[test]
    fn test_renders_text_and_numbered_code_blocks() {
        let conversation = answered("Run:\n```sh\nls\npwd\n```\nThen:\n```\nexit\n```");
        let snippets = SnippetManager::new();
        let mut number = 0;

        let texts: Vec<String> =
            MessageView::new(&conversation.messages()[1], 1, &snippets, Instant::now())
                .render(80, &mut number)
                .iter()
                .map(line_text)
                .collect();

        assert_eq!(number, 2);
        assert!(texts[0].contains("Assistant"));
        assert_eq!(texts[1], "│ Run:");
        assert_eq!(texts[2], "│ ┌ sh  [1] copy");
        assert_eq!(texts[3], "│ ▎ ls");
        assert_eq!(texts[4], "│ ▎ pwd");
        assert_eq!(texts[5], "│ Then:");
        assert_eq!(texts[6], "│ ┌ text  [2] copy");
        assert_eq!(texts[7], "│ ▎ exit");
        assert_eq!(texts.last().map(String::as_str), Some("╰─"));
    }

    #[test]
    fn test_placeholder_shows_streaming_dots() {
        let mut conversation = Conversation::new();
        conversation.set_input("question");
        conversation.apply(ConversationEvent::Submit);
        let snippets = SnippetManager::new();
        let mut number = 0;

        let texts: Vec<String> =
            MessageView::new(&conversation.messages()[1], 1, &snippets, Instant::now())
                .streaming(true, 0)
                .render(80, &mut number)
                .iter()
                .map(line_text)
                .collect();

        assert_eq!(texts.len(), 3);
        assert_eq!(texts[1], "│ ● ● ● ");
    }

    #[test]
    fn test_long_text_is_wrapped() {
        let conversation = answered("one two three four five six");
        let snippets = SnippetManager::new();
        let mut number = 0;

        let lines = MessageView::new(&conversation.messages()[1], 1, &snippets, Instant::now())
            .render(14, &mut number);

        let body: Vec<String> = lines[1..lines.len() - 1].iter().map(line_text).collect();
        assert!(body.len() > 1);
        assert!(body.iter().all(|l| l.chars().count() <= 14));
    }
}
