use crate::conversation::Phase;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const SPINNER_FRAMES: [&str; 4] = ["◐", "◓", "◑", "◒"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Activity {
    Idle,
    Waiting,
    Streaming,
}

/// One-line status under the message list: a spinner while a request or
/// reveal is running, plus the latest notice (copy results and the like).
#[derive(Debug)]
pub struct StatusIndicator {
    activity: Activity,
    status_text: String,
    spinner_idx: usize,
}

impl StatusIndicator {
    pub fn new() -> Self {
        Self {
            activity: Activity::Idle,
            status_text: String::new(),
            spinner_idx: 0,
        }
    }

    /// Follows the conversation phase.
    pub fn sync(&mut self, phase: &Phase) {
        self.activity = match phase {
            Phase::AwaitingResponse { .. } => Activity::Waiting,
            Phase::Revealing { .. } => Activity::Streaming,
            Phase::Idle | Phase::ErrorDisplayed => Activity::Idle,
        };
    }

    pub fn is_busy(&self) -> bool {
        self.activity != Activity::Idle
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status_text = status.into();
    }

    pub fn clear_status(&mut self) {
        self.status_text.clear();
    }

    pub fn status(&self) -> &str {
        &self.status_text
    }

    pub fn update_spinner(&mut self) {
        self.spinner_idx = self.spinner_idx.wrapping_add(1);
    }

    fn label(&self) -> &str {
        if !self.status_text.is_empty() {
            return &self.status_text;
        }
        match self.activity {
            Activity::Waiting => "Waiting for a reply...",
            Activity::Streaming => "Streaming reply... (Esc to stop)",
            Activity::Idle => "",
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let indicator = if self.is_busy() {
            SPINNER_FRAMES[self.spinner_idx % SPINNER_FRAMES.len()]
        } else {
            " "
        };

        let status_color = if !self.status_text.is_empty() {
            Color::Yellow
        } else {
            Color::DarkGray
        };

        let status = Line::from(vec![
            Span::styled(indicator, Style::default().fg(Color::Blue)),
            Span::raw(" "),
            Span::styled(self.label().to_string(), Style::default().fg(status_color)),
        ]);

        frame.render_widget(Paragraph::new(status).alignment(Alignment::Left), area);
    }
}

impl Default for StatusIndicator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_follows_phase() {
        let mut indicator = StatusIndicator::new();
        indicator.sync(&Phase::AwaitingResponse { request: 1 });
        assert!(indicator.is_busy());
        assert_eq!(indicator.label(), "Waiting for a reply...");

        indicator.sync(&Phase::ErrorDisplayed);
        assert!(!indicator.is_busy());
        assert_eq!(indicator.label(), "");
    }

    #[test]
    fn test_status_text_wins_over_activity() {
        let mut indicator = StatusIndicator::new();
        indicator.sync(&Phase::Revealing {
            request: 1,
            answer: "abc".to_string(),
            shown: 1,
        });
        indicator.set_status("Copied code block 1");
        assert_eq!(indicator.label(), "Copied code block 1");
        indicator.clear_status();
        assert_eq!(indicator.label(), "Streaming reply... (Esc to stop)");
    }
}
