use crate::chat::ChatController;
use crate::code_snippet::{
    collect_snippets, ClipboardSink, CodeSnippet, SnippetId, SnippetManager,
};
use crate::constants::COPY_ACK_DURATION;
use crate::conversation::ConversationEvent;
use crate::models::HealthStatus;
use crate::status_indicator::StatusIndicator;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Chat,
    QuitConfirm,
    Quit,
}

/// What the header shows about the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerStatus {
    Unknown,
    Healthy,
    Unhealthy(String),
}

impl From<Result<HealthStatus, String>> for ServerStatus {
    fn from(result: Result<HealthStatus, String>) -> Self {
        match result {
            Ok(health) if health.is_healthy() => ServerStatus::Healthy,
            Ok(health) => ServerStatus::Unhealthy(health.status),
            Err(reason) => ServerStatus::Unhealthy(reason),
        }
    }
}

pub struct App {
    pub state: AppState,
    pub chat: ChatController,
    pub snippets: SnippetManager,
    pub clipboard: Box<dyn ClipboardSink>,
    pub status_indicator: StatusIndicator,
    pub server_status: ServerStatus,
    pub scroll: u16,
    /// Rows of the message list at the last draw.
    pub page_height: u16,
    pub follow_latest: bool,
    pub frame: usize,
    notice_set_at: Option<Instant>,
}

impl App {
    pub fn new(chat: ChatController, clipboard: Box<dyn ClipboardSink>) -> App {
        App {
            state: AppState::Chat,
            chat,
            snippets: SnippetManager::new(),
            clipboard,
            status_indicator: StatusIndicator::new(),
            server_status: ServerStatus::Unknown,
            scroll: 0,
            page_height: 1,
            follow_latest: true,
            frame: 0,
            notice_set_at: None,
        }
    }

    pub fn submit(&mut self) {
        if self.chat.submit() {
            self.follow_latest = true;
            self.snippets.clear_focus();
            self.sync_status();
        }
    }

    pub fn cancel(&mut self) {
        if self.chat.cancel() {
            self.notify("Request cancelled", Instant::now());
            self.sync_status();
        }
    }

    /// Applies a result coming back from a background task.
    pub fn on_conversation_event(&mut self, event: ConversationEvent) {
        self.chat.handle(event);
        self.sync_status();
    }

    pub fn on_tick(&mut self, now: Instant) {
        self.frame = self.frame.wrapping_add(1);
        if self.status_indicator.is_busy() {
            self.status_indicator.update_spinner();
        }
        self.snippets.expire(now);
        if let Some(at) = self.notice_set_at {
            if now.saturating_duration_since(at) >= COPY_ACK_DURATION {
                self.status_indicator.clear_status();
                self.notice_set_at = None;
            }
        }
    }

    pub fn code_snippets(&self) -> Vec<CodeSnippet> {
        collect_snippets(self.chat.conversation().messages())
    }

    pub fn focus_next_snippet(&mut self) {
        let snippets = self.code_snippets();
        self.snippets.focus_next(&snippets);
    }

    pub fn focus_previous_snippet(&mut self) {
        let snippets = self.code_snippets();
        self.snippets.focus_previous(&snippets);
    }

    /// Copies the focused block, or the `number`-th one when given.
    pub fn copy_snippet(&mut self, number: Option<usize>, now: Instant) {
        let snippets = self.code_snippets();
        let position = |id: SnippetId| snippets.iter().position(|s| s.id == id).map(|i| i + 1);

        let result = match number {
            Some(n) => self
                .snippets
                .copy_nth(&snippets, n, self.clipboard.as_mut(), now),
            None => self
                .snippets
                .copy_focused(&snippets, self.clipboard.as_mut(), now),
        };

        match result {
            Ok(Some(id)) => {
                let shown = position(id).unwrap_or_default();
                log::debug!("copied code block {}", shown);
                self.notify(format!("Copied code block {}", shown), now);
            }
            Ok(None) => self.notify("No code block selected", now),
            Err(e) => {
                log::warn!("copy failed: {}", e);
                self.notify(e.to_string(), now);
            }
        }
    }

    pub fn scroll_up(&mut self) {
        self.follow_latest = false;
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
    }

    pub fn page_up(&mut self) {
        self.follow_latest = false;
        self.scroll = self.scroll.saturating_sub(self.page_height.max(1));
    }

    pub fn page_down(&mut self) {
        self.scroll = self.scroll.saturating_add(self.page_height.max(1));
    }

    pub fn follow(&mut self) {
        self.follow_latest = true;
    }

    fn notify(&mut self, text: impl Into<String>, now: Instant) {
        self.status_indicator.set_status(text);
        self.notice_set_at = Some(now);
    }

    fn sync_status(&mut self) {
        self.status_indicator.sync(self.chat.conversation().phase());
    }
}
