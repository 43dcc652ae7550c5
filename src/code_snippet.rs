use crate::constants::COPY_ACK_DURATION;
use crate::errors::{AskmeError, AskmeResult};
use crate::models::Message;
use crate::segment::{segment, RenderedPart};
use copypasta::{ClipboardContext, ClipboardProvider};
use std::collections::HashMap;
use std::time::Instant;

/// Position of a code block: which message, which part of that message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SnippetId {
    pub message: usize,
    pub part: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSnippet {
    pub id: SnippetId,
    pub language: String,
    pub content: String,
}

/// Every code block of the conversation, in display order.
pub fn collect_snippets(messages: &[Message]) -> Vec<CodeSnippet> {
    messages
        .iter()
        .enumerate()
        .flat_map(|(message, msg)| {
            segment(msg.content())
                .into_iter()
                .enumerate()
                .filter_map(move |(part, rendered)| match rendered {
                    RenderedPart::Code { language, content } => Some(CodeSnippet {
                        id: SnippetId { message, part },
                        language: language.to_string(),
                        content: content.to_string(),
                    }),
                    RenderedPart::Text(_) => None,
                })
        })
        .collect()
}

pub trait ClipboardSink {
    fn set_contents(&mut self, text: String) -> AskmeResult<()>;
}

/// The system clipboard, opened on first use.
#[derive(Default)]
pub struct SystemClipboard {
    context: Option<ClipboardContext>,
}

impl ClipboardSink for SystemClipboard {
    fn set_contents(&mut self, text: String) -> AskmeResult<()> {
        if self.context.is_none() {
            let context =
                ClipboardContext::new().map_err(|e| AskmeError::clipboard_error(e.to_string()))?;
            self.context = Some(context);
        }
        match self.context.as_mut() {
            Some(context) => context
                .set_contents(text)
                .map_err(|e| AskmeError::clipboard_error(e.to_string())),
            None => Err(AskmeError::clipboard_error("clipboard not initialised")),
        }
    }
}

/// Tracks the focused code block and the transient "copied" marks.
#[derive(Debug, Default)]
pub struct SnippetManager {
    focused: Option<SnippetId>,
    copied: HashMap<SnippetId, Instant>,
}

impl SnippetManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focused(&self) -> Option<SnippetId> {
        self.focused
    }

    pub fn focus_next(&mut self, snippets: &[CodeSnippet]) {
        self.focused = match self.focused_index(snippets) {
            Some(current) if current + 1 < snippets.len() => Some(snippets[current + 1].id),
            Some(current) => Some(snippets[current].id),
            None => snippets.first().map(|s| s.id),
        };
    }

    pub fn focus_previous(&mut self, snippets: &[CodeSnippet]) {
        self.focused = match self.focused_index(snippets) {
            Some(current) if current > 0 => Some(snippets[current - 1].id),
            Some(current) => Some(snippets[current].id),
            None => snippets.last().map(|s| s.id),
        };
    }

    pub fn clear_focus(&mut self) {
        self.focused = None;
    }

    fn focused_index(&self, snippets: &[CodeSnippet]) -> Option<usize> {
        let focused = self.focused?;
        snippets.iter().position(|s| s.id == focused)
    }

    /// Copies the focused block.
    pub fn copy_focused(
        &mut self,
        snippets: &[CodeSnippet],
        clipboard: &mut dyn ClipboardSink,
        now: Instant,
    ) -> AskmeResult<Option<SnippetId>> {
        match self.focused_index(snippets) {
            Some(index) => self.copy(&snippets[index], clipboard, now).map(Some),
            None => Ok(None),
        }
    }

    /// Copies the `number`-th block (1-based).
    pub fn copy_nth(
        &mut self,
        snippets: &[CodeSnippet],
        number: usize,
        clipboard: &mut dyn ClipboardSink,
        now: Instant,
    ) -> AskmeResult<Option<SnippetId>> {
        if number == 0 || number > snippets.len() {
            return Ok(None);
        }
        let snippet = &snippets[number - 1];
        self.focused = Some(snippet.id);
        self.copy(snippet, clipboard, now).map(Some)
    }

    fn copy(
        &mut self,
        snippet: &CodeSnippet,
        clipboard: &mut dyn ClipboardSink,
        now: Instant,
    ) -> AskmeResult<SnippetId> {
        clipboard.set_contents(snippet.content.clone())?;
        self.copied.insert(snippet.id, now);
        Ok(snippet.id)
    }

    pub fn is_copied(&self, id: SnippetId, now: Instant) -> bool {
        self.copied
            .get(&id)
            .is_some_and(|at| now.saturating_duration_since(*at) < COPY_ACK_DURATION)
    }

    /// Drops acknowledgements older than the display window.
    pub fn expire(&mut self, now: Instant) {
        self.copied
            .retain(|_, at| now.saturating_duration_since(*at) < COPY_ACK_DURATION);
    }
}
