// src/conversation.rs

//! Conversation state and its transition function.
//!
//! `Conversation::apply` is the only way the message list, the input buffer
//! or the phase change. It performs no I/O: anything that has to happen
//! outside (send the question, start or abort a background task) comes back
//! as an [`Effect`] for the caller to carry out.

use crate::constants::{CANCELLED_MESSAGE, ERROR_MESSAGE};
use crate::models::{Message, Role};
use crate::reveal;

/// Identifies one accepted submission. Completion events carry it so that
/// anything arriving for an older request is ignored.
pub type RequestId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    AwaitingResponse {
        request: RequestId,
    },
    Revealing {
        request: RequestId,
        answer: String,
        shown: usize,
    },
    /// Idle, with the last request's failure on screen.
    ErrorDisplayed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationEvent {
    /// Submit the current input buffer.
    Submit,
    ResponseReceived { request: RequestId, answer: String },
    ResponseFailed { request: RequestId },
    /// Show one more character of the answer.
    RevealStep { request: RequestId },
    /// Show the rest of the answer at once.
    RevealFinish { request: RequestId },
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SendQuestion { request: RequestId, question: String },
    StartReveal { request: RequestId, steps: usize },
    AbortInFlight,
}

#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
    input: String,
    phase: Phase,
    next_request: RequestId,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            input: String::new(),
            phase: Phase::Idle,
            next_request: 1,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// True while a request or its reveal is in flight.
    pub fn is_streaming(&self) -> bool {
        matches!(
            self.phase,
            Phase::AwaitingResponse { .. } | Phase::Revealing { .. }
        )
    }

    /// Whether a submit right now would be accepted.
    pub fn can_submit(&self) -> bool {
        !self.is_streaming() && !self.input.trim().is_empty()
    }

    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn apply(&mut self, event: ConversationEvent) -> Option<Effect> {
        match event {
            ConversationEvent::Submit => self.submit(),
            ConversationEvent::ResponseReceived { request, answer } => {
                self.response_received(request, answer)
            }
            ConversationEvent::ResponseFailed { request } => {
                if self.awaiting(request) {
                    self.replace_last(ERROR_MESSAGE);
                    self.phase = Phase::ErrorDisplayed;
                }
                None
            }
            ConversationEvent::RevealStep { request } => {
                self.reveal_step(request);
                None
            }
            ConversationEvent::RevealFinish { request } => {
                self.reveal_finish(request);
                None
            }
            ConversationEvent::Cancel => self.cancel(),
        }
    }

    fn submit(&mut self) -> Option<Effect> {
        if !self.can_submit() {
            return None;
        }

        let question = std::mem::take(&mut self.input);
        self.messages.push(Message::user(question.clone()));
        self.messages.push(Message::placeholder());

        let request = self.next_request;
        self.next_request += 1;
        self.phase = Phase::AwaitingResponse { request };

        Some(Effect::SendQuestion { request, question })
    }

    fn response_received(&mut self, request: RequestId, answer: String) -> Option<Effect> {
        if !self.awaiting(request) {
            return None;
        }

        let steps = reveal::step_count(&answer);
        if steps == 0 {
            self.phase = Phase::Idle;
            return None;
        }

        self.phase = Phase::Revealing {
            request,
            answer,
            shown: 0,
        };
        Some(Effect::StartReveal { request, steps })
    }

    fn reveal_step(&mut self, request: RequestId) {
        let Phase::Revealing {
            request: current,
            answer,
            shown,
        } = &mut self.phase
        else {
            return;
        };
        if *current != request {
            return;
        }

        let Some(end) = reveal::next_prefix_end(answer, *shown) else {
            return;
        };
        *shown = end;
        let prefix = answer[..end].to_string();
        let done = end == answer.len();

        self.replace_last(prefix);
        if done {
            self.phase = Phase::Idle;
        }
    }

    fn reveal_finish(&mut self, request: RequestId) {
        let answer = match &self.phase {
            Phase::Revealing {
                request: current,
                answer,
                ..
            } if *current == request => answer.clone(),
            _ => return,
        };
        self.replace_last(answer);
        self.phase = Phase::Idle;
    }

    fn cancel(&mut self) -> Option<Effect> {
        match self.phase {
            Phase::AwaitingResponse { .. } => {
                self.replace_last(CANCELLED_MESSAGE);
            }
            // Whatever has been revealed so far stays.
            Phase::Revealing { .. } => {}
            Phase::Idle | Phase::ErrorDisplayed => return None,
        }
        self.phase = Phase::Idle;
        Some(Effect::AbortInFlight)
    }

    fn awaiting(&self, request: RequestId) -> bool {
        matches!(self.phase, Phase::AwaitingResponse { request: current } if current == request)
    }

    /// Rewrites the in-flight assistant message.
    fn replace_last(&mut self, content: impl Into<String>) {
        if let Some(last) = self.messages.last_mut() {
            if last.role() == Role::Assistant {
                last.set_content(content);
            }
        }
    }
}
