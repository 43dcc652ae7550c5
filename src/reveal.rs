//! Paced, character-by-character reveal of an answer that has already been
//! received in full.
//!
//! The task here only decides *when* the next step happens; the conversation
//! decides *what* the next prefix is, so a cancelled task can never leave a
//! half-applied step behind.

use crate::config::Config;
use crate::conversation::{ConversationEvent, RequestId};
use rand::Rng;
use std::time::Duration;
use tokio::{sync::mpsc::UnboundedSender, task::JoinHandle, time::sleep};

/// Byte offsets at which each successive one-character-longer prefix ends.
pub fn prefix_ends(text: &str) -> impl Iterator<Item = usize> + '_ {
    text.char_indices().map(|(idx, ch)| idx + ch.len_utf8())
}

/// End of the prefix one character longer than `text[..shown]`, or `None`
/// once the whole text is shown.
pub fn next_prefix_end(text: &str, shown: usize) -> Option<usize> {
    text.get(shown..)?
        .chars()
        .next()
        .map(|ch| shown + ch.len_utf8())
}

/// Number of reveal steps needed for `text`.
pub fn step_count(text: &str) -> usize {
    text.chars().count()
}

/// Bounds of the random pause between two reveal steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealPacing {
    min: Duration,
    max: Duration,
}

impl RevealPacing {
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Duration::from_millis(config.reveal_min_delay_ms),
            Duration::from_millis(config.reveal_max_delay_ms),
        )
    }

    /// No pause at all between steps.
    pub fn immediate() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Draws a delay uniformly from `[min, max]`.
    pub fn next_delay<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let min = self.min.as_millis() as u64;
        let max = self.max.as_millis() as u64;
        Duration::from_millis(rng.random_range(min..=max))
    }
}

/// Handle to a running reveal.
#[derive(Debug)]
pub struct RevealTask {
    handle: JoinHandle<()>,
}

impl RevealTask {
    pub fn cancel(&self) {
        self.handle.abort();
    }
}

/// Emits `steps` reveal-step events for `request`, pausing between them.
pub fn spawn_reveal(
    events: UnboundedSender<ConversationEvent>,
    request: RequestId,
    steps: usize,
    pacing: RevealPacing,
) -> RevealTask {
    let handle = tokio::spawn(async move {
        for step in 0..steps {
            if events.send(ConversationEvent::RevealStep { request }).is_err() {
                log::debug!("reveal for request {} dropped: receiver gone", request);
                return;
            }
            if step + 1 < steps {
                let delay = pacing.next_delay(&mut rand::rng());
                sleep(delay).await;
            }
        }
        log::debug!("reveal for request {} emitted {} steps", request, steps);
    });

    RevealTask { handle }
}
