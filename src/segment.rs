//! Splits message bodies into plain text and fenced code spans.
//!
//! A fence is three backticks, an optional ASCII word used as the language
//! tag, a newline, the body, and three closing backticks. Anything that does
//! not form a complete fence stays plain text, so the split is total over all
//! inputs and always yields at least one part.

use once_cell::sync::Lazy;
use regex::Regex;

/// Language reported for fences that carry no tag.
pub const DEFAULT_LANGUAGE: &str = "text";

// The regex crate guarantees linear-time matching, lazy body included.
static CODE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```([A-Za-z0-9_]+)?\n(.*?)```").expect("code fence pattern is valid")
});

/// One display span of a message, borrowed from the message content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderedPart<'a> {
    Text(&'a str),
    Code { language: &'a str, content: &'a str },
}

impl<'a> RenderedPart<'a> {
    pub fn content(&self) -> &'a str {
        match self {
            RenderedPart::Text(content) => content,
            RenderedPart::Code { content, .. } => content,
        }
    }

    pub fn language(&self) -> Option<&'a str> {
        match self {
            RenderedPart::Text(_) => None,
            RenderedPart::Code { language, .. } => Some(language),
        }
    }

    pub fn is_code(&self) -> bool {
        matches!(self, RenderedPart::Code { .. })
    }
}

/// Partitions `content` into ordered text and code parts.
///
/// Code bodies are trimmed of surrounding whitespace; text between fences is
/// kept byte for byte. Empty input yields a single empty text part.
pub fn segment(content: &str) -> Vec<RenderedPart<'_>> {
    let mut parts = Vec::new();
    let mut last_index = 0;

    for caps in CODE_FENCE.captures_iter(content) {
        let Some(fence) = caps.get(0) else {
            continue;
        };

        if fence.start() > last_index {
            parts.push(RenderedPart::Text(&content[last_index..fence.start()]));
        }

        let language = caps.get(1).map_or(DEFAULT_LANGUAGE, |m| m.as_str());
        let body = caps.get(2).map_or("", |m| m.as_str());
        parts.push(RenderedPart::Code {
            language,
            content: body.trim(),
        });

        last_index = fence.end();
    }

    if last_index < content.len() {
        parts.push(RenderedPart::Text(&content[last_index..]));
    }

    if parts.is_empty() {
        parts.push(RenderedPart::Text(content));
    }

    parts
}
