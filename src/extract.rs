//! Pulls the code out of a markdown-formatted LLM response.
//!
//! This is a best-effort heuristic, not a markdown parser. It expects at most one
//! fenced block tagged with the configured language, e.g.
//!
//! ````text
//! ```python
//! print(factorial(5))
//! ```
//! ````
//!
//! With several blocks only the first one is isolated; whatever follows its closing
//! fence is dropped. Text after the closing fence keeps the fence in the output, and a
//! missing closing fence leaves the remainder as-is. Both are known gaps, not bugs to
//! paper over here.

use crate::config::DEFAULT_LANGUAGE;

/// Markdown code fence.
pub const FENCE: &str = "```";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    BeforeOpen,
    InsideBlock,
    AfterClose,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeExtractor {
    opening: String,
}

impl CodeExtractor {
    /// Extractor for blocks opened with ```` ```{language} ````.
    pub fn new(language: &str) -> Self {
        Self {
            opening: format!("{FENCE}{}", language.trim()),
        }
    }

    pub fn opening_marker(&self) -> &str {
        &self.opening
    }

    /// Return the code embedded in `response`, trimmed.
    ///
    /// Responses that don't start with the opening marker come back trimmed and
    /// otherwise untouched. Empty input yields an empty string.
    pub fn extract<'a>(&self, response: &'a str) -> &'a str {
        let trimmed = response.trim();
        let mut body = trimmed;
        let mut state = State::BeforeOpen;

        loop {
            state = match state {
                State::BeforeOpen => match trimmed.strip_prefix(self.opening.as_str()) {
                    Some(rest) => {
                        body = rest;
                        State::InsideBlock
                    }
                    None => return trimmed,
                },
                State::InsideBlock => {
                    if !body.trim_end().ends_with(FENCE) {
                        return body.trim();
                    }
                    State::AfterClose
                }
                State::AfterClose => {
                    let end = body.find(FENCE).unwrap_or(body.len());
                    return body[..end].trim();
                }
            };
        }
    }
}

impl Default for CodeExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_LANGUAGE)
    }
}
