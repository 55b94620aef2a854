//! Occurrence counting for pickaxe searches
//!
//! Content is raw bytes reinterpreted as text; invalid UTF-8 is replaced
//! lossily instead of being rejected.
//!
//! The two strategies count differently on purpose:
//!
//! - **Literal**: non-overlapping scan, resuming right after each hit.
//! - **Regex**: each search resumes one character past the *start* of the
//!   previous match, so overlapping matches count separately.

use crate::errors::{WalkError, WalkResult};
use regex::Regex;

#[derive(Debug, Clone)]
pub enum PatternCounter {
    Literal(String),
    Regex(Regex),
}

impl PatternCounter {
    pub fn literal(pattern: &str) -> WalkResult<Self> {
        if pattern.is_empty() {
            return Err(WalkError::invalid_pattern(pattern, "cannot match on empty string"));
        }

        Ok(PatternCounter::Literal(pattern.to_string()))
    }

    pub fn regex(pattern: &str) -> WalkResult<Self> {
        if pattern.is_empty() {
            return Err(WalkError::invalid_pattern(pattern, "cannot match on empty string"));
        }

        Regex::new(pattern)
            .map(PatternCounter::Regex)
            .map_err(|err| WalkError::invalid_pattern(pattern, err.to_string()))
    }

    pub fn pattern(&self) -> &str {
        match self {
            PatternCounter::Literal(pattern) => pattern,
            PatternCounter::Regex(regex) => regex.as_str(),
        }
    }

    pub fn count(&self, content: &[u8]) -> usize {
        let text = String::from_utf8_lossy(content);

        match self {
            PatternCounter::Literal(pattern) => count_literal(&text, pattern),
            PatternCounter::Regex(regex) => count_regex(&text, regex),
        }
    }
}

fn count_literal(text: &str, pattern: &str) -> usize {
    let mut count = 0;
    let mut position = 0;

    while let Some(found) = text[position..].find(pattern) {
        count += 1;
        position += found + pattern.len();
    }

    count
}

fn count_regex(text: &str, regex: &Regex) -> usize {
    let mut count = 0;
    let mut position = 0;

    while position <= text.len() {
        let Some(found) = regex.find_at(text, position) else {
            break;
        };
        count += 1;

        // one character past the match start, not its end
        let step = text[found.start()..].chars().next().map_or(1, char::len_utf8);
        position = found.start() + step;
    }

    count
}
