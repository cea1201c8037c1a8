// ABOUTME: Placeholder scanner that splits a pattern into literal text and ${...} regions
// ABOUTME: Yields segments lazily in occurrence order without ever failing

use regex::{Matches, Regex};
use serde::Serialize;
use std::sync::OnceLock;

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

fn placeholder_regex() -> &'static Regex {
    // A placeholder body runs up to the first '}' and never nests
    PLACEHOLDER_REGEX.get_or_init(|| Regex::new(r"\$\{[^}]+\}").expect("valid placeholder regex"))
}

/// One piece of a scanned pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Segment<'a> {
    /// Text outside any placeholder, passed through untouched
    Literal(&'a str),
    /// A full `${...}` span, delimiters included
    Expression(&'a str),
}

impl<'a> Segment<'a> {
    /// The original text of this segment as it appeared in the pattern
    pub fn as_str(&self) -> &'a str {
        match self {
            Segment::Literal(text) | Segment::Expression(text) => text,
        }
    }

    /// The placeholder body between `${` and `}`, if this is an expression
    pub fn body(&self) -> Option<&'a str> {
        match self {
            Segment::Expression(raw) => Some(&raw[2..raw.len() - 1]),
            Segment::Literal(_) => None,
        }
    }
}

/// Lazy iterator over the segments of a pattern
pub struct Scanner<'a> {
    pattern: &'a str,
    matches: Matches<'static, 'a>,
    position: usize,
    pending: Option<Segment<'a>>,
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(segment) = self.pending.take() {
            return Some(segment);
        }

        match self.matches.next() {
            Some(m) => {
                let expression = Segment::Expression(m.as_str());
                let literal = &self.pattern[self.position..m.start()];
                self.position = m.end();

                if literal.is_empty() {
                    Some(expression)
                } else {
                    self.pending = Some(expression);
                    Some(Segment::Literal(literal))
                }
            }
            None if self.position < self.pattern.len() => {
                let tail = &self.pattern[self.position..];
                self.position = self.pattern.len();
                Some(Segment::Literal(tail))
            }
            None => None,
        }
    }
}

/// Scan a pattern into literal and placeholder segments
pub fn scan(pattern: &str) -> Scanner<'_> {
    Scanner {
        pattern,
        matches: placeholder_regex().find_iter(pattern),
        position: 0,
        pending: None,
    }
}

/// Check if a string contains at least one placeholder
pub fn has_placeholders(text: &str) -> bool {
    placeholder_regex().is_match(text)
}
