// ABOUTME: Quote-aware tokenizer for a single pipeline stage such as `prefix 'a b'`
// ABOUTME: Splits on whitespace outside quotes and classifies argument tokens by shape

use serde::Serialize;
use std::fmt;

/// Shape of a raw argument token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Wrapped in matching single or double quotes
    StringLiteral,
    /// ASCII digits only
    Integer,
    /// `digits.digits`
    Float,
    /// Anything else
    Opaque,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::StringLiteral => "string",
            TokenKind::Integer => "integer",
            TokenKind::Float => "float",
            TokenKind::Opaque => "opaque",
        };
        write!(f, "{}", name)
    }
}

fn is_quote(c: char) -> bool {
    c == '\'' || c == '"'
}

/// Split a stage body into `[function_name, arg1, arg2, ...]`.
///
/// Whitespace inside a matching pair of quotes is kept in the token and the
/// quotes themselves are retained. A quote with no later partner is an
/// ordinary character.
pub fn tokenize(stage: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;
    let mut open_quote: Option<char> = None;

    for (index, c) in stage.char_indices() {
        if let Some(quote) = open_quote {
            if c == quote {
                open_quote = None;
            }
            continue;
        }

        if c.is_whitespace() {
            if let Some(token_start) = start.take() {
                tokens.push(&stage[token_start..index]);
            }
            continue;
        }

        if start.is_none() {
            start = Some(index);
        }

        if is_quote(c) && stage[index + c.len_utf8()..].contains(c) {
            open_quote = Some(c);
        }
    }

    if let Some(token_start) = start {
        tokens.push(&stage[token_start..]);
    }

    tokens
}

fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

/// Classify an argument token by its shape
pub fn classify(token: &str) -> TokenKind {
    let mut chars = token.chars();
    if let (Some(first), Some(last)) = (chars.next(), chars.next_back()) {
        if is_quote(first) && first == last {
            return TokenKind::StringLiteral;
        }
    }

    if is_digits(token) {
        return TokenKind::Integer;
    }

    match token.split_once('.') {
        Some((whole, fraction)) if is_digits(whole) && is_digits(fraction) => TokenKind::Float,
        _ => TokenKind::Opaque,
    }
}
