// ABOUTME: Parsing of placeholder bodies into a key and a pipeline of call specs
// ABOUTME: A body like `name | trim | prefix 'x'` becomes key `name` plus two calls

use serde::Serialize;

use super::scanner::{scan, Segment};
use super::tokenizer::{classify, tokenize, TokenKind};

/// One pipeline stage: a function name plus its raw argument tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallSpec<'a> {
    pub function: &'a str,
    pub args: Vec<&'a str>,
}

impl<'a> CallSpec<'a> {
    /// Parse one stage body. Returns `None` when the stage is blank.
    pub fn parse(stage: &'a str) -> Option<Self> {
        let mut tokens = tokenize(stage).into_iter();
        let function = tokens.next()?;

        Some(Self {
            function,
            args: tokens.collect(),
        })
    }

    /// Shape of each argument token, in order
    pub fn arg_kinds(&self) -> Vec<TokenKind> {
        self.args.iter().map(|token| classify(token)).collect()
    }
}

/// A parsed `${...}` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaceholderExpression<'a> {
    pub key: &'a str,
    /// Trimmed stage bodies in application order
    pub stages: Vec<&'a str>,
}

impl<'a> PlaceholderExpression<'a> {
    /// Split a placeholder body on `|` into the key and its stages.
    ///
    /// Trailing zero-length segments are dropped, so `x|` and `x||` carry no
    /// stages. A blank segment followed by another stage, or one holding only
    /// whitespace, is kept and later reported as an empty stage.
    pub fn parse(body: &'a str) -> Self {
        let mut parts: Vec<&str> = body.split('|').collect();
        while parts.len() > 1 && parts.last().is_some_and(|part| part.is_empty()) {
            parts.pop();
        }

        let mut parts = parts.into_iter().map(str::trim);
        let key = parts.next().unwrap_or_default();

        Self {
            key,
            stages: parts.collect(),
        }
    }

    pub fn has_pipeline(&self) -> bool {
        !self.stages.is_empty()
    }

    /// Parse every stage; blank stages come back as `None`
    pub fn calls(&self) -> impl Iterator<Item = Option<CallSpec<'a>>> + '_ {
        self.stages.iter().map(|stage| CallSpec::parse(*stage))
    }
}

/// An argument token together with its shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectedArg {
    pub token: String,
    pub kind: TokenKind,
}

/// A pipeline stage as the evaluator will see it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectedStage {
    pub raw: String,
    pub function: Option<String>,
    pub args: Vec<InspectedArg>,
}

/// Parsed view of one pattern segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InspectedSegment {
    Literal {
        text: String,
    },
    Placeholder {
        raw: String,
        key: String,
        stages: Vec<InspectedStage>,
    },
}

/// Scan and parse a pattern without evaluating anything
pub fn inspect(pattern: &str) -> Vec<InspectedSegment> {
    scan(pattern)
        .map(|segment| match segment {
            Segment::Literal(text) => InspectedSegment::Literal {
                text: text.to_string(),
            },
            Segment::Expression(raw) => {
                let expression = PlaceholderExpression::parse(segment.body().unwrap_or_default());
                let stages = expression
                    .stages
                    .iter()
                    .map(|stage| {
                        let call = CallSpec::parse(*stage);
                        InspectedStage {
                            raw: stage.to_string(),
                            function: call.as_ref().map(|c| c.function.to_string()),
                            args: call
                                .map(|c| {
                                    c.args
                                        .iter()
                                        .map(|token| InspectedArg {
                                            token: token.to_string(),
                                            kind: classify(token),
                                        })
                                        .collect()
                                })
                                .unwrap_or_default(),
                        }
                    })
                    .collect();

                InspectedSegment::Placeholder {
                    raw: raw.to_string(),
                    key: expression.key.to_string(),
                    stages,
                }
            }
        })
        .collect()
}
