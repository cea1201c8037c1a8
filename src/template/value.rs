// ABOUTME: Parameter values, the parameter map, and typed pipeline arguments
// ABOUTME: Converts raw argument tokens into typed values according to their shape

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use super::error::{Result, SubstitutionError};
use super::tokenizer::{classify, TokenKind};

/// A scalar parameter value; only its textual form reaches the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(b) => write!(f, "{}", b),
            ParamValue::Integer(i) => write!(f, "{}", i),
            ParamValue::Float(x) => write!(f, "{}", x),
            ParamValue::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::String(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::String(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Integer(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Integer(value.into())
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Integer(value.into())
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

/// Named values a pattern is substituted against. Keys are case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params {
    values: BTreeMap<String, ParamValue>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or update a parameter
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Builder form of [`Params::insert`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Merge another map in; its entries win on conflict
    pub fn extend(&mut self, other: Params) {
        self.values.extend(other.values);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.values.iter()
    }
}

impl From<HashMap<String, String>> for Params {
    fn from(map: HashMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Declared type of a pipeline argument, used to resolve a function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgType {
    String,
    Integer,
    Float,
    /// Untyped raw text from an unsupported token
    Any,
}

impl fmt::Display for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArgType::String => "string",
            ArgType::Integer => "int",
            ArgType::Float => "float",
            ArgType::Any => "any",
        };
        write!(f, "{}", name)
    }
}

impl From<TokenKind> for ArgType {
    fn from(kind: TokenKind) -> Self {
        match kind {
            TokenKind::StringLiteral => ArgType::String,
            TokenKind::Integer => ArgType::Integer,
            TokenKind::Float => ArgType::Float,
            TokenKind::Opaque => ArgType::Any,
        }
    }
}

/// A coerced pipeline argument
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    String(String),
    Integer(i64),
    Float(f64),
    Raw(String),
}

impl ArgValue {
    pub fn arg_type(&self) -> ArgType {
        match self {
            ArgValue::String(_) => ArgType::String,
            ArgValue::Integer(_) => ArgType::Integer,
            ArgValue::Float(_) => ArgType::Float,
            ArgValue::Raw(_) => ArgType::Any,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::String(s) | ArgValue::Raw(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ArgValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ArgValue::Float(x) => Some(*x),
            ArgValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }
}

/// Render a list of argument types as a signature, e.g. `string, int`
pub fn format_signature(types: &[ArgType]) -> String {
    std::iter::once("string".to_string())
        .chain(types.iter().map(ToString::to_string))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Determine the declared type of an argument token from its shape.
///
/// Integer-shaped tokens too large for `i64` are reported as unsupported.
pub fn determine_type(token: &str) -> Result<ArgType> {
    match classify(token) {
        TokenKind::Integer if token.parse::<i64>().is_err() => {
            Err(SubstitutionError::UnsupportedArgumentType {
                token: token.to_string(),
            })
        }
        TokenKind::Opaque => Err(SubstitutionError::UnsupportedArgumentType {
            token: token.to_string(),
        }),
        kind => Ok(kind.into()),
    }
}

/// Convert a token to a value of the given type.
///
/// Strings lose their surrounding quotes; anything that fails to parse as its
/// declared type falls back to raw text.
pub fn coerce(token: &str, arg_type: ArgType) -> ArgValue {
    match arg_type {
        ArgType::String => ArgValue::String(token[1..token.len() - 1].to_string()),
        ArgType::Integer => token
            .parse()
            .map(ArgValue::Integer)
            .unwrap_or_else(|_| ArgValue::Raw(token.to_string())),
        ArgType::Float => token
            .parse()
            .map(ArgValue::Float)
            .unwrap_or_else(|_| ArgValue::Raw(token.to_string())),
        ArgType::Any => ArgValue::Raw(token.to_string()),
    }
}

/// Coerce every token against its declared type
pub fn coerce_all(function: &str, tokens: &[&str], types: &[ArgType]) -> Result<Vec<ArgValue>> {
    if tokens.len() != types.len() {
        return Err(SubstitutionError::InternalArity {
            function: function.to_string(),
            tokens: tokens.len(),
            types: types.len(),
        });
    }

    Ok(tokens
        .iter()
        .zip(types)
        .map(|(token, arg_type)| coerce(token, *arg_type))
        .collect())
}
