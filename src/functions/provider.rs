// ABOUTME: The function provider capability consulted by the pipeline evaluator
// ABOUTME: Defines callable pipeline functions, their signatures, and their failure type

use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::template::value::{format_signature, ArgType, ArgValue};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FunctionError {
    #[error("missing argument at position {0}")]
    MissingArgument(usize),

    #[error("argument at position {position} must be {expected}")]
    InvalidArgument { position: usize, expected: ArgType },

    #[error("{0}")]
    Failed(String),
}

pub type Result<T> = std::result::Result<T, FunctionError>;

/// A pipeline function: `(current value, declared args) -> new value`
pub type PipeFunction = Arc<dyn Fn(&str, &[ArgValue]) -> Result<String> + Send + Sync>;

/// Name and declared argument types of a registered function
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FunctionSignature {
    pub name: String,
    pub args: Vec<ArgType>,
}

impl FunctionSignature {
    pub fn new(name: impl Into<String>, args: &[ArgType]) -> Self {
        Self {
            name: name.into(),
            args: args.to_vec(),
        }
    }
}

impl fmt::Display for FunctionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, format_signature(&self.args))
    }
}

/// Supplies pipeline functions by name and argument types.
///
/// The piped value is always the implicit first parameter, so `arg_types`
/// lists only the declared arguments. Functions must be pure and reentrant.
pub trait FunctionProvider: Send + Sync {
    /// Identifier used in diagnostics
    fn name(&self) -> &str;

    /// Look up a function matching `name` and exactly `arg_types`
    fn resolve(&self, name: &str, arg_types: &[ArgType]) -> Option<PipeFunction>;

    /// Every signature this provider can resolve
    fn signatures(&self) -> Vec<FunctionSignature>;
}

/// Fetch a string argument or report which position was wrong
pub fn arg_str(args: &[ArgValue], position: usize) -> Result<&str> {
    args.get(position)
        .ok_or(FunctionError::MissingArgument(position))?
        .as_str()
        .ok_or(FunctionError::InvalidArgument {
            position,
            expected: ArgType::String,
        })
}

/// Fetch an integer argument or report which position was wrong
pub fn arg_i64(args: &[ArgValue], position: usize) -> Result<i64> {
    args.get(position)
        .ok_or(FunctionError::MissingArgument(position))?
        .as_i64()
        .ok_or(FunctionError::InvalidArgument {
            position,
            expected: ArgType::Integer,
        })
}

/// Fetch an integer argument as a non-negative count
pub fn arg_usize(args: &[ArgValue], position: usize) -> Result<usize> {
    let value = arg_i64(args, position)?;
    usize::try_from(value).map_err(|_| FunctionError::InvalidArgument {
        position,
        expected: ArgType::Integer,
    })
}

/// Fetch a float argument; integers are widened
pub fn arg_f64(args: &[ArgValue], position: usize) -> Result<f64> {
    args.get(position)
        .ok_or(FunctionError::MissingArgument(position))?
        .as_f64()
        .ok_or(FunctionError::InvalidArgument {
            position,
            expected: ArgType::Float,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_display() {
        let sig = FunctionSignature::new("pad_left", &[ArgType::Integer, ArgType::String]);
        assert_eq!(sig.to_string(), "pad_left(string, int, string)");

        let sig = FunctionSignature::new("trim", &[]);
        assert_eq!(sig.to_string(), "trim(string)");
    }

    #[test]
    fn test_arg_accessors() {
        let args = vec![
            ArgValue::String("x".to_string()),
            ArgValue::Integer(4),
            ArgValue::Float(1.5),
        ];

        assert_eq!(arg_str(&args, 0).unwrap(), "x");
        assert_eq!(arg_i64(&args, 1).unwrap(), 4);
        assert_eq!(arg_usize(&args, 1).unwrap(), 4);
        assert_eq!(arg_f64(&args, 2).unwrap(), 1.5);
        assert_eq!(arg_f64(&args, 1).unwrap(), 4.0);

        assert_eq!(arg_str(&args, 5), Err(FunctionError::MissingArgument(5)));
        assert_eq!(
            arg_i64(&args, 0),
            Err(FunctionError::InvalidArgument {
                position: 0,
                expected: ArgType::Integer
            })
        );
    }
}
