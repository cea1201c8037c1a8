// ABOUTME: Error types for placeholder substitution
// ABOUTME: Defines the failure kinds surfaced in strict mode and recorded as diagnostics otherwise

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubstitutionError {
    #[error("param map does not contain key: {key}")]
    MissingKey { key: String },

    #[error("cannot find function '{function}({signature})' in provider '{provider}'")]
    FunctionNotFound {
        function: String,
        signature: String,
        provider: String,
    },

    #[error("function '{function}' in provider '{provider}' failed: {reason}")]
    InvocationFailed {
        function: String,
        provider: String,
        reason: String,
    },

    #[error("type of argument {token} is not supported")]
    UnsupportedArgumentType { token: String },

    #[error("argument count {tokens} does not match type count {types} for '{function}'")]
    InternalArity {
        function: String,
        tokens: usize,
        types: usize,
    },

    #[error("empty pipeline stage after key '{key}'")]
    EmptyStage { key: String },

    #[error("unknown function provider: {name}")]
    UnknownProvider { name: String },
}

impl SubstitutionError {
    /// Whether this failure happened while dispatching a pipeline stage
    pub fn is_dispatch_error(&self) -> bool {
        matches!(
            self,
            Self::FunctionNotFound { .. } | Self::InvocationFailed { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SubstitutionError>;
