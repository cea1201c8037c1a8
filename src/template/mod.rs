// ABOUTME: Template module implementing ${key | fn args...} placeholder substitution
// ABOUTME: Exports the scanner, stage tokenizer, parameter values, and the pipeline evaluator

pub mod engine;
pub mod error;
pub mod expression;
pub mod scanner;
pub mod tokenizer;
pub mod value;

pub use engine::{Diagnostic, Rendered, Severity, Substitutor, SubstitutorConfig};
pub use error::{Result, SubstitutionError};
pub use expression::{inspect, CallSpec, InspectedSegment, PlaceholderExpression};
pub use scanner::{has_placeholders, scan, Segment};
pub use tokenizer::{classify, tokenize, TokenKind};
pub use value::{ArgType, ArgValue, ParamValue, Params};
