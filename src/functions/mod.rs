// ABOUTME: Function providers supplying named string transformations to pipelines
// ABOUTME: Exports the provider trait, the explicit registry, and the built-in function sets

pub mod builtins;
pub mod provider;
pub mod registry;

pub use builtins::{builtin_provider, BUILTIN_PROVIDERS};
pub use provider::{FunctionError, FunctionProvider, FunctionSignature, PipeFunction};
pub use registry::FunctionRegistry;
