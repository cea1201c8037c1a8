// ABOUTME: Main library module for the substitutor placeholder engine
// ABOUTME: Exports the substitution engine, function providers, and CLI wiring

pub mod cli;
pub mod functions;
pub mod template;

// Re-export commonly used types
pub use cli::{App, Args, Config};
pub use functions::{FunctionProvider, FunctionRegistry};
pub use template::{Params, Rendered, SubstitutionError, Substitutor, SubstitutorConfig};

// Error handling
pub type Result<T> = anyhow::Result<T>;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
