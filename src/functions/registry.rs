// ABOUTME: Explicitly populated function provider keyed by name and argument types
// ABOUTME: Backs the built-in providers and any user-assembled function set

use std::collections::HashMap;
use std::sync::Arc;

use super::provider::{FunctionProvider, FunctionSignature, PipeFunction, Result};
use crate::template::value::{ArgType, ArgValue};

/// Registry of pipeline functions.
///
/// Each `(name, argument types)` pair maps to one function, so a name may be
/// overloaded by arity or type. Registering the same pair again replaces the
/// previous entry.
#[derive(Clone)]
pub struct FunctionRegistry {
    name: String,
    functions: HashMap<FunctionSignature, PipeFunction>,
}

impl FunctionRegistry {
    /// Create an empty registry
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            functions: HashMap::new(),
        }
    }

    /// Register a function under `name` taking the given declared argument types
    pub fn register<F>(&mut self, name: &str, arg_types: &[ArgType], function: F) -> &mut Self
    where
        F: Fn(&str, &[ArgValue]) -> Result<String> + Send + Sync + 'static,
    {
        self.functions
            .insert(FunctionSignature::new(name, arg_types), Arc::new(function));
        self
    }

    /// Register an infallible function that takes no declared arguments
    pub fn register_unary<F>(&mut self, name: &str, function: F) -> &mut Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.register(name, &[], move |value, _| Ok(function(value)))
    }

    /// Copy every function from another registry into this one
    pub fn merge(&mut self, other: &FunctionRegistry) -> &mut Self {
        for (signature, function) in &other.functions {
            self.functions.insert(signature.clone(), Arc::clone(function));
        }
        self
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl FunctionProvider for FunctionRegistry {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve(&self, name: &str, arg_types: &[ArgType]) -> Option<PipeFunction> {
        self.functions
            .get(&FunctionSignature::new(name, arg_types))
            .cloned()
    }

    fn signatures(&self) -> Vec<FunctionSignature> {
        let mut signatures: Vec<_> = self.functions.keys().cloned().collect();
        signatures.sort();
        signatures
    }
}

impl std::fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("name", &self.name)
            .field("count", &self.functions.len())
            .finish()
    }
}
