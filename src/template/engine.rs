// ABOUTME: Pipeline evaluator that substitutes ${key | fn args...} placeholders in a pattern
// ABOUTME: Resolves each stage against a function provider, failing or degrading per strict mode

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::error::{Result, SubstitutionError};
use super::expression::{CallSpec, PlaceholderExpression};
use super::scanner::{scan, Segment};
use super::value::{coerce_all, determine_type, format_signature, ArgType, Params};
use crate::functions::builtins::{builtin_provider, MINIMAL_PROVIDER};
use crate::functions::{FunctionProvider, FunctionRegistry};

/// Construction options for a [`Substitutor`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstitutorConfig {
    /// Identifier of the built-in provider to resolve functions against
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Surface every failure as an error instead of logging and degrading
    #[serde(default)]
    pub strict_mode: bool,
}

fn default_provider() -> String {
    MINIMAL_PROVIDER.to_string()
}

impl Default for SubstitutorConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            strict_mode: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

/// A failure tolerated in lenient mode
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// The full `${...}` text the failure occurred in
    pub placeholder: String,
    pub error: SubstitutionError,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{}: {} in {}", level, self.error, self.placeholder)
    }
}

/// Substituted text plus everything that was tolerated while producing it
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Rendered {
    pub text: String,
    pub diagnostics: Vec<Diagnostic>,
}

impl Rendered {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Per-placeholder failure policy
struct Tolerance<'a> {
    strict: bool,
    placeholder: &'a str,
    diagnostics: &'a mut Vec<Diagnostic>,
}

impl Tolerance<'_> {
    fn tolerate(&mut self, severity: Severity, error: SubstitutionError) -> Result<()> {
        if self.strict {
            return Err(error);
        }
        self.diagnostics.push(Diagnostic {
            severity,
            placeholder: self.placeholder.to_string(),
            error,
        });
        Ok(())
    }
}

/// Substitutes placeholders against a parameter map.
///
/// Holds only read-only configuration, so one instance can serve concurrent
/// callers.
#[derive(Clone)]
pub struct Substitutor {
    provider: Arc<dyn FunctionProvider>,
    strict_mode: bool,
}

impl Substitutor {
    /// Lenient substitutor backed by the `minimal` provider
    pub fn new() -> Self {
        Self::with_provider(Arc::new(crate::functions::builtins::minimal()))
    }

    /// Lenient substitutor backed by the given provider
    pub fn with_provider(provider: Arc<dyn FunctionProvider>) -> Self {
        Self {
            provider,
            strict_mode: false,
        }
    }

    /// Build from configuration, resolving the provider identifier.
    ///
    /// An unknown identifier is an error in strict mode. Otherwise it is
    /// logged and an empty provider under that name is used.
    pub fn from_config(config: &SubstitutorConfig) -> Result<Self> {
        let provider = match builtin_provider(&config.provider) {
            Some(registry) => registry,
            None => {
                error!("Cannot find function provider: {}", config.provider);
                if config.strict_mode {
                    return Err(SubstitutionError::UnknownProvider {
                        name: config.provider.clone(),
                    });
                }
                FunctionRegistry::new(config.provider.as_str())
            }
        };

        Ok(Self::with_provider(Arc::new(provider)).strict(config.strict_mode))
    }

    /// Builder form of [`Substitutor::set_strict_mode`]
    pub fn strict(mut self, strict_mode: bool) -> Self {
        self.strict_mode = strict_mode;
        self
    }

    pub fn set_strict_mode(&mut self, strict_mode: bool) {
        self.strict_mode = strict_mode;
    }

    pub fn is_strict(&self) -> bool {
        self.strict_mode
    }

    pub fn provider(&self) -> &dyn FunctionProvider {
        self.provider.as_ref()
    }

    /// Replace every placeholder in `pattern` with its piped parameter value
    pub fn substitute(&self, pattern: &str, params: &Params) -> Result<String> {
        self.render(pattern, params).map(|rendered| rendered.text)
    }

    /// Like [`Substitutor::substitute`], also returning tolerated failures
    pub fn render(&self, pattern: &str, params: &Params) -> Result<Rendered> {
        let mut rendered = Rendered {
            text: String::with_capacity(pattern.len()),
            diagnostics: Vec::new(),
        };

        for segment in scan(pattern) {
            match segment {
                Segment::Literal(text) => rendered.text.push_str(text),
                Segment::Expression(raw) => {
                    let mut tolerance = Tolerance {
                        strict: self.strict_mode,
                        placeholder: raw,
                        diagnostics: &mut rendered.diagnostics,
                    };
                    let body = segment.body().unwrap_or_default();
                    let replacement = self.evaluate(raw, body, params, &mut tolerance)?;
                    rendered.text.push_str(&replacement);
                }
            }
        }

        Ok(rendered)
    }

    fn evaluate(
        &self,
        raw: &str,
        body: &str,
        params: &Params,
        tolerance: &mut Tolerance<'_>,
    ) -> Result<String> {
        let expression = PlaceholderExpression::parse(body);

        let Some(value) = params.get(expression.key) else {
            warn!(
                "param map does not contain key: {}. Use raw pattern instead",
                expression.key
            );
            tolerance.tolerate(
                Severity::Warning,
                SubstitutionError::MissingKey {
                    key: expression.key.to_string(),
                },
            )?;
            return Ok(raw.to_string());
        };

        let mut current = value.to_string();

        for call in expression.calls() {
            let outcome = match call {
                Some(call) => self.apply(&current, &call, tolerance),
                None => {
                    error!("Empty pipeline stage in {}", raw);
                    Err(SubstitutionError::EmptyStage {
                        key: expression.key.to_string(),
                    })
                }
            };

            match outcome {
                Ok(next) => current = next,
                Err(e) => tolerance.tolerate(Severity::Error, e)?,
            }
        }

        Ok(current)
    }

    /// Run one pipeline stage. An `Err` leaves the running value unchanged.
    fn apply(
        &self,
        value: &str,
        call: &CallSpec<'_>,
        tolerance: &mut Tolerance<'_>,
    ) -> Result<String> {
        let mut arg_types = Vec::with_capacity(call.args.len());
        for token in &call.args {
            match determine_type(token) {
                Ok(arg_type) => arg_types.push(arg_type),
                Err(e) => {
                    warn!("Type of param {} is not supported. Use raw text instead", token);
                    tolerance.tolerate(Severity::Warning, e)?;
                    arg_types.push(ArgType::Any);
                }
            }
        }

        let args = coerce_all(call.function, &call.args, &arg_types).inspect_err(|e| {
            error!("{}", e);
        })?;

        let provider = self.provider.name();
        let Some(function) = self.provider.resolve(call.function, &arg_types) else {
            let signature = format_signature(&arg_types);
            error!(
                "Cannot find string processing function {}({}) in {}",
                call.function, signature, provider
            );
            return Err(SubstitutionError::FunctionNotFound {
                function: call.function.to_string(),
                signature,
                provider: provider.to_string(),
            });
        };

        debug!("Applying {} with {} argument(s)", call.function, args.len());

        function(value, args.as_slice()).map_err(|e| {
            error!("Function {} in {} failed: {}", call.function, provider, e);
            SubstitutionError::InvocationFailed {
                function: call.function.to_string(),
                provider: provider.to_string(),
                reason: e.to_string(),
            }
        })
    }
}

impl Default for Substitutor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Substitutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Substitutor")
            .field("provider", &self.provider.name())
            .field("strict_mode", &self.strict_mode)
            .finish()
    }
}
