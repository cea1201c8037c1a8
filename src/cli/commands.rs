// ABOUTME: Command implementations for the substitutor CLI
// ABOUTME: Handles execution of the render, functions, and inspect commands

use anyhow::{anyhow, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tracing::{debug, info, warn};

use super::args::Args;
use super::config::Config;
use crate::functions::builtins::builtin_provider;
use crate::functions::{FunctionProvider, BUILTIN_PROVIDERS};
use crate::template::{inspect, InspectedSegment, Params, Substitutor};

/// Everything the render command needs from the command line
#[derive(Debug, Default, Clone)]
pub struct RenderRequest {
    pub pattern: Option<String>,
    pub file: Option<PathBuf>,
    pub vars: Vec<String>,
    pub params_file: Option<PathBuf>,
    pub strict: bool,
    pub provider: Option<String>,
    pub output: Option<PathBuf>,
    pub report: bool,
}

/// Substitute a pattern and print or write the result
pub async fn render(request: RenderRequest, config: &Config) -> Result<()> {
    let pattern = read_pattern(request.pattern, request.file.as_deref()).await?;
    let params = collect_params(config, request.params_file.as_deref(), &request.vars).await?;
    info!("Rendering pattern with {} parameter(s)", params.len());

    let engine_config = config.substitutor_config(request.provider.as_deref(), request.strict);
    let substitutor = Substitutor::from_config(&engine_config)
        .map_err(|e| anyhow!("Failed to create substitutor: {}", e))?;
    debug!("Using {:?}", substitutor);

    let rendered = substitutor
        .render(&pattern, &params)
        .map_err(|e| anyhow!("Substitution failed: {}", e))?;

    if request.report {
        for diagnostic in &rendered.diagnostics {
            eprintln!("{}", diagnostic);
        }
    } else if !rendered.is_clean() {
        warn!(
            "{} placeholder problem(s) tolerated; rerun with --report for details",
            rendered.diagnostics.len()
        );
    }

    if let Some(output_path) = request.output {
        tokio::fs::write(&output_path, &rendered.text)
            .await
            .map_err(|e| {
                anyhow!(
                    "Failed to write output file '{}': {}",
                    output_path.display(),
                    e
                )
            })?;
        info!("Result written to: {}", output_path.display());
    } else {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(rendered.text.as_bytes())?;
        stdout.flush()?;
    }

    Ok(())
}

/// Print every signature a provider can resolve
pub async fn list_functions(provider: Option<String>, config: &Config) -> Result<()> {
    let name = provider.unwrap_or_else(|| config.provider.clone());
    let registry = builtin_provider(&name).ok_or_else(|| {
        anyhow!(
            "Unknown function provider '{}'. Available providers: {}",
            name,
            BUILTIN_PROVIDERS.join(", ")
        )
    })?;

    println!("Functions in provider '{}':", registry.name());
    for signature in registry.signatures() {
        println!("  {}", signature);
    }

    Ok(())
}

/// Print the parsed structure of a pattern
pub async fn inspect_pattern(
    pattern: Option<String>,
    file: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let pattern = read_pattern(pattern, file.as_deref()).await?;
    let segments = inspect(&pattern);

    if json {
        println!("{}", serde_json::to_string_pretty(&segments)?);
    } else {
        print!("{}", describe_segments(&segments));
    }

    Ok(())
}

/// Human-readable listing of inspected segments
pub fn describe_segments(segments: &[InspectedSegment]) -> String {
    let mut out = String::new();

    for segment in segments {
        match segment {
            InspectedSegment::Literal { text } => {
                out.push_str(&format!("literal {:?}\n", text));
            }
            InspectedSegment::Placeholder { raw, key, stages } => {
                out.push_str(&format!("placeholder {} key={:?}\n", raw, key));
                for stage in stages {
                    match &stage.function {
                        Some(function) => {
                            let args: Vec<String> = stage
                                .args
                                .iter()
                                .map(|arg| format!("{}:{}", arg.token, arg.kind))
                                .collect();
                            out.push_str(&format!("  | {} [{}]\n", function, args.join(", ")));
                        }
                        None => out.push_str("  | <empty stage>\n"),
                    }
                }
            }
        }
    }

    out
}

/// Read the pattern from the argument, a file, or stdin
async fn read_pattern(pattern: Option<String>, file: Option<&Path>) -> Result<String> {
    if let Some(pattern) = pattern {
        return Ok(pattern);
    }

    if let Some(path) = file {
        return tokio::fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read pattern file '{}': {}", path.display(), e));
    }

    let mut pattern = String::new();
    tokio::io::stdin().read_to_string(&mut pattern).await?;
    Ok(pattern)
}

/// Config defaults, then the params file, then `key=value` overrides
async fn collect_params(
    config: &Config,
    params_file: Option<&Path>,
    vars: &[String],
) -> Result<Params> {
    let mut params = config.params.clone();

    if let Some(path) = params_file {
        params.extend(load_params_file(path).await?);
    }

    params.extend(Args::parse_variables(vars)?);
    Ok(params)
}

/// Load parameters from a YAML or JSON object
pub async fn load_params_file(path: &Path) -> Result<Params> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| anyhow!("Failed to read params file '{}': {}", path.display(), e))?;

    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let params = if is_json {
        serde_json::from_str(&contents)
            .map_err(|e| anyhow!("Invalid JSON params in '{}': {}", path.display(), e))?
    } else {
        serde_yaml::from_str(&contents)
            .map_err(|e| anyhow!("Invalid YAML params in '{}': {}", path.display(), e))?
    };

    Ok(params)
}
