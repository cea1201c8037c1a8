// ABOUTME: Command line argument definitions and parsing using Clap
// ABOUTME: Defines the main CLI structure and the render, functions, and inspect subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::template::Params;

#[derive(Parser, Debug)]
#[command(name = "substitutor")]
#[command(about = "Substitute ${key | fn args} placeholders using named string-function pipelines")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Path to configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Disable colored output")]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Substitute placeholders in a pattern and print the result
    Render {
        #[arg(help = "Pattern text (read from --file or stdin when omitted)")]
        pattern: Option<String>,

        #[arg(short, long, help = "Read the pattern from a file", conflicts_with = "pattern")]
        file: Option<PathBuf>,

        #[arg(short = 'D', long = "var", help = "Set a parameter (key=value)")]
        vars: Vec<String>,

        #[arg(long, help = "YAML or JSON file of parameters")]
        params: Option<PathBuf>,

        #[arg(long, help = "Fail on the first missing key or pipeline error")]
        strict: bool,

        #[arg(long, help = "Function provider to resolve pipeline functions against")]
        provider: Option<String>,

        #[arg(short, long, help = "Write the result to a file instead of stdout")]
        output: Option<PathBuf>,

        #[arg(long, help = "Print tolerated errors to stderr")]
        report: bool,
    },

    /// List the functions a provider offers
    Functions {
        #[arg(long, help = "Function provider to list")]
        provider: Option<String>,
    },

    /// Show how a pattern is split into literals, keys, and pipeline stages
    Inspect {
        #[arg(help = "Pattern text (read from --file or stdin when omitted)")]
        pattern: Option<String>,

        #[arg(short, long, help = "Read the pattern from a file", conflicts_with = "pattern")]
        file: Option<PathBuf>,

        #[arg(long, help = "Emit JSON instead of text")]
        json: bool,
    },
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parse parameters from key=value format
    pub fn parse_variables(vars: &[String]) -> anyhow::Result<Params> {
        let mut params = Params::new();

        for var in vars {
            if let Some((key, value)) = var.split_once('=') {
                params.insert(key, value);
            } else {
                return Err(anyhow::anyhow!(
                    "Invalid variable format '{}'. Expected 'key=value'",
                    var
                ));
            }
        }

        Ok(params)
    }
}
