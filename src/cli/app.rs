// ABOUTME: Main application orchestration for the substitutor CLI
// ABOUTME: Coordinates between CLI arguments, configuration, and command execution

use anyhow::Result;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use super::commands::{self, RenderRequest};
use super::{Args, Commands, Config};

pub struct App {
    config: Config,
}

impl App {
    /// Create a new application instance
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Initialize logging based on configuration. Logs go to stderr.
    pub fn init_logging(&self, verbose: bool, no_color: bool) -> Result<()> {
        let log_level = if verbose {
            "debug"
        } else {
            &self.config.logging.level
        };

        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

        match self.config.logging.format.as_str() {
            "compact" => {
                tracing_subscriber::fmt()
                    .compact()
                    .with_env_filter(env_filter)
                    .with_ansi(!no_color)
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .init();
            }
            _ => {
                tracing_subscriber::fmt()
                    .with_env_filter(env_filter)
                    .with_ansi(!no_color)
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .init();
            }
        }

        debug!("Logging initialized with level: {}", log_level);
        Ok(())
    }

    /// Run the application with parsed arguments
    pub async fn run(&mut self, args: Args) -> Result<()> {
        self.init_logging(args.verbose, args.no_color)?;

        info!("Starting substitutor v{}", env!("CARGO_PKG_VERSION"));
        debug!("Configuration loaded from: {:?}", args.config);

        match args.command {
            Commands::Render {
                pattern,
                file,
                vars,
                params,
                strict,
                provider,
                output,
                report,
            } => {
                let request = RenderRequest {
                    pattern,
                    file,
                    vars,
                    params_file: params,
                    strict,
                    provider,
                    output,
                    report,
                };
                commands::render(request, &self.config).await
            }

            Commands::Functions { provider } => {
                commands::list_functions(provider, &self.config).await
            }

            Commands::Inspect {
                pattern,
                file,
                json,
            } => commands::inspect_pattern(pattern, file, json).await,
        }
    }

    /// Create application from parsed command line arguments
    pub fn from_args(args: &Args) -> Result<Self> {
        let config = Config::load(args.config.clone())?;
        Ok(Self::new(config))
    }
}
