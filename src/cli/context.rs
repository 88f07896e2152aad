//! CLI Context - configuration, backend clients and output for one invocation

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use geoshift_core::Config;
use geoshift_core::config::LoggingConfig;

use crate::app::{AppHandle, create_app};
use crate::cli::Cli;
use crate::cli::output::OutputWriter;

/// Everything a command needs to run
pub struct CliContext {
    /// Application configuration
    pub config: Arc<Config>,

    /// Backend clients
    pub app: AppHandle,

    /// Output writer configured from the global flags
    pub output: OutputWriter,

    /// Explicit `--config` file, if one was given
    pub config_file: Option<PathBuf>,
}

impl CliContext {
    /// Load configuration, start logging and build the backend clients
    pub fn new(cli: &Cli) -> Result<Self> {
        let config = Self::load_config(cli.config.as_ref())?;

        let logging = logging_for_flags(&config.logging, cli.verbose, cli.quiet);
        geoshift_core::init_tracing(&logging).context("Failed to initialise logging")?;

        let app = create_app(&config).context("Failed to create backend clients")?;
        let output = OutputWriter::new(cli.format, cli.quiet, cli.verbose);

        Ok(Self {
            config: Arc::new(config),
            app,
            output,
            config_file: cli.config.clone(),
        })
    }

    /// Build a context around existing clients; no logging is installed
    pub fn from_parts(config: Config, app: AppHandle, output: OutputWriter) -> Self {
        Self {
            config: Arc::new(config),
            app,
            output,
            config_file: None,
        }
    }

    fn load_config(config_path: Option<&PathBuf>) -> Result<Config> {
        match config_path {
            Some(path) => {
                let path_str = path
                    .to_str()
                    .with_context(|| format!("Config path {:?} is not valid UTF-8", path))?;
                Config::load_with(Some(path_str)).with_context(|| {
                    format!("Failed to load configuration from {}", path.display())
                })
            }
            None => Config::load().context("Failed to load configuration"),
        }
    }
}

/// `--verbose` raises the level to debug, `--quiet` lowers it to errors
fn logging_for_flags(base: &LoggingConfig, verbose: bool, quiet: bool) -> LoggingConfig {
    let mut logging = base.clone();
    if verbose {
        logging.level = "debug".to_string();
    } else if quiet {
        logging.level = "error".to_string();
    }
    logging
}
