//! Config Command - inspect the layered configuration
//!
//! Shows the effective values, where they can come from, and writes a
//! starter `config/local.toml`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use geoshift_core::config::API_URL_ENV_OVERRIDE;
use serde::Serialize;

use crate::cli::Cli;
use crate::cli::context::CliContext;
use crate::cli::exit_codes;
use crate::cli::output::OutputFormat;

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Show where configuration is read from
    Path,
    /// Get one value by dotted key, e.g. `api.ml_api_url`
    Get(GetArgs),
    /// Write a starter config/local.toml
    Init(InitArgs),
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Configuration key to retrieve
    pub key: String,
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// One configuration source, in load order
#[derive(Debug, Serialize)]
struct ConfigSource {
    path: PathBuf,
    exists: bool,
}

const LOCAL_CONFIG_TEMPLATE: &str = r#"# Geo Shift Spy local overrides
# Values here win over config/default.toml. GEOSHIFT__SECTION__KEY
# environment variables win over both.

[api]
# api_url = "http://localhost:8000"
# ml_api_url = "http://localhost:8000/api"
# geospatial_url = "http://localhost:8080/ml_backend/geospatial"

[http]
# request_timeout_seconds = 120

[logging]
# level = "debug"
# format = "json"
"#;

/// Run the config command
pub fn run(ctx: &CliContext, cli: &Cli, args: &ConfigArgs) -> Result<i32> {
    match &args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Path => show_path(ctx, cli),
        ConfigCommand::Get(get_args) => get_config(ctx, get_args),
        ConfigCommand::Init(init_args) => init_config(ctx, Path::new("config"), init_args),
    }
}

fn show_config(ctx: &CliContext) -> Result<i32> {
    match ctx.output.format() {
        OutputFormat::Json => ctx.output.json(&*ctx.config)?,
        OutputFormat::Table | OutputFormat::Plain => {
            let config = &ctx.config;

            ctx.output.header("API");
            ctx.output.field("api_url", &config.api.api_url);
            ctx.output.field("ml_api_url", &config.api.ml_api_url);
            ctx.output.field("geospatial_url", &config.api.geospatial_url);

            ctx.output.header("HTTP");
            ctx.output.field("user_agent", &config.http.user_agent);
            match config.http.request_timeout_seconds {
                Some(seconds) => ctx.output.field("request_timeout_seconds", seconds),
                None => ctx.output.field("request_timeout_seconds", "none"),
            }

            ctx.output.header("Logging");
            ctx.output.field("level", &config.logging.level);
            ctx.output.field("format", &config.logging.format);
        }
    }

    Ok(exit_codes::SUCCESS)
}

fn show_path(ctx: &CliContext, cli: &Cli) -> Result<i32> {
    let explicit = cli.config.as_ref().or(ctx.config_file.as_ref());
    let env = std::env::var("ENV").ok();
    let sources: Vec<ConfigSource> = config_search_paths(env.as_deref(), explicit)
        .into_iter()
        .map(|path| ConfigSource {
            exists: path.exists(),
            path,
        })
        .collect();

    if ctx.output.format() == OutputFormat::Json {
        ctx.output.json(&sources)?;
        return Ok(exit_codes::SUCCESS);
    }

    ctx.output.header("Configuration Sources");
    ctx.output.print("Load order (later sources override earlier ones):");
    for (i, source) in sources.iter().enumerate() {
        let marker = if source.exists { "✓" } else { " " };
        ctx.output
            .print(&format!("  {} {}. {}", marker, i + 1, source.path.display()));
    }

    ctx.output.print("\nEnvironment variables:");
    ctx.output.print("  GEOSHIFT__* - Override any config value");
    ctx.output.print("  Example: GEOSHIFT__API__ML_API_URL=http://gpu-box:8000/api");
    ctx.output.print(&format!(
        "  {} - Override api.api_url",
        API_URL_ENV_OVERRIDE
    ));

    Ok(exit_codes::SUCCESS)
}

fn get_config(ctx: &CliContext, args: &GetArgs) -> Result<i32> {
    let config_value = serde_json::to_value(&*ctx.config)?;

    let Some(value) = lookup(&config_value, &args.key) else {
        ctx.output
            .error(&format!("Configuration key not found: {}", args.key));
        return Ok(exit_codes::CONFIG_ERROR);
    };

    match ctx.output.format() {
        OutputFormat::Json => ctx.output.json(value)?,
        OutputFormat::Table | OutputFormat::Plain => match value {
            serde_json::Value::String(s) => ctx.output.print(s),
            other => ctx.output.print(&other.to_string()),
        },
    }

    Ok(exit_codes::SUCCESS)
}

fn init_config(ctx: &CliContext, dir: &Path, args: &InitArgs) -> Result<i32> {
    let path = dir.join("local.toml");

    if path.exists() && !args.force {
        ctx.output
            .error(&format!("Configuration file already exists: {}", path.display()));
        ctx.output.info("Use --force to overwrite");
        return Ok(exit_codes::CONFIG_ERROR);
    }

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    std::fs::write(&path, LOCAL_CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    ctx.output
        .success(&format!("Created configuration file: {}", path.display()));
    Ok(exit_codes::SUCCESS)
}

/// Files consulted by `Config::load_with`, lowest priority first
fn config_search_paths(env: Option<&str>, explicit: Option<&PathBuf>) -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("config/default.toml")];
    if let Some(env) = env {
        paths.push(PathBuf::from(format!("config/{}.toml", env)));
    }
    paths.push(PathBuf::from("config/local.toml"));
    if let Some(explicit) = explicit {
        paths.push(explicit.clone());
    }
    paths
}

fn lookup<'a>(value: &'a serde_json::Value, key: &str) -> Option<&'a serde_json::Value> {
    key.split('.')
        .try_fold(value, |current, part| current.get(part))
}
