//! Geo Shift Spy CLI - change detection from the command line
//!
//! Each subcommand maps onto one backend call or one local helper. Results are
//! rendered as a table, plain text or JSON depending on `--format`.

mod commands;
mod context;
mod output;

pub use context::CliContext;
pub use output::{OutputFormat, OutputWriter};

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Geo Shift Spy - satellite change detection from the command line
#[derive(Parser, Debug)]
#[command(
    name = "geoshift",
    version,
    about = "Compare satellite images and export detected changes",
    long_about = "Geo Shift Spy sends before/after satellite images to the change-detection \
                  backend and renders the results.\n\n\
                  Backend URLs come from config/default.toml, config/local.toml or \
                  GEOSHIFT__API__* environment variables."
)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress all output except results and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare two images with the basic comparison service
    #[command(visible_alias = "c")]
    Compare(commands::compare::CompareArgs),

    /// Compare two images with a chosen ML model
    AdvancedCompare(commands::ml::AdvancedCompareArgs),

    /// Segment one image into land-cover classes
    Segment(commands::ml::SegmentArgs),

    /// Assess building damage between pre- and post-disaster images
    AssessDamage(commands::ml::AssessDamageArgs),

    /// Show which ML models the backend has loaded
    Models,

    /// Check that the ML backend is up
    Health,

    /// Export change detections as GeoJSON or KML
    Export(commands::geo::ExportArgs),

    /// Generate a Mapbox or Leaflet configuration for a GeoJSON overlay
    MapConfig(commands::geo::MapConfigArgs),

    /// Group nearby change detections
    Cluster(commands::geo::ClusterArgs),

    /// Summarise a change-detection file locally
    Stats(commands::local::StatsArgs),

    /// Show, derive or check geographic bounds locally
    Bounds(commands::local::BoundsArgs),

    /// Format an area given in square meters
    Area(commands::local::AreaArgs),

    /// Configuration management
    #[command(visible_alias = "cfg")]
    Config(commands::config::ConfigArgs),
}

/// CLI application runner
pub struct CliApp {
    cli: Cli,
    context: CliContext,
}

impl CliApp {
    /// Parse the process arguments, load configuration and build the clients
    pub async fn new() -> anyhow::Result<Self> {
        let cli = Cli::parse();
        let context = CliContext::new(&cli)?;
        Ok(Self { cli, context })
    }

    /// Run against an already-built context
    pub fn with_context(cli: Cli, context: CliContext) -> Self {
        Self { cli, context }
    }

    /// Run the selected command, reporting any error and mapping it to an exit code
    pub async fn run(self) -> i32 {
        let result = match self.cli.command {
            Commands::Compare(ref args) => commands::compare::run(&self.context, args).await,
            Commands::AdvancedCompare(ref args) => {
                commands::ml::advanced_compare(&self.context, args).await
            }
            Commands::Segment(ref args) => commands::ml::segment(&self.context, args).await,
            Commands::AssessDamage(ref args) => {
                commands::ml::assess_damage(&self.context, args).await
            }
            Commands::Models => commands::ml::models(&self.context).await,
            Commands::Health => commands::ml::health(&self.context).await,
            Commands::Export(ref args) => commands::geo::export(&self.context, args).await,
            Commands::MapConfig(ref args) => commands::geo::map_config(&self.context, args).await,
            Commands::Cluster(ref args) => commands::geo::cluster(&self.context, args).await,
            Commands::Stats(ref args) => commands::local::stats(&self.context, args),
            Commands::Bounds(ref args) => commands::local::bounds(&self.context, args),
            Commands::Area(ref args) => commands::local::area(&self.context, args),
            Commands::Config(ref args) => commands::config::run(&self.context, &self.cli, args),
        };

        match result {
            Ok(code) => code,
            Err(e) => {
                self.context.output.error(&format!("{:#}", e));
                exit_codes::for_error(&e)
            }
        }
    }
}

/// Exit codes for scripting
pub mod exit_codes {
    use geoshift_client::ApiError;
    use geoshift_core::config::ConfigLoadError;
    use geoshift_core::domain::geospatial::GeoError;

    /// Success
    pub const SUCCESS: i32 = 0;
    /// Configuration or input error
    pub const CONFIG_ERROR: i32 = 2;
    /// Backend could not be reached
    pub const NETWORK_ERROR: i32 = 3;
    /// Backend answered with an error or an unexpected body
    pub const BACKEND_ERROR: i32 = 4;
    /// Internal error
    pub const INTERNAL_ERROR: i32 = 99;

    /// Classify an error raised by a command
    pub fn for_error(err: &anyhow::Error) -> i32 {
        if let Some(api) = err.downcast_ref::<ApiError>() {
            return if api.is_transport() {
                NETWORK_ERROR
            } else if api.is_backend() {
                BACKEND_ERROR
            } else {
                CONFIG_ERROR
            };
        }

        if err.downcast_ref::<ConfigLoadError>().is_some()
            || err.downcast_ref::<GeoError>().is_some()
            || err.downcast_ref::<serde_json::Error>().is_some()
            || err.downcast_ref::<std::io::Error>().is_some()
        {
            return CONFIG_ERROR;
        }

        INTERNAL_ERROR
    }

}
