//! Geospatial Commands - overlay export, map configuration, clustering

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use geoshift_core::domain::geospatial::{
    DEFAULT_CLUSTER_DISTANCE_METERS, ExportFormat, FeatureCollection, GeoBounds, GeoCoordinate,
    MapConfiguration, MapConfigurationRequest, MapProvider, default_bounds,
    detections_to_feature_collection,
};

use crate::cli::commands::{parse_bounds, read_detections};
use crate::cli::context::CliContext;
use crate::cli::exit_codes;
use crate::cli::output::{OutputFormat, OutputWriter};

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// JSON file holding a list of change detections
    pub detections: PathBuf,

    /// Height in pixels of the analysed image
    #[arg(long)]
    pub height: u32,

    /// Width in pixels of the analysed image
    #[arg(long)]
    pub width: u32,

    /// Preset region for the bounds (amazon, borneo, california, default)
    #[arg(long, conflicts_with = "bounds")]
    pub region: Option<String>,

    /// Explicit bounds as north,south,east,west
    #[arg(long, value_parser = parse_bounds, allow_hyphen_values = true)]
    pub bounds: Option<GeoBounds>,

    /// Overlay format (geojson, kml)
    #[arg(long = "export-format", default_value = "geojson")]
    pub export_format: ExportFormat,

    /// Project the detections locally instead of calling the backend (GeoJSON only)
    #[arg(long)]
    pub local: bool,

    /// Write the overlay to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the map-config command
#[derive(Args, Debug)]
pub struct MapConfigArgs {
    /// GeoJSON FeatureCollection to display
    pub geojson: PathBuf,

    /// Map library (mapbox, leaflet)
    #[arg(long, default_value = "mapbox")]
    pub provider: MapProvider,

    /// Map style URL (Mapbox only)
    #[arg(long)]
    pub style: Option<String>,

    /// Centre latitude
    #[arg(long, requires = "center_lon", allow_hyphen_values = true)]
    pub center_lat: Option<f64>,

    /// Centre longitude
    #[arg(long, requires = "center_lat", allow_hyphen_values = true)]
    pub center_lon: Option<f64>,
}

/// Arguments for the cluster command
#[derive(Args, Debug)]
pub struct ClusterArgs {
    /// JSON file holding a list of change detections
    pub detections: PathBuf,

    /// Maximum distance in meters between detections of one cluster
    #[arg(long, default_value_t = DEFAULT_CLUSTER_DISTANCE_METERS)]
    pub max_distance: f64,
}

impl ExportArgs {
    fn geo_bounds(&self) -> Option<GeoBounds> {
        self.bounds
            .or_else(|| self.region.as_deref().map(default_bounds))
    }
}

/// Export change detections as a GeoJSON or KML overlay
pub async fn export(ctx: &CliContext, args: &ExportArgs) -> Result<i32> {
    let detections = read_detections(&args.detections)?;

    let (document, filename) = if args.local {
        if args.export_format != ExportFormat::GeoJson {
            ctx.output.error("Local export only produces GeoJSON");
            return Ok(exit_codes::CONFIG_ERROR);
        }
        let bounds = args.geo_bounds().unwrap_or_else(|| default_bounds("default"));
        let collection =
            detections_to_feature_collection(&detections, args.height, args.width, &bounds)?;
        (
            serde_json::to_string_pretty(&collection)?,
            "change_detections.geojson".to_string(),
        )
    } else {
        ctx.output.info(&format!(
            "Exporting {} detections as {}...",
            detections.len(),
            args.export_format
        ));
        let overlay = ctx
            .app
            .geospatial
            .export_change_detections(
                &detections,
                args.height,
                args.width,
                args.geo_bounds(),
                args.export_format,
            )
            .await?;
        (overlay.decode()?, overlay.filename)
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, &document)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            ctx.output.success(&format!(
                "Wrote {} ({} detections) to {}",
                filename,
                detections.len(),
                path.display()
            ));
        }
        None => ctx.output.print(&document),
    }

    Ok(exit_codes::SUCCESS)
}

/// Generate a web-map configuration for a GeoJSON overlay
pub async fn map_config(ctx: &CliContext, args: &MapConfigArgs) -> Result<i32> {
    let text = std::fs::read_to_string(&args.geojson)
        .with_context(|| format!("Failed to read {}", args.geojson.display()))?;
    let collection: FeatureCollection = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a GeoJSON FeatureCollection", args.geojson.display()))?;

    let mut request =
        MapConfigurationRequest::from_feature_collection(&collection)?.with_provider(args.provider);
    if let Some(style) = &args.style {
        request = request.with_style(style.clone());
    }
    if let (Some(latitude), Some(longitude)) = (args.center_lat, args.center_lon) {
        request = request.with_center(GeoCoordinate {
            latitude,
            longitude,
        });
    }

    let config = ctx.app.geospatial.create_map_configuration(&request).await?;

    match ctx.output.format() {
        OutputFormat::Json => ctx.output.json(&config)?,
        OutputFormat::Table | OutputFormat::Plain => render_map_config(&ctx.output, &config),
    }

    Ok(exit_codes::SUCCESS)
}

/// Group nearby detections
pub async fn cluster(ctx: &CliContext, args: &ClusterArgs) -> Result<i32> {
    let detections = read_detections(&args.detections)?;
    let clusters = ctx
        .app
        .geospatial
        .cluster_detections(&detections, args.max_distance)
        .await?;

    match ctx.output.format() {
        OutputFormat::Json => ctx.output.json(&clusters)?,
        OutputFormat::Table | OutputFormat::Plain => {
            ctx.output.header("Clusters");
            let rows: Vec<Vec<String>> = clusters
                .iter()
                .enumerate()
                .map(|(i, c)| {
                    vec![
                        (i + 1).to_string(),
                        format!("{:?}", c.kind).to_lowercase(),
                        c.count.to_string(),
                        c.dominant_change_type.to_string(),
                        c.max_severity.to_string(),
                        format!("{:.2}", c.total_area_hectares),
                        format!("{:.2}", c.avg_confidence),
                    ]
                })
                .collect();
            ctx.output.table(
                &["#", "Kind", "Count", "Dominant", "Max severity", "Area (ha)", "Confidence"],
                &rows,
            );
            ctx.output.info(&format!(
                "{} detections in {} groups",
                detections.len(),
                clusters.len()
            ));
        }
    }

    Ok(exit_codes::SUCCESS)
}

fn render_map_config(output: &OutputWriter, config: &MapConfiguration) {
    output.header("Map Configuration");
    output.field("Provider", config.provider());
    let center = config.center();
    output.field(
        "Center",
        format!("{:.5}, {:.5}", center.latitude, center.longitude),
    );
    output.field("Zoom", config.zoom());

    let enabled: Vec<&str> = config
        .controls()
        .iter()
        .filter(|(_, on)| **on)
        .map(|(name, _)| name.as_str())
        .collect();
    if !enabled.is_empty() {
        output.field("Controls", enabled.join(", "));
    }

    let legend = config.legend();
    if !legend.items.is_empty() {
        output.header(&legend.title);
        let rows: Vec<Vec<String>> = legend
            .items
            .iter()
            .map(|item| vec![item.label.clone(), item.color.clone()])
            .collect();
        output.table(&["Label", "Color"], &rows);
    }
}
