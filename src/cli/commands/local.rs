//! Local Commands - helpers that never contact a backend

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use geoshift_core::domain::geospatial::area::hectares_to_square_meters;
use geoshift_core::domain::geospatial::{
    FeatureCollection, GeoBounds, GeoCoordinate, Region, StatsSummary, calculate_bounds,
    create_stats_summary, format_area,
};
use serde::Serialize;

use crate::cli::commands::{parse_bounds, read_detections};
use crate::cli::context::CliContext;
use crate::cli::exit_codes;
use crate::cli::output::{OutputFormat, OutputWriter};

/// Arguments for the stats command
#[derive(Args, Debug)]
pub struct StatsArgs {
    /// JSON file holding a list of change detections
    pub detections: PathBuf,
}

/// Arguments for the bounds command
#[derive(Args, Debug)]
pub struct BoundsArgs {
    /// Preset region (amazon, borneo, california, default); lists all when omitted
    #[arg(conflicts_with_all = ["geojson", "check"])]
    pub region: Option<String>,

    /// Derive bounds from a GeoJSON FeatureCollection
    #[arg(long, conflicts_with = "check")]
    pub geojson: Option<PathBuf>,

    /// Validate bounds given as north,south,east,west
    #[arg(long, allow_hyphen_values = true)]
    pub check: Option<String>,
}

/// Arguments for the area command
#[derive(Args, Debug)]
pub struct AreaArgs {
    /// Area in square meters
    pub value: f64,

    /// Read the value as hectares instead of square meters
    #[arg(long)]
    pub hectares: bool,
}

/// Stats output for JSON
#[derive(Debug, Serialize)]
struct StatsReport<'a> {
    #[serde(flatten)]
    summary: &'a StatsSummary,
    total_area: String,
}

/// Summarise a detection file
pub fn stats(ctx: &CliContext, args: &StatsArgs) -> Result<i32> {
    let detections = read_detections(&args.detections)?;
    let summary = create_stats_summary(&detections);
    let total_area = format_area(summary.total_area_square_meters()).to_string();

    match ctx.output.format() {
        OutputFormat::Json => ctx.output.json(&StatsReport {
            summary: &summary,
            total_area,
        })?,
        OutputFormat::Table | OutputFormat::Plain => {
            render_stats(&ctx.output, &summary, &total_area)
        }
    }

    Ok(exit_codes::SUCCESS)
}

fn render_stats(output: &OutputWriter, summary: &StatsSummary, total_area: &str) {
    output.header("Change Summary");
    output.field("Detections", summary.total);
    output.field("Total area", total_area);
    match summary.avg_confidence {
        Some(avg) => output.field("Average confidence", format!("{:.2}", avg)),
        None => output.field("Average confidence", "-"),
    }
    if let Some(severity) = summary.most_severe() {
        output.field("Most severe", severity);
    }

    if !summary.by_type.is_empty() {
        output.header("By Type");
        let rows: Vec<Vec<String>> = summary
            .by_type
            .iter()
            .map(|(change_type, count)| {
                vec![
                    change_type.label(),
                    count.to_string(),
                    change_type.color().to_string(),
                ]
            })
            .collect();
        output.table(&["Type", "Count", "Color"], &rows);
    }

    if !summary.by_severity.is_empty() {
        output.header("By Severity");
        let rows: Vec<Vec<String>> = summary
            .by_severity
            .iter()
            .rev()
            .map(|(severity, count)| {
                let style = severity.style();
                vec![
                    severity.to_string(),
                    count.to_string(),
                    style.color.to_string(),
                    format!("{:.1}", style.opacity),
                ]
            })
            .collect();
        output.table(&["Severity", "Count", "Color", "Opacity"], &rows);
    }
}

/// Bounds output for JSON
#[derive(Debug, Serialize)]
struct BoundsReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    region: Option<&'static str>,
    bounds: GeoBounds,
    center: GeoCoordinate,
}

impl BoundsReport {
    fn new(region: Option<&'static str>, bounds: GeoBounds) -> Self {
        Self {
            region,
            bounds,
            center: bounds.center(),
        }
    }
}

/// Show preset bounds, derive bounds from GeoJSON or check a bounds string
pub fn bounds(ctx: &CliContext, args: &BoundsArgs) -> Result<i32> {
    if let Some(check) = &args.check {
        return check_bounds(ctx, check);
    }

    let reports = if let Some(path) = &args.geojson {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let collection: FeatureCollection = serde_json::from_str(&text)
            .with_context(|| format!("{} is not a GeoJSON FeatureCollection", path.display()))?;
        match calculate_bounds(&collection)? {
            Some(bounds) => vec![BoundsReport::new(None, bounds)],
            None => {
                ctx.output
                    .warn(&format!("{} has no Point or Polygon positions", path.display()));
                return Ok(exit_codes::CONFIG_ERROR);
            }
        }
    } else if let Some(key) = &args.region {
        let region = match Region::from_key(key) {
            Some(region) => region,
            None => {
                ctx.output
                    .warn(&format!("Unknown region '{}', using default bounds", key));
                Region::Default
            }
        };
        vec![BoundsReport::new(Some(region.key()), region.bounds())]
    } else {
        Region::ALL
            .iter()
            .map(|region| BoundsReport::new(Some(region.key()), region.bounds()))
            .collect()
    };

    match ctx.output.format() {
        OutputFormat::Json if reports.len() == 1 => ctx.output.json(&reports[0])?,
        OutputFormat::Json => ctx.output.json(&reports)?,
        OutputFormat::Table | OutputFormat::Plain => {
            ctx.output.header("Bounds");
            let rows: Vec<Vec<String>> = reports
                .iter()
                .map(|r| {
                    vec![
                        r.region.unwrap_or("-").to_string(),
                        r.bounds.north.to_string(),
                        r.bounds.south.to_string(),
                        r.bounds.east.to_string(),
                        r.bounds.west.to_string(),
                        format!("{:.4}, {:.4}", r.center.latitude, r.center.longitude),
                    ]
                })
                .collect();
            ctx.output.table(
                &["Region", "North", "South", "East", "West", "Center"],
                &rows,
            );
        }
    }

    Ok(exit_codes::SUCCESS)
}

fn check_bounds(ctx: &CliContext, value: &str) -> Result<i32> {
    let bounds = match parse_bounds(value) {
        Ok(bounds) => bounds,
        Err(message) => {
            ctx.output.error(&message);
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };

    let verdict = bounds.validate();
    match ctx.output.format() {
        OutputFormat::Json => ctx.output.json(&serde_json::json!({
            "bounds": bounds,
            "valid": verdict.is_ok(),
            "error": verdict.as_ref().err().map(|e| e.to_string()),
        }))?,
        OutputFormat::Table | OutputFormat::Plain => match &verdict {
            Ok(()) => ctx.output.print(&format!("valid: {}", bounds)),
            Err(e) => ctx.output.print(&format!("invalid: {}", e)),
        },
    }

    Ok(if verdict.is_ok() {
        exit_codes::SUCCESS
    } else {
        exit_codes::CONFIG_ERROR
    })
}

/// Format an area with the display unit the web client uses
pub fn area(ctx: &CliContext, args: &AreaArgs) -> Result<i32> {
    if !args.value.is_finite() || args.value < 0.0 {
        ctx.output
            .error(&format!("Area must be a non-negative number, got {}", args.value));
        return Ok(exit_codes::CONFIG_ERROR);
    }

    let square_meters = if args.hectares {
        hectares_to_square_meters(args.value)
    } else {
        args.value
    };
    let formatted = format_area(square_meters);

    match ctx.output.format() {
        OutputFormat::Json => ctx.output.json(&formatted)?,
        OutputFormat::Table | OutputFormat::Plain => ctx.output.print(&formatted.to_string()),
    }

    Ok(exit_codes::SUCCESS)
}
