//! Compare Command - basic before/after comparison
//!
//! Uploads both images to the comparison service and renders the change
//! figure, the AI summary and the environmental report when present.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use geoshift_core::domain::{CompareResult, EnvironmentalReport};

use crate::cli::commands::read_image;
use crate::cli::context::CliContext;
use crate::cli::exit_codes;
use crate::cli::output::{OutputFormat, OutputWriter};

/// Arguments for the compare command
#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Image taken before the change
    pub before: PathBuf,

    /// Image taken after the change
    pub after: PathBuf,
}

/// Run the compare command
pub async fn run(ctx: &CliContext, args: &CompareArgs) -> Result<i32> {
    let before = read_image(&args.before)?;
    let after = read_image(&args.after)?;

    ctx.output.info(&format!(
        "Comparing {} with {}...",
        before.file_name, after.file_name
    ));
    let result = ctx.app.comparison.compare_images(&before, &after).await?;

    match ctx.output.format() {
        OutputFormat::Json => ctx.output.json(&result)?,
        OutputFormat::Table | OutputFormat::Plain => render_result(&ctx.output, &result),
    }

    Ok(exit_codes::SUCCESS)
}

fn render_result(output: &OutputWriter, result: &CompareResult) {
    output.header("Comparison");

    match result.change_percentage {
        Some(pct) => output.field("Change", format!("{:.2}%", pct)),
        None => output.field("Change", "not reported"),
    }
    if let Some(heatmap) = result.heatmap_ref() {
        output.field("Heatmap", abbreviate(heatmap, 60));
    }

    if let Some(assessment) = &result.overall_assessment {
        if let Some(area) = assessment.total_area_changed_sq_km {
            output.field("Area changed", format!("{:.2} km²", area));
        }
        if let Some(change_type) = &assessment.primary_change_type {
            output.field("Primary change", change_type);
        }
        if let Some(severity) = assessment.severity {
            output.field("Severity", severity);
        }
    }

    if let Some(ai) = &result.ai_analysis {
        output.header("AI Analysis");
        output.field("Change type", &ai.change_type);
        output.field("Risk score", format!("{:.1}/10", ai.risk_score));
        if !ai.description.is_empty() {
            output.print(&format!("  {}", ai.description));
        }
    }

    if let Some(report) = &result.environmental_report {
        render_report(output, report);
    }
}

fn render_report(output: &OutputWriter, report: &EnvironmentalReport) {
    output.header("Environmental Report");
    output.print(&format!("  {}", report.executive_summary));

    let analysis = &report.analysis;
    output.field("Severity", analysis.severity);
    output.field("Risk score", format!("{:.1}/10", analysis.risk_score));
    output.field("Affected area", &analysis.affected_area);
    if let Some(trend) = &analysis.temporal_analysis {
        match &trend.rate_of_change {
            Some(rate) => output.field("Trend", format!("{} ({})", trend.trend, rate)),
            None => output.field("Trend", &trend.trend),
        }
    }

    if !analysis.zonal_analysis.is_empty() {
        output.header("Zones");
        let rows: Vec<Vec<String>> = analysis
            .zonal_analysis
            .iter()
            .map(|zone| {
                vec![
                    zone.zone.clone(),
                    format!("{:.1}%", zone.change_percentage),
                    zone.severity.to_string(),
                ]
            })
            .collect();
        output.table(&["Zone", "Change", "Severity"], &rows);
    }

    if !report.insights.is_empty() {
        output.header("Insights");
        for insight in &report.insights {
            output.print(&format!("  - {}", insight));
        }
    }

    output.header("Predictions");
    let rows: Vec<Vec<String>> = report
        .predictions
        .iter()
        .map(|(horizon, prediction)| {
            vec![
                horizon.label().to_string(),
                prediction.projected_change.clone(),
                format!("{:.0}%", prediction.confidence * 100.0),
                prediction.risk_level.to_string(),
            ]
        })
        .collect();
    output.table(&["Horizon", "Projection", "Confidence", "Risk"], &rows);

    if report.recommendations.total() > 0 {
        output.header("Recommendations");
        for (tier, items) in report.recommendations.iter() {
            for item in items {
                output.print(&format!("  [{}] {}", tier.label(), item));
            }
        }
    }
}

/// Data URLs run to megabytes; show only the head
fn abbreviate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let head: String = value.chars().take(max_chars).collect();
    format!("{}…", head)
}
