//! ML Commands - advanced comparison, segmentation, damage assessment
//!
//! Thin wrappers over the ML backend. Maps returned as base64 can be written
//! to disk with `--save-map`.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use geoshift_core::domain::{
    AdvancedAnalysis, AdvancedCompareRequest, AnalysisDetails, AnalysisType,
    DEFAULT_CONFIDENCE_THRESHOLD, DamageAssessment, DamageStatistics, DatasetType,
    LandCoverSegmentation, ModelType,
};

use crate::cli::commands::{read_image, save_base64_image};
use crate::cli::context::CliContext;
use crate::cli::exit_codes;
use crate::cli::output::{OutputFormat, OutputWriter};

/// Arguments for the advanced-compare command
#[derive(Args, Debug)]
pub struct AdvancedCompareArgs {
    /// Image taken before the change
    pub before: PathBuf,

    /// Image taken after the change
    pub after: PathBuf,

    /// Model to run (changeformer, siam_unet, deeplabv3plus, xview2)
    #[arg(long = "model", default_value = "changeformer")]
    pub model: ModelType,

    /// Dataset preprocessing (sentinel2, landsat, global_forest_change, xview2, generic)
    #[arg(long = "dataset", default_value = "generic")]
    pub dataset: DatasetType,

    /// Analysis type (binary, multi_class, segmentation, damage_assessment)
    #[arg(long = "analysis", default_value = "binary")]
    pub analysis: AnalysisType,

    /// Confidence threshold in [0, 1]
    #[arg(long, default_value_t = DEFAULT_CONFIDENCE_THRESHOLD)]
    pub threshold: f64,

    /// Write the change map to this file
    #[arg(long)]
    pub save_map: Option<PathBuf>,
}

/// Arguments for the segment command
#[derive(Args, Debug)]
pub struct SegmentArgs {
    /// Image to segment
    pub image: PathBuf,

    /// Dataset preprocessing
    #[arg(long = "dataset", default_value = "generic")]
    pub dataset: DatasetType,

    /// Write the segmentation map to this file
    #[arg(long)]
    pub save_map: Option<PathBuf>,
}

/// Arguments for the assess-damage command
#[derive(Args, Debug)]
pub struct AssessDamageArgs {
    /// Pre-disaster image
    pub pre: PathBuf,

    /// Post-disaster image
    pub post: PathBuf,

    /// Write the damage map to this file
    #[arg(long)]
    pub save_map: Option<PathBuf>,
}

/// Run advanced comparison
pub async fn advanced_compare(ctx: &CliContext, args: &AdvancedCompareArgs) -> Result<i32> {
    let request = AdvancedCompareRequest::new(read_image(&args.before)?, read_image(&args.after)?)
        .with_model(args.model)
        .with_dataset(args.dataset)
        .with_analysis(args.analysis)
        .with_confidence_threshold(args.threshold);

    ctx.output.info(&format!(
        "Running {} analysis with {}...",
        args.analysis, args.model
    ));
    let analysis = ctx.app.ml.advanced_compare(&request).await?;

    save_map(ctx, args.save_map.as_deref(), &analysis.change_map_base64)?;

    match ctx.output.format() {
        OutputFormat::Json => ctx.output.json(&analysis)?,
        OutputFormat::Table | OutputFormat::Plain => render_analysis(&ctx.output, &analysis),
    }

    Ok(exit_codes::SUCCESS)
}

/// Run land-cover segmentation
pub async fn segment(ctx: &CliContext, args: &SegmentArgs) -> Result<i32> {
    let image = read_image(&args.image)?;

    ctx.output.info(&format!("Segmenting {}...", image.file_name));
    let segmentation = ctx.app.ml.segment_land_cover(&image, args.dataset).await?;

    save_map(ctx, args.save_map.as_deref(), &segmentation.segmentation_map_base64)?;

    match ctx.output.format() {
        OutputFormat::Json => ctx.output.json(&segmentation)?,
        OutputFormat::Table | OutputFormat::Plain => {
            render_segmentation(&ctx.output, &segmentation)
        }
    }

    Ok(exit_codes::SUCCESS)
}

/// Run building damage assessment
pub async fn assess_damage(ctx: &CliContext, args: &AssessDamageArgs) -> Result<i32> {
    let pre = read_image(&args.pre)?;
    let post = read_image(&args.post)?;

    ctx.output.info("Assessing damage...");
    let assessment = ctx.app.ml.assess_damage(&pre, &post).await?;

    save_map(ctx, args.save_map.as_deref(), &assessment.damage_map_base64)?;

    match ctx.output.format() {
        OutputFormat::Json => ctx.output.json(&assessment)?,
        OutputFormat::Table | OutputFormat::Plain => render_assessment(&ctx.output, &assessment),
    }

    Ok(exit_codes::SUCCESS)
}

/// Show model load state
pub async fn models(ctx: &CliContext) -> Result<i32> {
    let status = ctx.app.ml.model_status().await;

    match ctx.output.format() {
        OutputFormat::Json => ctx.output.json(&status)?,
        OutputFormat::Table | OutputFormat::Plain => {
            ctx.output.header("ML Models");
            let rows: Vec<Vec<String>> = ModelType::ALL
                .iter()
                .map(|model| {
                    let entry = status.models.get(model);
                    let loaded = if status.is_loaded(*model) { "yes" } else { "no" };
                    vec![
                        model.to_string(),
                        loaded.to_string(),
                        entry
                            .and_then(|s| s.device.clone())
                            .unwrap_or_else(|| "-".to_string()),
                    ]
                })
                .collect();
            ctx.output.table(&["Model", "Loaded", "Device"], &rows);
        }
    }

    if !status.ml_backend_available {
        ctx.output.warn("ML backend is not available");
        return Ok(exit_codes::NETWORK_ERROR);
    }

    Ok(exit_codes::SUCCESS)
}

/// Check the ML backend root endpoint
pub async fn health(ctx: &CliContext) -> Result<i32> {
    let health = ctx.app.ml.health().await?;

    match ctx.output.format() {
        OutputFormat::Json => ctx.output.json(&health)?,
        OutputFormat::Table | OutputFormat::Plain => {
            ctx.output.header("ML Backend");
            ctx.output.field("Status", &health.status);
            if !health.message.is_empty() {
                ctx.output.field("Message", &health.message);
            }
            if !health.available_models.is_empty() {
                ctx.output.field("Models", health.available_models.join(", "));
            }
            if let Some(timestamp) = &health.timestamp {
                ctx.output.field("Timestamp", timestamp);
            }
        }
    }

    if health.is_healthy() {
        ctx.output.success("ML backend is healthy");
        Ok(exit_codes::SUCCESS)
    } else {
        ctx.output
            .warn(&format!("ML backend reports status '{}'", health.status));
        Ok(exit_codes::BACKEND_ERROR)
    }
}

fn save_map(ctx: &CliContext, path: Option<&Path>, encoded: &str) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    if encoded.is_empty() {
        ctx.output.warn("Backend returned no map to save");
        return Ok(());
    }
    save_base64_image(path, encoded)?;
    ctx.output.success(&format!("Map written to {}", path.display()));
    Ok(())
}

fn render_analysis(output: &OutputWriter, analysis: &AdvancedAnalysis) {
    output.header("Advanced Analysis");
    output.field("Model", analysis.model_used);
    output.field("Analysis", analysis.analysis_type);
    output.field("Change", format!("{:.2}%", analysis.change_percentage));
    output.field("Confidence", format!("{:.2}", analysis.confidence_score));
    output.field("Processing time", format!("{:.2}s", analysis.processing_time));

    match &analysis.details {
        AnalysisDetails::Binary => {}
        AnalysisDetails::MultiClass { class_predictions }
        | AnalysisDetails::Segmentation {
            class_predictions, ..
        } => {
            if !class_predictions.is_empty() {
                output.header("Classes");
                let rows: Vec<Vec<String>> = class_predictions
                    .iter()
                    .map(|(class, pct)| vec![class.clone(), format!("{:.2}%", pct)])
                    .collect();
                output.table(&["Class", "Share"], &rows);
            }
        }
        AnalysisDetails::DamageAssessment { damage } => render_damage(output, damage),
    }
}

fn render_segmentation(output: &OutputWriter, segmentation: &LandCoverSegmentation) {
    output.header("Land Cover");
    if let Some((class, pct)) = segmentation.dominant_class() {
        output.field("Dominant class", format!("{} ({:.2}%)", class, pct));
    }

    let rows: Vec<Vec<String>> = segmentation
        .class_percentages
        .iter()
        .map(|(class, pct)| vec![class.clone(), format!("{:.2}%", pct)])
        .collect();
    output.table(&["Class", "Share"], &rows);
}

fn render_assessment(output: &OutputWriter, assessment: &DamageAssessment) {
    output.header("Damage Assessment");
    output.field("Building pixels", assessment.building_count);
    render_damage(output, &assessment.damage_statistics);
}

fn render_damage(output: &OutputWriter, damage: &DamageStatistics) {
    output.field("Damaged", format!("{:.2}%", damage.damaged_percentage()));
    output.field("Dominant class", damage.dominant_class());

    let rows: Vec<Vec<String>> = damage
        .iter()
        .map(|(class, breakdown)| {
            vec![
                class.to_string(),
                breakdown.pixels.to_string(),
                format!("{:.2}%", breakdown.percentage),
            ]
        })
        .collect();
    output.table(&["Class", "Pixels", "Share"], &rows);
}
