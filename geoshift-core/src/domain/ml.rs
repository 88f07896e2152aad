//! View models and option sets for the advanced ML endpoints
//!
//! Option sets are closed: a value outside them is rejected locally before
//! any request is built.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::image::ImagePayload;

/// Free-form metadata the backend attaches to analysis responses
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Default confidence threshold for advanced comparison
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.5;

/// Error for a value outside one of the closed option sets
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct UnknownOption {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

macro_rules! option_set {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $wire)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownOption;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($wire => Ok($name::$variant),)+
                    other => Err(UnknownOption {
                        kind: $kind,
                        value: other.to_string(),
                        expected: $name::ALL
                            .iter()
                            .map(|v| v.as_str())
                            .collect::<Vec<_>>()
                            .join(", "),
                    }),
                }
            }
        }
    };
}

pub(crate) use option_set;

option_set! {
    /// Change-detection model served by the ML backend
    ModelType, "model type" {
        ChangeFormer => "changeformer",
        SiamUnet => "siam_unet",
        DeepLabV3Plus => "deeplabv3plus",
        XView2 => "xview2",
    }
}

option_set! {
    /// Dataset-specific preprocessing applied before inference
    DatasetType, "dataset type" {
        Sentinel2 => "sentinel2",
        Landsat => "landsat",
        GlobalForestChange => "global_forest_change",
        XView2 => "xview2",
        Generic => "generic",
    }
}

option_set! {
    /// Kind of analysis requested from advanced comparison
    AnalysisType, "analysis type" {
        Binary => "binary",
        MultiClass => "multi_class",
        Segmentation => "segmentation",
        DamageAssessment => "damage_assessment",
    }
}

impl Default for ModelType {
    fn default() -> Self {
        ModelType::ChangeFormer
    }
}

impl Default for DatasetType {
    fn default() -> Self {
        DatasetType::Generic
    }
}

impl Default for AnalysisType {
    fn default() -> Self {
        AnalysisType::Binary
    }
}

/// Input for `POST /advanced-compare`
#[derive(Debug, Clone)]
pub struct AdvancedCompareRequest {
    pub before: ImagePayload,
    pub after: ImagePayload,
    pub model_type: ModelType,
    pub dataset_type: DatasetType,
    pub analysis_type: AnalysisType,
    pub confidence_threshold: f64,
}

impl AdvancedCompareRequest {
    pub fn new(before: ImagePayload, after: ImagePayload) -> Self {
        Self {
            before,
            after,
            model_type: ModelType::default(),
            dataset_type: DatasetType::default(),
            analysis_type: AnalysisType::default(),
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }

    pub fn with_model(mut self, model_type: ModelType) -> Self {
        self.model_type = model_type;
        self
    }

    pub fn with_dataset(mut self, dataset_type: DatasetType) -> Self {
        self.dataset_type = dataset_type;
        self
    }

    pub fn with_analysis(mut self, analysis_type: AnalysisType) -> Self {
        self.analysis_type = analysis_type;
        self
    }

    pub fn with_confidence_threshold(mut self, threshold: f64) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    /// Check the parts of the request that can be known to be wrong without asking the backend
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(format!(
                "confidence threshold must be within [0, 1], got {}",
                self.confidence_threshold
            ));
        }

        // The backend only implements damage assessment on the xView2 model
        if self.analysis_type == AnalysisType::DamageAssessment
            && self.model_type != ModelType::XView2
        {
            return Err("damage_assessment analysis requires the xview2 model".to_string());
        }

        Ok(())
    }
}

/// Pixel count and share for one class
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassBreakdown {
    pub pixels: u64,
    pub percentage: f64,
}

/// xView2 damage class
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DamageClass {
    NoDamage,
    MinorDamage,
    MajorDamage,
    Destroyed,
}

impl DamageClass {
    pub const ALL: [DamageClass; 4] = [
        DamageClass::NoDamage,
        DamageClass::MinorDamage,
        DamageClass::MajorDamage,
        DamageClass::Destroyed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DamageClass::NoDamage => "no-damage",
            DamageClass::MinorDamage => "minor-damage",
            DamageClass::MajorDamage => "major-damage",
            DamageClass::Destroyed => "destroyed",
        }
    }
}

impl fmt::Display for DamageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-damage-class breakdown over building pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DamageStatistics {
    #[serde(rename = "no-damage", default)]
    pub no_damage: ClassBreakdown,
    #[serde(rename = "minor-damage", default)]
    pub minor_damage: ClassBreakdown,
    #[serde(rename = "major-damage", default)]
    pub major_damage: ClassBreakdown,
    #[serde(default)]
    pub destroyed: ClassBreakdown,
}

impl DamageStatistics {
    pub fn get(&self, class: DamageClass) -> &ClassBreakdown {
        match class {
            DamageClass::NoDamage => &self.no_damage,
            DamageClass::MinorDamage => &self.minor_damage,
            DamageClass::MajorDamage => &self.major_damage,
            DamageClass::Destroyed => &self.destroyed,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (DamageClass, &ClassBreakdown)> {
        DamageClass::ALL.into_iter().map(move |class| (class, self.get(class)))
    }

    /// Share of building pixels with any damage
    pub fn damaged_percentage(&self) -> f64 {
        self.minor_damage.percentage + self.major_damage.percentage + self.destroyed.percentage
    }

    /// Class covering the most pixels; ties resolve to the more severe class
    pub fn dominant_class(&self) -> DamageClass {
        self.iter()
            .max_by(|(ca, a), (cb, b)| a.pixels.cmp(&b.pixels).then(ca.cmp(cb)))
            .map(|(class, _)| class)
            .unwrap_or(DamageClass::NoDamage)
    }
}

/// Analysis-specific part of an advanced comparison
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisDetails {
    Binary,
    MultiClass {
        class_predictions: BTreeMap<String, f64>,
    },
    Segmentation {
        segmentation_map_base64: Option<String>,
        class_predictions: BTreeMap<String, f64>,
    },
    DamageAssessment {
        damage: DamageStatistics,
    },
}

/// Response of `POST /advanced-compare`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAdvancedAnalysis", into = "RawAdvancedAnalysis")]
pub struct AdvancedAnalysis {
    pub success: bool,
    pub model_used: ModelType,
    pub analysis_type: AnalysisType,
    pub change_percentage: f64,
    pub change_map_base64: String,
    pub confidence_score: f64,
    pub processing_time: f64,
    pub metadata: Metadata,
    pub details: AnalysisDetails,
}

/// Flat wire shape; optional fields depend on `analysis_type`
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawAdvancedAnalysis {
    #[serde(default = "default_true")]
    success: bool,
    model_used: ModelType,
    analysis_type: AnalysisType,
    change_percentage: f64,
    #[serde(default)]
    change_map_base64: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    segmentation_map_base64: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    class_predictions: Option<BTreeMap<String, f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    damage_assessment: Option<DamageStatistics>,
    #[serde(default)]
    confidence_score: f64,
    #[serde(default)]
    processing_time: f64,
    #[serde(default)]
    metadata: Metadata,
}

fn default_true() -> bool {
    true
}

impl TryFrom<RawAdvancedAnalysis> for AdvancedAnalysis {
    type Error = String;

    fn try_from(raw: RawAdvancedAnalysis) -> Result<Self, Self::Error> {
        let details = match raw.analysis_type {
            AnalysisType::Binary => AnalysisDetails::Binary,
            AnalysisType::MultiClass => AnalysisDetails::MultiClass {
                class_predictions: raw.class_predictions.unwrap_or_default(),
            },
            AnalysisType::Segmentation => AnalysisDetails::Segmentation {
                segmentation_map_base64: raw.segmentation_map_base64,
                class_predictions: raw.class_predictions.unwrap_or_default(),
            },
            AnalysisType::DamageAssessment => AnalysisDetails::DamageAssessment {
                damage: raw.damage_assessment.ok_or_else(|| {
                    "damage_assessment analysis returned without damage statistics".to_string()
                })?,
            },
        };

        Ok(Self {
            success: raw.success,
            model_used: raw.model_used,
            analysis_type: raw.analysis_type,
            change_percentage: raw.change_percentage,
            change_map_base64: raw.change_map_base64,
            confidence_score: raw.confidence_score,
            processing_time: raw.processing_time,
            metadata: raw.metadata,
            details,
        })
    }
}

impl From<AdvancedAnalysis> for RawAdvancedAnalysis {
    fn from(analysis: AdvancedAnalysis) -> Self {
        let (segmentation_map_base64, class_predictions, damage_assessment) =
            match analysis.details {
                AnalysisDetails::Binary => (None, None, None),
                AnalysisDetails::MultiClass { class_predictions } => {
                    (None, Some(class_predictions), None)
                }
                AnalysisDetails::Segmentation {
                    segmentation_map_base64,
                    class_predictions,
                } => (segmentation_map_base64, Some(class_predictions), None),
                AnalysisDetails::DamageAssessment { damage } => (None, None, Some(damage)),
            };

        Self {
            success: analysis.success,
            model_used: analysis.model_used,
            analysis_type: analysis.analysis_type,
            change_percentage: analysis.change_percentage,
            change_map_base64: analysis.change_map_base64,
            segmentation_map_base64,
            class_predictions,
            damage_assessment,
            confidence_score: analysis.confidence_score,
            processing_time: analysis.processing_time,
            metadata: analysis.metadata,
        }
    }
}

/// Response of `POST /segment-land-cover`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandCoverSegmentation {
    #[serde(default = "default_true")]
    pub success: bool,
    pub segmentation_map_base64: String,
    #[serde(default)]
    pub land_cover_classes: Vec<String>,
    #[serde(default)]
    pub class_percentages: BTreeMap<String, f64>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl LandCoverSegmentation {
    /// Class with the largest share, if any class was reported
    pub fn dominant_class(&self) -> Option<(&str, f64)> {
        self.class_percentages
            .iter()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(name, pct)| (name.as_str(), *pct))
    }
}

/// Response of `POST /assess-damage`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageAssessment {
    #[serde(default = "default_true")]
    pub success: bool,
    pub damage_map_base64: String,
    /// Building pixels found in the pre-disaster image
    pub building_count: u64,
    pub damage_statistics: DamageStatistics,
    #[serde(default)]
    pub severity_map_base64: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
}

/// Load state of one backend model
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelStatus {
    pub loaded: bool,
    #[serde(default)]
    pub device: Option<String>,
    #[serde(default)]
    pub model_type: Option<String>,
}

/// Response of `GET /ml-models`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelStatusResponse {
    #[serde(default = "default_true")]
    pub success: bool,
    #[serde(default = "default_true")]
    pub ml_backend_available: bool,
    #[serde(default)]
    pub models: BTreeMap<ModelType, ModelStatus>,
}

impl ModelStatusResponse {
    /// Value reported when the backend cannot be reached
    pub fn unavailable() -> Self {
        Self {
            success: false,
            ml_backend_available: false,
            models: BTreeMap::new(),
        }
    }

    pub fn is_loaded(&self, model: ModelType) -> bool {
        self.models.get(&model).is_some_and(|s| s.loaded)
    }

    pub fn loaded_models(&self) -> Vec<ModelType> {
        self.models
            .iter()
            .filter(|(_, status)| status.loaded)
            .map(|(model, _)| *model)
            .collect()
    }
}

/// Response of `GET /` on the ML backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendHealth {
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub available_models: Vec<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl BackendHealth {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}
