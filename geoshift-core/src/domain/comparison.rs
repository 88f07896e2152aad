//! View models for the basic `/compare` endpoint
//!
//! The comparison service returns an overall change figure plus optional
//! AI-derived summary and a structured environmental report.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::severity::Severity;

/// Response of `POST /compare`
///
/// `change_percentage` and `overall_assessment.total_area_changed_sq_km` are
/// different units and are carried independently; neither is derived from the other.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompareResult {
    #[serde(default)]
    pub change_percentage: Option<f64>,
    /// Heatmap image reference (URL or data URL)
    #[serde(default, alias = "heatmap_url")]
    pub heatmap: Option<String>,
    /// Inline heatmap some backend versions send next to or instead of the URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heatmap_base64: Option<String>,
    #[serde(default)]
    pub ai_analysis: Option<AiAnalysis>,
    #[serde(default)]
    pub environmental_report: Option<EnvironmentalReport>,
    #[serde(default)]
    pub overall_assessment: Option<OverallAssessment>,
}

impl CompareResult {
    pub fn has_report(&self) -> bool {
        self.environmental_report.is_some()
    }

    /// Heatmap to show, preferring the URL over the inline image
    pub fn heatmap_ref(&self) -> Option<&str> {
        self.heatmap.as_deref().or(self.heatmap_base64.as_deref())
    }
}

/// AI-derived summary attached to a comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiAnalysis {
    /// 0-10
    pub risk_score: f64,
    pub change_type: String,
    #[serde(default)]
    pub description: String,
}

/// Alternate summary block some backend versions send instead of `change_percentage`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverallAssessment {
    #[serde(default)]
    pub total_area_changed_sq_km: Option<f64>,
    #[serde(default)]
    pub primary_change_type: Option<String>,
    #[serde(default)]
    pub severity: Option<Severity>,
}

/// A quantity the backend sends either as a bare number or as preformatted text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Measure {
    Number(f64),
    Text(String),
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Measure::Number(n) => write!(f, "{}", n),
            Measure::Text(t) => f.write_str(t),
        }
    }
}

/// Structured environmental report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalReport {
    pub executive_summary: String,
    pub analysis: ReportAnalysis,
    #[serde(default)]
    pub insights: Vec<String>,
    pub predictions: Predictions,
    pub recommendations: Recommendations,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportAnalysis {
    pub severity: Severity,
    /// 0-10
    pub risk_score: f64,
    pub affected_area: Measure,
    #[serde(default)]
    pub zonal_analysis: Vec<ZoneAnalysis>,
    #[serde(default)]
    pub temporal_analysis: Option<TemporalTrend>,
}

/// Change detected inside one spatial sub-region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneAnalysis {
    pub zone: String,
    pub change_percentage: f64,
    pub severity: Severity,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalTrend {
    pub trend: String,
    #[serde(default)]
    pub rate_of_change: Option<Measure>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Projection horizon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Horizon {
    ShortTerm,
    MediumTerm,
    LongTerm,
}

impl Horizon {
    pub fn label(&self) -> &'static str {
        match self {
            Horizon::ShortTerm => "Short term",
            Horizon::MediumTerm => "Medium term",
            Horizon::LongTerm => "Long term",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub projected_change: String,
    /// 0-1
    pub confidence: f64,
    pub risk_level: Severity,
}

/// Three fixed-name projections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predictions {
    pub short_term: Prediction,
    pub medium_term: Prediction,
    pub long_term: Prediction,
}

impl Predictions {
    pub fn iter(&self) -> impl Iterator<Item = (Horizon, &Prediction)> {
        [
            (Horizon::ShortTerm, &self.short_term),
            (Horizon::MediumTerm, &self.medium_term),
            (Horizon::LongTerm, &self.long_term),
        ]
        .into_iter()
    }

    pub fn get(&self, horizon: Horizon) -> &Prediction {
        match horizon {
            Horizon::ShortTerm => &self.short_term,
            Horizon::MediumTerm => &self.medium_term,
            Horizon::LongTerm => &self.long_term,
        }
    }
}

/// Recommendation urgency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrgencyTier {
    Immediate,
    ShortTerm,
    LongTerm,
}

impl UrgencyTier {
    pub fn label(&self) -> &'static str {
        match self {
            UrgencyTier::Immediate => "Immediate",
            UrgencyTier::ShortTerm => "Short term",
            UrgencyTier::LongTerm => "Long term",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    #[serde(default)]
    pub immediate: Vec<String>,
    #[serde(default)]
    pub short_term: Vec<String>,
    #[serde(default)]
    pub long_term: Vec<String>,
}

impl Recommendations {
    pub fn iter(&self) -> impl Iterator<Item = (UrgencyTier, &[String])> {
        [
            (UrgencyTier::Immediate, self.immediate.as_slice()),
            (UrgencyTier::ShortTerm, self.short_term.as_slice()),
            (UrgencyTier::LongTerm, self.long_term.as_slice()),
        ]
        .into_iter()
    }

    pub fn total(&self) -> usize {
        self.immediate.len() + self.short_term.len() + self.long_term.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report_json() -> serde_json::Value {
        serde_json::json!({
            "executive_summary": "Significant canopy loss in the north-east quadrant.",
            "analysis": {
                "severity": "high",
                "risk_score": 7.4,
                "affected_area": "12.5 km²",
                "zonal_analysis": [
                    { "zone": "NE", "change_percentage": 31.2, "severity": "critical" },
                    {
                        "zone": "SW",
                        "change_percentage": 4.0,
                        "severity": "low",
                        "description": "stable"
                    }
                ],
                "temporal_analysis": { "trend": "accelerating", "rate_of_change": 2.1 }
            },
            "insights": ["Loss concentrated near roads", "Water bodies unchanged"],
            "predictions": {
                "short_term": {
                    "projected_change": "+5%",
                    "confidence": 0.82,
                    "risk_level": "high"
                },
                "medium_term": {
                    "projected_change": "+12%",
                    "confidence": 0.64,
                    "risk_level": "high"
                },
                "long_term": {
                    "projected_change": "+25%",
                    "confidence": 0.41,
                    "risk_level": "critical"
                }
            },
            "recommendations": {
                "immediate": ["Deploy field survey"],
                "short_term": ["Increase monitoring cadence"],
                "long_term": []
            }
        })
    }

    #[test]
    fn test_parse_full_compare_result() {
        let body = serde_json::json!({
            "change_percentage": 18.3,
            "heatmap_url": "/static/heatmap.png",
            "ai_analysis": {
                "risk_score": 6.0,
                "change_type": "deforestation",
                "description": "canopy loss"
            },
            "environmental_report": sample_report_json()
        });

        let result: CompareResult = serde_json::from_value(body).unwrap();
        assert_eq!(result.change_percentage, Some(18.3));
        assert_eq!(result.heatmap.as_deref(), Some("/static/heatmap.png"));
        assert!(result.has_report());

        let report = result.environmental_report.unwrap();
        assert_eq!(report.analysis.severity, Severity::High);
        assert_eq!(report.analysis.affected_area.to_string(), "12.5 km²");
        assert_eq!(report.analysis.zonal_analysis.len(), 2);
        assert_eq!(report.predictions.get(Horizon::LongTerm).risk_level, Severity::Critical);
        assert_eq!(report.recommendations.total(), 2);
    }

    #[test]
    fn test_minimal_compare_result() {
        let result: CompareResult = serde_json::from_str(r#"{"change_percentage": 0.0}"#).unwrap();
        assert_eq!(result.change_percentage, Some(0.0));
        assert!(result.ai_analysis.is_none());
        assert!(!result.has_report());
    }

    #[test]
    fn test_heatmap_url_and_inline_image_together() {
        let result: CompareResult = serde_json::from_value(serde_json::json!({
            "change_percentage": 4.0,
            "heatmap_url": "/static/h.png",
            "heatmap_base64": "iVBORw=="
        }))
        .unwrap();
        assert_eq!(result.heatmap.as_deref(), Some("/static/h.png"));
        assert_eq!(result.heatmap_base64.as_deref(), Some("iVBORw=="));
        assert_eq!(result.heatmap_ref(), Some("/static/h.png"));

        let inline_only: CompareResult =
            serde_json::from_str(r#"{"heatmap_base64": "iVBORw=="}"#).unwrap();
        assert_eq!(inline_only.heatmap, None);
        assert_eq!(inline_only.heatmap_ref(), Some("iVBORw=="));
    }

    #[test]
    fn test_overall_assessment_kept_separately() {
        let result: CompareResult = serde_json::from_str(
            r#"{"overall_assessment": {"total_area_changed_sq_km": 3.2, "severity": "moderate"}}"#,
        )
        .unwrap();
        assert_eq!(result.change_percentage, None);
        let assessment = result.overall_assessment.unwrap();
        assert_eq!(assessment.total_area_changed_sq_km, Some(3.2));
        assert_eq!(assessment.severity, Some(Severity::Medium));
    }

    #[test]
    fn test_prediction_and_recommendation_order() {
        let report: EnvironmentalReport = serde_json::from_value(sample_report_json()).unwrap();

        let horizons: Vec<Horizon> = report.predictions.iter().map(|(h, _)| h).collect();
        assert_eq!(
            horizons,
            vec![Horizon::ShortTerm, Horizon::MediumTerm, Horizon::LongTerm]
        );

        let tiers: Vec<&str> = report
            .recommendations
            .iter()
            .map(|(tier, _)| tier.label())
            .collect();
        assert_eq!(tiers, vec!["Immediate", "Short term", "Long term"]);
    }
}
