//! Map styling for change features
//!
//! Fill colour follows the change type, fill opacity follows severity. The
//! palette matches what the backend emits in its Mapbox/Leaflet configurations.

use serde::Serialize;

use super::detection::ChangeType;
use crate::domain::severity::Severity;

pub const OUTLINE_COLOR: &str = "#000000";
pub const OUTLINE_WIDTH: f64 = 2.0;
/// Opacity used when severity is unknown
pub const DEFAULT_FILL_OPACITY: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeverityStyle {
    pub color: &'static str,
    pub opacity: f64,
}

impl Severity {
    pub fn style(&self) -> SeverityStyle {
        match self {
            Severity::Critical => SeverityStyle {
                color: "#dc2626",
                opacity: 0.8,
            },
            Severity::High => SeverityStyle {
                color: "#ea580c",
                opacity: 0.6,
            },
            Severity::Medium => SeverityStyle {
                color: "#ca8a04",
                opacity: 0.4,
            },
            Severity::Low => SeverityStyle {
                color: "#16a34a",
                opacity: 0.2,
            },
        }
    }
}

impl ChangeType {
    pub fn color(&self) -> &'static str {
        match self {
            ChangeType::Deforestation => "#ff4444",
            ChangeType::Urbanization => "#888888",
            ChangeType::WaterIncrease => "#4444ff",
            ChangeType::WaterDecrease => "#ffff44",
            ChangeType::DisasterDamage => "#ff0000",
            ChangeType::Burned => "#ff8800",
            ChangeType::Flooded => "#0088ff",
            ChangeType::Collapsed => "#8800ff",
            ChangeType::Other => "#00ff00",
        }
    }

    /// KML `aabbggrr` fill colour
    pub fn kml_color(&self) -> &'static str {
        match self {
            ChangeType::Deforestation | ChangeType::DisasterDamage => "ff0000ff",
            ChangeType::Urbanization => "ff808080",
            ChangeType::WaterIncrease | ChangeType::Flooded => "ffff0000",
            ChangeType::WaterDecrease => "ff00ffff",
            ChangeType::Burned => "ff0080ff",
            ChangeType::Collapsed => "ff8000ff",
            ChangeType::Other => "ff00ff00",
        }
    }
}

/// Full style for one rendered feature
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureStyle {
    pub fill_color: &'static str,
    pub fill_opacity: f64,
    pub stroke_color: &'static str,
    pub stroke_width: f64,
}

pub fn feature_style(change_type: ChangeType, severity: Option<Severity>) -> FeatureStyle {
    FeatureStyle {
        fill_color: change_type.color(),
        fill_opacity: severity
            .map(|s| s.style().opacity)
            .unwrap_or(DEFAULT_FILL_OPACITY),
        stroke_color: OUTLINE_COLOR,
        stroke_width: OUTLINE_WIDTH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opacity_rises_with_severity() {
        let opacities: Vec<f64> = Severity::ALL.iter().map(|s| s.style().opacity).collect();
        assert_eq!(opacities, vec![0.2, 0.4, 0.6, 0.8]);
    }

    #[test]
    fn test_feature_style() {
        let style = feature_style(ChangeType::Deforestation, Some(Severity::Critical));
        assert_eq!(style.fill_color, "#ff4444");
        assert_eq!(style.fill_opacity, 0.8);
        assert_eq!(style.stroke_color, "#000000");

        let style = feature_style(ChangeType::Other, None);
        assert_eq!(style.fill_color, "#00ff00");
        assert_eq!(style.fill_opacity, DEFAULT_FILL_OPACITY);
    }
}
