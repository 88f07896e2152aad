//! Change-detection records exchanged with the geospatial endpoints

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::severity::Severity;

/// Category of a detected change
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    Deforestation,
    Urbanization,
    WaterIncrease,
    WaterDecrease,
    DisasterDamage,
    Burned,
    Flooded,
    Collapsed,
    #[serde(other)]
    Other,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Deforestation => "deforestation",
            ChangeType::Urbanization => "urbanization",
            ChangeType::WaterIncrease => "water_increase",
            ChangeType::WaterDecrease => "water_decrease",
            ChangeType::DisasterDamage => "disaster_damage",
            ChangeType::Burned => "burned",
            ChangeType::Flooded => "flooded",
            ChangeType::Collapsed => "collapsed",
            ChangeType::Other => "other",
        }
    }

    /// Human label, e.g. `Water Increase`
    pub fn label(&self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detected region in pixel space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeDetection {
    pub change_type: ChangeType,
    /// 0-1; upstream data may omit it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    pub severity: Severity,
    #[serde(default)]
    pub area_hectares: f64,
    /// `[x, y, width, height]` in pixels
    pub bbox: [f64; 4],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polygon_coords: Option<Vec<[f64; 2]>>,
}

impl ChangeDetection {
    pub fn new(change_type: ChangeType, severity: Severity, bbox: [f64; 4]) -> Self {
        Self {
            change_type,
            confidence: None,
            severity,
            area_hectares: 0.0,
            bbox,
            polygon_coords: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn with_area_hectares(mut self, area_hectares: f64) -> Self {
        self.area_hectares = area_hectares;
        self
    }

    pub fn with_polygon(mut self, polygon: Vec<[f64; 2]>) -> Self {
        self.polygon_coords = Some(polygon);
        self
    }

    /// Pixel-space outline: the polygon if present, otherwise the bbox corners
    pub fn outline(&self) -> Vec<[f64; 2]> {
        match &self.polygon_coords {
            Some(polygon) if !polygon.is_empty() => polygon.clone(),
            _ => {
                let [x, y, w, h] = self.bbox;
                vec![[x, y], [x + w, y], [x + w, y + h], [x, y + h]]
            }
        }
    }

    pub fn bbox_center(&self) -> (f64, f64) {
        let [x, y, w, h] = self.bbox;
        (x + w / 2.0, y + h / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterKind {
    Individual,
    Cluster,
}

/// Group of nearby detections returned by the clustering endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionCluster {
    #[serde(rename = "type")]
    pub kind: ClusterKind,
    pub detections: Vec<ChangeDetection>,
    pub count: usize,
    pub dominant_change_type: ChangeType,
    pub total_area_hectares: f64,
    pub max_severity: Severity,
    pub avg_confidence: f64,
}
