//! Test data fixtures for geoshift-core

#![allow(dead_code)]

use geoshift_core::domain::Severity;
use geoshift_core::domain::geospatial::{ChangeDetection, ChangeType};

/// Create a detection with every optional field filled
pub fn test_detection(
    change_type: ChangeType,
    severity: Severity,
    confidence: f64,
    area_hectares: f64,
) -> ChangeDetection {
    ChangeDetection::new(change_type, severity, [10.0, 10.0, 20.0, 20.0])
        .with_confidence(confidence)
        .with_area_hectares(area_hectares)
}

pub fn sample_detections() -> Vec<ChangeDetection> {
    vec![
        test_detection(ChangeType::Deforestation, Severity::High, 0.92, 12.5),
        test_detection(ChangeType::Deforestation, Severity::Critical, 0.88, 40.0),
        test_detection(ChangeType::WaterIncrease, Severity::Medium, 0.71, 3.25),
        ChangeDetection::new(ChangeType::Urbanization, Severity::Low, [0.0, 0.0, 5.0, 5.0])
            .with_area_hectares(0.75),
    ]
}

/// Feature collection as the export endpoint returns it
pub fn sample_feature_collection_json() -> &'static str {
    r#"{
  "type": "FeatureCollection",
  "metadata": {
    "coordinate_system": "WGS84",
    "feature_count": 2
  },
  "features": [
    {
      "type": "Feature",
      "id": "change_0",
      "geometry": {
        "type": "Polygon",
        "coordinates": [[[-74.0, 39.5], [-73.5, 39.5], [-73.5, 40.0], [-74.0, 40.0], [-74.0, 39.5]]]
      },
      "properties": { "change_type": "deforestation", "severity": "high", "confidence": 0.9 }
    },
    {
      "type": "Feature",
      "id": "change_1",
      "geometry": { "type": "Point", "coordinates": [-73.25, 39.1] },
      "properties": { "change_type": "flooded", "severity": "low" }
    }
  ]
}"#
}
