use serde::Serialize;
use std::collections::BTreeMap;

use super::area::hectares_to_square_meters;
use super::detection::{ChangeDetection, ChangeType};
use crate::domain::severity::Severity;

/// Aggregate statistics over a detection list
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatsSummary {
    pub total: usize,
    pub by_type: BTreeMap<ChangeType, usize>,
    pub by_severity: BTreeMap<Severity, usize>,
    pub total_area_hectares: f64,
    /// Mean confidence, missing values counted as 0. `None` for an empty list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_confidence: Option<f64>,
}

impl StatsSummary {
    pub fn total_area_square_meters(&self) -> f64 {
        hectares_to_square_meters(self.total_area_hectares)
    }

    pub fn most_severe(&self) -> Option<Severity> {
        self.by_severity.keys().max().copied()
    }
}

pub fn create_stats_summary(detections: &[ChangeDetection]) -> StatsSummary {
    let mut summary = StatsSummary {
        total: detections.len(),
        ..StatsSummary::default()
    };

    let mut confidence_sum = 0.0;
    for detection in detections {
        *summary.by_type.entry(detection.change_type).or_insert(0) += 1;
        *summary.by_severity.entry(detection.severity).or_insert(0) += 1;
        summary.total_area_hectares += detection.area_hectares;
        confidence_sum += detection.confidence.unwrap_or(0.0);
    }

    if !detections.is_empty() {
        summary.avg_confidence = Some(confidence_sum / detections.len() as f64);
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_summary() {
        let summary = create_stats_summary(&[]);
        assert_eq!(summary.total, 0);
        assert!(summary.by_type.is_empty());
        assert!(summary.by_severity.is_empty());
        assert_eq!(summary.total_area_hectares, 0.0);
        assert_eq!(summary.avg_confidence, None);
        assert_eq!(summary.most_severe(), None);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "total": 0,
                "by_type": {},
                "by_severity": {},
                "total_area_hectares": 0.0
            })
        );
    }

    #[test]
    fn test_missing_confidence_counts_as_zero() {
        let detections = vec![
            ChangeDetection::new(ChangeType::Deforestation, Severity::High, [0.0; 4])
                .with_confidence(0.9)
                .with_area_hectares(2.0),
            ChangeDetection::new(ChangeType::Deforestation, Severity::Low, [0.0; 4])
                .with_area_hectares(0.5),
            ChangeDetection::new(ChangeType::Flooded, Severity::Critical, [0.0; 4])
                .with_confidence(0.6),
        ];

        let summary = create_stats_summary(&detections);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.by_type[&ChangeType::Deforestation], 2);
        assert_eq!(summary.by_type[&ChangeType::Flooded], 1);
        assert_eq!(summary.by_severity.values().sum::<usize>(), 3);
        assert_eq!(summary.total_area_hectares, 2.5);
        assert_eq!(summary.total_area_square_meters(), 25_000.0);
        assert!((summary.avg_confidence.unwrap() - 0.5).abs() < 1e-12);
        assert_eq!(summary.most_severe(), Some(Severity::Critical));
    }
}
