//! Common fixtures for the client integration tests

#![allow(dead_code)]

use geoshift_core::domain::ImagePayload;
use geoshift_core::domain::Severity;
use geoshift_core::domain::geospatial::{ChangeDetection, ChangeType, encode_data_url};
use reqwest::Client;

/// ASCII placeholder bytes so request bodies stay searchable as text
pub fn test_image(name: &str) -> ImagePayload {
    ImagePayload::new(name, format!("IMAGEDATA:{}", name).into_bytes())
}

pub fn http_client() -> Client {
    Client::new()
}

/// URI of a local port with nothing listening on it
pub async fn unreachable_uri() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

pub fn sample_detections() -> Vec<ChangeDetection> {
    vec![
        ChangeDetection::new(ChangeType::Deforestation, Severity::High, [10.0, 10.0, 40.0, 30.0])
            .with_confidence(0.91)
            .with_area_hectares(4.2),
        ChangeDetection::new(ChangeType::Flooded, Severity::Medium, [60.0, 60.0, 20.0, 20.0])
            .with_area_hectares(1.1),
    ]
}

pub fn geojson_overlay_body() -> serde_json::Value {
    let geojson = serde_json::json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "id": "change_0",
            "geometry": { "type": "Point", "coordinates": [-60.0, -3.0] },
            "properties": { "change_type": "deforestation" }
        }]
    });
    let data = encode_data_url(
        "application/geo+json",
        serde_json::to_string(&geojson).unwrap_or_default().as_bytes(),
    );

    serde_json::json!({
        "filename": "change_detections.geojson",
        "content_type": "application/geo+json",
        "data": data,
        "export_format": "geojson"
    })
}

pub fn compare_body() -> serde_json::Value {
    serde_json::json!({
        "change_percentage": 23.4,
        "heatmap_url": "http://localhost:8000/static/heatmap_123.png",
        "ai_analysis": {
            "risk_score": 6.5,
            "change_type": "deforestation",
            "description": "Large-scale canopy loss in the north-west quadrant"
        },
        "environmental_report": {
            "executive_summary": "Significant forest loss detected.",
            "analysis": {
                "severity": "high",
                "risk_score": 7.2,
                "affected_area": "12.4 km²",
                "zonal_analysis": [],
                "temporal_analysis": null
            },
            "insights": ["Canopy loss concentrated near roads"],
            "predictions": {
                "short_term": {
                    "projected_change": "5% further loss",
                    "confidence": 0.8,
                    "risk_level": "high"
                },
                "medium_term": {
                    "projected_change": "12% further loss",
                    "confidence": 0.6,
                    "risk_level": "high"
                },
                "long_term": {
                    "projected_change": "Habitat fragmentation",
                    "confidence": 0.4,
                    "risk_level": "critical"
                }
            },
            "recommendations": {
                "immediate": ["Deploy ground survey"],
                "short_term": ["Notify regional authority"],
                "long_term": []
            }
        }
    })
}
