//! Common test utilities for the CLI integration tests
//!
//! Mock implementations of the three backend traits, plus fixtures for
//! detection files and images on disk.

#![allow(dead_code)]

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use geoshift::AppHandle;
use geoshift::cli::{CliContext, OutputFormat, OutputWriter};
use geoshift::geoshift_client::{ApiError, ComparisonApi, GeospatialApi, MlApi};
use geoshift::geoshift_core::Config;
use geoshift::geoshift_core::domain::geospatial::{
    ChangeDetection, ChangeType, DetectionCluster, ExportFormat, ExportedOverlay, GeoBounds,
    MapConfiguration, MapConfigurationRequest, encode_data_url,
};
use geoshift::geoshift_core::domain::{
    AdvancedAnalysis, AdvancedCompareRequest, BackendHealth, CompareResult, DamageAssessment,
    DatasetType, ImagePayload, LandCoverSegmentation, ModelStatusResponse, Severity,
};

/// Failure a mock should report instead of succeeding
#[derive(Debug, Clone)]
pub enum MockFailure {
    Backend { status: u16, message: String },
    Decode(String),
    InvalidInput(String),
}

impl MockFailure {
    fn to_error(&self) -> ApiError {
        match self {
            MockFailure::Backend { status, message } => ApiError::http(*status, message.clone()),
            MockFailure::Decode(message) => ApiError::decode(message.clone()),
            MockFailure::InvalidInput(message) => ApiError::invalid_input(message.clone()),
        }
    }
}

/// Mock comparison service
#[derive(Debug, Default)]
pub struct MockComparisonApi {
    result: CompareResult,
    failure: Option<MockFailure>,
    pub calls: AtomicUsize,
}

impl MockComparisonApi {
    pub fn new(result: CompareResult) -> Self {
        Self {
            result,
            ..Self::default()
        }
    }

    pub fn failing(failure: MockFailure) -> Self {
        Self {
            failure: Some(failure),
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ComparisonApi for MockComparisonApi {
    async fn compare_images(
        &self,
        _before: &ImagePayload,
        _after: &ImagePayload,
    ) -> Result<CompareResult, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(failure) => Err(failure.to_error()),
            None => Ok(self.result.clone()),
        }
    }
}

/// Mock ML backend
#[derive(Debug)]
pub struct MockMlApi {
    status: ModelStatusResponse,
    health_status: String,
    failure: Option<MockFailure>,
    pub last_request: Mutex<Option<(String, String, String, f64)>>,
}

impl MockMlApi {
    pub fn new() -> Self {
        Self {
            status: model_status(),
            health_status: "healthy".to_string(),
            failure: None,
            last_request: Mutex::new(None),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            status: ModelStatusResponse::unavailable(),
            health_status: "degraded".to_string(),
            ..Self::new()
        }
    }

    pub fn failing(failure: MockFailure) -> Self {
        Self {
            failure: Some(failure),
            ..Self::new()
        }
    }

    fn check(&self) -> Result<(), ApiError> {
        match &self.failure {
            Some(failure) => Err(failure.to_error()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl MlApi for MockMlApi {
    async fn advanced_compare(
        &self,
        request: &AdvancedCompareRequest,
    ) -> Result<AdvancedAnalysis, ApiError> {
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some((
                request.model_type.to_string(),
                request.dataset_type.to_string(),
                request.analysis_type.to_string(),
                request.confidence_threshold,
            ));
        }
        self.check()?;
        Ok(serde_json::from_value(serde_json::json!({
            "model_used": request.model_type,
            "analysis_type": "binary",
            "change_percentage": 12.5,
            "change_map_base64": "iVBORw==",
            "confidence_score": 0.84,
            "processing_time": 1.2
        }))
        .map_err(|e| ApiError::decode(e.to_string()))?)
    }

    async fn segment_land_cover(
        &self,
        _image: &ImagePayload,
        _dataset: DatasetType,
    ) -> Result<LandCoverSegmentation, ApiError> {
        self.check()?;
        serde_json::from_value(serde_json::json!({
            "segmentation_map_base64": "iVBORw==",
            "land_cover_classes": ["forest", "water"],
            "class_percentages": { "forest": 70.0, "water": 30.0 }
        }))
        .map_err(|e| ApiError::decode(e.to_string()))
    }

    async fn assess_damage(
        &self,
        _pre_disaster: &ImagePayload,
        _post_disaster: &ImagePayload,
    ) -> Result<DamageAssessment, ApiError> {
        self.check()?;
        serde_json::from_value(serde_json::json!({
            "damage_map_base64": "",
            "building_count": 1200,
            "damage_statistics": {
                "no-damage": { "pixels": 800, "percentage": 66.7 },
                "minor-damage": { "pixels": 200, "percentage": 16.7 },
                "major-damage": { "pixels": 150, "percentage": 12.5 },
                "destroyed": { "pixels": 50, "percentage": 4.1 }
            }
        }))
        .map_err(|e| ApiError::decode(e.to_string()))
    }

    async fn model_status(&self) -> ModelStatusResponse {
        self.status.clone()
    }

    async fn health(&self) -> Result<BackendHealth, ApiError> {
        self.check()?;
        Ok(BackendHealth {
            status: self.health_status.clone(),
            message: "ML backend".to_string(),
            available_models: vec!["changeformer".to_string()],
            timestamp: None,
        })
    }
}

/// Arguments of the last export call
#[derive(Debug, Clone, PartialEq)]
pub struct ExportCall {
    pub detections: usize,
    pub image_height: u32,
    pub image_width: u32,
    pub bounds: Option<GeoBounds>,
    pub format: ExportFormat,
}

/// Mock geospatial service
#[derive(Debug, Default)]
pub struct MockGeospatialApi {
    failure: Option<MockFailure>,
    pub last_export: Mutex<Option<ExportCall>>,
    pub last_map_request: Mutex<Option<MapConfigurationRequest>>,
    pub last_cluster_distance: Mutex<Option<f64>>,
}

impl MockGeospatialApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(failure: MockFailure) -> Self {
        Self {
            failure: Some(failure),
            ..Self::default()
        }
    }

    fn check(&self) -> Result<(), ApiError> {
        match &self.failure {
            Some(failure) => Err(failure.to_error()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl GeospatialApi for MockGeospatialApi {
    async fn export_change_detections(
        &self,
        detections: &[ChangeDetection],
        image_height: u32,
        image_width: u32,
        bounds: Option<GeoBounds>,
        format: ExportFormat,
    ) -> Result<ExportedOverlay, ApiError> {
        if let Ok(mut last) = self.last_export.lock() {
            *last = Some(ExportCall {
                detections: detections.len(),
                image_height,
                image_width,
                bounds,
                format,
            });
        }
        self.check()?;

        let (content_type, document) = match format {
            ExportFormat::GeoJson => (
                "application/geo+json",
                r#"{"type":"FeatureCollection","features":[]}"#,
            ),
            ExportFormat::Kml => ("application/vnd.google-earth.kml+xml", "<kml/>"),
        };
        Ok(ExportedOverlay {
            filename: format!("change_detections.{}", format.file_extension()),
            content_type: content_type.to_string(),
            data: encode_data_url(content_type, document.as_bytes()),
            export_format: format,
        })
    }

    async fn create_map_configuration(
        &self,
        request: &MapConfigurationRequest,
    ) -> Result<MapConfiguration, ApiError> {
        if let Ok(mut last) = self.last_map_request.lock() {
            *last = Some(request.clone());
        }
        self.check()?;
        serde_json::from_value(serde_json::json!({
            "map": { "center": [39.5, -73.5], "zoom": 10.0 },
            "tileLayers": [],
            "geoJsonLayer": {},
            "legend": {
                "title": "Change Types",
                "items": [{ "color": "#ff4444", "label": "Deforestation" }]
            },
            "controls": { "zoom": true, "fullscreen": false }
        }))
        .map_err(|e| ApiError::decode(e.to_string()))
    }

    async fn cluster_detections(
        &self,
        detections: &[ChangeDetection],
        max_distance_meters: f64,
    ) -> Result<Vec<DetectionCluster>, ApiError> {
        if let Ok(mut last) = self.last_cluster_distance.lock() {
            *last = Some(max_distance_meters);
        }
        self.check()?;
        Ok(vec![DetectionCluster {
            kind: geoshift::geoshift_core::domain::geospatial::ClusterKind::Cluster,
            detections: detections.to_vec(),
            count: detections.len(),
            dominant_change_type: ChangeType::Deforestation,
            total_area_hectares: detections.iter().map(|d| d.area_hectares).sum(),
            max_severity: Severity::High,
            avg_confidence: 0.8,
        }])
    }
}

pub fn model_status() -> ModelStatusResponse {
    serde_json::from_value(serde_json::json!({
        "success": true,
        "ml_backend_available": true,
        "models": {
            "changeformer": { "loaded": true, "device": "cuda" },
            "siam_unet": { "loaded": false }
        }
    }))
    .unwrap()
}

/// Mocks wired into one handle, kept alongside for assertions
pub struct MockBackends {
    pub comparison: Arc<MockComparisonApi>,
    pub ml: Arc<MockMlApi>,
    pub geospatial: Arc<MockGeospatialApi>,
}

impl MockBackends {
    pub fn new() -> Self {
        Self {
            comparison: Arc::new(MockComparisonApi::new(CompareResult::default())),
            ml: Arc::new(MockMlApi::new()),
            geospatial: Arc::new(MockGeospatialApi::new()),
        }
    }

    pub fn with_comparison(mut self, comparison: MockComparisonApi) -> Self {
        self.comparison = Arc::new(comparison);
        self
    }

    pub fn with_ml(mut self, ml: MockMlApi) -> Self {
        self.ml = Arc::new(ml);
        self
    }

    pub fn with_geospatial(mut self, geospatial: MockGeospatialApi) -> Self {
        self.geospatial = Arc::new(geospatial);
        self
    }

    pub fn handle(&self) -> AppHandle {
        AppHandle::from_parts(
            self.comparison.clone(),
            self.ml.clone(),
            self.geospatial.clone(),
        )
    }

    pub fn context(&self, format: OutputFormat) -> CliContext {
        CliContext::from_parts(
            Config::default(),
            self.handle(),
            OutputWriter::new(format, true, false),
        )
    }
}

pub fn sample_detections() -> Vec<ChangeDetection> {
    vec![
        ChangeDetection::new(ChangeType::Deforestation, Severity::High, [0.0, 0.0, 50.0, 40.0])
            .with_confidence(0.9)
            .with_area_hectares(3.0),
        ChangeDetection::new(ChangeType::Flooded, Severity::Critical, [50.0, 50.0, 50.0, 50.0])
            .with_confidence(0.7)
            .with_area_hectares(1.5),
        ChangeDetection::new(ChangeType::Deforestation, Severity::Low, [10.0, 60.0, 5.0, 5.0])
            .with_area_hectares(0.5),
    ]
}

/// Write `detections` as a JSON file inside `dir`
pub fn write_detections(dir: &Path, detections: &[ChangeDetection]) -> PathBuf {
    let path = dir.join("detections.json");
    std::fs::write(&path, serde_json::to_vec(detections).unwrap()).unwrap();
    path
}

/// Write placeholder image bytes inside `dir`
pub fn write_image(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("IMAGEDATA:{}", name)).unwrap();
    path
}

/// URI of a local port with nothing listening on it
pub fn closed_port_uri() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}
