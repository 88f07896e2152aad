//! Traits for the three backend surfaces
//!
//! The traits are object-safe so the composition root can hand out
//! `Arc<dyn ComparisonApi>` and friends.

use async_trait::async_trait;

use geoshift_core::domain::geospatial::{
    ChangeDetection, DetectionCluster, ExportFormat, ExportedOverlay, GeoBounds, MapConfiguration,
    MapConfigurationRequest,
};
use geoshift_core::domain::{
    AdvancedAnalysis, AdvancedCompareRequest, BackendHealth, CompareResult, DamageAssessment,
    DatasetType, ImagePayload, LandCoverSegmentation, ModelStatusResponse,
};

use crate::domain::error::ApiError;

/// Basic before/after comparison
#[async_trait]
pub trait ComparisonApi: Send + Sync {
    /// Upload both images and return the comparison with its optional report
    async fn compare_images(
        &self,
        before: &ImagePayload,
        after: &ImagePayload,
    ) -> Result<CompareResult, ApiError>;
}

/// Model-backed analysis on the ML backend
#[async_trait]
pub trait MlApi: Send + Sync {
    async fn advanced_compare(
        &self,
        request: &AdvancedCompareRequest,
    ) -> Result<AdvancedAnalysis, ApiError>;

    async fn segment_land_cover(
        &self,
        image: &ImagePayload,
        dataset: DatasetType,
    ) -> Result<LandCoverSegmentation, ApiError>;

    async fn assess_damage(
        &self,
        pre_disaster: &ImagePayload,
        post_disaster: &ImagePayload,
    ) -> Result<DamageAssessment, ApiError>;

    /// Never fails; an unreachable backend is reported as unavailable
    async fn model_status(&self) -> ModelStatusResponse;

    async fn health(&self) -> Result<BackendHealth, ApiError>;
}

/// Overlay export and map helpers on the geospatial service
#[async_trait]
pub trait GeospatialApi: Send + Sync {
    async fn export_change_detections(
        &self,
        detections: &[ChangeDetection],
        image_height: u32,
        image_width: u32,
        bounds: Option<GeoBounds>,
        format: ExportFormat,
    ) -> Result<ExportedOverlay, ApiError>;

    async fn create_map_configuration(
        &self,
        request: &MapConfigurationRequest,
    ) -> Result<MapConfiguration, ApiError>;

    async fn cluster_detections(
        &self,
        detections: &[ChangeDetection],
        max_distance_meters: f64,
    ) -> Result<Vec<DetectionCluster>, ApiError>;
}
