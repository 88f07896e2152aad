//! Client for the geospatial router

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use geoshift_core::Config;
use geoshift_core::domain::geospatial::{
    ChangeDetection, ClusterRequest, DetectionCluster, ExportFormat, ExportRequest,
    ExportedOverlay, GeoBounds, MapConfiguration, MapConfigurationRequest,
};

use super::http::{ERROR_FIRST, build_http_client, endpoint, read_json};
use crate::domain::api::GeospatialApi;
use crate::domain::error::ApiError;

#[derive(Debug, Deserialize)]
struct ClusterResponse {
    clusters: Vec<DetectionCluster>,
}

/// Wrapper for the `{geospatial_url}` endpoints
#[derive(Debug, Clone)]
pub struct GeospatialClient {
    client: Client,
    base_url: String,
}

impl GeospatialClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Ok(Self::new(
            build_http_client(&config.http)?,
            config.api.geospatial_url.clone(),
        ))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync + ?Sized,
        T: serde::de::DeserializeOwned,
    {
        let url = endpoint(&self.base_url, path);
        debug!(url = %url, "Sending geospatial request");
        let response = self.client.post(&url).json(body).send().await?;
        read_json(response, ERROR_FIRST, path).await
    }
}

#[async_trait]
impl GeospatialApi for GeospatialClient {
    async fn export_change_detections(
        &self,
        detections: &[ChangeDetection],
        image_height: u32,
        image_width: u32,
        bounds: Option<GeoBounds>,
        format: ExportFormat,
    ) -> Result<ExportedOverlay, ApiError> {
        let request = ExportRequest::new(detections, image_height, image_width, bounds, format)?;

        debug!(
            detections = detections.len(),
            image_height,
            image_width,
            format = %format,
            "Exporting change detections"
        );

        self.post_json("export-change-detections", &request).await
    }

    async fn create_map_configuration(
        &self,
        request: &MapConfigurationRequest,
    ) -> Result<MapConfiguration, ApiError> {
        if request.geojson_data.as_deref().is_none_or(|d| d.trim().is_empty()) {
            return Err(ApiError::invalid_input("GeoJSON data is required"));
        }
        if let (Some(latitude), Some(longitude)) = (request.center_lat, request.center_lon) {
            if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
                return Err(ApiError::invalid_input(format!(
                    "map centre ({}, {}) is outside WGS84 range",
                    latitude, longitude
                )));
            }
        }

        self.post_json("create-map-configuration", request).await
    }

    async fn cluster_detections(
        &self,
        detections: &[ChangeDetection],
        max_distance_meters: f64,
    ) -> Result<Vec<DetectionCluster>, ApiError> {
        let request = ClusterRequest::new(detections, max_distance_meters)?;
        let response: ClusterResponse = self.post_json("cluster-detections", &request).await?;
        Ok(response.clusters)
    }
}
