//! Client for the ML backend

use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::Form;
use tracing::{debug, warn};

use geoshift_core::Config;
use geoshift_core::domain::{
    AdvancedAnalysis, AdvancedCompareRequest, BackendHealth, DamageAssessment, DatasetType,
    ImagePayload, LandCoverSegmentation, ModelStatusResponse,
};

use super::http::{ERROR_FIRST, build_http_client, endpoint, image_part, read_json};
use crate::domain::api::MlApi;
use crate::domain::error::ApiError;

/// Wrapper for the `{ml_api_url}` endpoints
#[derive(Debug, Clone)]
pub struct MlApiClient {
    client: Client,
    base_url: String,
}

impl MlApiClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Ok(Self::new(
            build_http_client(&config.http)?,
            config.api.ml_api_url.clone(),
        ))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_form<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T, ApiError> {
        let url = endpoint(&self.base_url, path);
        debug!(url = %url, "Sending ML request");
        let response = self.client.post(&url).multipart(form).send().await?;
        read_json(response, ERROR_FIRST, path).await
    }

    async fn fetch_model_status(&self) -> Result<ModelStatusResponse, ApiError> {
        let url = endpoint(&self.base_url, "ml-models");
        debug!(url = %url, "Fetching model status");
        let response = self.client.get(&url).send().await?;
        read_json(response, ERROR_FIRST, "ml-models").await
    }
}

#[async_trait]
impl MlApi for MlApiClient {
    async fn advanced_compare(
        &self,
        request: &AdvancedCompareRequest,
    ) -> Result<AdvancedAnalysis, ApiError> {
        request.validate().map_err(ApiError::InvalidInput)?;

        let form = Form::new()
            .part("beforeImage", image_part(&request.before)?)
            .part("afterImage", image_part(&request.after)?)
            .text("modelType", request.model_type.as_str())
            .text("datasetType", request.dataset_type.as_str())
            .text("analysisType", request.analysis_type.as_str())
            .text("confidenceThreshold", request.confidence_threshold.to_string());

        debug!(
            model = %request.model_type,
            dataset = %request.dataset_type,
            analysis = %request.analysis_type,
            threshold = request.confidence_threshold,
            "Advanced comparison"
        );

        self.post_form("advanced-compare", form).await
    }

    async fn segment_land_cover(
        &self,
        image: &ImagePayload,
        dataset: DatasetType,
    ) -> Result<LandCoverSegmentation, ApiError> {
        let form = Form::new()
            .part("image", image_part(image)?)
            .text("datasetType", dataset.as_str());

        self.post_form("segment-land-cover", form).await
    }

    async fn assess_damage(
        &self,
        pre_disaster: &ImagePayload,
        post_disaster: &ImagePayload,
    ) -> Result<DamageAssessment, ApiError> {
        let form = Form::new()
            .part("preDisaster", image_part(pre_disaster)?)
            .part("postDisaster", image_part(post_disaster)?);

        self.post_form("assess-damage", form).await
    }

    async fn model_status(&self) -> ModelStatusResponse {
        match self.fetch_model_status().await {
            Ok(status) => status,
            Err(e) => {
                warn!(error = %e, "ML backend unavailable, reporting no models");
                ModelStatusResponse::unavailable()
            }
        }
    }

    async fn health(&self) -> Result<BackendHealth, ApiError> {
        let url = endpoint(&self.base_url, "");
        debug!(url = %url, "Checking ML backend health");
        let response = self.client.get(&url).send().await?;
        read_json(response, ERROR_FIRST, "health").await
    }
}
