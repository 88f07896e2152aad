//! Client for the basic comparison service

use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::Form;
use tracing::debug;

use geoshift_core::Config;
use geoshift_core::domain::{CompareResult, ImagePayload};

use super::http::{MESSAGE_FIRST, build_http_client, endpoint, image_part, read_json};
use crate::domain::api::ComparisonApi;
use crate::domain::error::ApiError;

/// Wrapper for `POST {api_url}/compare`
#[derive(Debug, Clone)]
pub struct ComparisonClient {
    client: Client,
    base_url: String,
}

impl ComparisonClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Ok(Self::new(
            build_http_client(&config.http)?,
            config.api.api_url.clone(),
        ))
    }

    /// Point at another server (tests, proxies)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ComparisonApi for ComparisonClient {
    async fn compare_images(
        &self,
        before: &ImagePayload,
        after: &ImagePayload,
    ) -> Result<CompareResult, ApiError> {
        let url = endpoint(&self.base_url, "compare");
        let form = Form::new()
            .part("before_image", image_part(before)?)
            .part("after_image", image_part(after)?);

        debug!(
            url = %url,
            before = %before.file_name,
            after = %after.file_name,
            bytes = before.len() + after.len(),
            "Sending comparison request"
        );

        let response = self.client.post(&url).multipart(form).send().await?;
        read_json(response, MESSAGE_FIRST, "compare").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_uses_api_url() {
        let client = ComparisonClient::from_config(&Config::default()).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");

        let client = client.with_base_url("http://127.0.0.1:9000");
        assert_eq!(client.base_url(), "http://127.0.0.1:9000");
    }
}
