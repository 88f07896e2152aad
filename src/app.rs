//! Application setup and wiring

use std::sync::Arc;

use geoshift_client::{
    ApiError, ComparisonApi, ComparisonClient, GeospatialApi, GeospatialClient, MlApi,
    MlApiClient, build_http_client,
};
use geoshift_core::Config;

/// Every backend client, built once and shared by reference
#[derive(Clone)]
pub struct AppHandle {
    pub comparison: Arc<dyn ComparisonApi>,
    pub ml: Arc<dyn MlApi>,
    pub geospatial: Arc<dyn GeospatialApi>,
}

impl AppHandle {
    /// Assemble a handle from existing implementations (mocks, alternate transports)
    pub fn from_parts(
        comparison: Arc<dyn ComparisonApi>,
        ml: Arc<dyn MlApi>,
        geospatial: Arc<dyn GeospatialApi>,
    ) -> Self {
        Self {
            comparison,
            ml,
            geospatial,
        }
    }
}

/// Build the HTTP clients for every configured backend.
///
/// All three wrappers share one connection pool.
pub fn create_app(config: &Config) -> Result<AppHandle, ApiError> {
    let http = build_http_client(&config.http)?;

    tracing::debug!(
        api_url = %config.api.api_url,
        ml_api_url = %config.api.ml_api_url,
        geospatial_url = %config.api.geospatial_url,
        "Creating backend clients"
    );

    Ok(AppHandle::from_parts(
        Arc::new(ComparisonClient::new(http.clone(), config.api.api_url.clone())),
        Arc::new(MlApiClient::new(http.clone(), config.api.ml_api_url.clone())),
        Arc::new(GeospatialClient::new(http, config.api.geospatial_url.clone())),
    ))
}
