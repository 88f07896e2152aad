//! Geo Shift Spy Client - HTTP wrappers for the change-detection backend
//!
//! Three clients, one per backend surface:
//!
//! - [`ComparisonClient`] for the basic `/compare` endpoint
//! - [`MlApiClient`] for model-backed analysis, segmentation and damage assessment
//! - [`GeospatialClient`] for overlay export, map configuration and clustering
//!
//! Each implements the matching trait from [`domain::api`] so callers can hold
//! them as `Arc<dyn ...>` and tests can substitute mocks.
//!
//! ```rust,ignore
//! use geoshift_client::{ComparisonApi, ComparisonClient};
//! use geoshift_core::{Config, domain::ImagePayload};
//!
//! let client = ComparisonClient::from_config(&Config::default())?;
//! let before = ImagePayload::from_path("before.png")?;
//! let after = ImagePayload::from_path("after.png")?;
//! let result = client.compare_images(&before, &after).await?;
//! ```

pub mod domain;
pub mod infrastructure;

pub use domain::api::{ComparisonApi, GeospatialApi, MlApi};
pub use domain::error::ApiError;
pub use infrastructure::{ComparisonClient, GeospatialClient, MlApiClient, build_http_client};
