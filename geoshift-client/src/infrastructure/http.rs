//! Plumbing shared by every client: client construction, endpoint joining,
//! multipart image parts and error-body extraction.

use reqwest::multipart::Part;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::error;

use geoshift_core::config::HttpConfig;
use geoshift_core::domain::ImagePayload;

use crate::domain::error::ApiError;

/// Field order for the comparison service, which reports `message`
pub(crate) const MESSAGE_FIRST: &[&str] = &["message", "error", "detail"];

/// Field order for the ML and geospatial services, which report `error` or `detail`
pub(crate) const ERROR_FIRST: &[&str] = &["error", "message", "detail"];

/// Build the HTTP client shared by the wrappers.
///
/// No timeout is applied unless `request_timeout_seconds` is set.
pub fn build_http_client(config: &HttpConfig) -> Result<Client, ApiError> {
    let mut builder = Client::builder().user_agent(config.user_agent.clone());
    if let Some(timeout) = config.request_timeout() {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// Join a base URL and an endpoint path with exactly one slash
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

pub(crate) fn image_part(image: &ImagePayload) -> Result<Part, ApiError> {
    Part::bytes(image.bytes.clone())
        .file_name(image.file_name.clone())
        .mime_str(&image.mime_type)
        .map_err(|e| {
            ApiError::invalid_input(format!(
                "{}: bad MIME type '{}': {}",
                image.file_name, image.mime_type, e
            ))
        })
}

/// Pull a message and suggestions out of an error body.
///
/// Returns `None` when the body is not a JSON object or carries none of
/// `fields`. A non-string `detail` (FastAPI validation errors) is rendered as
/// compact JSON.
pub(crate) fn extract_error_message(body: &str, fields: &[&str]) -> Option<(String, Vec<String>)> {
    let value: Value = serde_json::from_str(body).ok()?;
    let object = value.as_object()?;

    let message = fields.iter().find_map(|field| match object.get(*field)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::String(_) | Value::Null => None,
        other => Some(other.to_string()),
    })?;

    let suggestions = object
        .get("suggestions")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Some((message, suggestions))
}

pub(crate) fn status_text(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => format!("HTTP {}", status.as_u16()),
    }
}

/// Turn a non-2xx response into [`ApiError::Http`]
pub(crate) async fn error_from_response(
    response: Response,
    fields: &[&str],
    operation: &str,
) -> ApiError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    let (message, suggestions) =
        extract_error_message(&body, fields).unwrap_or_else(|| (status_text(status), Vec::new()));

    error!(status = %status, operation, "Backend error: {}", message);

    ApiError::Http {
        status: status.as_u16(),
        message,
        suggestions,
    }
}

/// Check the status, then decode the JSON body as `T`
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: Response,
    fields: &[&str],
    operation: &str,
) -> Result<T, ApiError> {
    if !response.status().is_success() {
        return Err(error_from_response(response, fields, operation).await);
    }

    let body = response.text().await?;
    serde_json::from_str(&body)
        .map_err(|e| ApiError::decode(format!("{} response: {}", operation, e)))
}
