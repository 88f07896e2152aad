//! CLI Commands Module
//!
//! One module per command family, plus the file-reading helpers they share.

pub mod compare;
pub mod config;
pub mod geo;
pub mod local;
pub mod ml;

use std::path::Path;

use anyhow::{Context, Result};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use geoshift_core::domain::ImagePayload;
use geoshift_core::domain::geospatial::{ChangeDetection, GeoBounds, parse_data_url};

/// Read an image for upload
pub(crate) fn read_image(path: &Path) -> Result<ImagePayload> {
    let image = ImagePayload::from_path(path)
        .with_context(|| format!("Failed to read image {}", path.display()))?;
    if image.is_empty() {
        anyhow::bail!(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("{} is empty", path.display()),
        ));
    }
    Ok(image)
}

/// Read a JSON array of change detections
pub(crate) fn read_detections(path: &Path) -> Result<Vec<ChangeDetection>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read detections from {}", path.display()))?;
    let detections = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a list of change detections", path.display()))?;
    Ok(detections)
}

/// Write a base64 map returned by the backend to `path`.
///
/// Accepts a bare base64 payload or a full data URL.
pub(crate) fn save_base64_image(path: &Path, encoded: &str) -> Result<()> {
    let bytes = if encoded.trim_start().starts_with("data:") {
        parse_data_url(encoded)?.data
    } else {
        STANDARD
            .decode(encoded.trim())
            .context("Backend returned a map that is not valid base64")?
    };
    std::fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Parse `north,south,east,west`
pub(crate) fn parse_bounds(value: &str) -> Result<GeoBounds, String> {
    let parts: Vec<f64> = value
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|e| format!("bounds must be four numbers 'north,south,east,west': {}", e))?;

    match parts.as_slice() {
        [north, south, east, west] => Ok(GeoBounds::new(*north, *south, *east, *west)),
        _ => Err(format!(
            "bounds must be four numbers 'north,south,east,west', got {}",
            parts.len()
        )),
    }
}
