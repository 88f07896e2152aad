//! Geospatial error types

/// Failure of a local geospatial helper
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeoError {
    #[error("Invalid bounds: {0}")]
    InvalidBounds(String),

    #[error("Unsupported geometry type '{0}' (only Point and Polygon carry bounds)")]
    UnsupportedGeometry(String),

    #[error("Invalid position: expected [longitude, latitude], got {0} values")]
    InvalidPosition(usize),

    #[error("Invalid data URL: {0}")]
    InvalidDataUrl(String),

    #[error("Invalid image shape {height}x{width}")]
    InvalidImageShape { height: u32, width: u32 },

    #[error("Invalid clustering distance {0} (must be a positive number of meters)")]
    InvalidDistance(f64),

    #[error("Encoding error: {0}")]
    Encoding(String),
}

impl GeoError {
    pub fn invalid_bounds(message: impl Into<String>) -> Self {
        Self::InvalidBounds(message.into())
    }

    pub fn invalid_data_url(message: impl Into<String>) -> Self {
        Self::InvalidDataUrl(message.into())
    }
}

impl From<serde_json::Error> for GeoError {
    fn from(err: serde_json::Error) -> Self {
        GeoError::Encoding(err.to_string())
    }
}
