//! `data:<mime>;base64,<payload>` encoding used by the geospatial endpoints

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::Serialize;

use super::error::GeoError;

/// Decoded data URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl DataUrl {
    pub fn into_text(self) -> Result<String, GeoError> {
        String::from_utf8(self.data)
            .map_err(|e| GeoError::invalid_data_url(format!("payload is not UTF-8: {}", e)))
    }
}

/// Split and decode a base64 data URL
pub fn parse_data_url(input: &str) -> Result<DataUrl, GeoError> {
    let rest = input
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| GeoError::invalid_data_url("missing 'data:' prefix"))?;

    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| GeoError::invalid_data_url("missing ',' separator"))?;

    let mime_type = header
        .strip_suffix(";base64")
        .ok_or_else(|| GeoError::invalid_data_url("only base64 data URLs are supported"))?;

    if mime_type.is_empty() {
        return Err(GeoError::invalid_data_url("missing MIME type"));
    }

    let data = STANDARD
        .decode(payload)
        .map_err(|e| GeoError::invalid_data_url(format!("bad base64 payload: {}", e)))?;

    Ok(DataUrl {
        mime_type: mime_type.to_string(),
        data,
    })
}

pub fn encode_data_url(mime_type: &str, data: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(data))
}

/// Serialize `value` to JSON and wrap it as `data:application/json;base64,...`
pub fn encode_json_data_url<T: Serialize + ?Sized>(value: &T) -> Result<String, GeoError> {
    let json = serde_json::to_vec(value)?;
    Ok(encode_data_url("application/json", &json))
}
