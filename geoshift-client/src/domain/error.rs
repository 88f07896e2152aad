//! Client error taxonomy
//!
//! Every failure a wrapper can report falls into one of these variants. The
//! backend's own wording is preserved in [`ApiError::Http`] so it can be shown
//! to the user verbatim.

use geoshift_core::domain::geospatial::GeoError;
use geoshift_core::domain::ml::UnknownOption;

/// Error returned by every client operation
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced an HTTP response
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response; `message` is the best field the body offered
    #[error("{message}{}", render_suggestions(.suggestions))]
    Http {
        status: u16,
        message: String,
        suggestions: Vec<String>,
    },

    /// 2xx response whose body does not have the expected shape
    #[error("Invalid response: {0}")]
    Decode(String),

    /// Rejected locally before any request was sent
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Geo(#[from] GeoError),
}

fn render_suggestions(suggestions: &[String]) -> String {
    suggestions
        .iter()
        .map(|s| format!("\n  • {}", s))
        .collect()
}

impl ApiError {
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
            suggestions: Vec::new(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// HTTP status, for backend errors only
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }

    /// The backend answered, but not with what was asked for
    pub fn is_backend(&self) -> bool {
        matches!(self, ApiError::Http { .. } | ApiError::Decode(_))
    }

    /// Nothing was sent; the caller's input was wrong
    pub fn is_input(&self) -> bool {
        matches!(self, ApiError::InvalidInput(_) | ApiError::Geo(_))
    }
}

impl From<UnknownOption> for ApiError {
    fn from(err: UnknownOption) -> Self {
        ApiError::InvalidInput(err.to_string())
    }
}
