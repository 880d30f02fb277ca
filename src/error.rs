use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Caller-facing failures. Upstream and filesystem problems never surface
/// here; they degrade to empty containers instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Invalid ratingKey: \"{0}\". Must contain only ASCII letters, numbers, dashes, and underscores.")]
    InvalidToken(String),

    #[error("Invalid GUID format: \"{0}\"")]
    MalformedGuid(String),

    #[error("Invalid or unsupported ratingKey format: {0}")]
    UnsupportedRatingKey(String),
}

impl ProviderError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidToken(_) => "invalid_token",
            Self::MalformedGuid(_) => "malformed_guid",
            Self::UnsupportedRatingKey(_) => "unsupported_rating_key",
        }
    }
}

impl IntoResponse for ProviderError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": self.code(),
            "message": self.to_string(),
        });
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}
