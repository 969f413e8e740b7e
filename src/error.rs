//! Error types for the cache core
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Fetch Error Enum ==
/// Failure reported by a remote fetch function.
///
/// Cloneable so it can be fanned out to every subscriber of a partition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Transport-level failure (offline, timeout, ...)
    #[error("Network error: {0}")]
    Network(String),

    /// The remote database rejected or failed the query
    #[error("Database error: {0}")]
    Database(String),

    /// The query succeeded but returned no record
    #[error("No data: {0}")]
    NoData(String),
}

// == Cache Error Enum ==
/// Unified error type for the cache core and its diagnostics surface.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key not present in the partition
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Partition name does not match any known entity kind
    #[error("Unknown partition: {0}")]
    UnknownPartition(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::UnknownPartition(_) => StatusCode::BAD_REQUEST,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache core.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn test_fetch_error_display() {
        let err = FetchError::NoData("u1".to_string());
        assert_eq!(err.to_string(), "No data: u1");
        assert_eq!(err.clone(), err);
    }

    #[test]
    fn test_error_status_codes() {
        let cases = vec![
            (CacheError::NotFound("k".to_string()), StatusCode::NOT_FOUND),
            (
                CacheError::UnknownPartition("p".to_string()),
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[tokio::test]
    async fn test_error_body_is_json() {
        let response = CacheError::NotFound("u1_avatar".to_string()).into_response();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(json["error"], "Key not found: u1_avatar");
    }
}
