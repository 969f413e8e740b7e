//! API Routes
//!
//! Configures the Axum router with the diagnostics endpoints.

use axum::{
    routing::{delete, get},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    health_handler, invalidate_handler, partition_stats_handler, stats_handler, AppState,
};

/// Creates the diagnostics router.
///
/// # Endpoints
/// - `GET /stats` - Statistics of every partition
/// - `GET /stats/:partition` - Statistics of one partition
/// - `DELETE /partitions/:partition/:key` - Invalidate one entry
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/stats", get(stats_handler))
        .route("/stats/:partition", get(partition_stats_handler))
        .route("/partitions/:partition/:key", delete(invalidate_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        create_router(AppState::from_config(&Config::default()))
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = create_test_app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_partition_is_bad_request() {
        let response = create_test_app()
            .oneshot(
                Request::builder()
                    .uri("/stats/likes")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invalidate_missing_key_is_not_found() {
        let response = create_test_app()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/partitions/avatars/u1_avatar")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
