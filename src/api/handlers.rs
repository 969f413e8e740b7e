//! API Handlers
//!
//! HTTP request handlers for the diagnostics endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::keys::PartitionId;
use crate::models::{HealthResponse, InvalidateResponse, PartitionStatsResponse, StatsResponse};
use crate::registry::CacheRegistry;

/// Application state shared across all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub registry: CacheRegistry,
}

impl AppState {
    pub fn new(registry: CacheRegistry) -> Self {
        Self { registry }
    }

    /// Builds the registry from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(CacheRegistry::from_config(config))
    }
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.registry.stats().into())
}

/// Handler for GET /stats/:partition
pub async fn partition_stats_handler(
    State(state): State<AppState>,
    Path(partition): Path<String>,
) -> Result<Json<PartitionStatsResponse>> {
    let id: PartitionId = partition.parse()?;
    Ok(Json(state.registry.partition_stats(id).into()))
}

/// Handler for DELETE /partitions/:partition/:key
///
/// Forces the same invalidation a write path would perform.
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Path((partition, key)): Path<(String, String)>,
) -> Result<Json<InvalidateResponse>> {
    let id: PartitionId = partition.parse()?;

    if !state.registry.invalidate(id, &key) {
        return Err(CacheError::NotFound(key));
    }

    Ok(Json(InvalidateResponse::new(id.as_str(), key)))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
