//! Response DTOs for the diagnostics API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::registry::PartitionStats;

/// Response body for GET /stats
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub partitions: Vec<PartitionStatsResponse>,
}

/// Statistics of one partition with its derived hit rate.
#[derive(Debug, Clone, Serialize)]
pub struct PartitionStatsResponse {
    #[serde(flatten)]
    pub partition: PartitionStats,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<PartitionStats> for PartitionStatsResponse {
    fn from(partition: PartitionStats) -> Self {
        let hit_rate = partition.stats.hit_rate();
        Self {
            partition,
            hit_rate,
        }
    }
}

impl From<Vec<PartitionStats>> for StatsResponse {
    fn from(partitions: Vec<PartitionStats>) -> Self {
        Self {
            partitions: partitions.into_iter().map(Into::into).collect(),
        }
    }
}

/// Response body for DELETE /partitions/:partition/:key
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    pub message: String,
    pub partition: String,
    pub key: String,
}

impl InvalidateResponse {
    pub fn new(partition: impl Into<String>, key: impl Into<String>) -> Self {
        let partition = partition.into();
        let key = key.into();
        Self {
            message: format!("Key '{}' invalidated in '{}'", key, partition),
            partition,
            key,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
