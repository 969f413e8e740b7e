//! Partition capacity limits.

use serde::Serialize;

/// Count and byte budget of a single partition. `None` means no bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PartitionLimits {
    pub max_entries: Option<usize>,
    pub max_bytes: Option<usize>,
}

impl PartitionLimits {
    /// Count-limited partition without a byte budget.
    pub fn entries(max_entries: usize) -> Self {
        Self {
            max_entries: Some(max_entries),
            max_bytes: None,
        }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = Some(max_bytes);
        self
    }

    /// Whether a value of `weight` bytes can ever be retained.
    pub fn admits(&self, weight: usize) -> bool {
        self.max_entries != Some(0) && self.max_bytes.map_or(true, |max| weight <= max)
    }

    /// Whether `entries` values totalling `bytes` would break either bound.
    pub fn exceeded_by(&self, entries: usize, bytes: usize) -> bool {
        self.max_entries.map_or(false, |max| entries > max)
            || self.max_bytes.map_or(false, |max| bytes > max)
    }
}
