//! Engine configuration.

/// Configuration for the assignment coordinator.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum number of user ids accepted by one bulk request.
    /// Larger requests are rejected outright before any item runs.
    pub max_batch_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_batch_size: 500,
        }
    }
}
