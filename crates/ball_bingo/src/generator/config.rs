//! Generator tuning.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::GenerateError;

/// Number of cells in a standard puzzle.
pub const GRID_SIZE: usize = 16;

/// Sizes and bounds for puzzle generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct GeneratorConfig {
    /// Subjects fetched per attempt.
    #[serde(default = "default_pool_size")]
    pool_size: usize,

    /// Cells in the finished puzzle.
    #[serde(default = "default_target")]
    target: usize,

    /// Attempts before giving up with [`GenerateError::GenerationFailed`].
    #[serde(default = "default_max_tries")]
    max_tries: usize,
}

fn default_pool_size() -> usize {
    80
}

fn default_target() -> usize {
    GRID_SIZE
}

fn default_max_tries() -> usize {
    30
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            pool_size: default_pool_size(),
            target: default_target(),
            max_tries: default_max_tries(),
        }
    }
}

impl GeneratorConfig {
    /// Creates a generator configuration.
    pub fn new(pool_size: usize, target: usize, max_tries: usize) -> Self {
        Self {
            pool_size,
            target,
            max_tries,
        }
    }

    /// Checks that the bounds can produce a puzzle at all.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::InvalidConfig`] if the target is zero, the
    /// pool is smaller than the target, or no attempts are allowed.
    #[instrument(skip(self), fields(pool_size = self.pool_size, target = self.target, max_tries = self.max_tries))]
    pub fn validate(&self) -> Result<(), GenerateError> {
        if self.target == 0 {
            return Err(GenerateError::InvalidConfig {
                reason: "target must be at least 1",
            });
        }
        if self.pool_size < self.target {
            return Err(GenerateError::InvalidConfig {
                reason: "pool_size must be at least target",
            });
        }
        if self.max_tries == 0 {
            return Err(GenerateError::InvalidConfig {
                reason: "max_tries must be at least 1",
            });
        }
        Ok(())
    }
}
