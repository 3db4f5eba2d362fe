//! Core data types and error definitions for the alias store.

use crate::backend::BackendError;
use thiserror::Error;

/// Default number of generated codes tried before giving up on a create.
pub const DEFAULT_MAX_GENERATION_ATTEMPTS: usize = 5;

/// Errors emitted by alias store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Caller supplied missing or malformed input.
    #[error("{0}")]
    Validation(String),
    /// Requested code is already mapped to a target.
    #[error("Shortened code '{0}' already exists")]
    Conflict(String),
    /// No mapping exists for the code.
    #[error("Link '{0}' not found")]
    NotFound(String),
    /// Every generated candidate collided with an existing code.
    #[error("Could not generate an unused code after {attempts} attempts")]
    Exhausted {
        /// Number of candidates tried.
        attempts: usize,
    },
    /// Persistence backend failed; state was not guessed.
    #[error("Storage backend failed: {0}")]
    Backend(#[from] BackendError),
}

/// A stored code→target mapping, as returned from create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasEntry {
    /// Normalized short code.
    pub code: String,
    /// Destination URL.
    pub target: String,
    /// Fully qualified redirect URL for display.
    pub short_url: String,
}

/// Tunables applied by [`crate::store::AliasStore`].
#[derive(Debug, Clone)]
pub struct StoreSettings {
    /// Scheme and host prefixed to codes when building `short_url` (no trailing slash).
    pub base_url: String,
    /// Upper bound on generated-code attempts per create (at least 1).
    pub max_generation_attempts: usize,
}

impl StoreSettings {
    /// Settings with the given base URL and the default retry bound.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_generation_attempts: DEFAULT_MAX_GENERATION_ATTEMPTS,
        }
    }

    /// Override the generated-code retry bound.
    pub fn with_max_generation_attempts(mut self, attempts: usize) -> Self {
        self.max_generation_attempts = attempts.max(1);
        self
    }
}
