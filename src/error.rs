//! Error types for sampling and scoring internals.
//!
//! These errors never cross the public API boundary: the sampler converts any
//! internal failure into the sequential fallback sample, because this crate is
//! itself the always-available fallback for a less predictable primary
//! analyzer. The type exists so the selection boundary has one place to
//! catch, log, and degrade.

use thiserror::Error;

/// Result type for sampler internals.
pub type SamplerResult<T> = Result<T, SamplerError>;

/// Errors that can occur inside scoring and selection.
#[derive(Error, Debug)]
pub enum SamplerError {
    /// A column referenced during scoring has no computed statistics.
    #[error("Missing statistics for column '{0}'")]
    MissingStatistics(String),
}

impl SamplerError {
    /// Creates a missing-statistics error for the given column.
    pub fn missing_statistics(column: impl Into<String>) -> Self {
        Self::MissingStatistics(column.into())
    }
}
