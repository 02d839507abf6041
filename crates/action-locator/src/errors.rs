//! Error types for locator system

use thiserror::Error;

/// Why a single probe did not produce a match
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LocatorError {
    /// Probe exceeded its bound
    #[error("Strategy '{strategy}' timed out after {timeout_ms}ms")]
    ProbeTimeout { strategy: String, timeout_ms: u64 },

    /// Backend failed while probing
    #[error("Strategy '{strategy}' failed: {reason}")]
    StrategyFailed { strategy: String, reason: String },
}
