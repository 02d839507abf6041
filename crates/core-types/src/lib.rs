//! Shared data model for recorded steps.
//!
//! Everything the recorder persists and the executor replays lives here:
//! element descriptors with their recovery fingerprint, action plans, the
//! step-text normalization that keys the repository, and the per-run
//! environment variables.

use thiserror::Error;

pub mod descriptor;
pub mod environment;
pub mod normalize;
pub mod plan;

pub use descriptor::*;
pub use environment::*;
pub use normalize::*;
pub use plan::*;

/// Errors raised while loading shared model files.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
