//! Repository of recorded step plans, keyed by normalized step text.
//!
//! Plans live one per file (`<key>.json`) under a repository directory. The
//! executor only reads them; the recorder writes each key once.

pub mod errors;
pub mod recorder;
pub mod storage;

pub use errors::{RepoError, RepoErrorKind};
pub use recorder::{CapturedAction, StepRecorder};
pub use storage::{FileStepRepository, InMemoryStepRepository, RepoResult, StepRepository};

/// Repository directory used when none is configured
pub const DEFAULT_REPOSITORY_DIR: &str = "src/test/resources/locatorRepository";
