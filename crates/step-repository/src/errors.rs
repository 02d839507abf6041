use thiserror::Error;

#[derive(Clone, Debug, Error)]
pub enum RepoErrorKind {
    #[error("step already recorded: {0}")]
    AlreadyExists(String),
    #[error("corrupt step file {path}: {reason}")]
    Corrupt { path: String, reason: String },
    #[error("i/o error on {path}: {reason}")]
    Io { path: String, reason: String },
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

#[derive(Clone, Debug, Error)]
#[error(transparent)]
pub struct RepoError(pub RepoErrorKind);

impl RepoError {
    pub fn new(kind: RepoErrorKind) -> Self {
        Self(kind)
    }

    pub fn kind(&self) -> &RepoErrorKind {
        &self.0
    }

    pub fn already_exists(key: impl Into<String>) -> Self {
        Self(RepoErrorKind::AlreadyExists(key.into()))
    }

    pub fn io(path: impl Into<String>, err: &std::io::Error) -> Self {
        Self(RepoErrorKind::Io {
            path: path.into(),
            reason: err.to_string(),
        })
    }

    pub fn corrupt(path: impl Into<String>, reason: impl ToString) -> Self {
        Self(RepoErrorKind::Corrupt {
            path: path.into(),
            reason: reason.to_string(),
        })
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self(RepoErrorKind::InvalidInput(msg.into()))
    }
}

impl From<RepoErrorKind> for RepoError {
    fn from(kind: RepoErrorKind) -> Self {
        RepoError(kind)
    }
}
