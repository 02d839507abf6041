//! Error types for browser operations

use thiserror::Error;

/// Errors raised by browser backends and waits
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ActionError {
    /// Wait operation timed out
    #[error("Wait timeout: {0}")]
    WaitTimeout(String),

    /// Element is not clickable (hidden, detached, or obscured)
    #[error("Element not clickable: {0}")]
    NotClickable(String),

    /// Element is not enabled for interaction
    #[error("Element not enabled: {0}")]
    NotEnabled(String),

    /// Dropdown option was not found
    #[error("Option not found in dropdown: {0}")]
    OptionNotFound(String),

    /// No element matches the selector
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// CDP communication or protocol error
    #[error("CDP I/O error: {0}")]
    CdpIo(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}
