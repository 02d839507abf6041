//! Step execution error types

use action_primitives::ActionError;
use thiserror::Error;

/// Step execution errors
#[derive(Debug, Error)]
pub enum FlowError {
    /// Expected text never showed up in the element
    #[error("Expected text \"{expected}\" not found. Found: \"{found}\"")]
    VerificationFailed { expected: String, found: String },

    /// Element or page assertion failed
    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    /// Browser operation failed
    #[error("Action primitive error: {0}")]
    ActionError(ActionError),

    /// A numbered action of the plan failed
    #[error("Action {action_number} ({kind}) failed: {source}")]
    ActionFailed {
        action_number: u32,
        kind: String,
        #[source]
        source: Box<FlowError>,
    },

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl FlowError {
    /// The innermost error, unwrapping action context
    pub fn root_cause(&self) -> &FlowError {
        match self {
            FlowError::ActionFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Number of the failing action, when known
    pub fn action_number(&self) -> Option<u32> {
        match self {
            FlowError::ActionFailed { action_number, .. } => Some(*action_number),
            _ => None,
        }
    }
}

impl From<ActionError> for FlowError {
    fn from(err: ActionError) -> Self {
        FlowError::ActionError(err)
    }
}
