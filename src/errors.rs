//! Step-level errors surfaced to the scenario runner

use action_flow::FlowError;
use stepwright_repository::RepoError;
use thiserror::Error;

/// Errors raised while running one step of a scenario
#[derive(Debug, Error)]
pub enum StepError {
    /// Neither a recorded plan nor a manual definition exists
    #[error("Missing definition for: {step}")]
    MissingDefinition {
        step: String,
        key: String,
        expected_path: String,
    },

    /// The recorded plan or manual handler failed
    #[error("Step \"{step}\" failed: {source}")]
    Flow {
        step: String,
        #[source]
        source: FlowError,
    },

    /// The plan could not be loaded
    #[error("Could not load plan for \"{step}\": {source}")]
    Repository {
        step: String,
        #[source]
        source: RepoError,
    },

    /// A manual step pattern is not a valid regular expression
    #[error("Invalid step pattern {pattern}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl StepError {
    /// Step text the error belongs to
    pub fn step(&self) -> Option<&str> {
        match self {
            StepError::MissingDefinition { step, .. }
            | StepError::Flow { step, .. }
            | StepError::Repository { step, .. } => Some(step),
            StepError::InvalidPattern { .. } => None,
        }
    }

    /// Operator-facing explanation of how to fix a missing definition
    pub fn diagnostic(&self) -> Option<String> {
        match self {
            StepError::MissingDefinition {
                step,
                expected_path,
                ..
            } => Some(format!(
                "Recorded step not found!\n\
                 Gherkin: {step}\n\
                 Expected plan: {expected_path}\n\
                 OR\n\
                 Registered in: CustomStepRegistry\n\
                 Record this step or add a manual definition."
            )),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_definition_names_both_fixes() {
        let err = StepError::MissingDefinition {
            step: "user does a thing".into(),
            key: "user_does_a_thing".into(),
            expected_path: "steps/user_does_a_thing.json".into(),
        };
        assert_eq!(err.to_string(), "Missing definition for: user does a thing");
        let diagnostic = err.diagnostic().unwrap();
        assert!(diagnostic.contains("steps/user_does_a_thing.json"));
        assert!(diagnostic.contains("CustomStepRegistry"));
        assert_eq!(err.step(), Some("user does a thing"));
    }
}
