//! Hand-written step definitions used when no plan was recorded

use std::sync::Arc;

use action_flow::{FlowError, StepExecutor};
use action_primitives::BrowserPage;
use async_trait::async_trait;
use regex::Regex;
use tracing::info;

use crate::errors::StepError;

/// Fixtures handed to a manual step
pub struct StepContext<'a> {
    pub page: &'a dyn BrowserPage,
    pub executor: &'a StepExecutor,
}

/// A manual step definition
#[async_trait]
pub trait ManualStep: Send + Sync {
    /// Run the step with the pattern's capture groups, in order
    async fn run(&self, ctx: &StepContext<'_>, args: &[String]) -> Result<(), FlowError>;
}

struct RegisteredStep {
    pattern: Regex,
    handler: Arc<dyn ManualStep>,
}

/// Matched manual step, ready to run
pub struct ManualMatch {
    pub pattern: String,
    pub args: Vec<String>,
    pub handler: Arc<dyn ManualStep>,
}

/// Ordered list of pattern → handler; the first matching pattern wins
#[derive(Default)]
pub struct CustomStepRegistry {
    steps: Vec<RegisteredStep>,
}

impl CustomStepRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for step text matching `pattern` (unanchored regex)
    pub fn register(
        &mut self,
        pattern: &str,
        handler: Arc<dyn ManualStep>,
    ) -> Result<(), StepError> {
        let regex = Regex::new(pattern).map_err(|source| StepError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        info!(pattern, "Registered manual step");
        self.steps.push(RegisteredStep {
            pattern: regex,
            handler,
        });
        Ok(())
    }

    pub fn with_step(
        mut self,
        pattern: &str,
        handler: Arc<dyn ManualStep>,
    ) -> Result<Self, StepError> {
        self.register(pattern, handler)?;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// First registered step whose pattern matches `step_text`
    pub fn find(&self, step_text: &str) -> Option<ManualMatch> {
        self.steps.iter().find_map(|step| {
            let captures = step.pattern.captures(step_text)?;
            let args = captures
                .iter()
                .skip(1)
                .map(|group| group.map(|m| m.as_str().to_string()).unwrap_or_default())
                .collect();
            Some(ManualMatch {
                pattern: step.pattern.as_str().to_string(),
                args,
                handler: Arc::clone(&step.handler),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop;

    #[async_trait]
    impl ManualStep for Noop {
        async fn run(&self, _ctx: &StepContext<'_>, _args: &[String]) -> Result<(), FlowError> {
            Ok(())
        }
    }

    #[test]
    fn first_matching_pattern_wins() {
        let registry = CustomStepRegistry::new()
            .with_step(r#"user selects country "(.*)""#, Arc::new(Noop))
            .unwrap()
            .with_step(r#"selects (\w+) "(.*)""#, Arc::new(Noop))
            .unwrap();

        let matched = registry.find(r#"the user selects country "Canada""#).unwrap();
        assert_eq!(matched.pattern, r#"user selects country "(.*)""#);
        assert_eq!(matched.args, vec!["Canada".to_string()]);

        let matched = registry.find(r#"user selects city "Paris""#).unwrap();
        assert_eq!(matched.args, vec!["city".to_string(), "Paris".to_string()]);

        assert!(registry.find("user logs out").is_none());
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let mut registry = CustomStepRegistry::new();
        let err = registry.register("user (clicks", Arc::new(Noop)).unwrap_err();
        assert!(matches!(err, StepError::InvalidPattern { .. }));
        assert!(registry.is_empty());
    }
}
