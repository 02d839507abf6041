//! Universal step handler: recorded plan, then manual definition, then error

use std::sync::Arc;

use action_flow::{StepExecutor, StepReport};
use action_primitives::BrowserPage;
use stepwright_core_types::{extract_literals, normalize_step};
use stepwright_repository::StepRepository;
use tracing::{error, info};

use crate::errors::StepError;
use crate::steps::{CustomStepRegistry, StepContext};

/// How a step was satisfied
#[derive(Debug)]
pub enum StepOutcome {
    /// Replayed from a recorded plan
    Recorded(StepReport),

    /// Handled by the manual definition registered under `pattern`
    Manual { pattern: String },
}

impl StepOutcome {
    pub fn is_recorded(&self) -> bool {
        matches!(self, StepOutcome::Recorded(_))
    }
}

pub struct StepDispatcher {
    repository: Arc<dyn StepRepository>,
    registry: Arc<CustomStepRegistry>,
    executor: Arc<StepExecutor>,
}

impl StepDispatcher {
    pub fn new(
        repository: Arc<dyn StepRepository>,
        registry: Arc<CustomStepRegistry>,
        executor: Arc<StepExecutor>,
    ) -> Self {
        Self {
            repository,
            registry,
            executor,
        }
    }

    pub fn executor(&self) -> &StepExecutor {
        &self.executor
    }

    /// Run one step against `page`
    pub async fn run_step(
        &self,
        page: &dyn BrowserPage,
        step_text: &str,
    ) -> Result<StepOutcome, StepError> {
        info!(step = %step_text, "Processing step");
        let key = normalize_step(step_text);

        let record = self
            .repository
            .lookup(&key)
            .await
            .map_err(|source| StepError::Repository {
                step: step_text.to_string(),
                source,
            })?;

        if let Some(record) = record {
            let literals = extract_literals(step_text);
            let report = self
                .executor
                .execute_step(page, &record, &literals)
                .await
                .map_err(|source| StepError::Flow {
                    step: step_text.to_string(),
                    source,
                })?;
            return Ok(StepOutcome::Recorded(report));
        }

        info!(key = %key, "No recorded plan, trying manual definitions");
        if let Some(matched) = self.registry.find(step_text) {
            info!(pattern = %matched.pattern, "Running manual step");
            let ctx = StepContext {
                page,
                executor: &self.executor,
            };
            matched
                .handler
                .run(&ctx, &matched.args)
                .await
                .map_err(|source| StepError::Flow {
                    step: step_text.to_string(),
                    source,
                })?;
            return Ok(StepOutcome::Manual {
                pattern: matched.pattern,
            });
        }

        let err = StepError::MissingDefinition {
            step: step_text.to_string(),
            key: key.as_str().to_string(),
            expected_path: self.repository.describe_location(&key),
        };
        if let Some(diagnostic) = err.diagnostic() {
            error!("{}", diagnostic);
        }
        Err(err)
    }
}
