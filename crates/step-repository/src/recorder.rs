use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use stepwright_core_types::{
    normalize_step, Action, ActionKind, ElementDescriptor, StepMetadata, StepRecord, StepType,
    RUNTIME_PARAMETER,
};
use tracing::{info, warn};

use crate::errors::RepoError;
use crate::storage::{RepoResult, StepRepository};

/// One recorded interaction, as captured from the page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturedAction {
    pub action_type: ActionKind,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub element: Option<ElementDescriptor>,
    #[serde(default)]
    pub value: Option<String>,
}

impl CapturedAction {
    pub fn new(action_type: ActionKind) -> Self {
        Self {
            action_type,
            description: String::new(),
            element: None,
            value: None,
        }
    }

    pub fn with_element(mut self, element: ElementDescriptor) -> Self {
        self.element = Some(element);
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Parse one JSON payload, e.g.
    /// `{"actionType":"CLICK","element":{"id":"go"}}`.
    pub fn from_payload(payload: &str) -> RepoResult<Self> {
        serde_json::from_str(payload)
            .map_err(|err| RepoError::invalid_input(format!("bad capture payload: {}", err)))
    }
}

/// Buffers captured interactions and saves them as the plan for a step.
pub struct StepRecorder {
    repository: Arc<dyn StepRepository>,
    buffer: Mutex<Vec<CapturedAction>>,
}

impl StepRecorder {
    pub fn new(repository: Arc<dyn StepRepository>) -> Self {
        Self {
            repository,
            buffer: Mutex::new(Vec::new()),
        }
    }

    pub fn capture(&self, action: CapturedAction) {
        info!(
            kind = %action.action_type,
            element = %action
                .element
                .as_ref()
                .map(ElementDescriptor::display_name)
                .unwrap_or_default(),
            "Action captured"
        );
        self.buffer.lock().push(action);
    }

    pub fn capture_payload(&self, payload: &str) -> RepoResult<()> {
        self.capture(CapturedAction::from_payload(payload)?);
        Ok(())
    }

    /// Number of captured actions not yet saved
    pub fn pending(&self) -> usize {
        self.buffer.lock().len()
    }

    /// Save the buffered actions as the plan for `step_text`.
    ///
    /// A key that already has a plan is refused and the buffer is kept, so
    /// the same capture can be saved under a different step.
    pub async fn save(&self, step_text: &str) -> RepoResult<StepRecord> {
        let key = normalize_step(step_text);
        if self.repository.lookup(&key).await?.is_some() {
            warn!(key = %key, "Step already exists, skipping save");
            return Err(RepoError::already_exists(key.as_str()));
        }

        let captured = self.buffer.lock().clone();
        let record = build_record(step_text, &captured);
        self.repository.insert(record.clone()).await?;

        self.buffer.lock().drain(..captured.len());
        info!(
            key = %key,
            actions = record.actions.len(),
            location = %self.repository.describe_location(&key),
            "Saved step"
        );
        Ok(record)
    }
}

/// Plan for `step_text` from captured actions: numbered from 1, every
/// captured value replaced by the runtime placeholder.
pub fn build_record(step_text: &str, captured: &[CapturedAction]) -> StepRecord {
    let key = normalize_step(step_text);
    let actions: Vec<Action> = captured
        .iter()
        .enumerate()
        .map(|(index, captured)| Action {
            action_number: index as u32 + 1,
            action_type: captured.action_type.clone(),
            description: captured.description.clone(),
            element: captured.element.clone(),
            value: captured
                .value
                .as_deref()
                .filter(|value| !value.is_empty())
                .map(|_| RUNTIME_PARAMETER.to_string()),
            optional: false,
        })
        .collect();

    StepRecord {
        step_file_name: key.as_str().to_string(),
        gherkin_step: step_text.to_string(),
        normalized_step: key.as_str().to_string(),
        step_type: StepType::When,
        step_number: 1,
        status: "passed".to_string(),
        metadata: StepMetadata {
            created_date: Some(Utc::now()),
            total_actions: actions.len(),
        },
        actions,
    }
}
