//! Core types for step execution

use action_locator::LocatorStrategy;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stepwright_core_types::ActionKind;

use crate::dates::DEFAULT_DATE_FORMAT;

/// Polling bounds for text verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyPolicy {
    /// Pause between text checks
    pub interval_ms: u64,

    /// Give up after this long
    pub ceiling_ms: u64,
}

impl Default for VerifyPolicy {
    fn default() -> Self {
        Self {
            interval_ms: 500,
            ceiling_ms: 7_000,
        }
    }
}

/// Executor configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    pub verify: VerifyPolicy,

    /// Output format for `SELECT_DATE` values (`DD`, `MM`, `MMM`, `YYYY` tokens)
    pub date_format: String,

    /// Bound for `WAIT_NAVIGATION`
    pub wait_navigation_ms: u64,

    /// Bound for `WAIT_HIDDEN`
    pub wait_hidden_ms: u64,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            verify: VerifyPolicy::default(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            wait_navigation_ms: 10_000,
            wait_hidden_ms: 15_000,
        }
    }
}

impl ExecutorConfig {
    pub fn with_verify(mut self, verify: VerifyPolicy) -> Self {
        self.verify = verify;
        self
    }

    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }
}

/// What happened to one action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum ActionOutcome {
    /// Performed
    Done,

    /// Element action without a recorded element
    Skipped,

    /// Recognized kind without a backend implementation yet
    Pending,

    /// Kind not recognized
    Unknown,

    /// Optional action failed; the message is kept for the report
    FailedOptional(String),
}

/// Per-action record in a step report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRecord {
    pub action_number: u32,
    pub kind: ActionKind,
    pub outcome: ActionOutcome,

    /// Strategy that located the element, `None` for the last resort
    pub strategy: Option<LocatorStrategy>,

    /// Located through a healing strategy
    pub healed: bool,

    pub latency_ms: u64,
}

/// Result of executing one recorded step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepReport {
    /// Normalized key of the executed step
    pub step: String,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub latency_ms: u64,

    pub actions: Vec<ActionRecord>,

    /// PNG bytes captured by `SCREENSHOT` actions
    #[serde(skip)]
    pub screenshots: Vec<Vec<u8>>,
}

impl StepReport {
    pub fn new(step: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            step: step.into(),
            started_at: now,
            finished_at: now,
            latency_ms: 0,
            actions: Vec::new(),
            screenshots: Vec::new(),
        }
    }

    /// Set finish time and calculate latency
    pub fn finish(mut self) -> Self {
        self.finished_at = Utc::now();
        self.latency_ms = (self.finished_at - self.started_at).num_milliseconds().max(0) as u64;
        self
    }

    /// Actions that were located through healing
    pub fn healed_actions(&self) -> impl Iterator<Item = &ActionRecord> {
        self.actions.iter().filter(|record| record.healed)
    }

    pub fn outcome_of(&self, action_number: u32) -> Option<&ActionOutcome> {
        self.actions
            .iter()
            .find(|record| record.action_number == action_number)
            .map(|record| &record.outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_and_partial_override() {
        let config: ExecutorConfig =
            serde_json::from_str(r#"{ "verify": { "ceiling_ms": 1000 } }"#).unwrap();
        assert_eq!(config.verify.interval_ms, 500);
        assert_eq!(config.verify.ceiling_ms, 1000);
        assert_eq!(config.date_format, "DD-MM-YYYY");
        assert_eq!(config.wait_navigation_ms, 10_000);
        assert_eq!(config.wait_hidden_ms, 15_000);
    }

    #[test]
    fn report_serializes_outcomes() {
        let mut report = StepReport::new("user_clicks_login");
        report.actions.push(ActionRecord {
            action_number: 1,
            kind: ActionKind::Click,
            outcome: ActionOutcome::FailedOptional("gone".into()),
            strategy: Some(LocatorStrategy::HealLabel),
            healed: true,
            latency_ms: 12,
        });
        let report = report.finish();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["actions"][0]["kind"], "CLICK");
        assert_eq!(json["actions"][0]["outcome"]["outcome"], "failed_optional");
        assert_eq!(report.healed_actions().count(), 1);
        assert_eq!(
            report.outcome_of(1),
            Some(&ActionOutcome::FailedOptional("gone".into()))
        );
    }
}
