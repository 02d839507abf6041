//! Action plans: the persisted form of a recorded step.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::descriptor::ElementDescriptor;

/// Placeholder value replaced at execution time by the next quoted literal
/// of the step text.
pub const RUNTIME_PARAMETER: &str = "___RUNTIME_PARAMETER___";

/// Kind of UI action. Parsed case-insensitively from the stored name; names
/// that are not recognised are kept in [`ActionKind::Unknown`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionKind {
    Navigate,
    Type,
    Click,
    DoubleClick,
    RightClick,
    Hover,
    Check,
    Uncheck,
    Clear,
    Select,
    SelectDate,
    VerifyText,
    VerifyElement,
    Screenshot,
    PressKey,
    SwitchWindow,
    WaitNavigation,
    WaitHidden,
    DragDrop,
    Scroll,
    Unknown(String),
}

impl ActionKind {
    /// Stored name of the action.
    pub fn name(&self) -> &str {
        match self {
            ActionKind::Navigate => "NAVIGATE",
            ActionKind::Type => "TYPE",
            ActionKind::Click => "CLICK",
            ActionKind::DoubleClick => "DOUBLE_CLICK",
            ActionKind::RightClick => "RIGHT_CLICK",
            ActionKind::Hover => "HOVER",
            ActionKind::Check => "CHECK",
            ActionKind::Uncheck => "UNCHECK",
            ActionKind::Clear => "CLEAR",
            ActionKind::Select => "SELECT",
            ActionKind::SelectDate => "SELECT_DATE",
            ActionKind::VerifyText => "VERIFY_TEXT",
            ActionKind::VerifyElement => "VERIFY_ELEMENT",
            ActionKind::Screenshot => "SCREENSHOT",
            ActionKind::PressKey => "PRESS_KEY",
            ActionKind::SwitchWindow => "SWITCH_WINDOW",
            ActionKind::WaitNavigation => "WAIT_NAVIGATION",
            ActionKind::WaitHidden => "WAIT_HIDDEN",
            ActionKind::DragDrop => "DRAG_DROP",
            ActionKind::Scroll => "SCROLL",
            ActionKind::Unknown(name) => name,
        }
    }

    /// Recognised, but not executed yet.
    pub fn is_pending(&self) -> bool {
        matches!(self, ActionKind::DragDrop | ActionKind::Scroll)
    }
}

impl FromStr for ActionKind {
    type Err = std::convert::Infallible;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let kind = match raw.trim().to_ascii_uppercase().as_str() {
            "NAVIGATE" => ActionKind::Navigate,
            "TYPE" => ActionKind::Type,
            "CLICK" => ActionKind::Click,
            "DOUBLE_CLICK" => ActionKind::DoubleClick,
            "RIGHT_CLICK" => ActionKind::RightClick,
            "HOVER" => ActionKind::Hover,
            "CHECK" => ActionKind::Check,
            "UNCHECK" => ActionKind::Uncheck,
            "CLEAR" => ActionKind::Clear,
            "SELECT" => ActionKind::Select,
            "SELECT_DATE" => ActionKind::SelectDate,
            "VERIFY_TEXT" => ActionKind::VerifyText,
            "VERIFY_ELEMENT" => ActionKind::VerifyElement,
            "SCREENSHOT" => ActionKind::Screenshot,
            "PRESS_KEY" => ActionKind::PressKey,
            "SWITCH_WINDOW" => ActionKind::SwitchWindow,
            "WAIT_NAVIGATION" => ActionKind::WaitNavigation,
            "WAIT_HIDDEN" => ActionKind::WaitHidden,
            "DRAG_DROP" => ActionKind::DragDrop,
            "SCROLL" => ActionKind::Scroll,
            _ => ActionKind::Unknown(raw.trim().to_string()),
        };
        Ok(kind)
    }
}

impl From<String> for ActionKind {
    fn from(raw: String) -> Self {
        match raw.parse() {
            Ok(kind) => kind,
            Err(never) => match never {},
        }
    }
}

impl From<ActionKind> for String {
    fn from(kind: ActionKind) -> Self {
        kind.name().to_string()
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One concrete UI action inside a plan.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub action_number: u32,
    pub action_type: ActionKind,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<ElementDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Failure of an optional action is logged and skipped.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
}

impl Action {
    pub fn new(action_number: u32, action_type: ActionKind) -> Self {
        Self {
            action_number,
            action_type,
            description: String::new(),
            element: None,
            value: None,
            optional: false,
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

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// Gherkin keyword the step was recorded under.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepType {
    #[serde(alias = "given", alias = "GIVEN")]
    Given,
    #[default]
    #[serde(alias = "when", alias = "WHEN")]
    When,
    #[serde(alias = "then", alias = "THEN")]
    Then,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StepMetadata {
    pub created_date: Option<DateTime<Utc>>,
    pub total_actions: usize,
}

/// Recorded action plan for one normalized step.
///
/// Plans are written once by the recorder and only ever read afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepRecord {
    #[serde(default)]
    pub step_file_name: String,
    #[serde(default)]
    pub gherkin_step: String,
    #[serde(default)]
    pub normalized_step: String,
    #[serde(default)]
    pub step_type: StepType,
    #[serde(default = "default_step_number")]
    pub step_number: u32,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(default)]
    pub metadata: StepMetadata,
}

fn default_step_number() -> u32 {
    1
}

fn default_status() -> String {
    "passed".to_string()
}

impl StepRecord {
    /// Actions in execution order (ascending number, stable on ties).
    pub fn ordered_actions(&self) -> Vec<&Action> {
        let mut actions: Vec<&Action> = self.actions.iter().collect();
        actions.sort_by_key(|action| action.action_number);
        actions
    }

    /// Number of runtime placeholders across all action values.
    pub fn placeholder_count(&self) -> usize {
        self.actions
            .iter()
            .filter_map(|action| action.value.as_deref())
            .map(|value| value.matches(RUNTIME_PARAMETER).count())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_kind_parses_case_insensitively() {
        assert_eq!("click".parse::<ActionKind>().unwrap(), ActionKind::Click);
        assert_eq!(
            "Verify_Text".parse::<ActionKind>().unwrap(),
            ActionKind::VerifyText
        );
        assert_eq!(
            "TELEPORT".parse::<ActionKind>().unwrap(),
            ActionKind::Unknown("TELEPORT".to_string())
        );
    }

    #[test]
    fn parses_stored_plan() {
        let json = r#"{
            "stepFileName": "user_enters_param",
            "gherkinStep": "user enters \"Dallas\"",
            "normalizedStep": "user_enters_param",
            "stepType": "When",
            "stepNumber": 1,
            "status": "passed",
            "actions": [
                { "actionNumber": 2, "actionType": "click", "description": "submit",
                  "element": { "id": "go" } },
                { "actionNumber": 1, "actionType": "TYPE", "description": "city",
                  "element": { "id": "city" }, "value": "___RUNTIME_PARAMETER___" }
            ],
            "metadata": { "createdDate": "2026-01-11T09:30:00.000Z", "totalActions": 2 }
        }"#;

        let record: StepRecord = serde_json::from_str(json).unwrap();
        let order: Vec<u32> = record
            .ordered_actions()
            .iter()
            .map(|action| action.action_number)
            .collect();
        assert_eq!(order, vec![1, 2]);
        assert_eq!(record.actions[0].action_type, ActionKind::Click);
        assert_eq!(record.placeholder_count(), 1);
        assert_eq!(record.metadata.total_actions, 2);
        assert!(record.metadata.created_date.is_some());
    }

    #[test]
    fn unknown_kind_round_trips_its_name() {
        let action = Action::new(1, ActionKind::Unknown("HOVER_TWICE".to_string()));
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["actionType"], "HOVER_TWICE");
        assert!(json.get("optional").is_none());
    }

    #[test]
    fn ordering_is_stable_on_ties() {
        let record = StepRecord {
            step_file_name: String::new(),
            gherkin_step: String::new(),
            normalized_step: String::new(),
            step_type: StepType::When,
            step_number: 1,
            status: "passed".to_string(),
            actions: vec![
                Action::new(1, ActionKind::Click).with_description("first"),
                Action::new(1, ActionKind::Hover).with_description("second"),
                Action::new(0, ActionKind::Navigate).with_description("zero"),
            ],
            metadata: StepMetadata::default(),
        };
        let order: Vec<&str> = record
            .ordered_actions()
            .iter()
            .map(|action| action.description.as_str())
            .collect();
        assert_eq!(order, vec!["zero", "first", "second"]);
    }
}
