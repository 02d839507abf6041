//! Plain-text scenarios: one step per line, Gherkin keywords optional

use action_primitives::BrowserPage;
use tracing::info;

use crate::dispatch::{StepDispatcher, StepOutcome};
use crate::errors::StepError;

const KEYWORDS: &[&str] = &["Given", "When", "Then", "And", "But", "*"];
const HEADERS: &[&str] = &[
    "Feature:",
    "Background:",
    "Scenario:",
    "Scenario Outline:",
    "Examples:",
    "Rule:",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioStep {
    /// 1-based line in the source text
    pub line: usize,
    pub keyword: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scenario {
    pub steps: Vec<ScenarioStep>,
}

impl Scenario {
    /// Collect step lines, skipping blanks, comments, tags, tables and headers
    pub fn parse(source: &str) -> Self {
        let steps = source
            .lines()
            .enumerate()
            .filter_map(|(index, raw)| {
                let line = raw.trim();
                if line.is_empty()
                    || line.starts_with('#')
                    || line.starts_with('@')
                    || line.starts_with('|')
                    || HEADERS.iter().any(|header| line.starts_with(header))
                {
                    return None;
                }
                let (keyword, text) = split_keyword(line);
                if text.is_empty() {
                    return None;
                }
                Some(ScenarioStep {
                    line: index + 1,
                    keyword: keyword.map(str::to_string),
                    text: text.to_string(),
                })
            })
            .collect();
        Self { steps }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run every step in order, stopping at the first failure
    pub async fn run(
        &self,
        dispatcher: &StepDispatcher,
        page: &dyn BrowserPage,
    ) -> Result<Vec<StepOutcome>, StepError> {
        let mut outcomes = Vec::with_capacity(self.steps.len());
        for step in &self.steps {
            info!(line = step.line, step = %step.text, "Running step");
            outcomes.push(dispatcher.run_step(page, &step.text).await?);
        }
        Ok(outcomes)
    }
}

fn split_keyword(line: &str) -> (Option<&str>, &str) {
    for keyword in KEYWORDS {
        if let Some(rest) = line.strip_prefix(*keyword) {
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                return (Some(*keyword), rest.trim());
            }
        }
    }
    (None, line)
}
