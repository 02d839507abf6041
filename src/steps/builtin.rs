//! Manual definitions shipped with the runner

use std::sync::Arc;
use std::time::Duration;

use action_flow::FlowError;
use action_primitives::{ElementState, MouseButton, SelectOption, Selector};
use async_trait::async_trait;
use tracing::{info, warn};

use super::registry::{CustomStepRegistry, ManualStep, StepContext};
use crate::errors::StepError;

pub const SELECT_COUNTRY_PATTERN: &str = r#"user selects country "(.*)""#;
pub const LOCATION_SUGGESTION_PATTERN: &str = r#"enters location "(.*)" from suggestion"#;

/// Containers suggestion lists are rendered in
const SUGGESTION_CONTAINERS: &str = ".typeahead, .ui-autocomplete, .suggestion-item";
const SUGGESTION_TIMEOUT: Duration = Duration::from_secs(5);

fn first_arg(args: &[String]) -> &str {
    args.first().map(String::as_str).unwrap_or_default()
}

/// Pick an option by label in the `Country` combobox
pub struct SelectCountry;

#[async_trait]
impl ManualStep for SelectCountry {
    async fn run(&self, ctx: &StepContext<'_>, args: &[String]) -> Result<(), FlowError> {
        let country = first_arg(args);
        info!(country, "No recorded plan, selecting country manually");
        let combo = ctx
            .page
            .locate(Selector::role("combobox", Some("Country".to_string())));
        combo
            .select_option(&SelectOption::Label(country.to_string()))
            .await?;
        info!(country, "Selected country");
        Ok(())
    }
}

/// Type into `City/Town` and pick the matching typeahead suggestion,
/// falling back to `Enter` when no suggestion shows up
pub struct LocationFromSuggestion;

#[async_trait]
impl ManualStep for LocationFromSuggestion {
    async fn run(&self, ctx: &StepContext<'_>, args: &[String]) -> Result<(), FlowError> {
        let location = first_arg(args);
        info!(location, "No recorded plan, entering location manually");

        let input = ctx
            .page
            .locate(Selector::role("textbox", Some("City/Town".to_string())));
        input.fill(location).await?;

        let suggestion = ctx
            .page
            .locate(Selector::css_text(SUGGESTION_CONTAINERS, location, false));
        match suggestion
            .wait_for(ElementState::Visible, SUGGESTION_TIMEOUT)
            .await
        {
            Ok(()) => {
                suggestion.click(MouseButton::Left).await?;
                info!(location, "Selected location from suggestions");
            }
            Err(err) => {
                warn!(location, error = %err, "No suggestion appeared, keeping typed text");
                input.press("Enter").await?;
            }
        }
        Ok(())
    }
}

/// Registry preloaded with the shipped manual steps
pub fn default_registry() -> Result<CustomStepRegistry, StepError> {
    CustomStepRegistry::new()
        .with_step(SELECT_COUNTRY_PATTERN, Arc::new(SelectCountry))?
        .with_step(LOCATION_SUGGESTION_PATTERN, Arc::new(LocationFromSuggestion))
}

#[cfg(test)]
mod tests {
    use super::*;
    use action_flow::StepExecutor;
    use action_primitives::stub::{StubElement, StubEvent, StubPage};
    use stepwright_core_types::EnvironmentConfig;

    fn executor() -> StepExecutor {
        StepExecutor::with_defaults(Arc::new(EnvironmentConfig::empty()))
    }

    #[tokio::test]
    async fn select_country_by_label() {
        let combo = Selector::role("combobox", Some("Country".into()));
        let page = StubPage::new().with_element(
            StubElement::new(combo.clone())
                .with_option("us", "United States")
                .with_option("ca", "Canada"),
        );
        let executor = executor();
        let ctx = StepContext {
            page: &page,
            executor: &executor,
        };

        SelectCountry.run(&ctx, &["Canada".into()]).await.unwrap();
        assert_eq!(page.value_of(&combo).as_deref(), Some("ca"));
    }

    #[tokio::test]
    async fn location_picks_visible_suggestion() {
        let input = Selector::role("textbox", Some("City/Town".into()));
        let suggestion = Selector::css_text(SUGGESTION_CONTAINERS, "Dallas", false);
        let page = StubPage::new()
            .with_element(StubElement::new(input.clone()))
            .with_element(StubElement::new(suggestion.clone()).with_text("Dallas, TX"));
        let executor = executor();
        let ctx = StepContext {
            page: &page,
            executor: &executor,
        };

        LocationFromSuggestion
            .run(&ctx, &["Dallas".into()])
            .await
            .unwrap();

        assert_eq!(page.value_of(&input).as_deref(), Some("Dallas"));
        assert_eq!(
            page.interactions().last(),
            Some(&StubEvent::Click {
                selector: suggestion,
                button: MouseButton::Left,
            })
        );
    }

    #[test]
    fn default_registry_matches_shipped_steps() {
        let registry = default_registry().unwrap();
        assert_eq!(registry.len(), 2);
        let matched = registry
            .find(r#"user enters location "Dallas" from suggestion"#)
            .unwrap();
        assert_eq!(matched.pattern, LOCATION_SUGGESTION_PATTERN);
        assert_eq!(matched.args, vec!["Dallas".to_string()]);
    }
}
