//! Step executor implementation

use crate::dates::resolve_date;
use crate::errors::FlowError;
use crate::params::ParameterCursor;
use crate::types::*;
use action_locator::{DefaultElementResolver, ElementResolver, LocatorStrategy};
use action_primitives::{
    BrowserPage, ElementHandle, ElementState, LoadState, MouseButton, SelectOption,
    SmartWaitStrategy, WaitStrategy, WindowTarget,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use stepwright_core_types::{Action, ActionKind, ElementDescriptor, EnvironmentConfig, StepRecord};
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Key pressed when `PRESS_KEY` carries no value
const DEFAULT_KEY: &str = "Enter";

/// What performing one action produced, before it is turned into a record
struct Performed {
    outcome: ActionOutcome,
    strategy: Option<LocatorStrategy>,
    healed: bool,
}

impl Performed {
    fn plain(outcome: ActionOutcome) -> Self {
        Self {
            outcome,
            strategy: None,
            healed: false,
        }
    }

    fn located(strategy: Option<LocatorStrategy>) -> Self {
        Self {
            outcome: ActionOutcome::Done,
            healed: strategy.map_or(false, |s| s.is_healing()),
            strategy,
        }
    }
}

/// Replays recorded action plans, one action at a time
pub struct StepExecutor {
    resolver: Arc<dyn ElementResolver>,
    waits: Arc<dyn WaitStrategy>,
    environment: Arc<EnvironmentConfig>,
    config: ExecutorConfig,
}

impl StepExecutor {
    pub fn new(
        resolver: Arc<dyn ElementResolver>,
        waits: Arc<dyn WaitStrategy>,
        environment: Arc<EnvironmentConfig>,
        config: ExecutorConfig,
    ) -> Self {
        Self {
            resolver,
            waits,
            environment,
            config,
        }
    }

    /// Executor with the default resolver, waits and configuration
    pub fn with_defaults(environment: Arc<EnvironmentConfig>) -> Self {
        Self::new(
            Arc::new(DefaultElementResolver::default()),
            Arc::new(SmartWaitStrategy::default()),
            environment,
            ExecutorConfig::default(),
        )
    }

    pub fn environment(&self) -> &EnvironmentConfig {
        &self.environment
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Execute every action of `record` in ascending action number.
    ///
    /// `literals` are the quoted values of the step text; they replace the
    /// plan's runtime placeholders left to right. The first failure of a
    /// non-optional action aborts the step.
    pub async fn execute_step(
        &self,
        page: &dyn BrowserPage,
        record: &StepRecord,
        literals: &[String],
    ) -> Result<StepReport, FlowError> {
        let mut report = StepReport::new(record.normalized_step.clone());
        let placeholders = record.placeholder_count();
        if placeholders != literals.len() {
            warn!(
                step = %record.normalized_step,
                placeholders,
                literals = literals.len(),
                "Placeholder and literal counts differ"
            );
        }

        info!(
            step = %record.normalized_step,
            actions = record.actions.len(),
            "Executing recorded step"
        );

        let mut params = ParameterCursor::new(literals.to_vec());
        for action in record.ordered_actions() {
            let started = Instant::now();
            let value = action
                .value
                .as_deref()
                .map(|raw| self.environment.resolve(&params.substitute(raw)));

            info!(
                action = action.action_number,
                "Performing: {} - {}",
                action.action_type,
                action.description
            );

            let performed = match self
                .perform(page, action, value.as_deref(), &mut report)
                .await
            {
                Ok(performed) => performed,
                Err(err) if action.optional => {
                    warn!(
                        action = action.action_number,
                        kind = %action.action_type,
                        error = %err,
                        "Optional action failed, continuing"
                    );
                    Performed::plain(ActionOutcome::FailedOptional(err.to_string()))
                }
                Err(err) => {
                    warn!(
                        action = action.action_number,
                        kind = %action.action_type,
                        error = %err,
                        "Action failed, aborting step"
                    );
                    return Err(FlowError::ActionFailed {
                        action_number: action.action_number,
                        kind: action.action_type.to_string(),
                        source: Box::new(err),
                    });
                }
            };

            report.actions.push(ActionRecord {
                action_number: action.action_number,
                kind: action.action_type.clone(),
                outcome: performed.outcome,
                strategy: performed.strategy,
                healed: performed.healed,
                latency_ms: started.elapsed().as_millis() as u64,
            });
        }

        let report = report.finish();
        info!(
            step = %report.step,
            latency_ms = report.latency_ms,
            healed = report.healed_actions().count(),
            "Step completed"
        );
        Ok(report)
    }

    /// Resolve and click an element outside of a recorded plan
    pub async fn click(
        &self,
        page: &dyn BrowserPage,
        descriptor: &ElementDescriptor,
    ) -> Result<(), FlowError> {
        let resolution = self.resolver.resolve(page, descriptor).await;
        let element = resolution.handle.as_ref();
        self.waits.smart_wait(element, &ActionKind::Click).await;
        element.click(MouseButton::Left).await?;
        info!(element = %descriptor.display_name(), "Clicked");
        Ok(())
    }

    /// Resolve an element and replace its content with `text`
    pub async fn type_text(
        &self,
        page: &dyn BrowserPage,
        descriptor: &ElementDescriptor,
        text: &str,
    ) -> Result<(), FlowError> {
        let resolution = self.resolver.resolve(page, descriptor).await;
        let element = resolution.handle.as_ref();
        self.waits.smart_wait(element, &ActionKind::Type).await;
        element.fill("").await?;
        element.fill(text).await?;
        info!(element = %descriptor.display_name(), "Typed text");
        Ok(())
    }

    async fn perform(
        &self,
        page: &dyn BrowserPage,
        action: &Action,
        value: Option<&str>,
        report: &mut StepReport,
    ) -> Result<Performed, FlowError> {
        let kind = &action.action_type;
        match kind {
            ActionKind::Navigate => {
                page.goto(value.unwrap_or_default()).await?;
                self.waits.wait_for_page_ready(page).await;
                return Ok(Performed::plain(ActionOutcome::Done));
            }
            ActionKind::PressKey => {
                page.press_key(value.unwrap_or(DEFAULT_KEY)).await?;
                return Ok(Performed::plain(ActionOutcome::Done));
            }
            ActionKind::Screenshot => {
                let png = page.screenshot().await?;
                debug!(bytes = png.len(), "Captured screenshot");
                report.screenshots.push(png);
                return Ok(Performed::plain(ActionOutcome::Done));
            }
            ActionKind::SwitchWindow => {
                let target = WindowTarget::parse(value);
                if !page.switch_window(target).await? {
                    warn!(target = ?target, "No such window, staying on current tab");
                }
                return Ok(Performed::plain(ActionOutcome::Done));
            }
            ActionKind::WaitNavigation => {
                let bound = Duration::from_millis(self.config.wait_navigation_ms);
                if let Err(err) = page.wait_for_load_state(LoadState::Load, bound).await {
                    warn!(error = %err, "Navigation wait did not settle");
                }
                return Ok(Performed::plain(ActionOutcome::Done));
            }
            ActionKind::VerifyText if value.is_none() => {
                debug!(action = action.action_number, "Nothing to verify");
                return Ok(Performed::plain(ActionOutcome::Skipped));
            }
            ActionKind::VerifyText if action.element.is_none() => {
                let expected = value.unwrap_or_default();
                if !page.has_visible_text(expected).await? {
                    return Err(FlowError::AssertionFailed(format!(
                        "Text \"{}\" not found on page.",
                        expected
                    )));
                }
                info!(expected = %expected, "Text present on page");
                return Ok(Performed::plain(ActionOutcome::Done));
            }
            kind if kind.is_pending() => {
                warn!(kind = %kind, "Action recognized but implementation is pending");
                return Ok(Performed::plain(ActionOutcome::Pending));
            }
            ActionKind::Unknown(name) => {
                warn!(kind = %name, "Unsupported action type");
                return Ok(Performed::plain(ActionOutcome::Unknown));
            }
            _ => {}
        }

        let Some(descriptor) = action.element.as_ref() else {
            warn!(
                action = action.action_number,
                kind = %kind,
                "Action needs an element but none was recorded, skipping"
            );
            return Ok(Performed::plain(ActionOutcome::Skipped));
        };

        let resolution = self.resolver.resolve(page, descriptor).await;
        let element = resolution.handle.as_ref();

        match kind {
            ActionKind::Type => {
                self.waits.smart_wait(element, kind).await;
                element.fill("").await?;
                element.fill(value.unwrap_or_default()).await?;
            }
            ActionKind::Click => {
                self.waits.smart_wait(element, kind).await;
                element.click(MouseButton::Left).await?;
                self.waits.wait_for_page_ready(page).await;
            }
            ActionKind::DoubleClick => {
                self.waits.smart_wait(element, kind).await;
                element.double_click().await?;
            }
            ActionKind::RightClick => {
                element.click(MouseButton::Right).await?;
            }
            ActionKind::Hover => {
                self.waits.smart_wait(element, kind).await;
                element.hover().await?;
            }
            ActionKind::Check | ActionKind::Uncheck => {
                self.waits.smart_wait(element, kind).await;
                element
                    .set_checked(matches!(kind, ActionKind::Check))
                    .await?;
            }
            ActionKind::Clear => {
                element.clear().await?;
            }
            ActionKind::Select => {
                self.waits.smart_wait(element, kind).await;
                let option = SelectOption::ValueOrLabel(value.unwrap_or_default().to_string());
                element.select_option(&option).await?;
            }
            ActionKind::SelectDate => {
                self.waits.smart_wait(element, kind).await;
                let date = resolve_date(value.unwrap_or_default(), &self.config.date_format);
                element.fill("").await?;
                element.fill(&date).await?;
                element.press("Tab").await?;
            }
            ActionKind::VerifyText => {
                self.waits.smart_wait(element, kind).await;
                self.verify_text(element, value.unwrap_or_default()).await?;
            }
            ActionKind::VerifyElement => {
                if !self.waits.wait_for_visible(element, kind).await {
                    return Err(FlowError::AssertionFailed(
                        "Element not visible for verification.".to_string(),
                    ));
                }
            }
            ActionKind::WaitHidden => {
                let bound = Duration::from_millis(self.config.wait_hidden_ms);
                if let Err(err) = element.wait_for(ElementState::Hidden, bound).await {
                    warn!(
                        element = %descriptor.display_name(),
                        error = %err,
                        "Element still visible"
                    );
                }
            }
            other => {
                return Err(FlowError::Internal(format!(
                    "{} is not an element action",
                    other
                )))
            }
        }

        Ok(Performed::located(resolution.strategy))
    }

    /// Poll until the element is visible and contains `expected`
    async fn verify_text(
        &self,
        element: &dyn ElementHandle,
        expected: &str,
    ) -> Result<(), FlowError> {
        let interval = Duration::from_millis(self.config.verify.interval_ms);
        let ceiling = Duration::from_millis(self.config.verify.ceiling_ms);
        let started = Instant::now();
        let mut found = String::new();

        loop {
            match element.is_visible().await {
                Ok(true) => match element.text_content().await {
                    Ok(Some(text)) if text.contains(expected) => {
                        info!(
                            expected = %expected,
                            latency_ms = started.elapsed().as_millis() as u64,
                            "Text verified"
                        );
                        return Ok(());
                    }
                    Ok(Some(text)) => found = text,
                    Ok(None) => {}
                    Err(err) => debug!(error = %err, "Text read failed"),
                },
                Ok(false) => {}
                Err(err) => debug!(error = %err, "Visibility check failed"),
            }

            if started.elapsed() >= ceiling {
                break;
            }
            sleep(interval).await;
        }

        Err(FlowError::VerificationFailed {
            expected: expected.to_string(),
            found: found.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use action_locator::Prober;
    use action_primitives::stub::{StubElement, StubEvent, StubPage};
    use action_primitives::{ActionError, Selector, WaitTimeouts};
    use std::collections::BTreeMap;
    use stepwright_core_types::{Fingerprint, FingerprintContext, RUNTIME_PARAMETER};

    fn fast_waits() -> WaitTimeouts {
        WaitTimeouts {
            navigation_ms: 300,
            verification_ms: 200,
            interactive_ms: 200,
            scroll_ms: 100,
            short_probe_ms: 50,
            indicator_ms: 50,
            poll_ms: 10,
        }
    }

    fn executor_with(environment: EnvironmentConfig, config: ExecutorConfig) -> StepExecutor {
        StepExecutor::new(
            Arc::new(DefaultElementResolver::new(
                Prober::new(Duration::from_millis(50)),
                Duration::from_millis(100),
            )),
            Arc::new(SmartWaitStrategy::new(fast_waits())),
            Arc::new(environment),
            config,
        )
    }

    fn executor() -> StepExecutor {
        executor_with(EnvironmentConfig::empty(), ExecutorConfig::default())
    }

    fn by_id(id: &str) -> ElementDescriptor {
        ElementDescriptor {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    fn record(actions: Vec<Action>) -> StepRecord {
        let mut record: StepRecord =
            serde_json::from_value(serde_json::json!({ "normalizedStep": "test_step" })).unwrap();
        record.actions = actions;
        record
    }

    fn fills(page: &StubPage) -> Vec<String> {
        page.interactions()
            .into_iter()
            .filter_map(|event| match event {
                StubEvent::Fill { value, .. } => Some(value),
                _ => None,
            })
            .collect()
    }

    fn literals(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[tokio::test]
    async fn placeholders_zip_with_literals_in_order() {
        let page = StubPage::new()
            .with_element(StubElement::new(Selector::id("from")))
            .with_element(StubElement::new(Selector::id("to")));
        let plan = record(vec![
            Action::new(1, ActionKind::Type)
                .with_element(by_id("from"))
                .with_value(RUNTIME_PARAMETER),
            Action::new(2, ActionKind::Type)
                .with_element(by_id("to"))
                .with_value(RUNTIME_PARAMETER),
        ]);

        executor()
            .execute_step(&page, &plan, &literals(&["Dallas", "Houston"]))
            .await
            .unwrap();

        assert_eq!(fills(&page), vec!["", "Dallas", "", "Houston"]);
        assert_eq!(page.value_of(&Selector::id("from")).as_deref(), Some("Dallas"));
        assert_eq!(page.value_of(&Selector::id("to")).as_deref(), Some("Houston"));
    }

    #[tokio::test]
    async fn environment_tokens_resolved_after_substitution() {
        let mut values = BTreeMap::new();
        values.insert("BASE_URL".to_string(), "https://qa.example".to_string());
        let executor = executor_with(EnvironmentConfig::new("QA", values), ExecutorConfig::default());
        let page = StubPage::new();
        let plan = record(vec![Action::new(1, ActionKind::Navigate)
            .with_value(format!("${{BASE_URL}}/{}", RUNTIME_PARAMETER))]);

        executor
            .execute_step(&page, &plan, &literals(&["login"]))
            .await
            .unwrap();

        assert_eq!(
            page.events().first(),
            Some(&StubEvent::Goto("https://qa.example/login".into()))
        );
    }

    #[tokio::test]
    async fn navigate_waits_for_load_with_navigation_timeout() {
        let page = StubPage::new();
        let executor = StepExecutor::with_defaults(Arc::new(EnvironmentConfig::empty()));
        let plan = record(vec![Action::new(1, ActionKind::Navigate).with_value("https://a.test")]);

        executor.execute_step(&page, &plan, &[]).await.unwrap();

        assert!(page.events().contains(&StubEvent::LoadState {
            state: LoadState::Load,
            timeout: Duration::from_secs(120),
        }));
    }

    #[tokio::test]
    async fn page_that_never_loads_does_not_abort_the_step() {
        let page = StubPage::new()
            .with_element(StubElement::new(Selector::id("search")))
            .fail_load_state(LoadState::Load);
        let plan = record(vec![
            Action::new(1, ActionKind::Navigate).with_value("https://a.test"),
            Action::new(2, ActionKind::Click).with_element(by_id("search")),
        ]);

        let report = executor().execute_step(&page, &plan, &[]).await.unwrap();

        assert_eq!(report.outcome_of(1), Some(&ActionOutcome::Done));
        assert_eq!(report.outcome_of(2), Some(&ActionOutcome::Done));
        assert!(page.interactions().contains(&StubEvent::Click {
            selector: Selector::id("search"),
            button: MouseButton::Left,
        }));
    }

    #[tokio::test]
    async fn actions_run_in_number_order() {
        let page = StubPage::new()
            .with_element(StubElement::new(Selector::id("name")))
            .with_element(StubElement::new(Selector::id("save")));
        let plan = record(vec![
            Action::new(2, ActionKind::Click).with_element(by_id("save")),
            Action::new(1, ActionKind::Type)
                .with_element(by_id("name"))
                .with_value("Ada"),
        ]);

        let report = executor().execute_step(&page, &plan, &[]).await.unwrap();

        let numbers: Vec<u32> = report.actions.iter().map(|a| a.action_number).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert!(matches!(
            page.interactions().last(),
            Some(StubEvent::Click { .. })
        ));
        assert_eq!(report.actions[0].strategy, Some(LocatorStrategy::Id));
    }

    #[tokio::test]
    async fn verify_text_polls_until_text_appears() {
        let page = StubPage::new().with_element(
            StubElement::new(Selector::id("status"))
                .with_text("Loading")
                .text_after(Duration::from_secs(2), "Welcome back, Ada"),
        );
        let executor = StepExecutor::with_defaults(Arc::new(EnvironmentConfig::empty()));
        let plan = record(vec![Action::new(1, ActionKind::VerifyText)
            .with_element(by_id("status"))
            .with_value("Welcome back")]);

        let started = Instant::now();
        executor.execute_step(&page, &plan, &[]).await.unwrap();
        let elapsed = started.elapsed();

        assert!(elapsed >= Duration::from_secs(2), "finished too early: {:?}", elapsed);
        assert!(elapsed < Duration::from_secs(3), "finished too late: {:?}", elapsed);
    }

    #[tokio::test]
    async fn verify_text_failure_reports_last_text() {
        let page = StubPage::new()
            .with_element(StubElement::new(Selector::id("status")).with_text("  Loading  "));
        let config = ExecutorConfig::default().with_verify(VerifyPolicy {
            interval_ms: 50,
            ceiling_ms: 200,
        });
        let plan = record(vec![Action::new(1, ActionKind::VerifyText)
            .with_element(by_id("status"))
            .with_value("Welcome")]);

        let err = executor_with(EnvironmentConfig::empty(), config)
            .execute_step(&page, &plan, &[])
            .await
            .unwrap_err();

        assert_eq!(err.action_number(), Some(1));
        assert_eq!(
            err.root_cause().to_string(),
            "Expected text \"Welcome\" not found. Found: \"Loading\""
        );
    }

    #[tokio::test]
    async fn page_wide_text_check_without_element() {
        let page = StubPage::new()
            .with_element(StubElement::new(Selector::css("h1")).with_text("Order confirmed"));
        let plan = record(vec![Action::new(1, ActionKind::VerifyText).with_value("confirmed")]);
        executor().execute_step(&page, &plan, &[]).await.unwrap();

        let plan = record(vec![Action::new(1, ActionKind::VerifyText).with_value("refunded")]);
        let err = executor().execute_step(&page, &plan, &[]).await.unwrap_err();
        assert!(matches!(err.root_cause(), FlowError::AssertionFailed(_)));
    }

    #[tokio::test]
    async fn pending_and_unknown_kinds_do_not_fail() {
        let page = StubPage::new().with_element(StubElement::new(Selector::id("go")));
        let plan = record(vec![
            Action::new(1, ActionKind::DragDrop),
            Action::new(2, ActionKind::Unknown("TELEPORT".into())),
            Action::new(3, ActionKind::Click).with_element(by_id("go")),
        ]);

        let report = executor().execute_step(&page, &plan, &[]).await.unwrap();

        assert_eq!(report.outcome_of(1), Some(&ActionOutcome::Pending));
        assert_eq!(report.outcome_of(2), Some(&ActionOutcome::Unknown));
        assert_eq!(report.outcome_of(3), Some(&ActionOutcome::Done));
    }

    #[tokio::test]
    async fn failure_aborts_remaining_actions() {
        let page = StubPage::new().with_element(StubElement::new(Selector::id("name")));
        let plan = record(vec![
            Action::new(1, ActionKind::Click).with_element(by_id("missing")),
            Action::new(2, ActionKind::Type)
                .with_element(by_id("name"))
                .with_value("Ada"),
        ]);

        let err = executor().execute_step(&page, &plan, &[]).await.unwrap_err();

        assert_eq!(err.action_number(), Some(1));
        assert!(matches!(
            err.root_cause(),
            FlowError::ActionError(ActionError::ElementNotFound(_))
        ));
        assert!(fills(&page).is_empty());
    }

    #[tokio::test]
    async fn optional_failure_is_downgraded() {
        let page = StubPage::new().with_element(StubElement::new(Selector::id("name")));
        let plan = record(vec![
            Action::new(1, ActionKind::Click)
                .with_element(by_id("cookie-banner"))
                .optional(),
            Action::new(2, ActionKind::Type)
                .with_element(by_id("name"))
                .with_value("Ada"),
        ]);

        let report = executor().execute_step(&page, &plan, &[]).await.unwrap();

        assert!(matches!(
            report.outcome_of(1),
            Some(ActionOutcome::FailedOptional(_))
        ));
        assert_eq!(report.outcome_of(2), Some(&ActionOutcome::Done));
    }

    #[tokio::test]
    async fn select_date_fills_resolved_date_then_tabs() {
        let page = StubPage::new().with_element(StubElement::new(Selector::id("departure")));
        let plan = record(vec![Action::new(1, ActionKind::SelectDate)
            .with_element(by_id("departure"))
            .with_value("2026-01-11")]);

        executor().execute_step(&page, &plan, &[]).await.unwrap();

        let interactions = page.interactions();
        assert_eq!(fills(&page), vec!["", "11-01-2026"]);
        assert_eq!(
            interactions.last(),
            Some(&StubEvent::Press {
                selector: Selector::id("departure"),
                key: "Tab".into(),
            })
        );
    }

    #[test]
    fn element_action_without_element_is_skipped() {
        let page = StubPage::new();
        let plan = record(vec![Action::new(1, ActionKind::Click)]);
        let report = tokio_test::block_on(executor().execute_step(&page, &plan, &[])).unwrap();
        assert_eq!(report.outcome_of(1), Some(&ActionOutcome::Skipped));
        assert!(page.interactions().is_empty());
    }

    #[tokio::test]
    async fn page_level_actions() {
        let page = StubPage::new().with_windows(2);
        let plan = record(vec![
            Action::new(1, ActionKind::PressKey),
            Action::new(2, ActionKind::Screenshot),
            Action::new(3, ActionKind::SwitchWindow).with_value("next"),
            Action::new(4, ActionKind::SwitchWindow).with_value("7"),
        ]);

        let report = executor().execute_step(&page, &plan, &[]).await.unwrap();

        assert_eq!(report.screenshots.len(), 1);
        assert_eq!(page.current_window(), 1);
        assert_eq!(
            page.interactions(),
            vec![
                StubEvent::PageKey("Enter".into()),
                StubEvent::Screenshot,
                StubEvent::SwitchWindow(1),
            ]
        );
    }

    #[tokio::test]
    async fn healed_actions_are_flagged() {
        let page =
            StubPage::new().with_element(StubElement::new(Selector::label("Email address")));
        let descriptor = ElementDescriptor {
            id: Some("email-old".into()),
            fingerprint: Some(Fingerprint {
                context: FingerprintContext {
                    nearby_text: Some("Email address".into()),
                    ..Default::default()
                },
                ..Default::default()
            }),
            ..Default::default()
        };
        let plan = record(vec![Action::new(1, ActionKind::Type)
            .with_element(descriptor)
            .with_value("ada@example.com")]);

        let report = executor().execute_step(&page, &plan, &[]).await.unwrap();

        assert!(report.actions[0].healed);
        assert_eq!(report.actions[0].strategy, Some(LocatorStrategy::HealLabel));
    }

    #[tokio::test]
    async fn direct_helpers_resolve_and_act() {
        let page = StubPage::new()
            .with_element(StubElement::new(Selector::id("q")))
            .with_element(StubElement::new(Selector::id("search")));
        let executor = executor();

        executor.type_text(&page, &by_id("q"), "rust").await.unwrap();
        executor.click(&page, &by_id("search")).await.unwrap();

        assert_eq!(page.value_of(&Selector::id("q")).as_deref(), Some("rust"));
        assert!(matches!(
            page.interactions().last(),
            Some(StubEvent::Click { .. })
        ));
    }
}
