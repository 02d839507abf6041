//! Scripted in-memory page
//!
//! Elements are declared up front together with the selectors they answer
//! to. Visibility, enabled state and text can change after a delay, which is
//! enough to exercise healing, polling and timeout behaviour without a
//! browser. Every probe, wait and interaction is recorded for assertions.

use crate::{
    errors::ActionError,
    page::{poll_element_state, BrowserPage, ElementHandle},
    types::{ElementState, LoadState, MouseButton, SelectOption, Selector, WindowTarget},
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// PNG signature returned as screenshot payload
const FAKE_PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

/// Declarative element on a [`StubPage`]
#[derive(Debug, Clone)]
pub struct StubElement {
    selectors: Vec<Selector>,
    visible: bool,
    enabled: bool,
    text: Option<String>,
    visible_after: Option<Duration>,
    hidden_after: Option<Duration>,
    enabled_after: Option<Duration>,
    text_after: Option<(Duration, String)>,
    options: Vec<(String, String)>,
    value: String,
    checked: bool,
    unresponsive: bool,
}

impl StubElement {
    /// Visible, enabled element answering to `selector`
    pub fn new(selector: Selector) -> Self {
        Self {
            selectors: vec![selector],
            visible: true,
            enabled: true,
            text: None,
            visible_after: None,
            hidden_after: None,
            enabled_after: None,
            text_after: None,
            options: Vec::new(),
            value: String::new(),
            checked: false,
            unresponsive: false,
        }
    }

    /// Also answer to `selector`
    pub fn matching(mut self, selector: Selector) -> Self {
        self.selectors.push(selector);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn visible_after(mut self, delay: Duration) -> Self {
        self.visible_after = Some(delay);
        self
    }

    pub fn hidden_after(mut self, delay: Duration) -> Self {
        self.hidden_after = Some(delay);
        self
    }

    pub fn enabled_after(mut self, delay: Duration) -> Self {
        self.enabled = false;
        self.enabled_after = Some(delay);
        self
    }

    /// Visibility queries never answer, like a hung renderer
    pub fn unresponsive(mut self) -> Self {
        self.unresponsive = true;
        self
    }

    /// Replace the text once `delay` has elapsed
    pub fn text_after(mut self, delay: Duration, text: impl Into<String>) -> Self {
        self.text_after = Some((delay, text.into()));
        self
    }

    /// Dropdown option with `value` and visible `label`
    pub fn with_option(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.options.push((value.into(), label.into()));
        self
    }

    fn answers(&self, selector: &Selector) -> bool {
        self.selectors.iter().any(|candidate| candidate == selector)
    }

    fn visible_at(&self, elapsed: Duration) -> bool {
        let shown = self.visible || self.visible_after.map_or(false, |d| elapsed >= d);
        let gone = self.hidden_after.map_or(false, |d| elapsed >= d);
        shown && !gone
    }

    fn enabled_at(&self, elapsed: Duration) -> bool {
        self.enabled || self.enabled_after.map_or(false, |d| elapsed >= d)
    }

    fn text_at(&self, elapsed: Duration) -> Option<String> {
        match &self.text_after {
            Some((delay, text)) if elapsed >= *delay => Some(text.clone()),
            _ => self.text.clone(),
        }
    }
}

/// Wait recorded by the stub page
#[derive(Debug, Clone, PartialEq)]
pub struct StubWait {
    pub selector: Selector,
    pub state: ElementState,
    pub timeout: Duration,
}

/// Everything the stub page observed, in order
#[derive(Debug, Clone, PartialEq)]
pub enum StubEvent {
    /// Visibility query
    Probe(Selector),
    Wait(StubWait),
    Fill { selector: Selector, value: String },
    Clear(Selector),
    Click { selector: Selector, button: MouseButton },
    DoubleClick(Selector),
    Hover(Selector),
    SetChecked { selector: Selector, checked: bool },
    Select { selector: Selector, option: SelectOption },
    Press { selector: Selector, key: String },
    PageKey(String),
    Goto(String),
    LoadState { state: LoadState, timeout: Duration },
    Screenshot,
    SwitchWindow(usize),
}

impl StubEvent {
    /// Probes, waits and load-state checks are observation, not interaction
    pub fn is_interaction(&self) -> bool {
        !matches!(
            self,
            StubEvent::Probe(_) | StubEvent::Wait(_) | StubEvent::LoadState { .. }
        )
    }
}

struct StubState {
    started: Instant,
    elements: Mutex<Vec<StubElement>>,
    events: Mutex<Vec<StubEvent>>,
    failing_states: Mutex<HashSet<LoadState>>,
    windows: Mutex<(usize, usize)>,
}

impl StubState {
    fn record(&self, event: StubEvent) {
        self.events.lock().push(event);
    }
}

/// Scripted in-memory [`BrowserPage`]
#[derive(Clone)]
pub struct StubPage {
    state: Arc<StubState>,
}

impl Default for StubPage {
    fn default() -> Self {
        Self::new()
    }
}

impl StubPage {
    pub fn new() -> Self {
        Self {
            state: Arc::new(StubState {
                started: Instant::now(),
                elements: Mutex::new(Vec::new()),
                events: Mutex::new(Vec::new()),
                failing_states: Mutex::new(HashSet::new()),
                windows: Mutex::new((1, 0)),
            }),
        }
    }

    /// Add an element; earlier elements win when several answer to a selector
    pub fn with_element(self, element: StubElement) -> Self {
        self.state.elements.lock().push(element);
        self
    }

    /// Waits for `state` time out immediately
    pub fn fail_load_state(self, state: LoadState) -> Self {
        self.state.failing_states.lock().insert(state);
        self
    }

    /// Number of open tabs
    pub fn with_windows(self, count: usize) -> Self {
        *self.state.windows.lock() = (count.max(1), 0);
        self
    }

    pub fn events(&self) -> Vec<StubEvent> {
        self.state.events.lock().clone()
    }

    /// Selectors whose visibility was queried, in order
    pub fn probes(&self) -> Vec<Selector> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                StubEvent::Probe(selector) => Some(selector),
                _ => None,
            })
            .collect()
    }

    pub fn waits(&self) -> Vec<StubWait> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                StubEvent::Wait(wait) => Some(wait),
                _ => None,
            })
            .collect()
    }

    pub fn interactions(&self) -> Vec<StubEvent> {
        self.events()
            .into_iter()
            .filter(StubEvent::is_interaction)
            .collect()
    }

    /// Current value of the first element answering to `selector`
    pub fn value_of(&self, selector: &Selector) -> Option<String> {
        self.state
            .elements
            .lock()
            .iter()
            .find(|element| element.answers(selector))
            .map(|element| element.value.clone())
    }

    /// Index of the tab in front
    pub fn current_window(&self) -> usize {
        self.state.windows.lock().1
    }

    pub fn clear_events(&self) {
        self.state.events.lock().clear();
    }
}

/// Lazy handle into a [`StubPage`]
pub struct StubHandle {
    selector: Selector,
    state: Arc<StubState>,
}

impl StubHandle {
    fn elapsed(&self) -> Duration {
        self.state.started.elapsed()
    }

    fn inspect<T>(&self, f: impl FnOnce(&StubElement, Duration) -> T) -> Option<T> {
        let elapsed = self.elapsed();
        let elements = self.state.elements.lock();
        elements
            .iter()
            .find(|element| element.answers(&self.selector))
            .map(|element| f(element, elapsed))
    }

    /// Run `f` on the matching element after checking it can be interacted with
    fn interact<T>(
        &self,
        require_enabled: bool,
        f: impl FnOnce(&mut StubElement) -> Result<T, ActionError>,
    ) -> Result<T, ActionError> {
        let elapsed = self.elapsed();
        let mut elements = self.state.elements.lock();
        let element = elements
            .iter_mut()
            .find(|element| element.answers(&self.selector))
            .ok_or_else(|| ActionError::ElementNotFound(self.selector.to_string()))?;
        if !element.visible_at(elapsed) {
            return Err(ActionError::NotClickable(format!(
                "{} is not visible",
                self.selector
            )));
        }
        if require_enabled && !element.enabled_at(elapsed) {
            return Err(ActionError::NotEnabled(self.selector.to_string()));
        }
        f(element)
    }
}

#[async_trait]
impl ElementHandle for StubHandle {
    fn selector(&self) -> &Selector {
        &self.selector
    }

    async fn is_visible(&self) -> Result<bool, ActionError> {
        self.state.record(StubEvent::Probe(self.selector.clone()));
        if self.inspect(|element, _| element.unresponsive) == Some(true) {
            std::future::pending::<()>().await;
        }
        Ok(self
            .inspect(|element, elapsed| element.visible_at(elapsed))
            .unwrap_or(false))
    }

    async fn is_enabled(&self) -> Result<bool, ActionError> {
        Ok(self
            .inspect(|element, elapsed| element.enabled_at(elapsed))
            .unwrap_or(false))
    }

    async fn text_content(&self) -> Result<Option<String>, ActionError> {
        Ok(self
            .inspect(|element, elapsed| element.text_at(elapsed).unwrap_or_default()))
    }

    async fn wait_for(&self, state: ElementState, timeout: Duration) -> Result<(), ActionError> {
        self.state.record(StubEvent::Wait(StubWait {
            selector: self.selector.clone(),
            state,
            timeout,
        }));
        poll_element_state(self, state, timeout).await
    }

    async fn fill(&self, value: &str) -> Result<(), ActionError> {
        self.interact(true, |element| {
            element.value = value.to_string();
            Ok(())
        })?;
        self.state.record(StubEvent::Fill {
            selector: self.selector.clone(),
            value: value.to_string(),
        });
        Ok(())
    }

    async fn clear(&self) -> Result<(), ActionError> {
        self.interact(true, |element| {
            element.value.clear();
            Ok(())
        })?;
        self.state.record(StubEvent::Clear(self.selector.clone()));
        Ok(())
    }

    async fn click(&self, button: MouseButton) -> Result<(), ActionError> {
        self.interact(true, |_| Ok(()))?;
        self.state.record(StubEvent::Click {
            selector: self.selector.clone(),
            button,
        });
        Ok(())
    }

    async fn double_click(&self) -> Result<(), ActionError> {
        self.interact(true, |_| Ok(()))?;
        self.state
            .record(StubEvent::DoubleClick(self.selector.clone()));
        Ok(())
    }

    async fn hover(&self) -> Result<(), ActionError> {
        self.interact(false, |_| Ok(()))?;
        self.state.record(StubEvent::Hover(self.selector.clone()));
        Ok(())
    }

    async fn set_checked(&self, checked: bool) -> Result<(), ActionError> {
        self.interact(true, |element| {
            element.checked = checked;
            Ok(())
        })?;
        self.state.record(StubEvent::SetChecked {
            selector: self.selector.clone(),
            checked,
        });
        Ok(())
    }

    async fn select_option(&self, option: &SelectOption) -> Result<(), ActionError> {
        self.interact(true, |element| {
            let wanted = option.as_str();
            let found = element.options.iter().find(|(value, label)| match option {
                SelectOption::ValueOrLabel(_) => value == wanted || label == wanted,
                SelectOption::Label(_) => label == wanted,
            });
            match found {
                Some((value, _)) => {
                    element.value = value.clone();
                    Ok(())
                }
                None => Err(ActionError::OptionNotFound(wanted.to_string())),
            }
        })?;
        self.state.record(StubEvent::Select {
            selector: self.selector.clone(),
            option: option.clone(),
        });
        Ok(())
    }

    async fn press(&self, key: &str) -> Result<(), ActionError> {
        self.interact(false, |_| Ok(()))?;
        self.state.record(StubEvent::Press {
            selector: self.selector.clone(),
            key: key.to_string(),
        });
        Ok(())
    }
}

#[async_trait]
impl BrowserPage for StubPage {
    fn locate(&self, selector: Selector) -> Arc<dyn ElementHandle> {
        Arc::new(StubHandle {
            selector,
            state: Arc::clone(&self.state),
        })
    }

    async fn goto(&self, url: &str) -> Result<(), ActionError> {
        self.state.record(StubEvent::Goto(url.to_string()));
        Ok(())
    }

    async fn wait_for_load_state(
        &self,
        state: LoadState,
        timeout: Duration,
    ) -> Result<(), ActionError> {
        self.state.record(StubEvent::LoadState { state, timeout });
        if self.state.failing_states.lock().contains(&state) {
            return Err(ActionError::WaitTimeout(format!(
                "{} not reached after {}ms",
                state.name(),
                timeout.as_millis()
            )));
        }
        Ok(())
    }

    async fn press_key(&self, key: &str) -> Result<(), ActionError> {
        self.state.record(StubEvent::PageKey(key.to_string()));
        Ok(())
    }

    async fn screenshot(&self) -> Result<Vec<u8>, ActionError> {
        self.state.record(StubEvent::Screenshot);
        Ok(FAKE_PNG.to_vec())
    }

    async fn has_visible_text(&self, text: &str) -> Result<bool, ActionError> {
        let elapsed = self.state.started.elapsed();
        let elements = self.state.elements.lock();
        Ok(elements.iter().any(|element| {
            element.visible_at(elapsed)
                && element
                    .text_at(elapsed)
                    .map_or(false, |content| content.contains(text))
        }))
    }

    async fn switch_window(&self, target: WindowTarget) -> Result<bool, ActionError> {
        let index = {
            let mut windows = self.state.windows.lock();
            let (count, current) = *windows;
            let index = match target {
                WindowTarget::Next => current + 1,
                WindowTarget::Index(index) => index,
            };
            if index >= count {
                return Ok(false);
            }
            windows.1 = index;
            index
        };
        self.state.record(StubEvent::SwitchWindow(index));
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_declared_element_wins() {
        let page = StubPage::new()
            .with_element(StubElement::new(Selector::id("a")).with_text("first"))
            .with_element(
                StubElement::new(Selector::id("b"))
                    .matching(Selector::id("a"))
                    .with_text("second"),
            );

        let text = tokio_test::block_on(page.locate(Selector::id("a")).text_content()).unwrap();
        assert_eq!(text.as_deref(), Some("first"));
        let text = tokio_test::block_on(page.locate(Selector::id("b")).text_content()).unwrap();
        assert_eq!(text.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn missing_element_is_invisible_but_not_interactable() {
        let page = StubPage::new();
        let handle = page.locate(Selector::id("nope"));
        assert!(!handle.is_visible().await.unwrap());
        assert_eq!(handle.text_content().await.unwrap(), None);
        assert!(matches!(
            handle.click(MouseButton::Left).await,
            Err(ActionError::ElementNotFound(_))
        ));
        assert!(page.interactions().is_empty());
    }

    #[tokio::test]
    async fn fill_and_select_update_value() {
        let page = StubPage::new()
            .with_element(StubElement::new(Selector::id("name")))
            .with_element(
                StubElement::new(Selector::id("country"))
                    .with_option("us", "United States")
                    .with_option("ca", "Canada"),
            );

        page.locate(Selector::id("name")).fill("Ada").await.unwrap();
        assert_eq!(page.value_of(&Selector::id("name")).as_deref(), Some("Ada"));

        let country = page.locate(Selector::id("country"));
        country
            .select_option(&SelectOption::Label("Canada".into()))
            .await
            .unwrap();
        assert_eq!(page.value_of(&Selector::id("country")).as_deref(), Some("ca"));
        assert!(matches!(
            country
                .select_option(&SelectOption::Label("us".into()))
                .await,
            Err(ActionError::OptionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn wait_times_out_and_is_recorded() {
        let page = StubPage::new()
            .with_element(StubElement::new(Selector::id("ghost")).hidden());
        let err = page
            .locate(Selector::id("ghost"))
            .wait_for(ElementState::Visible, Duration::from_millis(50))
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::WaitTimeout(_)));
        assert_eq!(page.waits().len(), 1);
        assert_eq!(page.waits()[0].timeout, Duration::from_millis(50));
    }

    #[tokio::test]
    async fn switch_window_respects_tab_count() {
        let page = StubPage::new().with_windows(2);
        assert!(page.switch_window(WindowTarget::Next).await.unwrap());
        assert_eq!(page.current_window(), 1);
        assert!(!page.switch_window(WindowTarget::Next).await.unwrap());
        assert!(page.switch_window(WindowTarget::Index(0)).await.unwrap());
        assert!(!page.switch_window(WindowTarget::Index(5)).await.unwrap());
        assert_eq!(page.current_window(), 0);
    }
}
