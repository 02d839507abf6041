//! Browser session seam
//!
//! Step execution only ever talks to a page through these traits, so the
//! same plans run against Chromium or against the scripted stub page.

use crate::{
    errors::ActionError,
    types::{ElementState, LoadState, MouseButton, SelectOption, Selector, WindowTarget},
};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Interval between state checks while polling an element
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Lazy handle to the first element matching a selector.
///
/// Queries report a missing element as "not visible" rather than an error;
/// interactions on a missing element fail.
#[async_trait]
pub trait ElementHandle: Send + Sync {
    /// Selector this handle evaluates
    fn selector(&self) -> &Selector;

    async fn is_visible(&self) -> Result<bool, ActionError>;

    async fn is_enabled(&self) -> Result<bool, ActionError>;

    /// Raw text content, `None` when the element is missing
    async fn text_content(&self) -> Result<Option<String>, ActionError>;

    /// Wait until the element reaches `state` or `timeout` elapses
    async fn wait_for(&self, state: ElementState, timeout: Duration) -> Result<(), ActionError> {
        poll_element_state(self, state, timeout).await
    }

    /// Replace the element's value
    async fn fill(&self, value: &str) -> Result<(), ActionError>;

    async fn clear(&self) -> Result<(), ActionError>;

    async fn click(&self, button: MouseButton) -> Result<(), ActionError>;

    async fn double_click(&self) -> Result<(), ActionError>;

    async fn hover(&self) -> Result<(), ActionError>;

    async fn set_checked(&self, checked: bool) -> Result<(), ActionError>;

    async fn select_option(&self, option: &SelectOption) -> Result<(), ActionError>;

    /// Press a key while the element has focus
    async fn press(&self, key: &str) -> Result<(), ActionError>;
}

/// One browser tab as seen by step execution
#[async_trait]
pub trait BrowserPage: Send + Sync {
    /// Build a lazy handle; nothing is queried until the handle is used
    fn locate(&self, selector: Selector) -> Arc<dyn ElementHandle>;

    async fn goto(&self, url: &str) -> Result<(), ActionError>;

    async fn wait_for_load_state(
        &self,
        state: LoadState,
        timeout: Duration,
    ) -> Result<(), ActionError>;

    /// Press a key on whatever currently has focus
    async fn press_key(&self, key: &str) -> Result<(), ActionError>;

    /// PNG bytes of the viewport
    async fn screenshot(&self) -> Result<Vec<u8>, ActionError>;

    /// Whether some visible element shows `text`
    async fn has_visible_text(&self, text: &str) -> Result<bool, ActionError>;

    /// Bring another tab to the front. Returns `false` when it does not exist.
    async fn switch_window(&self, target: WindowTarget) -> Result<bool, ActionError>;
}

/// Poll visibility until `state` is reached. Shared by backends that have no
/// native element wait.
pub async fn poll_element_state<H>(
    handle: &H,
    state: ElementState,
    timeout: Duration,
) -> Result<(), ActionError>
where
    H: ElementHandle + ?Sized,
{
    let started = Instant::now();
    loop {
        let visible = handle.is_visible().await?;
        let reached = match state {
            ElementState::Visible => visible,
            ElementState::Hidden => !visible,
        };
        if reached {
            return Ok(());
        }

        let elapsed = started.elapsed();
        if elapsed >= timeout {
            return Err(ActionError::WaitTimeout(format!(
                "{} not {:?} after {}ms",
                handle.selector(),
                state,
                timeout.as_millis()
            )));
        }
        sleep(POLL_INTERVAL.min(timeout - elapsed)).await;
    }
}
