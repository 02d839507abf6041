//! Smart waiting: per-action timeout classes and page readiness

use crate::{
    errors::ActionError,
    page::{BrowserPage, ElementHandle},
    types::{ElementState, LoadState, PageReadiness, Selector},
};
use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use stepwright_core_types::ActionKind;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, info, warn};

/// Timeout class an action kind falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeoutClass {
    /// Page navigations
    Navigation,

    /// Assertions on page content
    Verification,

    /// Clicks, typing and everything else
    Interactive,

    /// Scrolling
    Scroll,
}

impl TimeoutClass {
    pub fn for_action(kind: &ActionKind) -> Self {
        match kind {
            ActionKind::Navigate | ActionKind::WaitNavigation => TimeoutClass::Navigation,
            ActionKind::VerifyText | ActionKind::VerifyElement => TimeoutClass::Verification,
            ActionKind::Scroll => TimeoutClass::Scroll,
            _ => TimeoutClass::Interactive,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TimeoutClass::Navigation => "navigation",
            TimeoutClass::Verification => "verification",
            TimeoutClass::Interactive => "interactive",
            TimeoutClass::Scroll => "scroll",
        }
    }
}

/// Wait bounds, in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitTimeouts {
    /// Navigation class, also the bound for the `load` milestone
    pub navigation_ms: u64,

    /// Verification class, also the bound for DOM ready and enabled polling
    pub verification_ms: u64,

    /// Interactive class (default for unlisted kinds)
    pub interactive_ms: u64,

    /// Scroll class, also the bound for network idle
    pub scroll_ms: u64,

    /// First visibility probe of `smart_wait`
    pub short_probe_ms: u64,

    /// Per-indicator bound while waiting for loading indicators to hide
    pub indicator_ms: u64,

    /// Interval between enabled-state checks
    pub poll_ms: u64,
}

impl Default for WaitTimeouts {
    fn default() -> Self {
        Self {
            navigation_ms: 120_000,
            verification_ms: 7_000,
            interactive_ms: 30_000,
            scroll_ms: 20_000,
            short_probe_ms: 20_000,
            indicator_ms: 5_000,
            poll_ms: 100,
        }
    }
}

impl WaitTimeouts {
    pub fn for_class(&self, class: TimeoutClass) -> Duration {
        let ms = match class {
            TimeoutClass::Navigation => self.navigation_ms,
            TimeoutClass::Verification => self.verification_ms,
            TimeoutClass::Interactive => self.interactive_ms,
            TimeoutClass::Scroll => self.scroll_ms,
        };
        Duration::from_millis(ms)
    }
}

/// Default loading indicators awaited hidden before a page counts as ready
pub fn default_loading_indicators() -> Vec<Selector> {
    vec![
        Selector::css_text("div", "Loading", true),
        Selector::css(".loading"),
        Selector::css(".spinner"),
        Selector::css("#loading"),
    ]
}

/// Waiting strategy trait
///
/// Waits report through their return value; a timeout is a `false` (or a
/// `false` field of [`PageReadiness`]), never a panic or a swallowed error.
#[async_trait]
pub trait WaitStrategy: Send + Sync {
    /// Timeout of the class `kind` belongs to
    fn timeout_for(&self, kind: &ActionKind) -> Duration;

    /// Short visibility probe, escalating to the class timeout on failure
    async fn smart_wait(&self, element: &dyn ElementHandle, kind: &ActionKind) -> bool;

    /// Single visibility wait bounded by the class timeout
    async fn wait_for_visible(&self, element: &dyn ElementHandle, kind: &ActionKind) -> bool;

    /// Visible, then enabled
    async fn wait_for_enabled(&self, element: &dyn ElementHandle) -> bool;

    /// Load, DOM ready, loading indicators, network idle.
    ///
    /// Advisory: every stage may time out, the result reports which settled.
    async fn wait_for_page_ready(&self, page: &dyn BrowserPage) -> PageReadiness;
}

/// Default smart waiting strategy
#[derive(Debug, Clone)]
pub struct SmartWaitStrategy {
    pub timeouts: WaitTimeouts,
    pub loading_indicators: Vec<Selector>,
}

impl Default for SmartWaitStrategy {
    fn default() -> Self {
        Self::new(WaitTimeouts::default())
    }
}

impl SmartWaitStrategy {
    pub fn new(timeouts: WaitTimeouts) -> Self {
        Self {
            timeouts,
            loading_indicators: default_loading_indicators(),
        }
    }

    pub fn with_loading_indicators(mut self, indicators: Vec<Selector>) -> Self {
        self.loading_indicators = indicators;
        self
    }

    fn ms(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    /// Element wait capped at `bound` plus one poll interval, even when the
    /// backend never answers.
    async fn bounded_wait(
        &self,
        element: &dyn ElementHandle,
        state: ElementState,
        bound: Duration,
    ) -> Result<(), ActionError> {
        let cap = bound + Self::ms(self.timeouts.poll_ms);
        match timeout(cap, element.wait_for(state, bound)).await {
            Ok(result) => result,
            Err(_) => Err(ActionError::WaitTimeout(format!(
                "{} gave no answer within {}ms",
                element.selector(),
                cap.as_millis()
            ))),
        }
    }

    async fn wait_indicator_hidden(&self, page: &dyn BrowserPage, selector: &Selector) -> bool {
        let indicator = page.locate(selector.clone());
        let bound = Self::ms(self.timeouts.indicator_ms);
        match timeout(bound, indicator.is_visible()).await {
            Ok(Ok(true)) => {}
            Ok(Ok(false)) => return true,
            Ok(Err(err)) => {
                debug!(indicator = %selector, error = %err, "Indicator check failed");
                return true;
            }
            Err(_) => {
                warn!(indicator = %selector, "Indicator check gave no answer");
                return false;
            }
        }

        debug!(indicator = %selector, "Waiting for loading indicator to hide");
        match self
            .bounded_wait(indicator.as_ref(), ElementState::Hidden, bound)
            .await
        {
            Ok(()) => true,
            Err(err) => {
                warn!(indicator = %selector, error = %err, "Loading indicator still visible");
                false
            }
        }
    }
}

#[async_trait]
impl WaitStrategy for SmartWaitStrategy {
    fn timeout_for(&self, kind: &ActionKind) -> Duration {
        self.timeouts.for_class(TimeoutClass::for_action(kind))
    }

    async fn smart_wait(&self, element: &dyn ElementHandle, kind: &ActionKind) -> bool {
        let short = Self::ms(self.timeouts.short_probe_ms);
        match self.bounded_wait(element, ElementState::Visible, short).await {
            Ok(()) => true,
            Err(err) => {
                debug!(
                    selector = %element.selector(),
                    error = %err,
                    "Short visibility probe failed, escalating to class timeout"
                );
                self.wait_for_visible(element, kind).await
            }
        }
    }

    async fn wait_for_visible(&self, element: &dyn ElementHandle, kind: &ActionKind) -> bool {
        let class = TimeoutClass::for_action(kind);
        let bound = self.timeouts.for_class(class);
        match self.bounded_wait(element, ElementState::Visible, bound).await {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    selector = %element.selector(),
                    class = class.name(),
                    timeout_ms = bound.as_millis() as u64,
                    error = %err,
                    "Element did not become visible"
                );
                false
            }
        }
    }

    async fn wait_for_enabled(&self, element: &dyn ElementHandle) -> bool {
        let bound = Self::ms(self.timeouts.verification_ms);
        if let Err(err) = self.bounded_wait(element, ElementState::Visible, bound).await {
            warn!(selector = %element.selector(), error = %err, "Element not visible");
            return false;
        }

        let started = Instant::now();
        loop {
            let remaining = bound.saturating_sub(started.elapsed());
            match timeout(remaining, element.is_enabled()).await {
                Ok(Ok(true)) => return true,
                Ok(Ok(false)) => {}
                Ok(Err(err)) => debug!(selector = %element.selector(), error = %err, "Enabled check failed"),
                Err(_) => debug!(selector = %element.selector(), "Enabled check gave no answer"),
            }
            if started.elapsed() >= bound {
                warn!(selector = %element.selector(), "Element did not become enabled");
                return false;
            }
            sleep(Self::ms(self.timeouts.poll_ms)).await;
        }
    }

    async fn wait_for_page_ready(&self, page: &dyn BrowserPage) -> PageReadiness {
        let started = Instant::now();

        let loaded = match page
            .wait_for_load_state(LoadState::Load, Self::ms(self.timeouts.navigation_ms))
            .await
        {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "Page load did not complete, continuing");
                false
            }
        };

        let dom_ready = match page
            .wait_for_load_state(
                LoadState::DomContentLoaded,
                Self::ms(self.timeouts.verification_ms),
            )
            .await
        {
            Ok(()) => true,
            Err(err) => {
                debug!(error = %err, "DOM ready wait did not settle");
                false
            }
        };

        let indicators = join_all(
            self.loading_indicators
                .iter()
                .map(|selector| self.wait_indicator_hidden(page, selector)),
        )
        .await;
        let indicators_cleared = indicators.into_iter().all(|cleared| cleared);

        let network_idle = match page
            .wait_for_load_state(LoadState::NetworkIdle, Self::ms(self.timeouts.scroll_ms))
            .await
        {
            Ok(()) => true,
            Err(err) => {
                debug!(error = %err, "Network idle wait did not settle");
                false
            }
        };

        let readiness = PageReadiness {
            loaded,
            dom_ready,
            indicators_cleared,
            network_idle,
        };
        info!(
            latency_ms = started.elapsed().as_millis() as u64,
            settled = readiness.is_settled(),
            "Page ready"
        );
        readiness
    }
}
