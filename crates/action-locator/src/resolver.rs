//! Element resolver with exact strategies, healing and a last resort

use crate::{
    healer::{FingerprintHealer, SelfHealer},
    strategies::{primary_strategies, Prober, Strategy},
    types::*,
};
use action_primitives::{BrowserPage, LoadState, Selector};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use stepwright_core_types::ElementDescriptor;
use tracing::{debug, info, warn};

/// Element resolver trait
#[async_trait]
pub trait ElementResolver: Send + Sync {
    /// Resolve a descriptor to a live handle. Never fails: when nothing
    /// matches, the handle points at the recorded XPath.
    async fn resolve(&self, page: &dyn BrowserPage, descriptor: &ElementDescriptor) -> Resolution;
}

/// Default element resolver implementation
pub struct DefaultElementResolver {
    strategies: Vec<Arc<dyn Strategy>>,
    healer: Arc<dyn SelfHealer>,
    prober: Prober,
    dom_ready_timeout: Duration,
}

impl Default for DefaultElementResolver {
    fn default() -> Self {
        Self::new(Prober::default(), Duration::from_millis(5000))
    }
}

impl DefaultElementResolver {
    /// Create a resolver with the default strategies and healer
    pub fn new(prober: Prober, dom_ready_timeout: Duration) -> Self {
        Self {
            strategies: primary_strategies(),
            healer: Arc::new(FingerprintHealer::default()),
            prober,
            dom_ready_timeout,
        }
    }

    /// Replace the self-healer
    pub fn with_healer(mut self, healer: Arc<dyn SelfHealer>) -> Self {
        self.healer = healer;
        self
    }
}

#[async_trait]
impl ElementResolver for DefaultElementResolver {
    async fn resolve(&self, page: &dyn BrowserPage, descriptor: &ElementDescriptor) -> Resolution {
        let element = descriptor.display_name();
        info!(element = %element, "Resolving element");

        if let Err(err) = page
            .wait_for_load_state(LoadState::DomContentLoaded, self.dom_ready_timeout)
            .await
        {
            debug!(error = %err, "DOM not ready, probing anyway");
        }

        let mut attempts = Vec::new();

        for strategy in &self.strategies {
            let Some(selector) = strategy.selector(descriptor) else {
                continue;
            };
            if let Some(handle) = self
                .prober
                .probe(page, strategy.strategy_type(), selector, &mut attempts)
                .await
            {
                info!(
                    element = %element,
                    strategy = strategy.name(),
                    selector = %handle.selector(),
                    "Match found"
                );
                return Resolution::matched(handle, strategy.strategy_type(), attempts);
            }
        }

        warn!(element = %element, "Exact strategies failed, attempting self-heal");

        match self
            .healer
            .heal(page, descriptor, &self.prober, &mut attempts)
            .await
        {
            HealOutcome::Healed { strategy, handle } => {
                info!(
                    element = %element,
                    strategy = strategy.name(),
                    selector = %handle.selector(),
                    "[SUCCESS] Rediscovered element"
                );
                return Resolution::matched(handle, strategy, attempts);
            }
            HealOutcome::Skipped { reason } => {
                warn!(element = %element, reason = %reason, "Self-heal skipped");
            }
            HealOutcome::Exhausted => {}
        }

        let selector = Selector::xpath(descriptor.xpath().unwrap_or_default());
        warn!(
            element = %element,
            selector = %selector,
            attempts = attempts.len(),
            "All strategies failed, using last-resort locator"
        );
        Resolution::last_resort(page.locate(selector), attempts)
    }
}
