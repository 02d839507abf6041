//! Locator strategy implementations

use crate::{
    errors::LocatorError,
    types::{LocatorStrategy, ProbeAttempt, ProbeOutcome},
};
use action_primitives::{BrowserPage, ElementHandle, Selector};
use std::sync::Arc;
use std::time::Duration;
use stepwright_core_types::ElementDescriptor;
use tokio::time::timeout;
use tracing::debug;

/// Strategy trait
///
/// A strategy only builds a selector from the descriptor; probing is shared.
pub trait Strategy: Send + Sync {
    /// Selector for this strategy, `None` when the descriptor lacks the data
    fn selector(&self, descriptor: &ElementDescriptor) -> Option<Selector>;

    /// Get strategy type
    fn strategy_type(&self) -> LocatorStrategy;

    /// Get strategy name
    fn name(&self) -> &'static str {
        self.strategy_type().name()
    }
}

/// Recorded XPath, matched exactly
pub struct XPathStrategy;

impl Strategy for XPathStrategy {
    fn selector(&self, descriptor: &ElementDescriptor) -> Option<Selector> {
        descriptor.xpath().map(Selector::xpath)
    }

    fn strategy_type(&self) -> LocatorStrategy {
        LocatorStrategy::XPath
    }
}

/// `#id`
pub struct IdStrategy;

impl Strategy for IdStrategy {
    fn selector(&self, descriptor: &ElementDescriptor) -> Option<Selector> {
        descriptor.id().map(Selector::id)
    }

    fn strategy_type(&self) -> LocatorStrategy {
        LocatorStrategy::Id
    }
}

/// Exact visible text (trimmed)
pub struct TextStrategy;

impl Strategy for TextStrategy {
    fn selector(&self, descriptor: &ElementDescriptor) -> Option<Selector> {
        descriptor.text().map(|text| Selector::text(text, true))
    }

    fn strategy_type(&self) -> LocatorStrategy {
        LocatorStrategy::Text
    }
}

/// Exact strategies in resolution order
pub fn primary_strategies() -> Vec<Arc<dyn Strategy>> {
    vec![
        Arc::new(XPathStrategy),
        Arc::new(IdStrategy),
        Arc::new(TextStrategy),
    ]
}

/// Bounded visibility probe shared by all strategies
#[derive(Debug, Clone, Copy)]
pub struct Prober {
    pub timeout: Duration,
}

impl Default for Prober {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(1000),
        }
    }
}

impl Prober {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Probe `selector` once and record the attempt. Returns the handle when
    /// the element is currently visible.
    pub async fn probe(
        &self,
        page: &dyn BrowserPage,
        strategy: LocatorStrategy,
        selector: Selector,
        attempts: &mut Vec<ProbeAttempt>,
    ) -> Option<Arc<dyn ElementHandle>> {
        let handle = page.locate(selector.clone());
        let outcome = match timeout(self.timeout, handle.is_visible()).await {
            Ok(Ok(true)) => ProbeOutcome::Matched,
            Ok(Ok(false)) => ProbeOutcome::NotVisible,
            Ok(Err(err)) => ProbeOutcome::Failed(LocatorError::StrategyFailed {
                strategy: strategy.name().to_string(),
                reason: err.to_string(),
            }),
            Err(_) => ProbeOutcome::Failed(LocatorError::ProbeTimeout {
                strategy: strategy.name().to_string(),
                timeout_ms: self.timeout.as_millis() as u64,
            }),
        };

        debug!(
            strategy = strategy.name(),
            selector = %selector,
            outcome = ?outcome,
            "Probed locator"
        );

        let matched = outcome == ProbeOutcome::Matched;
        attempts.push(ProbeAttempt {
            strategy,
            selector,
            outcome,
        });
        matched.then_some(handle)
    }
}
