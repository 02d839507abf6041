//! Fingerprint-based self-healing
//!
//! Healing never rewrites the recorded descriptor; it only finds a live
//! match for the current run.

use crate::{
    strategies::{Prober, Strategy},
    types::{HealOutcome, LocatorStrategy, ProbeAttempt},
};
use action_primitives::{BrowserPage, Selector};
use async_trait::async_trait;
use std::sync::Arc;
use stepwright_core_types::ElementDescriptor;
use tracing::{debug, info, warn};

/// Tags tried when the descriptor does not record one
const PROXIMITY_FALLBACK_TARGET: &str = "input, button, select";

/// Self-healer trait
#[async_trait]
pub trait SelfHealer: Send + Sync {
    /// Attempt to find the element from its fingerprint, recording every probe
    async fn heal(
        &self,
        page: &dyn BrowserPage,
        descriptor: &ElementDescriptor,
        prober: &Prober,
        attempts: &mut Vec<ProbeAttempt>,
    ) -> HealOutcome;
}

/// Accessible label equal to the fingerprint's nearby text
pub struct LabelHeal;

impl Strategy for LabelHeal {
    fn selector(&self, descriptor: &ElementDescriptor) -> Option<Selector> {
        descriptor.nearby_text().map(Selector::label)
    }

    fn strategy_type(&self) -> LocatorStrategy {
        LocatorStrategy::HealLabel
    }
}

/// Fingerprint role, narrowed by the recorded `aria-label` when present
pub struct SemanticHeal;

impl Strategy for SemanticHeal {
    fn selector(&self, descriptor: &ElementDescriptor) -> Option<Selector> {
        descriptor.fingerprint_role().map(|role| {
            Selector::role(role, descriptor.aria_label().map(str::to_string))
        })
    }

    fn strategy_type(&self) -> LocatorStrategy {
        LocatorStrategy::HealSemantic
    }
}

/// Recorded tag (or any form control) near the fingerprint's nearby text
pub struct ProximityHeal;

impl Strategy for ProximityHeal {
    fn selector(&self, descriptor: &ElementDescriptor) -> Option<Selector> {
        let anchor = descriptor.nearby_text()?;
        let target = descriptor.tag().unwrap_or(PROXIMITY_FALLBACK_TARGET);
        Some(Selector::near(target, anchor))
    }

    fn strategy_type(&self) -> LocatorStrategy {
        LocatorStrategy::HealProximity
    }
}

/// Default self-healer: label, then role + name, then proximity
pub struct FingerprintHealer {
    strategies: Vec<Arc<dyn Strategy>>,
}

impl Default for FingerprintHealer {
    fn default() -> Self {
        Self {
            strategies: vec![
                Arc::new(LabelHeal),
                Arc::new(SemanticHeal),
                Arc::new(ProximityHeal),
            ],
        }
    }
}

impl FingerprintHealer {
    pub fn new(strategies: Vec<Arc<dyn Strategy>>) -> Self {
        Self { strategies }
    }
}

#[async_trait]
impl SelfHealer for FingerprintHealer {
    async fn heal(
        &self,
        page: &dyn BrowserPage,
        descriptor: &ElementDescriptor,
        prober: &Prober,
        attempts: &mut Vec<ProbeAttempt>,
    ) -> HealOutcome {
        if descriptor.fingerprint.is_none() {
            return HealOutcome::Skipped {
                reason: "no fingerprint recorded".to_string(),
            };
        }

        info!(element = %descriptor.display_name(), "Attempting self-heal from fingerprint");

        for strategy in &self.strategies {
            let Some(selector) = strategy.selector(descriptor) else {
                debug!(strategy = strategy.name(), "Fingerprint lacks data for strategy");
                continue;
            };

            if let Some(handle) = prober
                .probe(page, strategy.strategy_type(), selector, attempts)
                .await
            {
                return HealOutcome::Healed {
                    strategy: strategy.strategy_type(),
                    handle,
                };
            }
        }

        warn!(element = %descriptor.display_name(), "Self-heal exhausted");
        HealOutcome::Exhausted
    }
}
