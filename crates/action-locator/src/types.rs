//! Core types for locator system

use crate::errors::LocatorError;
use action_primitives::{ElementHandle, Selector};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Locator strategy enumeration
///
/// The exact strategies run in order; the healing strategies only run when
/// every exact strategy missed and a fingerprint was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocatorStrategy {
    /// Recorded XPath
    XPath,

    /// `#id`
    Id,

    /// Exact visible text
    Text,

    /// Accessible label taken from the fingerprint's nearby text
    HealLabel,

    /// Fingerprint role plus accessible name
    HealSemantic,

    /// Same kind of element positioned near the fingerprint's nearby text
    HealProximity,
}

impl LocatorStrategy {
    /// Get strategy name as string
    pub fn name(&self) -> &'static str {
        match self {
            LocatorStrategy::XPath => "xpath",
            LocatorStrategy::Id => "id",
            LocatorStrategy::Text => "text",
            LocatorStrategy::HealLabel => "heal-label",
            LocatorStrategy::HealSemantic => "heal-semantic",
            LocatorStrategy::HealProximity => "heal-proximity",
        }
    }

    pub fn is_healing(&self) -> bool {
        matches!(
            self,
            LocatorStrategy::HealLabel | LocatorStrategy::HealSemantic | LocatorStrategy::HealProximity
        )
    }
}

impl fmt::Display for LocatorStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of probing one selector
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    Matched,
    NotVisible,
    Failed(LocatorError),
}

/// One entry in the resolution trace
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeAttempt {
    pub strategy: LocatorStrategy,
    pub selector: Selector,
    pub outcome: ProbeOutcome,
}

/// Heal outcome enumeration
pub enum HealOutcome {
    /// A healing strategy found a visible element
    Healed {
        strategy: LocatorStrategy,
        handle: Arc<dyn ElementHandle>,
    },

    /// Healing not attempted (e.g. no fingerprint recorded)
    Skipped { reason: String },

    /// Every healing strategy missed
    Exhausted,
}

impl fmt::Debug for HealOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealOutcome::Healed { strategy, handle } => f
                .debug_struct("Healed")
                .field("strategy", strategy)
                .field("selector", handle.selector())
                .finish(),
            HealOutcome::Skipped { reason } => {
                f.debug_struct("Skipped").field("reason", reason).finish()
            }
            HealOutcome::Exhausted => f.write_str("Exhausted"),
        }
    }
}

/// Element resolution result
///
/// Always carries a handle. When no strategy matched, the handle is built
/// from the recorded XPath and `strategy` is `None`; using it fails at the
/// point of interaction.
#[derive(Clone)]
pub struct Resolution {
    pub handle: Arc<dyn ElementHandle>,

    /// Strategy that matched, `None` for the last-resort handle
    pub strategy: Option<LocatorStrategy>,

    /// Every probe made while resolving, in order
    pub attempts: Vec<ProbeAttempt>,
}

impl Resolution {
    pub fn matched(
        handle: Arc<dyn ElementHandle>,
        strategy: LocatorStrategy,
        attempts: Vec<ProbeAttempt>,
    ) -> Self {
        Self {
            handle,
            strategy: Some(strategy),
            attempts,
        }
    }

    pub fn last_resort(handle: Arc<dyn ElementHandle>, attempts: Vec<ProbeAttempt>) -> Self {
        Self {
            handle,
            strategy: None,
            attempts,
        }
    }

    /// Whether a healing strategy produced the match
    pub fn from_heal(&self) -> bool {
        self.strategy.map_or(false, |s| s.is_healing())
    }

    pub fn is_last_resort(&self) -> bool {
        self.strategy.is_none()
    }

    pub fn selector(&self) -> &Selector {
        self.handle.selector()
    }
}

impl fmt::Debug for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolution")
            .field("selector", self.handle.selector())
            .field("strategy", &self.strategy)
            .field("attempts", &self.attempts)
            .finish()
    }
}
