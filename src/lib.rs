//! Stepwright runner library
//!
//! Step dispatch, manual definitions, scenario parsing and configuration,
//! exposed for the `stepwright` binary and integration tests

pub mod config;
pub mod dispatch;
pub mod errors;
pub mod scenario;
pub mod steps;

pub use config::{AppConfig, BrowserSettings};
pub use dispatch::{StepDispatcher, StepOutcome};
pub use errors::StepError;
pub use scenario::{Scenario, ScenarioStep};
pub use steps::{default_registry, CustomStepRegistry, ManualStep, StepContext};
