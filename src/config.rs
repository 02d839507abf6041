//! Runner configuration
//!
//! Loaded from YAML; every field has a default so partial files work.
//! Environment variables override the file.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use action_flow::{ExecutorConfig, StepExecutor};
use action_locator::{DefaultElementResolver, Prober};
use action_primitives::{Selector, SmartWaitStrategy, WaitTimeouts};
use serde::{Deserialize, Serialize};
use stepwright_core_types::{EnvironmentConfig, ENV_SELECTOR};
use stepwright_repository::{FileStepRepository, DEFAULT_REPOSITORY_DIR};

pub const REPOSITORY_ENV: &str = "STEPWRIGHT_REPOSITORY";
pub const HEADLESS_ENV: &str = "STEPWRIGHT_HEADLESS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    pub headless: bool,
    pub executable: Option<PathBuf>,
    pub window_width: u32,
    pub window_height: u32,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            executable: None,
            window_width: 1280,
            window_height: 800,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding one `<key>.json` plan per step
    pub repository_dir: PathBuf,

    /// Directory holding `<ENV>.json` variable files
    pub environments_dir: PathBuf,

    /// Environment name; `TEST_ENV` (or `DEV`) when unset
    pub environment: Option<String>,

    /// Per-run log files go here
    pub log_dir: PathBuf,

    pub executor: ExecutorConfig,
    pub waits: WaitTimeouts,

    /// Bound on each locator probe
    pub probe_timeout_ms: u64,

    /// Best-effort DOM-ready wait before locating
    pub dom_ready_timeout_ms: u64,

    /// Replaces the default loading indicators when set
    pub loading_indicators: Option<Vec<Selector>>,

    pub browser: BrowserSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            repository_dir: PathBuf::from(DEFAULT_REPOSITORY_DIR),
            environments_dir: PathBuf::from("src/environments"),
            environment: None,
            log_dir: PathBuf::from("logs"),
            executor: ExecutorConfig::default(),
            waits: WaitTimeouts::default(),
            probe_timeout_ms: 1_000,
            dom_ready_timeout_ms: 5_000,
            loading_indicators: None,
            browser: BrowserSettings::default(),
        }
    }
}

impl AppConfig {
    /// Apply `STEPWRIGHT_REPOSITORY`, `TEST_ENV` and `STEPWRIGHT_HEADLESS`
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup(REPOSITORY_ENV).filter(|v| !v.trim().is_empty()) {
            self.repository_dir = PathBuf::from(dir);
        }
        if let Some(env) = lookup(ENV_SELECTOR).filter(|v| !v.trim().is_empty()) {
            self.environment = Some(env);
        }
        if let Some(headless) = lookup(HEADLESS_ENV).and_then(|v| v.trim().parse::<bool>().ok()) {
            self.browser.headless = headless;
        }
    }

    pub fn environment_name(&self) -> String {
        self.environment
            .as_deref()
            .map(str::to_uppercase)
            .unwrap_or_else(EnvironmentConfig::selected_name)
    }

    pub fn load_environment(&self) -> EnvironmentConfig {
        EnvironmentConfig::load(&self.environments_dir, &self.environment_name())
    }

    pub fn repository(&self) -> FileStepRepository {
        FileStepRepository::new(&self.repository_dir)
    }

    pub fn wait_strategy(&self) -> SmartWaitStrategy {
        let strategy = SmartWaitStrategy::new(self.waits.clone());
        match &self.loading_indicators {
            Some(indicators) => strategy.with_loading_indicators(indicators.clone()),
            None => strategy,
        }
    }

    pub fn build_executor(&self, environment: Arc<EnvironmentConfig>) -> StepExecutor {
        let resolver = DefaultElementResolver::new(
            Prober::new(Duration::from_millis(self.probe_timeout_ms)),
            Duration::from_millis(self.dom_ready_timeout_ms),
        );
        StepExecutor::new(
            Arc::new(resolver),
            Arc::new(self.wait_strategy()),
            environment,
            self.executor.clone(),
        )
    }
}
