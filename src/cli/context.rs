use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use stepwright_cli::{default_registry, AppConfig, StepDispatcher};
use stepwright_repository::StepRepository;

pub struct CliContext {
    config: Arc<AppConfig>,
    config_path: PathBuf,
}

impl CliContext {
    pub fn new(config: AppConfig, config_path: PathBuf) -> Self {
        Self {
            config: Arc::new(config),
            config_path,
        }
    }

    pub fn config(&self) -> &AppConfig {
        self.config.as_ref()
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn repository(&self) -> Arc<dyn StepRepository> {
        Arc::new(self.config.repository())
    }

    /// Dispatcher over the file repository, the shipped manual steps and
    /// the configured environment
    pub fn dispatcher(&self) -> Result<StepDispatcher> {
        let environment = Arc::new(self.config.load_environment());
        let executor = Arc::new(self.config.build_executor(environment));
        let registry = default_registry().context("Failed to build manual step registry")?;
        Ok(StepDispatcher::new(
            self.repository(),
            Arc::new(registry),
            executor,
        ))
    }
}
