use std::fs as stdfs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use stepwright_cli::AppConfig;
use tokio::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Set up `tracing`. With a log dir, every event is also written to a fresh
/// `execution_<timestamp>.log` there; keep the returned guard alive until exit.
pub fn init_logging(level: &str, debug: bool, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        level.parse().context("Invalid log level")?
    };

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            stdfs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::never(dir, execution_log_name(Local::now()));
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    // stdout is reserved for command output
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string())))
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    Ok(guard)
}

pub fn execution_log_name(now: DateTime<Local>) -> String {
    format!("execution_{}.log", now.format("%Y%m%d_%H%M%S"))
}

pub struct LoadedConfig {
    pub config: AppConfig,
    pub path: PathBuf,
    pub found: bool,
}

fn default_config_path() -> PathBuf {
    // Priority: ./config/stepwright.yaml > ~/.config/stepwright/config.yaml
    let local_config = PathBuf::from("config/stepwright.yaml");
    if local_config.exists() {
        return local_config;
    }
    match dirs::config_dir() {
        Some(mut path) => {
            path.push("stepwright");
            path.push("config.yaml");
            path
        }
        None => local_config,
    }
}

/// Read the YAML config (or defaults when there is none), then apply
/// environment overrides
pub async fn load_config(config_path: Option<&PathBuf>) -> Result<LoadedConfig> {
    let config_path = match config_path {
        Some(path) => path.clone(),
        None => default_config_path(),
    };

    let (mut config, found) = if config_path.exists() {
        let content = fs::read_to_string(&config_path)
            .await
            .context("Failed to read config file")?;
        let config: AppConfig =
            serde_yaml::from_str(&content).context("Failed to parse config file")?;
        (config, true)
    } else {
        (AppConfig::default(), false)
    };
    config.apply_env_overrides();

    Ok(LoadedConfig {
        config,
        path: config_path,
        found,
    })
}
