use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use super::context::CliContext;
use super::dispatch::dispatch;
use super::env::CliArgs;
use super::runtime::{init_logging, load_config, LoadedConfig};

pub async fn run() -> Result<()> {
    let cli = CliArgs::parse();

    let LoadedConfig {
        config,
        path,
        found,
    } = load_config(cli.config.as_ref()).await?;

    let log_dir = cli
        .command
        .writes_execution_log()
        .then(|| config.log_dir.clone());
    let _log_guard = init_logging(&cli.log_level, cli.debug, log_dir.as_deref())?;

    info!("Starting Stepwright v{}", env!("CARGO_PKG_VERSION"));
    if found {
        info!("Loaded configuration from: {}", path.display());
    } else {
        info!("Config file not found, using defaults: {}", path.display());
    }

    let cli_context = CliContext::new(config, path);

    match dispatch(&cli, &cli_context).await {
        Ok(()) => {
            info!("Command completed successfully");
            Ok(())
        }
        Err(err) => {
            error!("Command failed: {}", err);
            Err(err)
        }
    }
}
