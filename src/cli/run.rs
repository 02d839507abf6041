use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use stepwright_cli::{AppConfig, Scenario, StepDispatcher, StepOutcome};
use tracing::info;

use super::context::CliContext;

#[derive(Args, Clone, Debug)]
pub struct RunArgs {
    /// Scenario file, one step per line (Gherkin keywords optional)
    pub scenario: PathBuf,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,
}

pub async fn cmd_run(args: RunArgs, ctx: &CliContext) -> Result<()> {
    let source = tokio::fs::read_to_string(&args.scenario)
        .await
        .with_context(|| format!("Failed to read scenario {}", args.scenario.display()))?;
    let scenario = Scenario::parse(&source);
    if scenario.is_empty() {
        bail!("No steps found in {}", args.scenario.display());
    }

    info!(
        scenario = %args.scenario.display(),
        config = %ctx.config_path().display(),
        steps = scenario.len(),
        "Running scenario"
    );
    let dispatcher = ctx.dispatcher()?;
    let outcomes = run_in_browser(&scenario, &dispatcher, ctx.config(), args.headed).await?;

    for (step, outcome) in scenario.steps.iter().zip(&outcomes) {
        match outcome {
            StepOutcome::Recorded(report) => println!(
                "PASS  {}  ({} actions, {} healed, {} ms)",
                step.text,
                report.actions.len(),
                report.healed_actions().count(),
                report.latency_ms
            ),
            StepOutcome::Manual { pattern } => {
                println!("PASS  {}  (manual: {})", step.text, pattern)
            }
        }
    }
    println!("{} steps passed", outcomes.len());
    Ok(())
}

#[cfg(feature = "chromium")]
async fn run_in_browser(
    scenario: &Scenario,
    dispatcher: &StepDispatcher,
    config: &AppConfig,
    headed: bool,
) -> Result<Vec<StepOutcome>> {
    use action_primitives::chromium::{ChromiumOptions, ChromiumPage};
    use tracing::warn;

    let options = ChromiumOptions {
        headless: config.browser.headless && !headed,
        executable: config.browser.executable.clone(),
        window_width: config.browser.window_width,
        window_height: config.browser.window_height,
    };
    let page = ChromiumPage::launch(options)
        .await
        .context("Failed to launch Chromium")?;

    let outcomes = scenario.run(dispatcher, &page).await;
    if let Err(err) = page.close().await {
        warn!(error = %err, "Failed to close browser");
    }
    Ok(outcomes?)
}

#[cfg(not(feature = "chromium"))]
async fn run_in_browser(
    _scenario: &Scenario,
    _dispatcher: &StepDispatcher,
    _config: &AppConfig,
    _headed: bool,
) -> Result<Vec<StepOutcome>> {
    bail!("stepwright was built without the `chromium` feature; rebuild with `--features chromium` to run scenarios")
}
