use std::path::PathBuf;

use action_flow::resolve_date;
use anyhow::{bail, Context, Result};
use clap::Args;
use stepwright_core_types::{extract_literals, normalize_step};
use stepwright_repository::StepRecorder;

use super::context::CliContext;

#[derive(Args, Clone, Debug)]
pub struct StepArgs {
    /// Step text, e.g. 'user enters "admin" in username'
    pub step: String,
}

#[derive(Args, Clone, Debug)]
pub struct RecordArgs {
    /// Step text the captured actions implement
    pub step: String,

    /// Captured actions, one JSON payload per line
    pub captured: PathBuf,
}

#[derive(Args, Clone, Debug)]
pub struct DateArgs {
    /// Relative ("25 days", "2 months") or absolute ("2026-01-11") date
    pub expr: String,

    /// Output pattern using YYYY, MMM, MM and DD tokens (defaults to the configured format)
    #[arg(short, long)]
    pub format: Option<String>,
}

pub fn cmd_normalize(args: StepArgs) -> Result<()> {
    println!("{}", normalize_step(&args.step).as_str());
    Ok(())
}

pub fn cmd_params(args: StepArgs) -> Result<()> {
    for literal in extract_literals(&args.step) {
        println!("{}", literal);
    }
    Ok(())
}

pub async fn cmd_show(args: StepArgs, ctx: &CliContext) -> Result<()> {
    let repository = ctx.repository();
    let key = normalize_step(&args.step);
    match repository
        .lookup(&key)
        .await
        .with_context(|| format!("Failed to read plan for {}", key.as_str()))?
    {
        Some(record) => {
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        None => {
            println!(
                "No recorded plan for {} (expected at {})",
                key.as_str(),
                repository.describe_location(&key)
            );
        }
    }
    Ok(())
}

pub async fn cmd_list(ctx: &CliContext) -> Result<()> {
    let keys = ctx
        .repository()
        .keys()
        .await
        .context("Failed to list recorded steps")?;
    if keys.is_empty() {
        println!(
            "No recorded steps in {}",
            ctx.config().repository_dir.display()
        );
    }
    for key in keys {
        println!("{}", key.as_str());
    }
    Ok(())
}

pub async fn cmd_forget(args: StepArgs, ctx: &CliContext) -> Result<()> {
    let key = normalize_step(&args.step);
    let removed = ctx
        .repository()
        .remove(&key)
        .await
        .with_context(|| format!("Failed to delete plan for {}", key.as_str()))?;
    if removed {
        println!("Deleted recorded plan {}", key.as_str());
    } else {
        println!("No recorded plan for {}", key.as_str());
    }
    Ok(())
}

pub async fn cmd_record(args: RecordArgs, ctx: &CliContext) -> Result<()> {
    let raw = tokio::fs::read_to_string(&args.captured)
        .await
        .with_context(|| format!("Failed to read {}", args.captured.display()))?;

    let recorder = StepRecorder::new(ctx.repository());
    for (index, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        recorder
            .capture_payload(line)
            .with_context(|| format!("{}:{}", args.captured.display(), index + 1))?;
    }
    if recorder.pending() == 0 {
        bail!("No captured actions in {}", args.captured.display());
    }

    let record = recorder
        .save(&args.step)
        .await
        .with_context(|| format!("Failed to save plan for {}", args.step))?;
    println!(
        "Saved {} actions as {}",
        record.actions.len(),
        record.normalized_step
    );
    Ok(())
}

pub fn cmd_date(args: DateArgs, ctx: &CliContext) -> Result<()> {
    let format = args
        .format
        .unwrap_or_else(|| ctx.config().executor.date_format.clone());
    println!("{}", resolve_date(&args.expr, &format));
    Ok(())
}
