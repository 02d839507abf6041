use clap::Subcommand;

use super::run::RunArgs;
use super::steps::{DateArgs, RecordArgs, StepArgs};

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Run a scenario file against a Chromium session
    Run(RunArgs),

    /// Print the repository key for a step
    Normalize(StepArgs),

    /// Print the quoted literals of a step, in order
    Params(StepArgs),

    /// Print the recorded plan for a step
    Show(StepArgs),

    /// List recorded step keys
    List,

    /// Save captured actions (JSON lines) as the plan for a step
    Record(RecordArgs),

    /// Delete the recorded plan for a step so it can be re-recorded
    Forget(StepArgs),

    /// Resolve a date expression such as "25 days" or "2026-01-11"
    Date(DateArgs),
}

impl Commands {
    /// Only scenario runs get a per-run log file
    pub fn writes_execution_log(&self) -> bool {
        matches!(self, Commands::Run(_))
    }
}
