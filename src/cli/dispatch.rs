use anyhow::Result;

use super::commands::Commands;
use super::context::CliContext;
use super::env::CliArgs;
use super::run::cmd_run;
use super::steps::{
    cmd_date, cmd_forget, cmd_list, cmd_normalize, cmd_params, cmd_record, cmd_show,
};

pub async fn dispatch(cli: &CliArgs, ctx: &CliContext) -> Result<()> {
    match cli.command.clone() {
        Commands::Run(args) => cmd_run(args, ctx).await,
        Commands::Normalize(args) => cmd_normalize(args),
        Commands::Params(args) => cmd_params(args),
        Commands::Show(args) => cmd_show(args, ctx).await,
        Commands::List => cmd_list(ctx).await,
        Commands::Record(args) => cmd_record(args, ctx).await,
        Commands::Forget(args) => cmd_forget(args, ctx).await,
        Commands::Date(args) => cmd_date(args, ctx),
    }
}
