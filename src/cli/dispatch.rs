use anyhow::Result;

use super::capabilities::cmd_capabilities;
use super::commands::Commands;
use super::context::CliContext;
use super::env::CliArgs;
use super::generate::cmd_generate;
use super::info::cmd_info;
use super::outline::cmd_outline;
use super::run::cmd_run;

pub async fn dispatch(cli: &CliArgs, ctx: &CliContext) -> Result<()> {
    match cli.command.clone() {
        Commands::Run(args) => cmd_run(args, ctx).await,
        Commands::Capabilities(args) => cmd_capabilities(args, ctx).await,
        Commands::Outline(args) => cmd_outline(args, ctx).await,
        Commands::Generate(args) => cmd_generate(args, ctx),
        Commands::Info => cmd_info(ctx),
    }
}
