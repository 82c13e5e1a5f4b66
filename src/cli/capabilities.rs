use anyhow::{Context, Result};
use cdp_adapter::{resolve_bridge_capability, summarize_capabilities};
use clap::Args;
use serde_json::json;

use super::context::CliContext;
use super::output::{print_json, OutputFormat};

#[derive(Args, Clone, Debug)]
pub struct CapabilitiesArgs {
    /// Explicit capability name to resolve to
    #[arg(long)]
    pub capability: Option<String>,
}

pub async fn cmd_capabilities(args: CapabilitiesArgs, ctx: &CliContext) -> Result<()> {
    let host = ctx.host().await?;
    let capabilities = host
        .list_capabilities()
        .await
        .context("failed to list bridge capabilities")?;
    let explicit = ctx.capability_override(args.capability);
    let resolved = resolve_bridge_capability(&capabilities, explicit.as_deref());

    match ctx.output() {
        OutputFormat::Json => print_json(&json!({
            "capabilities": capabilities,
            "resolved": resolved,
        })),
        OutputFormat::Human => {
            println!("{}", summarize_capabilities(&capabilities));
            println!();
            match resolved {
                Some(name) => println!("Bridge capability: {name}"),
                None => println!(
                    "Bridge capability: none found (set bridge.capability or pass --capability)"
                ),
            }
            Ok(())
        }
    }
}
