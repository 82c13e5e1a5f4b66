use anyhow::Result;
use clap::Args;
use soulbrowser_breakpoints::connect_bridge;
use tracing::warn;

use super::context::CliContext;
use super::output::{print_json, OutputFormat};

#[derive(Args, Clone, Debug)]
pub struct OutlineArgs {
    /// Page to load before capturing
    #[arg(short, long)]
    pub url: Option<String>,

    /// Override outline.max_depth
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Override outline.max_children
    #[arg(long)]
    pub max_children: Option<usize>,

    /// Bridge capability to use instead of discovering one
    #[arg(long)]
    pub capability: Option<String>,
}

pub async fn cmd_outline(args: OutlineArgs, ctx: &CliContext) -> Result<()> {
    let mut limits = ctx.config().outline;
    if let Some(depth) = args.max_depth {
        limits.max_depth = depth;
    }
    if let Some(children) = args.max_children {
        limits.max_children = children;
    }

    let host = ctx.host().await?;
    let capability = ctx.capability_override(args.capability);
    let bridge = connect_bridge(host, capability.as_deref()).await?;
    bridge.open(args.url.as_deref()).await;
    let outline = bridge.capture_outline(limits).await;
    if outline.degraded {
        warn!(target: "outline", "document could not be summarized");
    }

    match ctx.output() {
        OutputFormat::Json => print_json(&outline),
        OutputFormat::Human => {
            println!("{}", outline.text);
            Ok(())
        }
    }
}
