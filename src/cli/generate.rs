use std::path::PathBuf;

use agent_core::{validate_plan, StaticPlanner};
use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;
use soulbrowser_instrumentation::generate;

use super::context::CliContext;
use super::output::{print_json, OutputFormat};

#[derive(Args, Clone, Debug)]
pub struct GenerateArgs {
    /// Plan JSON to validate and render
    #[arg(long, value_name = "FILE")]
    pub plan_file: PathBuf,

    /// Console group label; defaults to the plan explanation
    #[arg(long)]
    pub label: Option<String>,
}

pub fn cmd_generate(args: GenerateArgs, ctx: &CliContext) -> Result<()> {
    let raw = StaticPlanner::from_file(&args.plan_file)?;
    let plan = validate_plan(raw.plan_value())
        .with_context(|| format!("plan {} is invalid", args.plan_file.display()))?;
    let label = args
        .label
        .filter(|label| !label.trim().is_empty())
        .or_else(|| plan.explanation.clone())
        .unwrap_or_else(|| plan.describe());
    let fragment = generate(&plan, &label);

    match ctx.output() {
        OutputFormat::Json => print_json(&json!({
            "plan": plan,
            "label": label,
            "fragment": fragment,
        })),
        OutputFormat::Human => {
            println!("{fragment}");
            Ok(())
        }
    }
}
