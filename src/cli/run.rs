use std::path::PathBuf;
use std::sync::Arc;

use agent_core::{BreakpointPlanner, StaticPlanner};
use anyhow::{Context, Result};
use clap::Args;
use soulbrowser_breakpoints::{
    DebugSession, OpenAiConfig, OpenAiPlanner, SessionOptions, SessionReport,
};

use super::context::CliContext;
use super::output::{print_json, OutputFormat};

#[derive(Args, Clone, Debug)]
pub struct RunArgs {
    /// What you are trying to debug, in plain words
    #[arg(short, long)]
    pub goal: String,

    /// Page to load before inspecting
    #[arg(short, long)]
    pub url: Option<String>,

    /// Bridge capability to use instead of discovering one
    #[arg(long)]
    pub capability: Option<String>,

    /// Use this plan JSON instead of asking the planner
    #[arg(long, value_name = "FILE")]
    pub plan_file: Option<PathBuf>,

    /// Console group label for the breakpoint
    #[arg(long)]
    pub label: Option<String>,
}

pub async fn cmd_run(args: RunArgs, ctx: &CliContext) -> Result<()> {
    let planner = build_planner(args.plan_file.as_ref(), ctx)?;
    let host = ctx.host().await?;
    let session = DebugSession::new(host, planner)
        .with_capability_override(ctx.capability_override(args.capability))
        .with_outline_limits(ctx.config().outline);

    let options = SessionOptions {
        url: args.url,
        label: args.label,
    };
    let report = session
        .run(&args.goal, &options)
        .await
        .with_context(|| format!("breakpoint session for '{}' failed", args.goal.trim()))?;

    match ctx.output() {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Human => {
            print_report(&report);
            Ok(())
        }
    }
}

fn build_planner(
    plan_file: Option<&PathBuf>,
    ctx: &CliContext,
) -> Result<Arc<dyn BreakpointPlanner>> {
    if let Some(path) = plan_file {
        return Ok(Arc::new(StaticPlanner::from_file(path)?));
    }
    let planner = OpenAiPlanner::new(OpenAiConfig::from(&ctx.config().planner))?;
    Ok(Arc::new(planner))
}

fn print_report(report: &SessionReport) {
    println!("Goal: {}", report.goal);
    println!("Bridge capability: {}", report.capability);
    if report.outline_degraded {
        println!("DOM outline: unavailable (planned without page structure)");
    }
    println!("Plan: {}", report.plan.describe());
    if let Some(explanation) = &report.plan.explanation {
        println!("Why: {explanation}");
    }
    for note in &report.plan.console_notes {
        println!("- {note}");
    }
    println!("Label: {}", report.label);
    println!("Status: {}", report.outcome);
    if report.outcome.is_actionable_diagnostic() {
        println!(
            "Action needed: the page does not match the plan ({}); adjust the goal or load the right page and run again.",
            report.outcome
        );
    } else if report.outcome.is_installed() {
        println!("Breakpoint armed. Trigger it in the page with DevTools open.");
    }
}
