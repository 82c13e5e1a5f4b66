use anyhow::Result;

use super::context::CliContext;

pub fn cmd_info(ctx: &CliContext) -> Result<()> {
    let config = ctx.config();

    println!("soul-breakpoint");
    println!("===============");
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!("Build Date: {}", env!("BUILD_DATE"));
    println!("Git Commit: {} ({})", env!("GIT_HASH"), env!("GIT_BRANCH"));
    println!();

    println!("Configuration: {}", ctx.config_path().display());
    match &config.bridge.command {
        Some(command) => println!("- Bridge server: {} {}", command, config.bridge.args.join(" ")),
        None => println!("- Bridge server: (not configured)"),
    }
    println!(
        "- Bridge capability: {}",
        config
            .bridge
            .capability
            .as_deref()
            .unwrap_or("(discovered)")
    );
    println!(
        "- Outline limits: depth {} / {} children per node",
        config.outline.max_depth, config.outline.max_children
    );
    println!(
        "- Planner: {} at {} ({} API key(s))",
        config.planner.model,
        config.planner.api_base,
        config.planner.api_keys.len()
    );
    Ok(())
}
