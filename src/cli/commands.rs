use clap::Subcommand;

use super::capabilities::CapabilitiesArgs;
use super::generate::GenerateArgs;
use super::outline::OutlineArgs;
use super::run::RunArgs;

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Plan and install a breakpoint for a debugging goal
    Run(RunArgs),

    /// List bridge capabilities and show which one forwards protocol calls
    Capabilities(CapabilitiesArgs),

    /// Capture and print the outline of the inspected page
    Outline(OutlineArgs),

    /// Validate a plan file and print its instrumentation fragment (no bridge needed)
    Generate(GenerateArgs),

    /// Show version and build information
    Info,
}
