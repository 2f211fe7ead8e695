//! Command-line interface definitions for the `rigup` binary.
//!
//! This module centralises the clap parser structures so both the main binary
//! and the build script can reuse them when generating the manual page.

use clap::Parser;

/// Top-level CLI for the `rigup` binary.
#[derive(Debug, Parser)]
#[command(
    name = "rigup",
    about = "Outfit a freshly created local VM over SSH",
    arg_required_else_help = true
)]
pub(crate) enum Cli {
    /// Run the full provisioning flow against the target VM.
    #[command(name = "apply", about = "Update, install, and configure the target VM")]
    Apply(ApplyCommand),
    /// Print the resolved command plan without connecting.
    #[command(name = "plan", about = "Print the commands that apply would run")]
    Plan(PlanCommand),
}

/// Arguments for the `rigup apply` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct ApplyCommand {
    /// Override the target distribution for this run.
    ///
    /// Accepted values are `fedora`, `ubuntu`, and `debian`; anything else is
    /// rejected before any remote connection is attempted.
    #[arg(long, value_name = "DISTRIBUTION")]
    pub(crate) distribution: Option<String>,
}

/// Arguments for the `rigup plan` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct PlanCommand {
    /// Override the target distribution for this run.
    #[arg(long, value_name = "DISTRIBUTION")]
    pub(crate) distribution: Option<String>,
}
