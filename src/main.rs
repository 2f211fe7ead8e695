//! Binary entry point for the rigup CLI.

use std::io::{self, Write};
use std::process;

use clap::Parser;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use rigup::{
    Distribution, Plan, ProvisionConfig, ProvisionError, Provisioner, RemoteError, SshConfig,
    SshExecutor,
};

mod cli;

use cli::{ApplyCommand, Cli, PlanCommand};

#[derive(Debug, Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("ssh configuration error: {0}")]
    Ssh(String),
    #[error("provisioning failed: {0}")]
    Provision(#[from] ProvisionError<RemoteError>),
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();
    let exit_code = match dispatch(cli).await {
        Ok(code) => code,
        Err(err) => {
            report_error(&err);
            1
        }
    };

    process::exit(exit_code);
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();
}

async fn dispatch(cli: Cli) -> Result<i32, CliError> {
    match cli {
        Cli::Apply(command) => apply_command(&command).await,
        Cli::Plan(command) => plan_command(&command),
    }
}

async fn apply_command(args: &ApplyCommand) -> Result<i32, CliError> {
    let (config, distribution) = load_provision_config(args.distribution.as_deref())?;
    let ssh_config =
        SshConfig::load_without_cli_args().map_err(|err| CliError::Ssh(err.to_string()))?;
    let connection = ssh_config
        .connection()
        .map_err(|err| CliError::Ssh(err.to_string()))?;

    let plan = Plan::for_distribution(distribution, &config.plan_options(&connection.user));
    let executor = SshExecutor::with_process_runner(ssh_config, connection)
        .map_err(|err| CliError::Ssh(err.to_string()))?;

    let summary = Provisioner::new(executor).execute(&plan).await?;
    tracing::info!(
        distribution = %summary.distribution,
        commands = summary.commands_submitted,
        "setup complete"
    );
    Ok(0)
}

fn plan_command(args: &PlanCommand) -> Result<i32, CliError> {
    let (config, distribution) = load_provision_config(args.distribution.as_deref())?;
    let ssh_config =
        SshConfig::load_without_cli_args().map_err(|err| CliError::Ssh(err.to_string()))?;
    ssh_config
        .validate()
        .map_err(|err| CliError::Ssh(err.to_string()))?;

    let plan = Plan::for_distribution(distribution, &config.plan_options(&ssh_config.user));
    render_plan(io::stdout(), &plan);
    Ok(0)
}

fn load_provision_config(
    distribution_override: Option<&str>,
) -> Result<(ProvisionConfig, Distribution), CliError> {
    let mut config =
        ProvisionConfig::load_without_cli_args().map_err(|err| CliError::Config(err.to_string()))?;
    if let Some(label) = distribution_override {
        config.distribution = label.to_owned();
    }
    config
        .validate()
        .map_err(|err| CliError::Config(err.to_string()))?;
    let distribution = config
        .resolved_distribution()
        .map_err(|err| CliError::Config(err.to_string()))?;
    Ok((config, distribution))
}

fn render_plan(mut target: impl Write, plan: &Plan) {
    writeln!(target, "update: {}: '{}'", plan.update.name, plan.update.shell).ok();
    for spec in &plan.setup {
        writeln!(target, "setup: {}: '{}'", spec.name, spec.shell).ok();
    }
    for spec in &plan.extras {
        writeln!(target, "extra: {}: '{}'", spec.name, spec.shell).ok();
    }
}

fn report_error(err: &CliError) {
    write_error(io::stderr(), err);
}

fn write_error(mut target: impl Write, err: &CliError) {
    writeln!(target, "{err}").ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use rigup::PlanOptions;

    fn sample_plan() -> Plan {
        Plan::for_distribution(
            Distribution::Debian,
            &PlanOptions {
                username: String::from("dev"),
                config_repo: String::from("https://github.com/ismail/config.git"),
                hacks_repo: String::from("https://github.com/ismail/hacks.git"),
            },
        )
    }

    #[test]
    fn render_plan_lists_update_setup_and_extras() {
        let mut buf = Vec::new();
        render_plan(&mut buf, &sample_plan());
        let rendered = String::from_utf8(buf).expect("utf8");

        assert!(
            rendered.starts_with(
                "update: update-system: 'sudo apt-get update && sudo apt-get dist-upgrade -y'\n"
            ),
            "rendered: {rendered}"
        );
        assert!(
            rendered.contains("setup: use-zsh: 'sudo chsh -s /bin/zsh dev'"),
            "rendered: {rendered}"
        );
        assert!(
            rendered.contains("extra: install-uv:"),
            "rendered: {rendered}"
        );
    }

    #[test]
    fn write_error_writes_cli_error() {
        let mut buf = Vec::new();
        let err = CliError::Config(String::from("unsupported distribution: arch"));
        write_error(&mut buf, &err);
        let rendered = String::from_utf8(buf).expect("utf8");
        assert!(
            rendered.contains("configuration error: unsupported distribution: arch"),
            "rendered: {rendered}"
        );
    }
}
