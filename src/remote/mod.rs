//! Remote command submission over the system `ssh` client.
//!
//! The executor is the crate's remote-command primitive: it receives named
//! shell commands, runs them on the target host through `ssh`, and reports
//! per-command failures with the remote exit status. Submissions execute
//! synchronously in submission order, so a dependency recorded at submission
//! time is always satisfied before the dependent command runs.

use std::ffi::OsString;
use std::future::Future;
use std::pin::Pin;

use crate::plan::CommandSpec;

mod config;
mod identity;
mod types;
mod util;

pub use config::{DEFAULT_IDENTITY_FILE, DEFAULT_SSH_PORT, SshConfig, SshConfigError};
pub use identity::{IdentityError, resolve_identity_file};
pub use types::{CommandOutput, CommandRunner, Connection, ProcessCommandRunner, RemoteError};
pub use util::expand_tilde;

/// Handle returned once a command has been submitted and applied.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommandHandle {
    /// Name of the submitted command.
    pub name: String,
}

/// Future returned by executor submissions.
pub type SubmitFuture<'a, E> =
    Pin<Box<dyn Future<Output = Result<CommandHandle, E>> + Send + 'a>>;

/// Remote-command primitive: submits named shell commands for execution on
/// the target host, honouring declaration-order dependencies.
pub trait Executor {
    /// Error type surfaced by failed submissions.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Submits `spec` for execution, optionally depending on a previously
    /// submitted command having completed.
    fn submit<'a>(
        &'a self,
        spec: &'a CommandSpec,
        depends_on: Option<&'a CommandHandle>,
    ) -> SubmitFuture<'a, Self::Error>;
}

/// Executor backed by the system `ssh` client.
#[derive(Clone, Debug)]
pub struct SshExecutor<R: CommandRunner> {
    config: SshConfig,
    connection: Connection,
    runner: R,
}

impl SshExecutor<ProcessCommandRunner> {
    /// Convenience constructor that wires the real process runner.
    ///
    /// # Errors
    ///
    /// Returns [`SshConfigError::InvalidConfig`] when validation fails.
    pub fn with_process_runner(
        config: SshConfig,
        connection: Connection,
    ) -> Result<Self, SshConfigError> {
        Self::new(config, connection, ProcessCommandRunner)
    }
}

impl<R: CommandRunner> SshExecutor<R> {
    /// Creates a new executor using the provided runner and configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SshConfigError::InvalidConfig`] when configuration
    /// validation fails.
    pub fn new(config: SshConfig, connection: Connection, runner: R) -> Result<Self, SshConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            connection,
            runner,
        })
    }

    /// Returns the connection the executor submits through.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Runs `spec` on the target host and returns its handle.
    ///
    /// The shell text is passed verbatim as the final `ssh` argument; only
    /// the connection details are turned into client options.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Spawn`] when the ssh client cannot be started
    /// and [`RemoteError::CommandFailed`] when the remote command exits
    /// non-zero or terminates without an exit status.
    pub fn run_command(&self, spec: &CommandSpec) -> Result<CommandHandle, RemoteError> {
        let args = self.build_ssh_args(&spec.shell);
        let output = self.runner.run(&self.config.ssh_bin, &args)?;

        if output.is_success() {
            return Ok(CommandHandle {
                name: spec.name.clone(),
            });
        }

        let status_text = output
            .code
            .map_or_else(|| String::from("unknown"), |code| code.to_string());
        Err(RemoteError::CommandFailed {
            name: spec.name.clone(),
            status: output.code,
            status_text,
            stderr: output.stderr,
        })
    }

    fn build_ssh_args(&self, shell: &str) -> Vec<OsString> {
        let mut args = vec![
            OsString::from("-p"),
            OsString::from(self.connection.port.to_string()),
            OsString::from("-i"),
            OsString::from(self.connection.identity_file.as_str()),
        ];

        if self.config.batch_mode {
            args.push(OsString::from("-o"));
            args.push(OsString::from("BatchMode=yes"));
        }

        if !self.config.strict_host_key_checking {
            args.push(OsString::from("-o"));
            args.push(OsString::from("StrictHostKeyChecking=no"));
        }

        if !self.config.known_hosts_file.trim().is_empty() {
            args.push(OsString::from("-o"));
            args.push(OsString::from(format!(
                "UserKnownHostsFile={}",
                self.config.known_hosts_file
            )));
        }

        args.push(OsString::from(format!(
            "{}@{}",
            self.connection.user, self.connection.host
        )));
        args.push(OsString::from(shell));
        args
    }
}

impl<R> Executor for SshExecutor<R>
where
    R: CommandRunner + Send + Sync,
{
    type Error = RemoteError;

    // Submissions execute synchronously in submission order, so the recorded
    // dependency is satisfied by the time the next submission starts.
    fn submit<'a>(
        &'a self,
        spec: &'a CommandSpec,
        _depends_on: Option<&'a CommandHandle>,
    ) -> SubmitFuture<'a, Self::Error> {
        Box::pin(async move { self.run_command(spec) })
    }
}

#[cfg(test)]
mod tests;
