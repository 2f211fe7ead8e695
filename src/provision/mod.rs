//! Orchestrates the provisioning flow over a remote executor.
//!
//! The flow always updates the system first, then submits the ordered setup
//! chain with each command depending on its predecessor, and finally submits
//! the independent extras. The first failed submission aborts the run;
//! nothing after it is submitted. Errors carry the failing command's name and
//! shell text so callers can report exactly what stopped the run.

use thiserror::Error;

use crate::distro::Distribution;
use crate::plan::{CommandChain, CommandSet, Plan};
use crate::remote::{CommandHandle, Executor};

/// Errors surfaced while executing a provisioning plan.
#[derive(Debug, Error)]
pub enum ProvisionError<ExecutorError>
where
    ExecutorError: std::error::Error + 'static,
{
    /// Raised when the always-run system update fails.
    #[error("failed to update the system with '{shell}': {source}")]
    Update {
        /// Shell text of the update command.
        shell: String,
        /// Underlying submission error.
        #[source]
        source: ExecutorError,
    },
    /// Raised when an ordered setup command fails; later chain positions are
    /// never submitted.
    #[error("failed to run command '{shell}': {source}")]
    Setup {
        /// Name of the failing command.
        name: String,
        /// Shell text of the failing command.
        shell: String,
        /// Underlying submission error.
        #[source]
        source: ExecutorError,
    },
    /// Raised when an independent extra command fails; remaining extras are
    /// never submitted.
    #[error("failed to run command '{shell}': {source}")]
    Extra {
        /// Name of the failing command.
        name: String,
        /// Shell text of the failing command.
        shell: String,
        /// Underlying submission error.
        #[source]
        source: ExecutorError,
    },
}

/// Summary returned after a successful provisioning run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProvisionSummary {
    /// Distribution that was provisioned.
    pub distribution: Distribution,
    /// Total number of commands submitted, including the update anchor.
    pub commands_submitted: usize,
}

/// Executes a [`Plan`] through the provided executor.
#[derive(Clone, Debug)]
pub struct Provisioner<E> {
    executor: E,
}

impl<E: Executor> Provisioner<E> {
    /// Creates a new provisioner.
    #[must_use]
    pub const fn new(executor: E) -> Self {
        Self { executor }
    }

    /// Runs the full provisioning flow and returns a run summary.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError`] when any submission fails; the error names
    /// the command that stopped the run.
    pub async fn execute(&self, plan: &Plan) -> Result<ProvisionSummary, ProvisionError<E::Error>> {
        tracing::info!(name = %plan.update.name, shell = %plan.update.shell, "submitting");
        let anchor = self
            .executor
            .submit(&plan.update, None)
            .await
            .map_err(|source| ProvisionError::Update {
                shell: plan.update.shell.clone(),
                source,
            })?;

        self.run_chain(&plan.setup, anchor).await?;
        self.run_set(&plan.extras).await?;

        Ok(ProvisionSummary {
            distribution: plan.distribution,
            commands_submitted: 1 + plan.setup.len() + plan.extras.len(),
        })
    }

    /// Submits the ordered chain, threading each returned handle as the
    /// dependency anchor for the next submission.
    async fn run_chain(
        &self,
        chain: &CommandChain,
        anchor: CommandHandle,
    ) -> Result<CommandHandle, ProvisionError<E::Error>> {
        let mut previous = anchor;
        for spec in chain {
            tracing::info!(name = %spec.name, shell = %spec.shell, "submitting");
            previous = self
                .executor
                .submit(spec, Some(&previous))
                .await
                .map_err(|source| ProvisionError::Setup {
                    name: spec.name.clone(),
                    shell: spec.shell.clone(),
                    source,
                })?;
        }
        Ok(previous)
    }

    /// Submits each independent command with no dependency edge.
    async fn run_set(&self, set: &CommandSet) -> Result<(), ProvisionError<E::Error>> {
        for spec in set {
            tracing::info!(name = %spec.name, shell = %spec.shell, "submitting");
            self.executor
                .submit(spec, None)
                .await
                .map_err(|source| ProvisionError::Extra {
                    name: spec.name.clone(),
                    shell: spec.shell.clone(),
                    source,
                })?;
        }
        Ok(())
    }
}
