//! Core library for the `rigup` VM provisioning tool.
//!
//! The crate outfits a freshly created Linux VM over SSH: it builds a
//! distribution-specific command plan (system update, package installation,
//! dotfiles checkout, shell change, developer-tool installs) and submits it
//! through a remote executor, chaining the ordered commands by dependency and
//! fanning out the independent ones.

pub mod config;
pub mod distro;
pub mod plan;
pub mod provision;
pub mod remote;
pub mod test_support;

pub use config::{ConfigError, ProvisionConfig};
pub use distro::{Distribution, UnsupportedDistribution};
pub use plan::{CommandChain, CommandSet, CommandSpec, Plan, PlanOptions};
pub use provision::{ProvisionError, ProvisionSummary, Provisioner};
pub use remote::{
    CommandHandle, CommandOutput, CommandRunner, Connection, Executor, IdentityError,
    ProcessCommandRunner, RemoteError, SshConfig, SshConfigError, SshExecutor, SubmitFuture,
};
