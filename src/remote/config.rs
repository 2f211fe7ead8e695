//! SSH transport configuration and validation.
//!
//! This module defines [`SshConfig`] for reaching the target VM, along with
//! associated error types. Configuration is loaded via `ortho-config` which
//! merges defaults, configuration files, and environment variables.

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use super::identity::{IdentityError, resolve_identity_file};
use super::types::Connection;

/// Default forwarded SSH port of a freshly created local VM.
pub const DEFAULT_SSH_PORT: u16 = 32222;

/// Default identity file for OrbStack-managed VMs.
pub const DEFAULT_IDENTITY_FILE: &str = "~/.orbstack/ssh/id_ed25519";

/// SSH settings loaded via `ortho-config`.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(
    prefix = "RIGUP_SSH",
    discovery(
        app_name = "rigup",
        env_var = "RIGUP_CONFIG_PATH",
        config_file_name = "rigup.toml",
        dotfile_name = ".rigup.toml",
        project_file_name = "rigup.toml"
    )
)]
pub struct SshConfig {
    /// Path to the `ssh` executable.
    #[ortho_config(default = "ssh".to_owned())]
    pub ssh_bin: String,
    /// Host the VM's SSH endpoint is reachable on. The default matches the
    /// port-forwarding setup used for local VMs.
    #[ortho_config(default = "localhost".to_owned())]
    pub host: String,
    /// Forwarded SSH port of the VM.
    #[ortho_config(default = 32222)]
    pub port: u16,
    /// Remote login user the VM was created with.
    #[ortho_config(default = String::new())]
    pub user: String,
    /// Path to the SSH private key. Supports tilde expansion
    /// (`~/.orbstack/ssh/id_ed25519`).
    #[ortho_config(default = DEFAULT_IDENTITY_FILE.to_owned())]
    pub identity_file: String,
    /// Whether to force batch mode for SSH to avoid password prompts.
    #[ortho_config(default = true)]
    pub batch_mode: bool,
    /// Whether to enforce host key checking; defaults to disabling to smooth
    /// freshly created hosts.
    #[ortho_config(default = false)]
    pub strict_host_key_checking: bool,
    /// Known hosts file override; defaults to `/dev/null` for fresh hosts.
    #[ortho_config(default = "/dev/null".to_owned())]
    pub known_hosts_file: String,
}

/// Errors raised when loading or validating the SSH configuration.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum SshConfigError {
    /// Surfaces errors from the `ortho-config` loader.
    #[error("ssh configuration parsing failed: {0}")]
    Parse(String),
    /// Raised when configuration is missing required values. The message
    /// names the environment variable and configuration key that supply the
    /// value.
    #[error("missing {field}: set RIGUP_SSH_{env_suffix} or add {field} to [ssh] in rigup.toml", env_suffix = field.to_uppercase())]
    InvalidConfig {
        /// Configuration field that failed validation.
        field: String,
    },
    /// Raised when the identity file cannot be resolved.
    #[error(transparent)]
    Identity(#[from] IdentityError),
}

impl SshConfig {
    /// Loads configuration without attempting to parse CLI arguments. Values
    /// still merge defaults, configuration files, and environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`SshConfigError::Parse`] when merging sources fails.
    pub fn load_without_cli_args() -> Result<Self, SshConfigError> {
        Self::load_from_iter([std::ffi::OsString::from("rigup")])
            .map_err(|err| SshConfigError::Parse(err.to_string()))
    }

    /// Ensures configuration values are present after trimming whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`SshConfigError::InvalidConfig`] when a required field is
    /// empty or the port is zero.
    pub fn validate(&self) -> Result<(), SshConfigError> {
        Self::require_value(&self.ssh_bin, "ssh_bin")?;
        Self::require_value(&self.host, "host")?;
        Self::require_value(&self.user, "user")?;
        Self::require_value(&self.identity_file, "identity_file")?;
        if self.port == 0 {
            return Err(SshConfigError::InvalidConfig {
                field: "port".to_owned(),
            });
        }
        Ok(())
    }

    /// Builds a [`Connection`], resolving and verifying the identity file.
    ///
    /// # Errors
    ///
    /// Returns [`SshConfigError::InvalidConfig`] when validation fails and
    /// [`SshConfigError::Identity`] when the private key cannot be read.
    pub fn connection(&self) -> Result<Connection, SshConfigError> {
        self.validate()?;
        let identity_file = resolve_identity_file(&self.identity_file)?;
        Ok(Connection {
            host: self.host.clone(),
            port: self.port,
            user: self.user.clone(),
            identity_file,
        })
    }

    fn require_value(value: &str, field: &str) -> Result<(), SshConfigError> {
        if value.trim().is_empty() {
            return Err(SshConfigError::InvalidConfig {
                field: field.to_owned(),
            });
        }
        Ok(())
    }
}
