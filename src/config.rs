//! Provisioning configuration loading via `ortho-config`.

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::distro::{Distribution, UnsupportedDistribution};
use crate::plan::PlanOptions;

/// Default dotfiles configuration repository.
pub const DEFAULT_CONFIG_REPO: &str = "https://github.com/ismail/config.git";

/// Default auxiliary scripts repository.
pub const DEFAULT_HACKS_REPO: &str = "https://github.com/ismail/hacks.git";

/// Provisioning inputs derived from environment variables, configuration
/// files, and defaults.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(
    prefix = "RIGUP",
    discovery(
        app_name = "rigup",
        env_var = "RIGUP_CONFIG_PATH",
        config_file_name = "rigup.toml",
        dotfile_name = ".rigup.toml",
        project_file_name = "rigup.toml"
    )
)]
pub struct ProvisionConfig {
    /// Target distribution label (`fedora`, `ubuntu`, or `debian`). This
    /// value is required.
    #[ortho_config(default = String::new())]
    pub distribution: String,
    /// Git URL of the dotfiles configuration repository.
    #[ortho_config(default = DEFAULT_CONFIG_REPO.to_owned())]
    pub config_repo: String,
    /// Git URL of the auxiliary scripts repository.
    #[ortho_config(default = DEFAULT_HACKS_REPO.to_owned())]
    pub hacks_repo: String,
}

/// Metadata for a configuration field, used to generate actionable error
/// messages.
struct FieldMetadata {
    description: &'static str,
    env_var: &'static str,
    toml_key: &'static str,
    section: &'static str,
}

impl FieldMetadata {
    const fn new(
        description: &'static str,
        env_var: &'static str,
        toml_key: &'static str,
        section: &'static str,
    ) -> Self {
        Self {
            description,
            env_var,
            toml_key,
            section,
        }
    }
}

impl ProvisionConfig {
    fn require_field(value: &str, metadata: &FieldMetadata) -> Result<(), ConfigError> {
        if value.trim().is_empty() {
            return Err(ConfigError::MissingField(format!(
                "missing {}: set {} or add {} to [{}] in rigup.toml",
                metadata.description, metadata.env_var, metadata.toml_key, metadata.section
            )));
        }
        Ok(())
    }

    /// Loads configuration using the `ortho-config` derive. Values merge
    /// defaults, configuration files, environment variables, and CLI flags in
    /// that order of precedence.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the loader fails to merge sources.
    pub fn load_from_sources() -> Result<Self, ConfigError> {
        Self::load().map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Loads configuration without attempting to parse CLI arguments. Values
    /// still merge defaults, configuration files, and environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the merge fails.
    pub fn load_without_cli_args() -> Result<Self, ConfigError> {
        Self::load_from_iter([std::ffi::OsString::from("rigup")])
            .map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Performs semantic validation on required fields. Error messages
    /// include guidance on how to provide missing values via environment
    /// variables or configuration files.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when a required field is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::require_field(
            &self.distribution,
            &FieldMetadata::new(
                "target distribution",
                "RIGUP_DISTRIBUTION",
                "distribution",
                "provision",
            ),
        )?;
        Self::require_field(
            &self.config_repo,
            &FieldMetadata::new(
                "dotfiles repository URL",
                "RIGUP_CONFIG_REPO",
                "config_repo",
                "provision",
            ),
        )?;
        Self::require_field(
            &self.hacks_repo,
            &FieldMetadata::new(
                "scripts repository URL",
                "RIGUP_HACKS_REPO",
                "hacks_repo",
                "provision",
            ),
        )?;
        Ok(())
    }

    /// Resolves the configured distribution label to its enum variant.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Distribution`] for labels outside the
    /// supported set.
    pub fn resolved_distribution(&self) -> Result<Distribution, ConfigError> {
        Ok(self.distribution.parse::<Distribution>()?)
    }

    /// Builds the plan options for `username`, the remote login user.
    #[must_use]
    pub fn plan_options(&self, username: &str) -> PlanOptions {
        PlanOptions {
            username: username.to_owned(),
            config_repo: self.config_repo.clone(),
            hacks_repo: self.hacks_repo.clone(),
        }
    }
}

/// Errors raised during configuration loading and validation.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// Indicates a required configuration field is empty or missing.
    #[error("missing configuration field: {0}")]
    MissingField(String),
    /// Surfaces errors from the `ortho-config` loader.
    #[error("configuration parsing failed: {0}")]
    Parse(String),
    /// Indicates the configured distribution label is not supported.
    #[error(transparent)]
    Distribution(#[from] UnsupportedDistribution),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn valid_config() -> ProvisionConfig {
        ProvisionConfig {
            distribution: String::from("fedora"),
            config_repo: String::from(DEFAULT_CONFIG_REPO),
            hacks_repo: String::from(DEFAULT_HACKS_REPO),
        }
    }

    #[rstest]
    fn validation_accepts_a_complete_config(valid_config: ProvisionConfig) {
        assert!(valid_config.validate().is_ok());
    }

    #[rstest]
    fn validation_rejects_a_missing_distribution_with_actionable_error(
        valid_config: ProvisionConfig,
    ) {
        let cfg = ProvisionConfig {
            distribution: String::new(),
            ..valid_config
        };

        let error = cfg.validate().expect_err("distribution is required");
        let ConfigError::MissingField(ref message) = error else {
            panic!("expected MissingField error, got {error:?}");
        };
        assert!(
            message.contains("RIGUP_DISTRIBUTION"),
            "error should mention env var: {message}"
        );
        assert!(
            message.contains("rigup.toml"),
            "error should mention config file: {message}"
        );
        assert!(
            message.contains("distribution"),
            "error should mention TOML key: {message}"
        );
    }

    #[rstest]
    fn resolves_supported_distribution_labels(valid_config: ProvisionConfig) {
        let distribution = valid_config
            .resolved_distribution()
            .expect("fedora should resolve");
        assert_eq!(distribution, Distribution::Fedora);
    }

    #[rstest]
    fn unsupported_distribution_labels_surface_the_input(valid_config: ProvisionConfig) {
        let cfg = ProvisionConfig {
            distribution: String::from("arch"),
            ..valid_config
        };

        let error = cfg
            .resolved_distribution()
            .expect_err("arch should be rejected");
        assert_eq!(error.to_string(), "unsupported distribution: arch");
    }

    #[rstest]
    fn plan_options_carry_the_login_user_and_repositories(valid_config: ProvisionConfig) {
        let options = valid_config.plan_options("dev");
        assert_eq!(options.username, "dev");
        assert_eq!(options.config_repo, DEFAULT_CONFIG_REPO);
        assert_eq!(options.hacks_repo, DEFAULT_HACKS_REPO);
    }
}
