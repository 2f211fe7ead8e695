//! Distribution command tables for package management.
//!
//! The target distribution is resolved from its configuration label once at
//! startup; everything downstream works with the enum so unsupported values
//! cannot reach command construction.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Target Linux package-manager family.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Distribution {
    /// Fedora and its `dnf` package manager.
    Fedora,
    /// Ubuntu, managed through `apt-get`.
    Ubuntu,
    /// Debian, managed through `apt-get`.
    Debian,
}

/// Error raised when a configured distribution label is not supported.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("unsupported distribution: {0}")]
pub struct UnsupportedDistribution(pub String);

impl FromStr for Distribution {
    type Err = UnsupportedDistribution;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "fedora" => Ok(Self::Fedora),
            "ubuntu" => Ok(Self::Ubuntu),
            "debian" => Ok(Self::Debian),
            other => Err(UnsupportedDistribution(other.to_owned())),
        }
    }
}

impl Distribution {
    /// Returns the configuration label for this distribution.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fedora => "fedora",
            Self::Ubuntu => "ubuntu",
            Self::Debian => "debian",
        }
    }

    /// Package-manager install invocation, without package arguments.
    #[must_use]
    pub const fn install_command(self) -> &'static str {
        match self {
            Self::Fedora => "sudo dnf install -y",
            Self::Ubuntu | Self::Debian => "sudo apt-get install -y",
        }
    }

    /// Full system update invocation.
    #[must_use]
    pub const fn update_command(self) -> &'static str {
        match self {
            Self::Fedora => "sudo dnf update -y",
            Self::Ubuntu | Self::Debian => {
                "sudo apt-get update && sudo apt-get dist-upgrade -y"
            }
        }
    }

    /// Packages that only exist, or carry a different name, on this
    /// distribution.
    #[must_use]
    pub const fn extra_packages(self) -> &'static [&'static str] {
        match self {
            Self::Fedora => &["fedora-packager", "fedora-review", "gcc-c++", "ninja", "perf"],
            Self::Ubuntu | Self::Debian => &["g++", "linux-tools-virtual", "ninja-build"],
        }
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("fedora", Distribution::Fedora)]
    #[case("ubuntu", Distribution::Ubuntu)]
    #[case("debian", Distribution::Debian)]
    fn parses_supported_labels(#[case] label: &str, #[case] expected: Distribution) {
        let parsed: Distribution = label.parse().expect("label should be supported");
        assert_eq!(parsed, expected);
        assert_eq!(parsed.as_str(), label);
    }

    #[rstest]
    #[case("arch")]
    #[case("")]
    #[case("Fedora")]
    fn rejects_unsupported_labels(#[case] label: &str) {
        let err = label
            .parse::<Distribution>()
            .expect_err("label should be rejected");
        assert_eq!(err, UnsupportedDistribution(label.to_owned()));
        assert_eq!(err.to_string(), format!("unsupported distribution: {label}"));
    }

    #[rstest]
    #[case(Distribution::Fedora, "sudo dnf install -y", "sudo dnf update -y")]
    #[case(
        Distribution::Ubuntu,
        "sudo apt-get install -y",
        "sudo apt-get update && sudo apt-get dist-upgrade -y"
    )]
    #[case(
        Distribution::Debian,
        "sudo apt-get install -y",
        "sudo apt-get update && sudo apt-get dist-upgrade -y"
    )]
    fn package_manager_invocations_are_literal(
        #[case] distribution: Distribution,
        #[case] install: &str,
        #[case] update: &str,
    ) {
        assert_eq!(distribution.install_command(), install);
        assert_eq!(distribution.update_command(), update);
    }

    #[test]
    fn extra_packages_differ_by_family() {
        assert_eq!(
            Distribution::Fedora.extra_packages(),
            &["fedora-packager", "fedora-review", "gcc-c++", "ninja", "perf"]
        );
        assert_eq!(
            Distribution::Ubuntu.extra_packages(),
            Distribution::Debian.extra_packages()
        );
        assert_eq!(
            Distribution::Debian.extra_packages(),
            &["g++", "linux-tools-virtual", "ninja-build"]
        );
    }
}
