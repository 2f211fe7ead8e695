//! Behavioural smoke tests for the CLI entrypoint.
//!
//! These tests drive the `plan` subcommand only; it resolves configuration
//! and renders the command plan without opening any connection, which keeps
//! the suite hermetic.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn cli_without_arguments_prints_usage() {
    let mut cmd = cargo_bin_cmd!("rigup");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn plan_renders_the_fedora_command_list() {
    let mut cmd = cargo_bin_cmd!("rigup");
    cmd.arg("plan")
        .env("RIGUP_DISTRIBUTION", "fedora")
        .env("RIGUP_SSH_USER", "dev")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("update: update-system: 'sudo dnf update -y'")
                .and(predicate::str::contains("setup: install-packages: 'sudo dnf install -y"))
                .and(predicate::str::contains("setup: use-zsh: 'sudo chsh -s /bin/zsh dev'"))
                .and(predicate::str::contains("extra: install-starship:")),
        );
}

#[test]
fn plan_accepts_a_distribution_override_flag() {
    let mut cmd = cargo_bin_cmd!("rigup");
    cmd.args(["plan", "--distribution", "debian"])
        .env("RIGUP_SSH_USER", "dev")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "update: update-system: 'sudo apt-get update && sudo apt-get dist-upgrade -y'",
        ));
}

#[test]
fn plan_rejects_an_unsupported_distribution() {
    let mut cmd = cargo_bin_cmd!("rigup");
    cmd.arg("plan")
        .env("RIGUP_DISTRIBUTION", "arch")
        .env("RIGUP_SSH_USER", "dev")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported distribution: arch"));
}

#[test]
fn plan_requires_a_distribution() {
    let mut cmd = cargo_bin_cmd!("rigup");
    cmd.arg("plan")
        .env("RIGUP_SSH_USER", "dev")
        .assert()
        .failure()
        .stderr(predicate::str::contains("RIGUP_DISTRIBUTION"));
}
