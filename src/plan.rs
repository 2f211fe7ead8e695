//! Declarative provisioning command lists.
//!
//! A [`Plan`] is rebuilt fresh on every invocation from the distribution
//! command tables and the configured options; nothing in this module talks to
//! the network. Values interpolated into shell text (the login user and the
//! dotfiles repository URLs) are shell-escaped, while the fixed command
//! strings are kept verbatim.

use shell_escape::unix::escape;

use crate::distro::Distribution;

/// Packages installed on every supported distribution.
pub const COMMON_PACKAGES: &str =
    "bpftrace clang cmake curl gcc gdb git less llvm man-db mold pkgconf sysstat zsh";

/// Tools installed through `cargo install` once the toolchain is present.
pub const CARGO_PACKAGES: &str = "bat csvlens hexyl hyperfine xsv";

/// A named shell command to run on the target host.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommandSpec {
    /// Identifier unique within a run, used for logging and error context.
    pub name: String,
    /// Shell text executed on the remote host.
    pub shell: String,
}

impl CommandSpec {
    /// Creates a new command spec.
    #[must_use]
    pub fn new(name: impl Into<String>, shell: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shell: shell.into(),
        }
    }
}

/// Ordered commands where each entry depends on its predecessor completing.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CommandChain(Vec<CommandSpec>);

impl CommandChain {
    /// Wraps an ordered list of commands.
    #[must_use]
    pub const fn new(commands: Vec<CommandSpec>) -> Self {
        Self(commands)
    }

    /// Iterates the commands in execution order.
    pub fn iter(&self) -> std::slice::Iter<'_, CommandSpec> {
        self.0.iter()
    }

    /// Number of commands in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when the chain holds no commands.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a CommandChain {
    type Item = &'a CommandSpec;
    type IntoIter = std::slice::Iter<'a, CommandSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Commands with no inter-dependency edges.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CommandSet(Vec<CommandSpec>);

impl CommandSet {
    /// Wraps a list of independent commands.
    #[must_use]
    pub const fn new(commands: Vec<CommandSpec>) -> Self {
        Self(commands)
    }

    /// Iterates the commands in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, CommandSpec> {
        self.0.iter()
    }

    /// Number of commands in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when the set holds no commands.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a CommandSet {
    type Item = &'a CommandSpec;
    type IntoIter = std::slice::Iter<'a, CommandSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Options that vary the rendered plan beyond the distribution tables.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PlanOptions {
    /// Login user whose shell is switched to zsh.
    pub username: String,
    /// Git URL of the dotfiles configuration repository.
    pub config_repo: String,
    /// Git URL of the auxiliary scripts repository.
    pub hacks_repo: String,
}

/// Full provisioning plan for one distribution.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Plan {
    /// Distribution the plan was built for.
    pub distribution: Distribution,
    /// Always-run system update; anchor for the setup chain.
    pub update: CommandSpec,
    /// Ordered setup commands, each depending on its predecessor.
    pub setup: CommandChain,
    /// Independent commands with no ordering requirements.
    pub extras: CommandSet,
}

impl Plan {
    /// Builds the plan for `distribution` with the given options.
    #[must_use]
    pub fn for_distribution(distribution: Distribution, options: &PlanOptions) -> Self {
        Self {
            distribution,
            update: CommandSpec::new("update-system", distribution.update_command()),
            setup: setup_chain(distribution, options),
            extras: extras_set(),
        }
    }
}

fn setup_chain(distribution: Distribution, options: &PlanOptions) -> CommandChain {
    let install_packages = format!(
        "{} {} {}",
        distribution.install_command(),
        COMMON_PACKAGES,
        distribution.extra_packages().join(" ")
    );
    let user = escape(options.username.as_str().into());
    let config_repo = escape(options.config_repo.as_str().into());
    let hacks_repo = escape(options.hacks_repo.as_str().into());

    CommandChain::new(vec![
        CommandSpec::new("install-packages", install_packages),
        CommandSpec::new(
            "install-cargo",
            "rm -rf ~/.cargo ~/.rustup && curl -LsSf https://sh.rustup.rs | sh -s -- -y --no-modify-path",
        ),
        // zsh is not set up yet, so cargo needs its full path
        CommandSpec::new(
            "install-cargo-packages",
            format!("~/.cargo/bin/cargo install {CARGO_PACKAGES}"),
        ),
        CommandSpec::new(
            "setup-config",
            format!(
                "rm -rf ~/github/config && git clone {config_repo} ~/github/config && ~/github/config/setup.sh"
            ),
        ),
        CommandSpec::new(
            "setup-hacks",
            format!(
                "rm -rf ~/github/hacks && git clone {hacks_repo} ~/github/hacks && ~/github/hacks/setup.sh"
            ),
        ),
        CommandSpec::new(
            "set-zlogin",
            "echo 'path+=(~/.local/bin ~/.cargo/bin $path)\n\neval \"$(starship init zsh)\"' > ~/.zlogin",
        ),
        CommandSpec::new("use-zsh", format!("sudo chsh -s /bin/zsh {user}")),
    ])
}

fn extras_set() -> CommandSet {
    CommandSet::new(vec![
        CommandSpec::new(
            "install-starship",
            "curl -sS https://starship.rs/install.sh | sudo sh -s -- -y",
        ),
        CommandSpec::new(
            "install-uv",
            "curl -LsSf https://astral.sh/uv/install.sh | UV_NO_MODIFY_PATH=1 sh",
        ),
        CommandSpec::new(
            "starship-disable-container",
            "mkdir -p ~/.config && echo \"[container]\ndisabled = true\" > ~/.config/starship.toml",
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn options() -> PlanOptions {
        PlanOptions {
            username: String::from("dev"),
            config_repo: String::from("https://github.com/ismail/config.git"),
            hacks_repo: String::from("https://github.com/ismail/hacks.git"),
        }
    }

    #[rstest]
    fn update_command_matches_distribution_table(options: PlanOptions) {
        let plan = Plan::for_distribution(Distribution::Fedora, &options);
        assert_eq!(plan.update.name, "update-system");
        assert_eq!(plan.update.shell, "sudo dnf update -y");
    }

    #[rstest]
    fn setup_chain_preserves_declaration_order(options: PlanOptions) {
        let plan = Plan::for_distribution(Distribution::Ubuntu, &options);
        let names: Vec<&str> = plan.setup.iter().map(|spec| spec.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "install-packages",
                "install-cargo",
                "install-cargo-packages",
                "setup-config",
                "setup-hacks",
                "set-zlogin",
                "use-zsh",
            ]
        );
    }

    #[rstest]
    fn command_names_are_unique_within_the_plan(options: PlanOptions) {
        let plan = Plan::for_distribution(Distribution::Debian, &options);
        let mut names = vec![plan.update.name.clone()];
        names.extend(plan.setup.iter().map(|spec| spec.name.clone()));
        names.extend(plan.extras.iter().map(|spec| spec.name.clone()));

        let mut deduped = names.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), names.len(), "duplicate command name in {names:?}");
    }

    #[rstest]
    fn install_packages_combines_common_and_extra_packages(options: PlanOptions) {
        let plan = Plan::for_distribution(Distribution::Fedora, &options);
        let install = plan
            .setup
            .iter()
            .find(|spec| spec.name == "install-packages")
            .expect("plan should install packages");
        assert_eq!(
            install.shell,
            format!("sudo dnf install -y {COMMON_PACKAGES} fedora-packager fedora-review gcc-c++ ninja perf")
        );
    }

    #[rstest]
    fn cargo_tools_are_installed_via_full_path(options: PlanOptions) {
        let plan = Plan::for_distribution(Distribution::Debian, &options);
        let install = plan
            .setup
            .iter()
            .find(|spec| spec.name == "install-cargo-packages")
            .expect("plan should install cargo packages");
        assert_eq!(
            install.shell,
            format!("~/.cargo/bin/cargo install {CARGO_PACKAGES}")
        );
    }

    #[rstest]
    fn chsh_targets_the_configured_user(options: PlanOptions) {
        let plan = Plan::for_distribution(Distribution::Ubuntu, &options);
        let use_zsh = plan
            .setup
            .iter()
            .find(|spec| spec.name == "use-zsh")
            .expect("plan should switch the login shell");
        assert_eq!(use_zsh.shell, "sudo chsh -s /bin/zsh dev");
    }

    #[rstest]
    fn interpolated_values_are_shell_escaped(options: PlanOptions) {
        let spaced = PlanOptions {
            username: String::from("dev user"),
            ..options
        };
        let plan = Plan::for_distribution(Distribution::Ubuntu, &spaced);
        let use_zsh = plan
            .setup
            .iter()
            .find(|spec| spec.name == "use-zsh")
            .expect("plan should switch the login shell");
        assert_eq!(use_zsh.shell, "sudo chsh -s /bin/zsh 'dev user'");
    }

    #[rstest]
    fn dotfiles_checkouts_use_configured_repositories(options: PlanOptions) {
        let custom = PlanOptions {
            config_repo: String::from("https://example.com/dotfiles.git"),
            ..options
        };
        let plan = Plan::for_distribution(Distribution::Fedora, &custom);
        let setup_config = plan
            .setup
            .iter()
            .find(|spec| spec.name == "setup-config")
            .expect("plan should check out the config repository");
        assert_eq!(
            setup_config.shell,
            "rm -rf ~/github/config && git clone https://example.com/dotfiles.git ~/github/config && ~/github/config/setup.sh"
        );
    }

    #[rstest]
    fn extras_are_independent_tool_installs(options: PlanOptions) {
        let plan = Plan::for_distribution(Distribution::Fedora, &options);
        let names: Vec<&str> = plan.extras.iter().map(|spec| spec.name.as_str()).collect();
        assert_eq!(
            names,
            ["install-starship", "install-uv", "starship-disable-container"]
        );
    }
}
