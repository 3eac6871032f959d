//! Command dispatch for the interactive menu and one-shot CLI subcommands.
//!
//! The core consumes one [`Action`] at a time; reading the terminal belongs
//! to the caller, so everything below runs without simulated input.

pub mod install;
pub mod manifest;

use anyhow::Result;

use crate::config::Config;
use crate::environment::ResolvedEnvironment;
use crate::runner::CommandRunner;
use crate::youtube::TutorialFinder;

/// One unit of work, independent of how it was requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Install the listed packages one by one.
    Install(Vec<String>),
    /// Install everything from the manifest file in one call.
    SyncManifest,
    /// Snapshot the environment into the manifest file.
    FreezeManifest,
}

/// Split a raw comma- and/or whitespace-separated package list, dropping
/// empty entries. Specifiers pass through verbatim.
pub fn parse_target_list(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Execute one action against the resolved environment.
pub fn dispatch(
    action: Action,
    env: &ResolvedEnvironment,
    config: &Config,
    runner: &dyn CommandRunner,
    finder: &TutorialFinder,
) -> Result<()> {
    match action {
        Action::Install(targets) => {
            install::install_packages(&targets, runner, finder, env.python_version.as_deref());
            Ok(())
        }
        Action::SyncManifest => manifest::install_from_manifest(runner, &config.manifest_path),
        Action::FreezeManifest => manifest::generate_manifest(runner, &config.manifest_path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_target_list() {
        assert_eq!(
            parse_target_list("numpy, pandas , ,requests"),
            vec!["numpy", "pandas", "requests"]
        );
        assert_eq!(parse_target_list("a b,c"), vec!["a", "b", "c"]);
        assert_eq!(
            parse_target_list("requests==2.31.0"),
            vec!["requests==2.31.0"]
        );
        assert!(parse_target_list("").is_empty());
        assert!(parse_target_list(" , ,, ").is_empty());
    }
}
