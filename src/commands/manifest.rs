//! Manifest (requirements file) install and generation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use colored::*;

use crate::runner::CommandRunner;

/// Install everything in the manifest as a single atomic pip call.
///
/// A missing manifest is reported and skipped, not an error. A failure midway
/// through the file surfaces as one failed call; there is no per-line
/// diagnosis.
pub fn install_from_manifest(runner: &dyn CommandRunner, manifest: &Path) -> Result<()> {
    if !manifest.exists() {
        println!(
            "{} '{}' not found. Create one or generate it first.",
            "⊘".yellow(),
            manifest.display()
        );
        return Ok(());
    }

    println!(
        "{} Installing all packages from {}...",
        "→".cyan(),
        manifest.display()
    );

    let manifest_arg = manifest.to_string_lossy();
    let output = runner.run(&["install", "-r", &*manifest_arg])?;

    if output.success() {
        print!("{}", output.stdout);
        println!(
            "{} Successfully installed all packages from {}",
            "✓".green(),
            manifest.display()
        );
    } else {
        println!(
            "{} Install from {} failed (exit code {})",
            "✗".red(),
            manifest.display(),
            output.exit_code
        );
        println!("{}", "Full error log:".yellow());
        println!("{}", output.stderr.trim());
    }

    Ok(())
}

/// Snapshot installed packages into the manifest.
///
/// The file is fully overwritten with the freeze output; repeated runs are
/// snapshots of current state, never cumulative history.
pub fn generate_manifest(runner: &dyn CommandRunner, manifest: &Path) -> Result<()> {
    println!("{} Generating {}...", "→".cyan(), manifest.display());

    let output = runner.run(&["freeze"])?;

    if !output.success() {
        println!("{} Failed to generate {}", "✗".red(), manifest.display());
        println!("{}", output.stderr.trim());
        return Ok(());
    }

    fs::write(manifest, &output.stdout)
        .with_context(|| format!("failed to write {}", manifest.display()))?;

    println!(
        "{} {} generated successfully",
        "✓".green(),
        manifest.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipmateResult;
    use crate::runner::RunOutput;
    use std::cell::RefCell;
    use tempfile::TempDir;

    /// Records calls and replies to `freeze` with canned output.
    struct MockRunner {
        calls: RefCell<Vec<Vec<String>>>,
        freeze_output: String,
    }

    impl MockRunner {
        fn new(freeze_output: &str) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                freeze_output: freeze_output.to_string(),
            }
        }

        fn calls(&self) -> Vec<Vec<String>> {
            self.calls.borrow().clone()
        }
    }

    impl CommandRunner for MockRunner {
        fn run(&self, args: &[&str]) -> PipmateResult<RunOutput> {
            self.calls
                .borrow_mut()
                .push(args.iter().map(|s| s.to_string()).collect());

            Ok(RunOutput {
                exit_code: 0,
                stdout: self.freeze_output.clone(),
                stderr: String::new(),
            })
        }
    }

    #[test]
    fn test_missing_manifest_runs_nothing() {
        let dir = TempDir::new().unwrap();
        let runner = MockRunner::new("");

        install_from_manifest(&runner, &dir.path().join("requirements.txt")).unwrap();
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_install_is_one_atomic_call() {
        let dir = TempDir::new().unwrap();
        let manifest = dir.path().join("requirements.txt");
        fs::write(&manifest, "numpy==1.26.0\npandas==2.1.0\n").unwrap();

        let runner = MockRunner::new("");
        install_from_manifest(&runner, &manifest).unwrap();

        assert_eq!(
            runner.calls(),
            vec![vec![
                "install".to_string(),
                "-r".to_string(),
                manifest.to_string_lossy().to_string(),
            ]]
        );
    }

    #[test]
    fn test_generate_writes_freeze_output_verbatim() {
        let dir = TempDir::new().unwrap();
        let manifest = dir.path().join("requirements.txt");

        let runner = MockRunner::new("numpy==1.26.0\n");
        generate_manifest(&runner, &manifest).unwrap();

        assert_eq!(runner.calls(), vec![vec!["freeze".to_string()]]);
        assert_eq!(fs::read_to_string(&manifest).unwrap(), "numpy==1.26.0\n");
    }

    #[test]
    fn test_generate_overwrites_previous_snapshot() {
        let dir = TempDir::new().unwrap();
        let manifest = dir.path().join("requirements.txt");
        fs::write(&manifest, "stale==0.1\nleftover==9.9\n").unwrap();

        let runner = MockRunner::new("fresh==1.0\n");
        generate_manifest(&runner, &manifest).unwrap();

        assert_eq!(fs::read_to_string(&manifest).unwrap(), "fresh==1.0\n");
    }
}
