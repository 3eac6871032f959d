//! Per-package install orchestration.

use colored::*;

use crate::diagnose;
use crate::runner::CommandRunner;
use crate::youtube::TutorialFinder;

/// Install each target sequentially and independently.
///
/// A failing package is reported, diagnosed, and handed to the tutorial
/// lookup; then the loop moves on to the next target. There is no aggregate
/// status; progress is printed as it happens.
pub fn install_packages(
    targets: &[String],
    runner: &dyn CommandRunner,
    finder: &TutorialFinder,
    python_version: Option<&str>,
) {
    if targets.is_empty() {
        println!("{} No packages were provided to install", "⊘".yellow());
        return;
    }

    println!();
    println!(
        "{} Attempting to install: {}",
        "→".cyan(),
        targets.join(", ")
    );

    for target in targets {
        println!("--- Installing {} ---", target.bold());
        match runner.run(&["install", target.as_str()]) {
            Ok(output) if output.success() => {
                print!("{}", output.stdout);
                println!("{} Successfully installed {}", "✓".green(), target);
            }
            Ok(output) => {
                let stderr = output.stderr.trim();
                println!(
                    "{} Error installing '{}' (exit code {})",
                    "✗".red(),
                    target,
                    output.exit_code
                );
                println!("{}", "Full error log:".yellow());
                println!("{}", stderr);
                diagnose::suggest_fix(target, stderr, python_version);
                finder.lookup(target);
            }
            Err(e) => {
                // Spawn or decoding failure: report and keep going. There is
                // no stderr to diagnose here.
                println!("{} Error installing '{}': {}", "✗".red(), target, e);
            }
        }
        println!("{}", "-".repeat(target.len() + 20));
    }
}
