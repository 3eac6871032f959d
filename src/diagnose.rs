//! Failure classification for pip install errors.
//!
//! Classification is a pure function over the captured stderr so it can be
//! tested without running pip. Rules are checked in order and the first match
//! wins: a build log may also mention permissions, so the order is part of
//! the contract.

use colored::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diagnosis {
    PermissionDenied,
    BuildFailure,
    PackageNotFound,
    VersionMismatch,
    Unclassified,
}

/// Ordered substring rules, matched against lower-cased stderr.
const RULES: &[(&str, Diagnosis)] = &[
    ("permission denied", Diagnosis::PermissionDenied),
    ("failed building wheel", Diagnosis::BuildFailure),
    ("no matching distribution found", Diagnosis::PackageNotFound),
    ("requires python", Diagnosis::VersionMismatch),
];

/// Classify an install failure from its stderr text.
pub fn classify(stderr: &str) -> Diagnosis {
    let lowered = stderr.to_lowercase();
    RULES
        .iter()
        .find(|(needle, _)| lowered.contains(needle))
        .map(|(_, diagnosis)| *diagnosis)
        .unwrap_or(Diagnosis::Unclassified)
}

/// Search query suggested when no rule matches: the failed target plus the
/// last line of stderr.
pub fn search_query(target: &str, stderr: &str) -> String {
    let last_line = stderr.lines().last().unwrap_or("").trim();
    format!("pip install {} error {}", target, last_line)
}

/// Build the remediation text for a failed install.
pub fn remediation(target: &str, stderr: &str, python_version: Option<&str>) -> String {
    match classify(stderr) {
        Diagnosis::PermissionDenied => {
            "Permission error: run your terminal as Administrator (Windows) or retry with \
             `sudo` (macOS/Linux)."
                .to_string()
        }
        Diagnosis::BuildFailure => [
            "Build error: this package compiles from source and needs system build tools.",
            "  - Debian/Ubuntu:  sudo apt-get install build-essential python3-dev",
            "  - Fedora/CentOS:  sudo yum groupinstall 'Development Tools'",
            "  - Also try: pip install --upgrade pip wheel",
        ]
        .join("\n"),
        Diagnosis::PackageNotFound => format!(
            "Not found: no package named '{}' could be located. Double-check for typos.",
            target
        ),
        Diagnosis::VersionMismatch => match python_version {
            Some(version) => format!(
                "Version mismatch: this release of '{}' is not compatible with Python {}.",
                target, version
            ),
            None => format!(
                "Version mismatch: this release of '{}' is not compatible with the \
                 environment's Python version.",
                target
            ),
        },
        Diagnosis::Unclassified => format!(
            "No specific fix known. Try searching for:\n  \"{}\"",
            search_query(target, stderr)
        ),
    }
}

/// Print a targeted remediation for a failed install.
pub fn suggest_fix(target: &str, stderr: &str, python_version: Option<&str>) {
    println!();
    println!("{}", "Suggested fix:".cyan().bold());
    for line in remediation(target, stderr, python_version).lines() {
        println!("  {}", line);
    }
}
