//! Execution-context detection and virtual-environment provisioning.
//!
//! The context and the pip invocation are resolved once at startup and stay
//! read-only for the lifetime of the process.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use colored::*;

use crate::config::Config;
use crate::error::{PipmateError, PipmateResult};

/// Environment variable present inside Google Colab runtimes.
const COLAB_MARKER: &str = "COLAB_RELEASE_TAG";

/// Where the tool is running; fixed for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionContext {
    /// A pre-provisioned hosted notebook session; installs mutate the
    /// session's own environment.
    HostedSession,
    /// A local machine using an isolated virtual environment.
    LocalIsolated,
}

impl ExecutionContext {
    /// Detect the context from the hosted-session marker. No side effects.
    pub fn detect() -> Self {
        if std::env::var_os(COLAB_MARKER).is_some() {
            ExecutionContext::HostedSession
        } else {
            ExecutionContext::LocalIsolated
        }
    }
}

/// Command prefix for every pip subprocess call.
#[derive(Debug, Clone)]
pub struct PipInvocation {
    program: PathBuf,
    base_args: Vec<String>,
}

impl PipInvocation {
    pub fn new(program: impl Into<PathBuf>, base_args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            base_args,
        }
    }

    /// System interpreter driving `-m pip` (hosted sessions).
    pub fn via_interpreter(python: &str) -> Self {
        Self::new(python, vec!["-m".to_string(), "pip".to_string()])
    }

    /// Direct pip executable inside an isolated environment.
    pub fn direct(pip: PathBuf) -> Self {
        Self::new(pip, Vec::new())
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn base_args(&self) -> &[String] {
        &self.base_args
    }
}

impl fmt::Display for PipInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.base_args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Everything later stages need to know about the resolved environment.
#[derive(Debug, Clone)]
pub struct ResolvedEnvironment {
    pub context: ExecutionContext,
    pub invocation: PipInvocation,
    /// Interpreter version as reported by pip, e.g. "3.11". Best-effort.
    pub python_version: Option<String>,
}

impl ResolvedEnvironment {
    /// Human description shown in the menu header.
    pub fn describe(&self, config: &Config) -> String {
        match self.context {
            ExecutionContext::HostedSession => "hosted notebook session".to_string(),
            ExecutionContext::LocalIsolated => format!("./{}/", config.env_dir.display()),
        }
    }
}

/// Detect the context, then provision and validate the environment.
///
/// Runs before any install command; every error out of here is fatal to the
/// caller.
pub fn resolve(config: &Config) -> PipmateResult<ResolvedEnvironment> {
    let context = ExecutionContext::detect();
    ensure_environment(context, &config.env_dir)?;
    let invocation = resolve_invocation(context, &config.env_dir)?;
    let python_version = probe_python_version(&invocation);

    Ok(ResolvedEnvironment {
        context,
        invocation,
        python_version,
    })
}

/// Create the isolated environment if it does not exist. Idempotent; no-op in
/// hosted sessions.
pub fn ensure_environment(context: ExecutionContext, env_dir: &Path) -> PipmateResult<()> {
    if context == ExecutionContext::HostedSession {
        println!(
            "{} Hosted session detected, skipping virtual environment creation",
            "→".cyan()
        );
        return Ok(());
    }

    if env_dir.exists() {
        println!(
            "{} Virtual environment '{}' already exists",
            "✓".green(),
            env_dir.display()
        );
        return Ok(());
    }

    println!(
        "{} Creating virtual environment '{}'...",
        "→".cyan(),
        env_dir.display()
    );

    // `python -m venv` bundles pip into the new environment by default.
    let python = detect_python_interpreter()?;
    let output = Command::new(&python)
        .arg("-m")
        .arg("venv")
        .arg(env_dir)
        .output()
        .map_err(|source| PipmateError::Spawn {
            command: format!("{} -m venv", python),
            source,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PipmateError::EnvCreation(stderr.trim().to_string()));
    }

    println!("{} Virtual environment created", "✓".green());
    Ok(())
}

/// Resolve the pip invocation for the detected context.
///
/// In a local context the pip executable must already exist on disk; a
/// missing executable means the environment is corrupt and is fatal.
pub fn resolve_invocation(
    context: ExecutionContext,
    env_dir: &Path,
) -> PipmateResult<PipInvocation> {
    match context {
        ExecutionContext::HostedSession => {
            let python = detect_python_interpreter()?;
            Ok(PipInvocation::via_interpreter(&python))
        }
        ExecutionContext::LocalIsolated => {
            let pip = pip_executable_path(env_dir);
            if !pip.exists() {
                return Err(PipmateError::PipNotFound(pip));
            }
            Ok(PipInvocation::direct(pip))
        }
    }
}

/// Path of the pip executable inside an environment directory.
///
/// Windows venvs put executables under `Scripts\`, POSIX under `bin/`.
pub fn pip_executable_path(env_dir: &Path) -> PathBuf {
    if cfg!(windows) {
        env_dir.join("Scripts").join("pip.exe")
    } else {
        env_dir.join("bin").join("pip")
    }
}

fn detect_python_interpreter() -> PipmateResult<String> {
    for cmd in &["python3", "python"] {
        if Command::new(cmd).arg("--version").output().is_ok() {
            return Ok(cmd.to_string());
        }
    }
    Err(PipmateError::PythonNotFound)
}

/// Ask pip which interpreter it belongs to. Best-effort; `None` on any
/// failure.
fn probe_python_version(invocation: &PipInvocation) -> Option<String> {
    let output = Command::new(invocation.program())
        .args(invocation.base_args())
        .arg("--version")
        .output()
        .ok()?;
    let text = String::from_utf8(output.stdout).ok()?;
    parse_python_version(&text)
}

/// Extract "3.11" from a line like
/// `pip 23.2.1 from /venv/lib/python3.11/site-packages/pip (python 3.11)`.
fn parse_python_version(pip_version_line: &str) -> Option<String> {
    let start = pip_version_line.rfind("(python ")?;
    let rest = &pip_version_line[start + "(python ".len()..];
    let end = rest.find(')')?;
    let version = rest[..end].trim();
    if version.is_empty() {
        None
    } else {
        Some(version.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_hosted_invocation_uses_interpreter_module() {
        let invocation = PipInvocation::via_interpreter("python3");
        assert_eq!(invocation.program(), Path::new("python3"));
        assert_eq!(
            invocation.base_args().to_vec(),
            vec!["-m".to_string(), "pip".to_string()]
        );
    }

    #[test]
    fn test_invocation_display() {
        let invocation = PipInvocation::via_interpreter("python3");
        assert_eq!(invocation.to_string(), "python3 -m pip");
    }

    #[cfg(not(windows))]
    #[test]
    fn test_pip_path_posix_layout() {
        let path = pip_executable_path(Path::new("venv"));
        assert_eq!(path, PathBuf::from("venv/bin/pip"));
    }

    #[cfg(windows)]
    #[test]
    fn test_pip_path_windows_layout() {
        let path = pip_executable_path(Path::new("venv"));
        assert_eq!(path, PathBuf::from("venv").join("Scripts").join("pip.exe"));
    }

    #[test]
    fn test_missing_pip_is_fatal() {
        let dir = TempDir::new().unwrap();
        let err = resolve_invocation(ExecutionContext::LocalIsolated, dir.path()).unwrap_err();
        assert!(matches!(err, PipmateError::PipNotFound(_)));
    }

    #[test]
    fn test_existing_pip_resolves_directly() {
        let dir = TempDir::new().unwrap();
        let pip = pip_executable_path(dir.path());
        fs::create_dir_all(pip.parent().unwrap()).unwrap();
        fs::write(&pip, "").unwrap();

        let invocation =
            resolve_invocation(ExecutionContext::LocalIsolated, dir.path()).unwrap();
        assert_eq!(invocation.program(), pip.as_path());
        assert!(invocation.base_args().is_empty());
    }

    #[test]
    fn test_parse_python_version() {
        let line = "pip 23.2.1 from /v/lib/python3.11/site-packages/pip (python 3.11)";
        assert_eq!(parse_python_version(line), Some("3.11".to_string()));
        assert_eq!(parse_python_version("pip 23.2.1"), None);
        assert_eq!(parse_python_version(""), None);
    }
}
