//! Subprocess execution for pip commands.

use std::process::Command;

use crate::environment::PipInvocation;
use crate::error::{PipmateError, PipmateResult};

/// Captured result of one subprocess call.
///
/// A non-zero exit code is an in-band outcome, not an `Err`: callers get the
/// exit code and both streams so failure diagnosis can inspect stderr.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl RunOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs pip subcommands. Implemented by [`PipRunner`] in production and by
/// recording mocks in tests.
pub trait CommandRunner {
    fn run(&self, args: &[&str]) -> PipmateResult<RunOutput>;
}

/// Production runner: prefixes every call with the resolved pip invocation
/// and blocks until the subprocess exits. No timeout is enforced.
pub struct PipRunner {
    invocation: PipInvocation,
}

impl PipRunner {
    pub fn new(invocation: PipInvocation) -> Self {
        Self { invocation }
    }
}

impl CommandRunner for PipRunner {
    fn run(&self, args: &[&str]) -> PipmateResult<RunOutput> {
        let output = Command::new(self.invocation.program())
            .args(self.invocation.base_args())
            .args(args)
            .output()
            .map_err(|source| PipmateError::Spawn {
                command: self.invocation.to_string(),
                source,
            })?;

        Ok(RunOutput {
            // -1 stands in for "terminated by signal", which carries no code.
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8(output.stdout)?,
            stderr: String::from_utf8(output.stderr)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[cfg(unix)]
    fn shell_runner() -> PipRunner {
        PipRunner::new(PipInvocation::new("/bin/sh", vec!["-c".to_string()]))
    }

    #[cfg(unix)]
    #[test]
    fn test_captures_exit_code_and_streams() {
        let out = shell_runner()
            .run(&["echo out; echo err >&2; exit 3"])
            .unwrap();
        assert_eq!(out.exit_code, 3);
        assert!(!out.success());
        assert_eq!(out.stdout.trim(), "out");
        assert_eq!(out.stderr.trim(), "err");
    }

    #[cfg(unix)]
    #[test]
    fn test_zero_exit_is_success() {
        let out = shell_runner().run(&["true"]).unwrap();
        assert_eq!(out.exit_code, 0);
        assert!(out.success());
    }

    #[cfg(unix)]
    #[test]
    fn test_invalid_utf8_output_is_an_error() {
        let result = shell_runner().run(&[r"printf '\377'"]);
        assert!(matches!(result, Err(PipmateError::OutputDecoding(_))));
    }

    #[test]
    fn test_spawn_failure_is_an_error() {
        let runner = PipRunner::new(PipInvocation::direct(PathBuf::from(
            "/nonexistent/definitely-missing-pip",
        )));
        let result = runner.run(&["install", "requests"]);
        assert!(matches!(result, Err(PipmateError::Spawn { .. })));
    }
}
