//! Error types for pipmate.
//!
//! Fatal startup errors (missing interpreter, broken environment) terminate
//! the process; everything else is caught at the boundary of the operation
//! that produced it and reported, so the interactive session keeps going.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type PipmateResult<T> = Result<T, PipmateError>;

#[derive(Debug, Error)]
pub enum PipmateError {
    /// No usable Python interpreter on PATH.
    #[error("no Python interpreter found. Install Python 3.7+ and ensure it's in PATH")]
    PythonNotFound,

    /// The pip executable expected inside the virtual environment is missing.
    #[error("pip executable not found at '{0}'")]
    PipNotFound(PathBuf),

    /// Virtual environment creation failed.
    #[error("could not create virtual environment: {0}")]
    EnvCreation(String),

    /// The subprocess could not be launched at all.
    #[error("failed to launch '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    /// Subprocess output was not valid UTF-8.
    #[error("failed to decode subprocess output")]
    OutputDecoding(#[from] std::string::FromUtf8Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}
