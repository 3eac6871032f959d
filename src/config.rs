//! Startup configuration.
//!
//! Everything configurable is resolved once here and passed by reference into
//! the components that need it; nothing reads ambient global state afterwards.

use std::path::PathBuf;

/// Environment variable consulted when `--api-key` is not given.
pub const API_KEY_ENV: &str = "YOUTUBE_API_KEY";

/// Placeholder value treated the same as an absent key.
const API_KEY_UNSET: &str = "unset";

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory of the isolated environment, relative to the cwd.
    pub env_dir: PathBuf,
    /// Path of the requirements manifest.
    pub manifest_path: PathBuf,
    /// YouTube Data API key; `None` disables tutorial lookup only.
    pub api_key: Option<String>,
}

impl Config {
    /// Resolve configuration from CLI values, falling back to environment
    /// variables (flag > env var > default).
    pub fn resolve(env_dir: String, manifest: String, api_key_flag: Option<String>) -> Self {
        let api_key = api_key_flag
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .and_then(normalize_api_key);

        Self {
            env_dir: PathBuf::from(env_dir),
            manifest_path: PathBuf::from(manifest),
            api_key,
        }
    }
}

fn normalize_api_key(raw: String) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == API_KEY_UNSET {
        None
    } else {
        Some(trimmed.to_string())
    }
}
