//! Error types surfaced by the core library
//!
//! Commands wrap these in `anyhow` for context; the binary prints the
//! top-level message and decides the exit code.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenieError {
    #[error("{} is not an expo-genie project. Run `expo-genie init` first.", .0.display())]
    NotManagedProject(PathBuf),

    #[error(
        "{} is not a valid expo-genie manifest ({source}). Fix the file by hand or delete it and run `expo-genie init` again.",
        .path.display()
    )]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(
        "{} records a path outside the project ({path_entry}). Fix the file by hand or delete it and run `expo-genie init` again.",
        .path.display()
    )]
    ManifestUnsafePath { path: PathBuf, path_entry: String },

    #[error("Global config {} is unreadable ({source}). Run `expo-genie config reset` to restore defaults.", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unknown {kind} '{key}'. Available: {available}")]
    NotFound {
        kind: &'static str,
        key: String,
        available: String,
    },

    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("Missing required argument: {0}")]
    MissingArgument(&'static str),

    #[error("{0}")]
    Unsupported(String),

    #[error("{0} is not installed or not on PATH")]
    PackageManagerUnavailable(String),

    #[error("`{command}` exited with status {code}")]
    CommandFailed { command: String, code: i32 },

    #[error(
        "Another expo-genie command is running (lock {} held since {since}). Remove the file if that process is gone.",
        .path.display()
    )]
    Locked { path: PathBuf, since: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl GenieError {
    /// Build a `NotFound` error listing the keys that would have matched
    pub fn not_found<'a>(
        kind: &'static str,
        key: &str,
        available: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        GenieError::NotFound {
            kind,
            key: key.to_string(),
            available: available.into_iter().collect::<Vec<_>>().join(", "),
        }
    }
}
