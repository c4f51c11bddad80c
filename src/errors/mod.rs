use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failures that stop a build. Per-line and per-game problems are
/// reported as [`crate::domain::Diagnostic`] values instead.
#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("no usable score input: none of the {configured} configured games has a score file")]
    NoUsableInput { configured: usize },

    #[error("I/O failure on {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LeaderboardError {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        LeaderboardError::InvalidConfig(message.into())
    }

    pub fn io(path: &Path, source: std::io::Error) -> Self {
        LeaderboardError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Add context to read errors
pub fn read_context(path: &Path) -> String {
    format!("Failed to read {}", path.display())
}

/// Add context to parse errors
pub fn parse_context(data_type: &str, path: &Path) -> String {
    format!("Failed to parse {} from {}", data_type, path.display())
}

/// Add context to publish errors
pub fn publish_context(path: &Path) -> String {
    format!("Failed to publish {}", path.display())
}
