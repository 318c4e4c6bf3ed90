//! Error types for the ffmpeg adapter.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors from probing or rendering with ffmpeg tools.
#[derive(Error, Debug)]
pub enum FfmpegError {
    /// Required binary missing from PATH.
    #[error("{tool} not found in PATH")]
    ToolNotFound { tool: String },

    /// Input file missing.
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    /// Tool exited nonzero.
    #[error("{tool} failed with exit code {exit_code}: {message}")]
    CommandFailed {
        tool: String,
        exit_code: i32,
        message: String,
    },

    /// Tool output could not be parsed.
    #[error("failed to parse {what}: {message}")]
    ParseError { what: String, message: String },

    /// Operation sequence cannot be expressed as a filter graph.
    #[error("unsupported operation sequence: {0}")]
    UnsupportedSequence(String),

    /// File I/O error.
    #[error("I/O error in {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: io::Error,
    },
}

impl FfmpegError {
    /// Create a parse error.
    pub fn parse(what: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ParseError {
            what: what.into(),
            message: message.into(),
        }
    }

    /// Create an I/O error with context.
    pub fn io(operation: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }
}

/// Result type for ffmpeg operations.
pub type FfmpegResult<T> = Result<T, FfmpegError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_failed_displays_context() {
        let err = FfmpegError::CommandFailed {
            tool: "ffmpeg".to_string(),
            exit_code: 1,
            message: "invalid filter".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("ffmpeg"));
        assert!(msg.contains("exit code 1"));
    }
}
