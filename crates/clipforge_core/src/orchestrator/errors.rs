//! Error types for the job orchestrator.
//!
//! Errors carry context that chains through layers:
//! Job → Stage → Error kind → Detail
//!
//! All core stages fail fast; a fused timeline, censor list, or layout
//! plan is never partially valid. The orchestrator surfaces the first
//! error and halts the job. Retrying timed-out upstream calls belongs to
//! the caller of the core, not the core itself.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::compose::ComposeError;
use crate::layout::LayoutError;
use crate::models::{JobStage, SignalError};

use super::engines::EngineError;

/// Classification of a stage error, surfaced in job reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Word or segment with inverted span or negative timestamp.
    /// Rejected at ingestion; not retryable.
    MalformedSignal,
    /// Malformed geometry input. Not retryable; fix the input.
    InvalidLayoutRequest,
    /// Composed operation window past the media duration. Indicates
    /// upstream timestamp corruption; not retryable.
    OutOfBoundsOperation,
    /// External engine did not respond within its bound. Retryable by the
    /// orchestrator's caller.
    UpstreamTimeout,
    /// External engine reported a failure.
    EngineFailure,
    /// Job was cancelled.
    Cancelled,
}

impl ErrorKind {
    /// Whether the orchestrator's caller may retry the job unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::UpstreamTimeout)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::MalformedSignal => "MalformedSignal",
            Self::InvalidLayoutRequest => "InvalidLayoutRequest",
            Self::OutOfBoundsOperation => "OutOfBoundsOperation",
            Self::UpstreamTimeout => "UpstreamTimeout",
            Self::EngineFailure => "EngineFailure",
            Self::Cancelled => "Cancelled",
        };
        write!(f, "{}", name)
    }
}

/// Error from a single pipeline stage.
#[derive(Error, Debug)]
pub enum StageError {
    /// Raw signal rejected at ingestion.
    #[error("malformed signal: {0}")]
    MalformedSignal(#[from] SignalError),

    /// Layout planning rejected the geometry input.
    #[error(transparent)]
    InvalidLayout(#[from] LayoutError),

    /// Composition found an out-of-bounds operation window.
    #[error(transparent)]
    OutOfBounds(#[from] ComposeError),

    /// External engine call exceeded its bound.
    #[error("{call} timed out after {timeout_ms}ms")]
    UpstreamTimeout { call: String, timeout_ms: u64 },

    /// External engine call failed.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Job cancelled at a stage boundary.
    #[error("job cancelled")]
    Cancelled,
}

impl StageError {
    /// Create an upstream timeout error.
    pub fn timeout(call: impl Into<String>, timeout_ms: u64) -> Self {
        Self::UpstreamTimeout {
            call: call.into(),
            timeout_ms,
        }
    }

    /// Classify this error for reporting.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedSignal(_) => ErrorKind::MalformedSignal,
            Self::InvalidLayout(_) => ErrorKind::InvalidLayoutRequest,
            Self::OutOfBounds(_) => ErrorKind::OutOfBoundsOperation,
            Self::UpstreamTimeout { .. } => ErrorKind::UpstreamTimeout,
            Self::Engine(_) => ErrorKind::EngineFailure,
            Self::Cancelled => ErrorKind::Cancelled,
        }
    }
}

/// Job-level error with the originating stage preserved.
#[derive(Error, Debug)]
#[error("job '{job_name}' failed at stage {stage}: {source}")]
pub struct JobError {
    pub job_name: String,
    /// The stage being attempted when the error occurred.
    pub stage: JobStage,
    #[source]
    pub source: StageError,
}

impl JobError {
    /// Wrap a stage error with job context.
    pub fn at_stage(job_name: impl Into<String>, stage: JobStage, source: StageError) -> Self {
        Self {
            job_name: job_name.into(),
            stage,
            source,
        }
    }
}

/// Result type for stage operations.
pub type StageResult<T> = Result<T, StageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_is_retryable_others_are_not() {
        assert!(ErrorKind::UpstreamTimeout.is_retryable());
        assert!(!ErrorKind::MalformedSignal.is_retryable());
        assert!(!ErrorKind::OutOfBoundsOperation.is_retryable());
    }

    #[test]
    fn stage_error_classification() {
        let err = StageError::timeout("transcribe", 5000);
        assert_eq!(err.kind(), ErrorKind::UpstreamTimeout);
        assert!(err.to_string().contains("transcribe"));
        assert!(err.to_string().contains("5000"));
    }

    #[test]
    fn job_error_chains_context() {
        let stage_err = StageError::Cancelled;
        let job_err = JobError::at_stage("clip_07", JobStage::Fused, stage_err);
        let msg = job_err.to_string();
        assert!(msg.contains("clip_07"));
        assert!(msg.contains("Fused"));
    }
}
