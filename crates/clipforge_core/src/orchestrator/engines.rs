//! External engine boundary.
//!
//! The speech-to-text engine, speaker-diarization engine, and media
//! engine are external collaborators. The core only depends on these
//! traits; calls through them are the sole suspension points in a job and
//! are wrapped in timeouts by the runner.

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use crate::compose::RenderOperation;
use crate::models::{ArtifactHandle, SourceMetadata, SpeakerSegment, WordEvent};

/// Failure reported by an external engine.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{call} failed: {message}")]
    Failed { call: String, message: String },

    #[error("I/O error in {call}: {source}")]
    Io {
        call: String,
        #[source]
        source: std::io::Error,
    },
}

impl EngineError {
    /// Create a generic engine failure.
    pub fn failed(call: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            call: call.into(),
            message: message.into(),
        }
    }

    /// Create an I/O engine failure.
    pub fn io(call: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            call: call.into(),
            source,
        }
    }
}

/// Result type for engine calls.
pub type EngineResult<T> = Result<T, EngineError>;

/// Produces word-level transcripts with timestamps.
#[async_trait]
pub trait TranscriptionEngine: Send + Sync {
    /// Engine name for logs and error context.
    fn name(&self) -> &str;

    /// Transcribe the source's audio into timed word events, ordered by
    /// non-decreasing start time.
    async fn transcribe(&self, source: &Path) -> EngineResult<Vec<WordEvent>>;
}

/// Produces speaker-labeled time segments.
#[async_trait]
pub trait DiarizationEngine: Send + Sync {
    /// Engine name for logs and error context.
    fn name(&self) -> &str;

    /// Diarize the source's audio. An empty result is valid; the fused
    /// timeline degrades to `UNKNOWN` speakers.
    async fn diarize(&self, source: &Path) -> EngineResult<Vec<SpeakerSegment>>;
}

/// Render request handed to the media engine.
///
/// The ordered operation sequence is the core's sole rendering contract;
/// it is consumed exactly once per render pass.
#[derive(Debug)]
pub struct RenderRequest<'a> {
    /// Source video path.
    pub source: &'a Path,
    /// Probed source metadata.
    pub metadata: &'a SourceMetadata,
    /// Ordered render operations.
    pub operations: &'a [RenderOperation],
    /// Output frame dimensions.
    pub output: crate::models::Dimensions,
    /// Directory for the rendered artifact.
    pub output_dir: &'a Path,
    /// Job name, used for artifact naming.
    pub job_name: &'a str,
}

/// Performs the actual pixel/sample manipulation.
#[async_trait]
pub trait MediaEngine: Send + Sync {
    /// Engine name for logs and error context.
    fn name(&self) -> &str;

    /// Render the operation sequence into an artifact.
    async fn render(&self, request: RenderRequest<'_>) -> EngineResult<ArtifactHandle>;
}
