//! Signal-file engine adapters.
//!
//! The speech-to-text and diarization engines are external collaborators;
//! the CLI consumes their word/segment output as JSON files and adapts
//! them to the core's engine traits.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use clipforge_core::models::{SpeakerSegment, WordEvent};
use clipforge_core::orchestrator::{
    DiarizationEngine, EngineError, EngineResult, TranscriptionEngine,
};

/// Transcription engine backed by a word-events JSON file.
///
/// Expected shape: `[{"text": "...", "start_ms": 0, "end_ms": 500,
/// "confidence": 0.98}, ...]`.
pub struct JsonTranscriptionEngine {
    path: PathBuf,
}

impl JsonTranscriptionEngine {
    /// Create an engine reading the given file.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl TranscriptionEngine for JsonTranscriptionEngine {
    fn name(&self) -> &str {
        "transcript-json"
    }

    async fn transcribe(&self, _source: &Path) -> EngineResult<Vec<WordEvent>> {
        read_json(&self.path, "transcript").await
    }
}

/// Diarization engine backed by a speaker-segments JSON file.
///
/// A missing file path yields an empty segment list: the documented
/// degradation path where every utterance is attributed UNKNOWN.
pub struct JsonDiarizationEngine {
    path: Option<PathBuf>,
}

impl JsonDiarizationEngine {
    /// Create an engine reading the given file, or none.
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

#[async_trait]
impl DiarizationEngine for JsonDiarizationEngine {
    fn name(&self) -> &str {
        "diarization-json"
    }

    async fn diarize(&self, _source: &Path) -> EngineResult<Vec<SpeakerSegment>> {
        match &self.path {
            Some(path) => read_json(path, "diarization").await,
            None => {
                tracing::warn!("no diarization input, speakers will be UNKNOWN");
                Ok(Vec::new())
            }
        }
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> EngineResult<T> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| EngineError::io(format!("reading {} file", what), e))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| EngineError::failed(format!("parsing {} file", what), e.to_string()))
}
