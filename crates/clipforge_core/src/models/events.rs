//! Raw signal events produced by the external transcription and
//! diarization engines.
//!
//! All timing values are integer milliseconds. Events are validated once at
//! ingestion and never mutated afterwards.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation failure for a raw signal event.
///
/// Malformed signals are rejected at ingestion; they indicate a broken
/// upstream engine, not recoverable noise.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignalError {
    #[error("{what} has negative timestamp ({start_ms}..{end_ms})")]
    NegativeTimestamp {
        what: String,
        start_ms: i64,
        end_ms: i64,
    },

    #[error("{what} has start after end ({start_ms} > {end_ms})")]
    InvertedSpan {
        what: String,
        start_ms: i64,
        end_ms: i64,
    },
}

fn validate_span(what: impl Into<String>, start_ms: i64, end_ms: i64) -> Result<(), SignalError> {
    if start_ms < 0 || end_ms < 0 {
        return Err(SignalError::NegativeTimestamp {
            what: what.into(),
            start_ms,
            end_ms,
        });
    }
    if start_ms > end_ms {
        return Err(SignalError::InvertedSpan {
            what: what.into(),
            start_ms,
            end_ms,
        });
    }
    Ok(())
}

/// Opaque speaker token from the diarization engine.
///
/// The reserved value [`SpeakerId::UNKNOWN`] marks words no diarization
/// segment covers - the documented degradation path, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeakerId(String);

impl SpeakerId {
    /// Token used for words with no covering diarization segment.
    pub const UNKNOWN: &'static str = "UNKNOWN";

    /// Create a speaker id from an opaque engine token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The unknown-speaker id.
    pub fn unknown() -> Self {
        Self(Self::UNKNOWN.to_string())
    }

    /// Whether this is the unknown-speaker id.
    pub fn is_unknown(&self) -> bool {
        self.0 == Self::UNKNOWN
    }

    /// The raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SpeakerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SpeakerId {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

/// A single transcribed word with timing and confidence.
///
/// Word sequences are ordered by non-decreasing start time but are not
/// guaranteed gap-free or non-overlapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordEvent {
    /// Raw word text as produced by the transcription engine.
    pub text: String,
    pub start_ms: i64,
    pub end_ms: i64,
    /// Engine confidence in 0.0..=1.0.
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

fn default_confidence() -> f64 {
    1.0
}

impl WordEvent {
    /// Create a new word event.
    pub fn new(text: impl Into<String>, start_ms: i64, end_ms: i64) -> Self {
        Self {
            text: text.into(),
            start_ms,
            end_ms,
            confidence: 1.0,
        }
    }

    /// Midpoint of the word span, used for speaker attribution.
    pub fn midpoint_ms(&self) -> i64 {
        (self.start_ms + self.end_ms) / 2
    }

    /// Word duration. Zero-duration words are valid degenerate intervals.
    pub fn duration_ms(&self) -> i64 {
        self.end_ms - self.start_ms
    }

    /// Validate timing. Rejected words fail the whole ingestion.
    pub fn validate(&self) -> Result<(), SignalError> {
        validate_span(format!("word '{}'", self.text), self.start_ms, self.end_ms)
    }
}

/// A speaker-labeled time segment from the diarization engine.
///
/// Segments for the same speaker may be non-contiguous, and segments from
/// different speakers may overlap (simultaneous speech). Overlap is
/// expected input, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerSegment {
    pub speaker_id: SpeakerId,
    pub start_ms: i64,
    pub end_ms: i64,
}

impl SpeakerSegment {
    /// Create a new speaker segment.
    pub fn new(speaker_id: impl Into<SpeakerId>, start_ms: i64, end_ms: i64) -> Self {
        Self {
            speaker_id: speaker_id.into(),
            start_ms,
            end_ms,
        }
    }

    /// Whether the segment covers an instant, inclusive at both ends so
    /// degenerate zero-duration segments can still cover a point.
    pub fn covers(&self, instant_ms: i64) -> bool {
        self.start_ms <= instant_ms && instant_ms <= self.end_ms
    }

    /// Temporal overlap with an arbitrary span, clamped to zero.
    pub fn overlap_with(&self, start_ms: i64, end_ms: i64) -> i64 {
        (self.end_ms.min(end_ms) - self.start_ms.max(start_ms)).max(0)
    }

    /// Validate timing. Rejected segments fail the whole ingestion.
    pub fn validate(&self) -> Result<(), SignalError> {
        validate_span(
            format!("segment for '{}'", self.speaker_id),
            self.start_ms,
            self.end_ms,
        )
    }
}
