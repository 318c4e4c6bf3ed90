//! Data models for the clipforge pipeline.
//!
//! This module contains the core data structures shared across stages:
//! - Enums for redaction, fill, placement, operation kinds, and job stages
//! - Raw signal events (words, speaker segments)
//! - Fused timeline entities (utterances, censor intervals, subtitle cues)
//! - Geometry primitives and source/artifact metadata

mod enums;
mod events;
mod geometry;
mod media;
mod timeline;

pub use enums::{
    CameraPlacement, CensorReason, FillMode, FillPreference, JobStage, OperationKind,
    PlacementPreference, RedactionMode,
};
pub use events::{SignalError, SpeakerId, SpeakerSegment, WordEvent};
pub use geometry::{even_floor, AspectRatio, Dimensions, Rect};
pub use media::{ArtifactHandle, SourceMetadata};
pub use timeline::{CensorInterval, SubtitleCue, Utterance};
