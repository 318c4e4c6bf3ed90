//! Core enums used throughout the pipeline.

use serde::{Deserialize, Serialize};

/// How a profane word is reproduced in subtitle text.
///
/// Audio is always muted over the word's span; this controls only the
/// displayed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedactionMode {
    /// Mute audio but leave the subtitle text untouched.
    MuteOnly,
    /// Mute audio and remove the word from the displayed text.
    MuteAndBlank,
    /// Mute audio and replace each character with a mask symbol,
    /// preserving word length.
    #[default]
    MuteAndAsterisk,
}

impl RedactionMode {
    /// Get the display name for this mode.
    pub fn name(&self) -> &'static str {
        match self {
            Self::MuteOnly => "mute_only",
            Self::MuteAndBlank => "mute_and_blank",
            Self::MuteAndAsterisk => "mute_and_asterisk",
        }
    }

    /// Get all available modes.
    pub fn all() -> &'static [RedactionMode] {
        &[Self::MuteOnly, Self::MuteAndBlank, Self::MuteAndAsterisk]
    }
}

impl std::fmt::Display for RedactionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Preferred strategy for filling letterbox area not covered by content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillPreference {
    /// Scaled and blurred copy of the source frame.
    #[default]
    Blur,
    /// Flat color fill.
    Solid,
}

/// Fill strategy actually selected by the layout planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillMode {
    Blur,
    Solid,
    /// Content covers the whole output frame, nothing to fill.
    #[default]
    None,
}

impl FillMode {
    /// Map a preference to the corresponding fill mode.
    pub fn from_preference(preference: FillPreference) -> Self {
        match preference {
            FillPreference::Blur => Self::Blur,
            FillPreference::Solid => Self::Solid,
        }
    }
}

/// Which output band hosts the camera feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraPlacement {
    Top,
    Bottom,
    /// No camera band (region absent, unusable, or overlapping the crop).
    #[default]
    None,
}

/// Operator preference for the camera band side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementPreference {
    /// Pick the side whose frame third overlaps the crop least.
    #[default]
    Auto,
    Top,
    Bottom,
}

/// Why an interval must be censored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CensorReason {
    Profanity,
}

/// Discriminant of a render operation, used for the ordering contract
/// with the external media engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Crop,
    FillBackground,
    OverlayCamera,
    MuteAudio,
    DrawSubtitle,
}

impl OperationKind {
    /// Tie-break priority for operations sharing a start time.
    ///
    /// Audio processing must not depend on subtitle render state, so
    /// MuteAudio sorts before DrawSubtitle.
    pub fn priority(&self) -> u8 {
        match self {
            Self::Crop => 0,
            Self::FillBackground => 1,
            Self::OverlayCamera => 2,
            Self::MuteAudio => 3,
            Self::DrawSubtitle => 4,
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Crop => "crop",
            Self::FillBackground => "fill_background",
            Self::OverlayCamera => "overlay_camera",
            Self::MuteAudio => "mute_audio",
            Self::DrawSubtitle => "draw_subtitle",
        };
        write!(f, "{}", name)
    }
}

/// Stage of a pipeline job.
///
/// Stages advance strictly forward; `Rendered` is terminal-success and
/// `Failed` is terminal-failure. No stage is re-entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStage {
    /// Signals received and validated.
    #[default]
    Ingested,
    /// Timeline fusion complete.
    Fused,
    /// Censor intervals and subtitle cues derived.
    PolicyDerived,
    /// Spatial layout plan computed.
    LaidOut,
    /// Render operation sequence composed.
    Composed,
    /// External media engine produced the artifact.
    Rendered,
    /// Job halted with a structured error.
    Failed,
}

impl JobStage {
    /// Whether this stage is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rendered | Self::Failed)
    }

    /// Get the display name for this stage.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ingested => "Ingested",
            Self::Fused => "Fused",
            Self::PolicyDerived => "PolicyDerived",
            Self::LaidOut => "LaidOut",
            Self::Composed => "Composed",
            Self::Rendered => "Rendered",
            Self::Failed => "Failed",
        }
    }
}

impl std::fmt::Display for JobStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
