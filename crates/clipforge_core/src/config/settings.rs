//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Every tuning knob the pipeline components take lives here; components
//! receive the relevant section by reference and never read global state.

use serde::{Deserialize, Serialize};

use crate::models::{
    AspectRatio, Dimensions, FillPreference, PlacementPreference, RedactionMode,
};

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Path-related settings.
    #[serde(default)]
    pub paths: PathSettings,

    /// Per-job logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,

    /// Timeline fusion settings.
    #[serde(default)]
    pub fusion: FusionSettings,

    /// Profanity censoring settings.
    #[serde(default)]
    pub censor: CensorSettings,

    /// Subtitle cue settings.
    #[serde(default)]
    pub subtitles: SubtitleSettings,

    /// Spatial layout settings.
    #[serde(default)]
    pub layout: LayoutSettings,

    /// External engine call bounds.
    #[serde(default)]
    pub engine: EngineSettings,

    /// Upload dispatch settings.
    #[serde(default)]
    pub upload: UploadSettings,
}

/// Path configuration for output, temp, and logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    /// Output folder for rendered clips.
    #[serde(default = "default_output_folder")]
    pub output_folder: String,

    /// Root folder for job working files.
    #[serde(default = "default_temp_root")]
    pub temp_root: String,

    /// Folder for per-job log files.
    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,
}

fn default_output_folder() -> String {
    "shorts_output".to_string()
}

fn default_temp_root() -> String {
    ".temp".to_string()
}

fn default_logs_folder() -> String {
    ".logs".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            output_folder: default_output_folder(),
            temp_root: default_temp_root(),
            logs_folder: default_logs_folder(),
        }
    }
}

/// Per-job logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Use compact log output (filter progress lines).
    #[serde(default = "default_true")]
    pub compact: bool,

    /// Number of engine output lines kept for error diagnosis.
    #[serde(default = "default_error_tail")]
    pub error_tail: u32,

    /// Progress update step percentage.
    #[serde(default = "default_progress_step")]
    pub progress_step: u32,

    /// Prefix log lines with a timestamp.
    #[serde(default = "default_true")]
    pub show_timestamps: bool,
}

fn default_true() -> bool {
    true
}

fn default_error_tail() -> u32 {
    20
}

fn default_progress_step() -> u32 {
    20
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            compact: default_true(),
            error_tail: default_error_tail(),
            progress_step: default_progress_step(),
            show_timestamps: default_true(),
        }
    }
}

/// Timeline fusion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FusionSettings {
    /// Silence gap that starts a new utterance even when the speaker is
    /// unchanged, in milliseconds.
    #[serde(default = "default_utterance_gap_ms")]
    pub utterance_gap_ms: i64,
}

fn default_utterance_gap_ms() -> i64 {
    200
}

impl Default for FusionSettings {
    fn default() -> Self {
        Self {
            utterance_gap_ms: default_utterance_gap_ms(),
        }
    }
}

/// Profanity censoring settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CensorSettings {
    /// Pad applied to each side of a matched word span, in milliseconds.
    /// Avoids perceptible word-fragment leakage at interval edges.
    #[serde(default = "default_censor_pad_ms")]
    pub pad_ms: i64,

    /// Intervals closer than this after padding are merged, in milliseconds.
    #[serde(default = "default_merge_gap_ms")]
    pub merge_gap_ms: i64,

    /// How matched words are reproduced in subtitle text.
    #[serde(default)]
    pub redaction_mode: RedactionMode,

    /// Additional words to censor beyond the built-in list.
    #[serde(default)]
    pub extra_words: Vec<String>,

    /// Words never censored even when the list matches them.
    #[serde(default = "default_whitelist")]
    pub whitelist: Vec<String>,
}

fn default_censor_pad_ms() -> i64 {
    50
}

fn default_merge_gap_ms() -> i64 {
    150
}

fn default_whitelist() -> Vec<String> {
    vec!["god".to_string()]
}

impl Default for CensorSettings {
    fn default() -> Self {
        Self {
            pad_ms: default_censor_pad_ms(),
            merge_gap_ms: default_merge_gap_ms(),
            redaction_mode: RedactionMode::default(),
            extra_words: Vec::new(),
            whitelist: default_whitelist(),
        }
    }
}

/// Subtitle cue settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubtitleSettings {
    /// Maximum characters per on-screen cue before splitting.
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    /// Maximum on-screen duration per cue before splitting, in milliseconds.
    #[serde(default = "default_max_duration_ms")]
    pub max_duration_ms: i64,

    /// Extra display time appended to each cue, clamped to half the gap to
    /// the next cue so cues never collide, in milliseconds.
    #[serde(default = "default_end_padding_ms")]
    pub end_padding_ms: i64,

    /// Speaker color palette (`#RRGGBB` tokens), assigned in first-seen
    /// order and cycled when exhausted.
    #[serde(default = "default_palette")]
    pub palette: Vec<String>,
}

fn default_max_chars() -> usize {
    42
}

fn default_max_duration_ms() -> i64 {
    5000
}

fn default_end_padding_ms() -> i64 {
    500
}

fn default_palette() -> Vec<String> {
    vec![
        "#FFFFFF".to_string(),
        "#FFD700".to_string(),
        "#00BFFF".to_string(),
        "#7CFC00".to_string(),
        "#FF69B4".to_string(),
        "#FFA500".to_string(),
    ]
}

impl Default for SubtitleSettings {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
            max_duration_ms: default_max_duration_ms(),
            end_padding_ms: default_end_padding_ms(),
            palette: default_palette(),
        }
    }
}

/// Spatial layout settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutSettings {
    /// Target aspect width component.
    #[serde(default = "default_target_aspect_w")]
    pub target_aspect_w: i32,

    /// Target aspect height component.
    #[serde(default = "default_target_aspect_h")]
    pub target_aspect_h: i32,

    /// Output frame width in pixels; height follows the target aspect.
    #[serde(default = "default_output_width")]
    pub output_width: u32,

    /// Ratio difference below which source and target aspect are treated
    /// as matching.
    #[serde(default = "default_aspect_tolerance")]
    pub aspect_tolerance: f64,

    /// Fill strategy for letterbox area not covered by content.
    #[serde(default)]
    pub fill_preference: FillPreference,

    /// Fraction of output height reserved for the camera band.
    #[serde(default = "default_camera_band_frac")]
    pub camera_band_frac: f64,

    /// Which side hosts the camera band.
    #[serde(default)]
    pub camera_placement_preference: PlacementPreference,

    /// Fraction of output height given to main content when no camera is
    /// hosted. Unset means content spans the full output with no fill.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_height_frac: Option<f64>,
}

fn default_target_aspect_w() -> i32 {
    9
}

fn default_target_aspect_h() -> i32 {
    16
}

fn default_output_width() -> u32 {
    1080
}

fn default_aspect_tolerance() -> f64 {
    0.01
}

fn default_camera_band_frac() -> f64 {
    1.0 / 3.0
}

impl LayoutSettings {
    /// The configured target aspect ratio.
    pub fn target_aspect(&self) -> AspectRatio {
        AspectRatio::new(self.target_aspect_w, self.target_aspect_h)
    }

    /// Output frame dimensions derived from width and target aspect.
    ///
    /// Only meaningful when the target aspect is non-degenerate; the layout
    /// planner validates that before any geometry is derived.
    pub fn output_dimensions(&self) -> Dimensions {
        let height = if self.target_aspect_w > 0 {
            (i64::from(self.output_width) * i64::from(self.target_aspect_h)
                / i64::from(self.target_aspect_w)) as u32
        } else {
            0
        };
        Dimensions::new(self.output_width, crate::models::even_floor(height))
    }
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            target_aspect_w: default_target_aspect_w(),
            target_aspect_h: default_target_aspect_h(),
            output_width: default_output_width(),
            aspect_tolerance: default_aspect_tolerance(),
            fill_preference: FillPreference::default(),
            camera_band_frac: default_camera_band_frac(),
            camera_placement_preference: PlacementPreference::default(),
            content_height_frac: None,
        }
    }
}

/// Timeout bounds for external engine calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Transcription engine timeout in milliseconds.
    #[serde(default = "default_transcribe_timeout_ms")]
    pub transcribe_timeout_ms: u64,

    /// Diarization engine timeout in milliseconds.
    #[serde(default = "default_diarize_timeout_ms")]
    pub diarize_timeout_ms: u64,

    /// Media engine render timeout in milliseconds.
    #[serde(default = "default_render_timeout_ms")]
    pub render_timeout_ms: u64,
}

fn default_transcribe_timeout_ms() -> u64 {
    300_000
}

fn default_diarize_timeout_ms() -> u64 {
    300_000
}

fn default_render_timeout_ms() -> u64 {
    600_000
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            transcribe_timeout_ms: default_transcribe_timeout_ms(),
            diarize_timeout_ms: default_diarize_timeout_ms(),
            render_timeout_ms: default_render_timeout_ms(),
        }
    }
}

/// Upload dispatch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadSettings {
    /// Attempts per platform before giving up.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial retry backoff in milliseconds, doubled per attempt.
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,

    /// Maximum parallel platform uploads.
    #[serde(default = "default_max_parallel")]
    pub max_parallel: usize,
}

fn default_max_retries() -> u32 {
    3
}

fn default_backoff_ms() -> u64 {
    2000
}

fn default_max_parallel() -> usize {
    4
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            backoff_ms: default_backoff_ms(),
            max_parallel: default_max_parallel(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_sections() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings.fusion.utterance_gap_ms, 200);
        assert_eq!(settings.censor.pad_ms, 50);
        assert_eq!(settings.subtitles.max_chars, 42);
        assert_eq!(settings.layout.target_aspect(), AspectRatio::new(9, 16));
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [censor]
            pad_ms = 80
            "#,
        )
        .unwrap();
        assert_eq!(settings.censor.pad_ms, 80);
        assert_eq!(settings.censor.merge_gap_ms, 150);
        assert_eq!(settings.censor.whitelist, vec!["god".to_string()]);
    }

    #[test]
    fn output_dimensions_follow_aspect() {
        let layout = LayoutSettings::default();
        assert_eq!(layout.output_dimensions(), Dimensions::new(1080, 1920));
    }

    #[test]
    fn settings_roundtrip_through_toml() {
        let settings = Settings::default();
        let serialized = toml::to_string(&settings).unwrap();
        let parsed: Settings = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.subtitles.palette, settings.subtitles.palette);
        assert_eq!(parsed.engine.render_timeout_ms, 600_000);
    }
}
