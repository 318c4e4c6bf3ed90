//! Content policy engine.
//!
//! Walks the fused timeline and produces the two derived instruction sets:
//! censor intervals (audio mute spans) and subtitle cues (redacted text,
//! speaker color, time window).
//!
//! The profanity list and color palette are read-only configuration loaded
//! once and injected per call; nothing here touches global state.

mod censor;
mod cues;
mod normalize;
mod palette;

pub use censor::{censor_intervals, ProfanityList};
pub use cues::subtitle_cues;
pub use palette::SpeakerPalette;

use serde::{Deserialize, Serialize};

use crate::config::{CensorSettings, SubtitleSettings};
use crate::models::{CensorInterval, SubtitleCue, Utterance};

/// Output of the policy derivation stage.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PolicyOutput {
    /// Merged, non-overlapping audio mute spans.
    pub censors: Vec<CensorInterval>,
    /// Ordered subtitle cues with redacted text and speaker colors.
    pub cues: Vec<SubtitleCue>,
}

/// Derive censor intervals and subtitle cues from the fused timeline.
///
/// `duration_ms` bounds every derived span so the composer's duration
/// check can never fail on policy output.
pub fn derive(
    utterances: &[Utterance],
    list: &ProfanityList,
    censor_settings: &CensorSettings,
    subtitle_settings: &SubtitleSettings,
    duration_ms: i64,
) -> PolicyOutput {
    let censors = censor_intervals(utterances, list, censor_settings, duration_ms);
    let cues = subtitle_cues(
        utterances,
        list,
        subtitle_settings,
        censor_settings.redaction_mode,
        duration_ms,
    );
    PolicyOutput { censors, cues }
}
