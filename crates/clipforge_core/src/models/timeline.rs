//! Fused-timeline entities: utterances, censor intervals, subtitle cues.
//!
//! These are derived, job-local values. Each is produced by exactly one
//! stage and read-only afterwards.

use serde::{Deserialize, Serialize};

use super::enums::CensorReason;
use super::events::{SpeakerId, WordEvent};

/// A maximal span of consecutive words attributed to one speaker.
///
/// Invariants: `start_ms` equals the first word's start, `end_ms` equals the
/// last word's end, words are ordered by start time, and no two utterances
/// in the same timeline overlap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    pub speaker_id: SpeakerId,
    pub words: Vec<WordEvent>,
    pub start_ms: i64,
    pub end_ms: i64,
}

impl Utterance {
    /// Build an utterance from a non-empty word run.
    ///
    /// Returns `None` for an empty run; start/end are derived from the
    /// first and last word.
    pub fn from_words(speaker_id: SpeakerId, words: Vec<WordEvent>) -> Option<Self> {
        let first = words.first()?;
        let last = words.last()?;
        let (start_ms, end_ms) = (first.start_ms, last.end_ms);
        Some(Self {
            speaker_id,
            words,
            start_ms,
            end_ms,
        })
    }

    /// Utterance duration in milliseconds.
    pub fn duration_ms(&self) -> i64 {
        self.end_ms - self.start_ms
    }

    /// Raw display text: word texts joined by single spaces.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for (i, word) in self.words.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push_str(word.text.trim());
        }
        out
    }
}

/// A time span over which audio must be muted.
///
/// Intervals are non-overlapping by construction; adjacent intervals within
/// the configured gap tolerance are merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CensorInterval {
    pub start_ms: i64,
    pub end_ms: i64,
    pub reason: CensorReason,
}

impl CensorInterval {
    /// Create a profanity censor interval.
    pub fn profanity(start_ms: i64, end_ms: i64) -> Self {
        Self {
            start_ms,
            end_ms,
            reason: CensorReason::Profanity,
        }
    }

    /// Expand by a pad on both sides, clamping the start at zero.
    pub fn expanded(&self, pad_ms: i64) -> Self {
        Self {
            start_ms: (self.start_ms - pad_ms).max(0),
            end_ms: self.end_ms + pad_ms,
            ..*self
        }
    }

    /// Whether another interval overlaps this one or starts within
    /// `gap_ms` of its end. Assumes `other.start_ms >= self.start_ms`.
    pub fn absorbs(&self, other: &CensorInterval, gap_ms: i64) -> bool {
        other.start_ms <= self.end_ms + gap_ms
    }

    /// Merge another interval into this one.
    pub fn merge(&mut self, other: &CensorInterval) {
        self.end_ms = self.end_ms.max(other.end_ms);
    }
}

/// One subtitle line ready for rendering.
///
/// Text is already redacted per the configured redaction mode. The color is
/// an opaque palette token (`#RRGGBB`) assigned deterministically per
/// speaker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleCue {
    pub text: String,
    pub speaker_id: SpeakerId,
    pub color: String,
    pub start_ms: i64,
    pub end_ms: i64,
}

impl SubtitleCue {
    /// Cue duration in milliseconds.
    pub fn duration_ms(&self) -> i64 {
        self.end_ms - self.start_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utterance_derives_span_from_words() {
        let words = vec![
            WordEvent::new("shoot", 0, 500),
            WordEvent::new("that", 500, 900),
        ];
        let utt = Utterance::from_words(SpeakerId::new("A"), words).unwrap();
        assert_eq!(utt.start_ms, 0);
        assert_eq!(utt.end_ms, 900);
        assert_eq!(utt.text(), "shoot that");
    }

    #[test]
    fn empty_word_run_yields_none() {
        assert!(Utterance::from_words(SpeakerId::new("A"), Vec::new()).is_none());
    }

    #[test]
    fn censor_expand_clamps_at_zero() {
        let interval = CensorInterval::profanity(20, 400);
        let padded = interval.expanded(50);
        assert_eq!(padded.start_ms, 0);
        assert_eq!(padded.end_ms, 450);
    }

    #[test]
    fn censor_absorbs_within_gap() {
        let mut a = CensorInterval::profanity(0, 100);
        let b = CensorInterval::profanity(180, 300);
        assert!(a.absorbs(&b, 100));
        assert!(!a.absorbs(&b, 50));
        a.merge(&b);
        assert_eq!(a.end_ms, 300);
    }
}
