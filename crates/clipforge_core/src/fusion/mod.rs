//! Timeline fusion engine.
//!
//! Merges word-level transcript events and speaker-labeled diarization
//! segments into one ordered, speaker-attributed timeline of utterances.
//!
//! Attribution is by word midpoint: the segment covering the midpoint with
//! the largest overlap against the word's full span wins; remaining ties go
//! to the lexicographically smaller speaker id, so resolution never depends
//! on input iteration order. Words no segment covers are attributed
//! `UNKNOWN` - the documented degradation path when diarization is absent.

mod segment_index;

pub use segment_index::SegmentIndex;

use crate::config::FusionSettings;
use crate::models::{SpeakerId, SpeakerSegment, Utterance, WordEvent};

/// Fuse transcript words and diarization segments into utterances.
///
/// Both inputs are sorted by start time (stable). Consecutive words with
/// the same resolved speaker group into one utterance; a speaker change or
/// a silence gap over `settings.utterance_gap_ms` starts a new one.
///
/// An empty word sequence yields an empty timeline; an empty segment
/// sequence yields all-`UNKNOWN` utterances. Neither is an error.
pub fn fuse(
    mut words: Vec<WordEvent>,
    segments: Vec<SpeakerSegment>,
    settings: &FusionSettings,
) -> Vec<Utterance> {
    words.sort_by_key(|w| w.start_ms);
    let index = SegmentIndex::new(segments);

    let mut utterances = Vec::new();
    let mut current_speaker: Option<SpeakerId> = None;
    let mut current_words: Vec<WordEvent> = Vec::new();
    let mut prev_end_ms = 0_i64;

    for word in words {
        let speaker = resolve_speaker(&word, &index);

        let same_speaker = current_speaker.as_ref() == Some(&speaker);
        let gap_ms = word.start_ms - prev_end_ms;
        let breaks_run =
            !same_speaker || (!current_words.is_empty() && gap_ms > settings.utterance_gap_ms);

        if breaks_run && !current_words.is_empty() {
            if let Some(speaker_id) = current_speaker.take() {
                if let Some(utterance) =
                    Utterance::from_words(speaker_id, std::mem::take(&mut current_words))
                {
                    utterances.push(utterance);
                }
            }
        }

        prev_end_ms = word.end_ms;
        current_speaker = Some(speaker);
        current_words.push(word);
    }

    if let (Some(speaker_id), false) = (current_speaker, current_words.is_empty()) {
        if let Some(utterance) = Utterance::from_words(speaker_id, current_words) {
            utterances.push(utterance);
        }
    }

    tracing::debug!(utterances = utterances.len(), "timeline fused");
    utterances
}

/// Resolve the speaker for one word.
///
/// Candidates are the segments covering the word midpoint. Tie-break order:
/// larger overlap with the word span, then smaller speaker id.
fn resolve_speaker(word: &WordEvent, index: &SegmentIndex) -> SpeakerId {
    let candidates = index.covering(word.midpoint_ms());

    candidates
        .into_iter()
        .max_by(|a, b| {
            let overlap_a = a.overlap_with(word.start_ms, word.end_ms);
            let overlap_b = b.overlap_with(word.start_ms, word.end_ms);
            overlap_a
                .cmp(&overlap_b)
                // max_by keeps the later element on ties, so order ids
                // descending to end up with the smaller one.
                .then_with(|| b.speaker_id.cmp(&a.speaker_id))
        })
        .map(|s| s.speaker_id.clone())
        .unwrap_or_else(SpeakerId::unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, start: i64, end: i64) -> WordEvent {
        WordEvent::new(text, start, end)
    }

    fn seg(speaker: &str, start: i64, end: i64) -> SpeakerSegment {
        SpeakerSegment::new(speaker, start, end)
    }

    fn settings() -> FusionSettings {
        FusionSettings::default()
    }

    #[test]
    fn empty_words_yield_empty_timeline() {
        let timeline = fuse(Vec::new(), vec![seg("A", 0, 1000)], &settings());
        assert!(timeline.is_empty());
    }

    #[test]
    fn no_segments_yield_unknown_speaker() {
        let timeline = fuse(
            vec![word("hello", 0, 400), word("there", 450, 800)],
            Vec::new(),
            &settings(),
        );
        assert_eq!(timeline.len(), 1);
        assert!(timeline[0].speaker_id.is_unknown());
    }

    #[test]
    fn speaker_change_splits_utterances() {
        // Scenario from the product requirements: two speakers back to back.
        let timeline = fuse(
            vec![
                word("shoot", 0, 500),
                word("that", 500, 900),
                word("dang", 900, 1200),
            ],
            vec![seg("A", 0, 900), seg("B", 900, 1200)],
            &settings(),
        );

        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline[0].speaker_id.as_str(), "A");
        assert_eq!(timeline[0].start_ms, 0);
        assert_eq!(timeline[0].end_ms, 900);
        assert_eq!(timeline[1].speaker_id.as_str(), "B");
        assert_eq!(timeline[1].start_ms, 900);
        assert_eq!(timeline[1].end_ms, 1200);
    }

    #[test]
    fn equal_overlap_resolves_lexicographically() {
        // Word fully inside both segments: overlap ties, "A" wins.
        let timeline = fuse(
            vec![word("hey", 600, 700)],
            vec![seg("B", 500, 1500), seg("A", 0, 1000)],
            &settings(),
        );
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline[0].speaker_id.as_str(), "A");
    }

    #[test]
    fn larger_overlap_beats_lexicographic_order() {
        // Word 400..1000, midpoint 700 covered by both; Z overlaps fully.
        let timeline = fuse(
            vec![word("nice", 400, 1000)],
            vec![seg("A", 600, 800), seg("Z", 0, 2000)],
            &settings(),
        );
        assert_eq!(timeline[0].speaker_id.as_str(), "Z");
    }

    #[test]
    fn silence_gap_splits_same_speaker() {
        let timeline = fuse(
            vec![word("one", 0, 300), word("two", 800, 1100)],
            vec![seg("A", 0, 2000)],
            &settings(),
        );
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline[0].speaker_id.as_str(), "A");
        assert_eq!(timeline[1].speaker_id.as_str(), "A");
    }

    #[test]
    fn fusion_is_lossless_partition() {
        let words = vec![
            word("a", 0, 100),
            word("b", 120, 250),
            word("c", 260, 400),
            word("d", 2000, 2200),
            word("e", 2250, 2500),
        ];
        let segments = vec![seg("S1", 0, 300), seg("S2", 250, 3000)];

        let timeline = fuse(words.clone(), segments, &settings());

        let flattened: Vec<WordEvent> = timeline
            .iter()
            .flat_map(|u| u.words.iter().cloned())
            .collect();
        assert_eq!(flattened, words);

        for utterance in &timeline {
            assert_eq!(utterance.start_ms, utterance.words[0].start_ms);
            assert_eq!(
                utterance.end_ms,
                utterance.words.last().unwrap().end_ms
            );
        }
    }

    #[test]
    fn utterances_never_overlap() {
        let words = vec![
            word("a", 0, 500),
            word("b", 500, 900),
            word("c", 900, 1300),
            word("d", 1300, 1500),
        ];
        let segments = vec![seg("A", 0, 900), seg("B", 900, 1500)];
        let timeline = fuse(words, segments, &settings());

        for pair in timeline.windows(2) {
            assert!(pair[0].end_ms <= pair[1].start_ms);
        }
    }

    #[test]
    fn zero_duration_word_is_attributed() {
        let timeline = fuse(
            vec![word("uh", 500, 500)],
            vec![seg("A", 0, 1000)],
            &settings(),
        );
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline[0].speaker_id.as_str(), "A");
        assert_eq!(timeline[0].start_ms, 500);
        assert_eq!(timeline[0].end_ms, 500);
    }

    #[test]
    fn unsorted_words_are_sorted_first() {
        let timeline = fuse(
            vec![word("later", 1000, 1200), word("first", 0, 300)],
            vec![seg("A", 0, 2000)],
            &settings(),
        );
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline[0].words[0].text, "first");
    }
}
