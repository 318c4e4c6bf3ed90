//! Profanity detection and censor interval derivation.

use std::collections::HashSet;

use crate::config::CensorSettings;
use crate::models::{CensorInterval, Utterance, WordEvent};

use super::normalize::{casefold, strip_punctuation};

/// Read-only profanity word set.
///
/// Loaded once per job (or process-wide) and injected into the policy
/// engine; entries are lowercase normalized strings. A word matches when
/// either its casefolded form or its punctuation-stripped form is in the
/// set, so pre-masked entries like `f***` still match.
#[derive(Debug, Clone)]
pub struct ProfanityList {
    words: HashSet<String>,
}

impl ProfanityList {
    /// Build from raw word entries, normalizing each.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| casefold(w.as_ref()))
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    /// Build from censor settings: the built-in base list plus
    /// `extra_words`, minus `whitelist` entries.
    pub fn from_settings(settings: &CensorSettings) -> Self {
        let mut list = Self::from_words(BASE_WORDS.iter().copied());
        list.words
            .extend(settings.extra_words.iter().map(|w| casefold(w)));
        for white in &settings.whitelist {
            list.words.remove(&casefold(white));
        }
        list
    }

    /// Whether a raw word from the transcript matches the list.
    pub fn matches(&self, raw_word: &str) -> bool {
        if self.words.contains(&casefold(raw_word)) {
            return true;
        }
        let stripped = strip_punctuation(raw_word);
        !stripped.is_empty() && self.words.contains(&stripped)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Minimal built-in list; deployments extend it via `censor.extra_words`.
const BASE_WORDS: &[&str] = &[
    "fuck", "fucking", "fucked", "shit", "bitch", "asshole", "bastard", "dick", "pussy", "cunt",
    "goddamn", "motherfucker",
];

/// Derive merged censor intervals from the fused timeline.
///
/// Every matched word contributes an interval spanning exactly its word
/// span expanded by the configured pad; overlapping or near-adjacent
/// intervals merge. Interval ends are clamped to `duration_ms` so the
/// composer's duration bound always holds.
pub fn censor_intervals(
    utterances: &[Utterance],
    list: &ProfanityList,
    settings: &CensorSettings,
    duration_ms: i64,
) -> Vec<CensorInterval> {
    let mut intervals: Vec<CensorInterval> = utterances
        .iter()
        .flat_map(|u| u.words.iter())
        .filter(|w| list.matches(&w.text))
        .map(|w| word_interval(w, settings.pad_ms, duration_ms))
        .collect();

    intervals.sort_by_key(|i| (i.start_ms, i.end_ms));

    let mut merged: Vec<CensorInterval> = Vec::with_capacity(intervals.len());
    for interval in intervals {
        match merged.last_mut() {
            Some(last) if last.absorbs(&interval, settings.merge_gap_ms) => {
                last.merge(&interval);
            }
            _ => merged.push(interval),
        }
    }

    tracing::debug!(intervals = merged.len(), "censor intervals derived");
    merged
}

fn word_interval(word: &WordEvent, pad_ms: i64, duration_ms: i64) -> CensorInterval {
    let padded = CensorInterval::profanity(word.start_ms, word.end_ms).expanded(pad_ms);
    CensorInterval {
        end_ms: padded.end_ms.min(duration_ms),
        ..padded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SpeakerId;

    fn utterance(speaker: &str, words: Vec<WordEvent>) -> Utterance {
        Utterance::from_words(SpeakerId::new(speaker), words).unwrap()
    }

    fn settings() -> CensorSettings {
        CensorSettings::default()
    }

    #[test]
    fn matches_trailing_punctuation() {
        let list = ProfanityList::from_words(["fuck"]);
        assert!(list.matches("Fuck!"));
        assert!(list.matches(" fuck,"));
        assert!(!list.matches("duck"));
    }

    #[test]
    fn matches_premasked_entry() {
        let list = ProfanityList::from_words(["f***"]);
        assert!(list.matches("f***"));
        assert!(list.matches("F***"));
    }

    #[test]
    fn whitelist_removes_entries() {
        let cfg = CensorSettings {
            extra_words: vec!["frick".to_string()],
            whitelist: vec!["frick".to_string()],
            ..CensorSettings::default()
        };
        let list = ProfanityList::from_settings(&cfg);
        assert!(!list.matches("frick"));
        assert!(list.matches("fuck"));
    }

    #[test]
    fn interval_spans_word_with_pad() {
        let list = ProfanityList::from_words(["damn"]);
        let utterances = vec![utterance(
            "A",
            vec![
                WordEvent::new("well", 0, 400),
                WordEvent::new("damn", 900, 1200),
            ],
        )];

        let intervals = censor_intervals(&utterances, &list, &settings(), 60_000);
        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0].start_ms, 850);
        assert_eq!(intervals[0].end_ms, 1250);
    }

    #[test]
    fn intervals_contained_in_utterance_span_with_pad() {
        let list = ProfanityList::from_words(["damn"]);
        let utterances = vec![utterance(
            "A",
            vec![
                WordEvent::new("damn", 100, 300),
                WordEvent::new("damn", 2000, 2300),
            ],
        )];
        let cfg = settings();
        let intervals = censor_intervals(&utterances, &list, &cfg, 60_000);
        for interval in &intervals {
            assert!(interval.start_ms >= utterances[0].start_ms - cfg.pad_ms);
            assert!(interval.end_ms <= utterances[0].end_ms + cfg.pad_ms);
        }
    }

    #[test]
    fn adjacent_intervals_merge() {
        let list = ProfanityList::from_words(["damn"]);
        // 100ms apart after padding, within the 150ms merge gap.
        let utterances = vec![utterance(
            "A",
            vec![
                WordEvent::new("damn", 0, 300),
                WordEvent::new("damn", 500, 800),
            ],
        )];
        let intervals = censor_intervals(&utterances, &list, &settings(), 60_000);
        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0].start_ms, 0);
        assert_eq!(intervals[0].end_ms, 850);
    }

    #[test]
    fn output_intervals_never_overlap() {
        let list = ProfanityList::from_words(["damn"]);
        let utterances = vec![utterance(
            "A",
            vec![
                WordEvent::new("damn", 0, 500),
                WordEvent::new("damn", 400, 900),
                WordEvent::new("damn", 5000, 5400),
            ],
        )];
        let intervals = censor_intervals(&utterances, &list, &settings(), 60_000);
        for pair in intervals.windows(2) {
            assert!(pair[0].end_ms < pair[1].start_ms);
        }
    }

    #[test]
    fn interval_end_clamped_to_duration() {
        let list = ProfanityList::from_words(["damn"]);
        let utterances = vec![utterance("A", vec![WordEvent::new("damn", 990, 1000)])];
        let intervals = censor_intervals(&utterances, &list, &settings(), 1000);
        assert_eq!(intervals[0].end_ms, 1000);
    }

    #[test]
    fn clean_timeline_yields_no_intervals() {
        let list = ProfanityList::from_settings(&settings());
        let utterances = vec![utterance(
            "A",
            vec![WordEvent::new("nice", 0, 200), WordEvent::new("shot", 250, 500)],
        )];
        assert!(censor_intervals(&utterances, &list, &settings(), 60_000).is_empty());
    }
}
