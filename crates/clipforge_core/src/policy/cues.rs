//! Subtitle cue derivation: redaction, splitting, display padding.

use crate::config::SubtitleSettings;
use crate::models::{RedactionMode, SubtitleCue, Utterance};

use super::censor::ProfanityList;
use super::palette::SpeakerPalette;

/// One word as it will be displayed after redaction.
#[derive(Debug, Clone)]
struct DisplayWord {
    text: String,
}

/// Derive subtitle cues from the fused timeline.
///
/// One cue per utterance, split at word boundaries when the rendered text
/// exceeds the character budget or the window exceeds the duration budget;
/// split windows divide the utterance span proportionally by character
/// count. Profane words are reproduced per the redaction mode. A display
/// end-padding extends each cue, clamped to half the gap to the next cue
/// and to the media duration.
pub fn subtitle_cues(
    utterances: &[Utterance],
    list: &ProfanityList,
    settings: &SubtitleSettings,
    redaction: RedactionMode,
    duration_ms: i64,
) -> Vec<SubtitleCue> {
    let mut palette = SpeakerPalette::new(&settings.palette);
    let mut cues = Vec::new();

    for utterance in utterances {
        let color = palette.color_for(&utterance.speaker_id).to_string();
        let display = redact_words(utterance, list, redaction);

        if display.is_empty() {
            // Every word was blanked; the cue keeps its window so timing
            // stays comparable across redaction modes.
            cues.push(SubtitleCue {
                text: String::new(),
                speaker_id: utterance.speaker_id.clone(),
                color,
                start_ms: utterance.start_ms,
                end_ms: utterance.end_ms,
            });
            continue;
        }

        let chunks = split_chunks(&display, utterance, settings);
        let windows = proportional_windows(utterance.start_ms, utterance.end_ms, &chunks);

        for (chunk, (start_ms, end_ms)) in chunks.iter().zip(windows) {
            cues.push(SubtitleCue {
                text: join_words(chunk),
                speaker_id: utterance.speaker_id.clone(),
                color: color.clone(),
                start_ms,
                end_ms,
            });
        }
    }

    apply_end_padding(&mut cues, settings.end_padding_ms, duration_ms);

    tracing::debug!(cues = cues.len(), "subtitle cues derived");
    cues
}

/// Apply the redaction mode to an utterance's words.
fn redact_words(
    utterance: &Utterance,
    list: &ProfanityList,
    redaction: RedactionMode,
) -> Vec<DisplayWord> {
    utterance
        .words
        .iter()
        .filter_map(|word| {
            let trimmed = word.text.trim();
            if !list.matches(trimmed) {
                return Some(DisplayWord {
                    text: trimmed.to_string(),
                });
            }
            match redaction {
                RedactionMode::MuteOnly => Some(DisplayWord {
                    text: trimmed.to_string(),
                }),
                RedactionMode::MuteAndBlank => None,
                RedactionMode::MuteAndAsterisk => Some(DisplayWord {
                    text: "*".repeat(trimmed.chars().count()),
                }),
            }
        })
        .collect()
}

/// Pack display words into chunks within the character budget, then split
/// further until every chunk's proportional window fits the duration
/// budget.
fn split_chunks<'a>(
    display: &'a [DisplayWord],
    utterance: &Utterance,
    settings: &SubtitleSettings,
) -> Vec<Vec<&'a DisplayWord>> {
    let mut chunks: Vec<Vec<&DisplayWord>> = Vec::new();
    let mut current: Vec<&DisplayWord> = Vec::new();
    let mut current_chars = 0usize;

    for word in display {
        let word_chars = word.text.chars().count();
        let added = if current.is_empty() {
            word_chars
        } else {
            current_chars + 1 + word_chars
        };
        if !current.is_empty() && added > settings.max_chars {
            chunks.push(std::mem::take(&mut current));
            current_chars = word_chars;
        } else {
            current_chars = added;
        }
        current.push(word);
    }
    if !current.is_empty() {
        chunks.push(current);
    }

    // Duration budget: split the widest offending chunk at its character
    // midpoint until all proportional windows fit. Bounded by word count.
    loop {
        let windows = proportional_windows(utterance.start_ms, utterance.end_ms, &chunks);
        let offender = chunks
            .iter()
            .zip(&windows)
            .position(|(chunk, (start, end))| {
                chunk.len() > 1 && end - start > settings.max_duration_ms
            });
        match offender {
            Some(index) => {
                let chunk = chunks.remove(index);
                let (left, right) = split_at_char_midpoint(chunk);
                chunks.insert(index, right);
                chunks.insert(index, left);
            }
            None => break,
        }
    }

    chunks
}

/// Split a multi-word chunk at the word boundary closest to half its
/// character count.
fn split_at_char_midpoint(chunk: Vec<&DisplayWord>) -> (Vec<&DisplayWord>, Vec<&DisplayWord>) {
    let total: usize = chunk.iter().map(|w| w.text.chars().count()).sum();
    let mut seen = 0usize;
    let mut split_index = 1;
    for (i, word) in chunk.iter().enumerate() {
        seen += word.text.chars().count();
        if seen * 2 >= total {
            split_index = (i + 1).min(chunk.len() - 1).max(1);
            break;
        }
    }
    let mut left = chunk;
    let right = left.split_off(split_index);
    (left, right)
}

/// Divide `[start, end]` across chunks proportionally by character count.
fn proportional_windows(
    start_ms: i64,
    end_ms: i64,
    chunks: &[Vec<&DisplayWord>],
) -> Vec<(i64, i64)> {
    let total_chars: usize = chunks
        .iter()
        .map(|c| chunk_chars(c))
        .sum::<usize>()
        .max(1);
    let total_duration = end_ms - start_ms;

    let mut windows = Vec::with_capacity(chunks.len());
    let mut cumulative = 0usize;
    let mut previous_boundary = start_ms;
    for (i, chunk) in chunks.iter().enumerate() {
        cumulative += chunk_chars(chunk);
        let boundary = if i + 1 == chunks.len() {
            // Last chunk always ends exactly at the utterance end.
            end_ms
        } else {
            start_ms + (total_duration * cumulative as i64) / total_chars as i64
        };
        windows.push((previous_boundary, boundary));
        previous_boundary = boundary;
    }
    windows
}

fn chunk_chars(chunk: &[&DisplayWord]) -> usize {
    let words: usize = chunk.iter().map(|w| w.text.chars().count()).sum();
    words + chunk.len().saturating_sub(1)
}

fn join_words(chunk: &[&DisplayWord]) -> String {
    let mut out = String::new();
    for (i, word) in chunk.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&word.text);
    }
    out
}

/// Extend cue ends for readability without ever colliding with the next
/// cue or exceeding the media duration.
fn apply_end_padding(cues: &mut [SubtitleCue], padding_ms: i64, duration_ms: i64) {
    if padding_ms <= 0 {
        return;
    }
    for i in 0..cues.len() {
        let pad = match cues.get(i + 1) {
            Some(next) => {
                let gap = next.start_ms - cues[i].end_ms;
                if gap < padding_ms {
                    (gap / 2).max(0)
                } else {
                    padding_ms
                }
            }
            None => padding_ms,
        };
        cues[i].end_ms = (cues[i].end_ms + pad).min(duration_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SpeakerId, WordEvent};

    fn utterance(speaker: &str, words: &[(&str, i64, i64)]) -> Utterance {
        let words = words
            .iter()
            .map(|(t, s, e)| WordEvent::new(*t, *s, *e))
            .collect();
        Utterance::from_words(SpeakerId::new(speaker), words).unwrap()
    }

    fn settings() -> SubtitleSettings {
        SubtitleSettings {
            end_padding_ms: 0,
            ..SubtitleSettings::default()
        }
    }

    fn no_profanity() -> ProfanityList {
        ProfanityList::from_words(Vec::<String>::new())
    }

    #[test]
    fn one_cue_per_short_utterance() {
        let utterances = vec![
            utterance("A", &[("nice", 0, 300), ("shot", 350, 700)]),
            utterance("B", &[("thanks", 900, 1300)]),
        ];
        let cues = subtitle_cues(
            &utterances,
            &no_profanity(),
            &settings(),
            RedactionMode::MuteOnly,
            60_000,
        );
        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0].text, "nice shot");
        assert_eq!(cues[1].text, "thanks");
    }

    #[test]
    fn speaker_colors_follow_first_seen_order() {
        let utterances = vec![
            utterance("B", &[("first", 0, 300)]),
            utterance("A", &[("second", 400, 700)]),
            utterance("B", &[("third", 900, 1200)]),
        ];
        let cfg = settings();
        let cues = subtitle_cues(
            &utterances,
            &no_profanity(),
            &cfg,
            RedactionMode::MuteOnly,
            60_000,
        );
        assert_eq!(cues[0].color, cfg.palette[0]);
        assert_eq!(cues[1].color, cfg.palette[1]);
        assert_eq!(cues[2].color, cfg.palette[0]);
    }

    #[test]
    fn color_assignment_is_reproducible() {
        let utterances = vec![
            utterance("X", &[("one", 0, 300)]),
            utterance("Y", &[("two", 400, 700)]),
        ];
        let cfg = settings();
        let first = subtitle_cues(
            &utterances,
            &no_profanity(),
            &cfg,
            RedactionMode::MuteOnly,
            60_000,
        );
        let second = subtitle_cues(
            &utterances,
            &no_profanity(),
            &cfg,
            RedactionMode::MuteOnly,
            60_000,
        );
        assert_eq!(first, second);
    }

    #[test]
    fn asterisk_mode_preserves_length_and_position() {
        let list = ProfanityList::from_words(["damn"]);
        let utterances = vec![utterance(
            "A",
            &[("well", 0, 300), ("damn,", 350, 700), ("dude", 750, 1000)],
        )];
        let cues = subtitle_cues(
            &utterances,
            &list,
            &settings(),
            RedactionMode::MuteAndAsterisk,
            60_000,
        );
        assert_eq!(cues[0].text, "well ***** dude");
    }

    #[test]
    fn blank_mode_removes_word_but_keeps_window() {
        let list = ProfanityList::from_words(["damn"]);
        let utterances = vec![utterance("A", &[("well", 0, 300), ("damn", 350, 700)])];

        let blanked = subtitle_cues(
            &utterances,
            &list,
            &settings(),
            RedactionMode::MuteAndBlank,
            60_000,
        );
        let visible = subtitle_cues(
            &utterances,
            &list,
            &settings(),
            RedactionMode::MuteOnly,
            60_000,
        );

        assert_eq!(blanked[0].text, "well");
        assert_eq!(visible[0].text, "well damn");
        assert_eq!(blanked[0].start_ms, visible[0].start_ms);
        assert_eq!(blanked[0].end_ms, visible[0].end_ms);
    }

    #[test]
    fn fully_blanked_utterance_keeps_empty_cue() {
        let list = ProfanityList::from_words(["damn"]);
        let utterances = vec![utterance("A", &[("damn", 100, 500)])];
        let cues = subtitle_cues(
            &utterances,
            &list,
            &settings(),
            RedactionMode::MuteAndBlank,
            60_000,
        );
        assert_eq!(cues.len(), 1);
        assert!(cues[0].text.is_empty());
        assert_eq!((cues[0].start_ms, cues[0].end_ms), (100, 500));
    }

    #[test]
    fn long_utterance_splits_at_word_boundaries() {
        let words: Vec<(String, i64, i64)> = (0..12)
            .map(|i| (format!("word{:02}", i), i * 500, i * 500 + 400))
            .collect();
        let word_refs: Vec<(&str, i64, i64)> =
            words.iter().map(|(t, s, e)| (t.as_str(), *s, *e)).collect();
        let utterances = vec![utterance("A", &word_refs)];

        let cfg = SubtitleSettings {
            max_chars: 20,
            end_padding_ms: 0,
            ..SubtitleSettings::default()
        };
        let cues = subtitle_cues(
            &utterances,
            &no_profanity(),
            &cfg,
            RedactionMode::MuteOnly,
            60_000,
        );

        assert!(cues.len() > 1);
        // Windows tile the utterance span in order without gaps.
        assert_eq!(cues.first().unwrap().start_ms, 0);
        assert_eq!(cues.last().unwrap().end_ms, 11 * 500 + 400);
        for pair in cues.windows(2) {
            assert_eq!(pair[0].end_ms, pair[1].start_ms);
        }
        for cue in &cues {
            assert!(cue.text.chars().count() <= 20);
        }
    }

    #[test]
    fn duration_budget_forces_split() {
        // Two short words held for twelve seconds.
        let utterances = vec![utterance("A", &[("noo", 0, 6000), ("way", 6000, 12_000)])];
        let cfg = SubtitleSettings {
            max_duration_ms: 5000,
            end_padding_ms: 0,
            ..SubtitleSettings::default()
        };
        let cues = subtitle_cues(
            &utterances,
            &no_profanity(),
            &cfg,
            RedactionMode::MuteOnly,
            60_000,
        );
        assert_eq!(cues.len(), 2);
    }

    #[test]
    fn end_padding_clamped_to_half_gap() {
        let utterances = vec![
            utterance("A", &[("one", 0, 1000)]),
            utterance("B", &[("two", 1200, 2000)]),
        ];
        let cfg = SubtitleSettings {
            end_padding_ms: 500,
            ..SubtitleSettings::default()
        };
        let cues = subtitle_cues(
            &utterances,
            &no_profanity(),
            &cfg,
            RedactionMode::MuteOnly,
            60_000,
        );
        // Gap is 200ms, under the padding, so only half the gap is added.
        assert_eq!(cues[0].end_ms, 1100);
        // Last cue gets the full padding.
        assert_eq!(cues[1].end_ms, 2500);
    }

    #[test]
    fn end_padding_clamped_to_duration() {
        let utterances = vec![utterance("A", &[("bye", 0, 1000)])];
        let cfg = SubtitleSettings {
            end_padding_ms: 500,
            ..SubtitleSettings::default()
        };
        let cues = subtitle_cues(
            &utterances,
            &no_profanity(),
            &cfg,
            RedactionMode::MuteOnly,
            1200,
        );
        assert_eq!(cues[0].end_ms, 1200);
    }
}
