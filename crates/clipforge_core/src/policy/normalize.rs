//! Word normalization for profanity matching.
//!
//! Transcription engines emit words with leading spaces and trailing
//! punctuation (" Hell!"). Matching happens on normalized forms; the
//! original text is never altered here.

/// Casefold and trim surrounding whitespace.
pub fn casefold(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Casefold and strip leading/trailing non-alphanumeric characters.
///
/// Interior characters are kept so pre-masked tokens ("f***") survive as
/// the casefolded form rather than collapsing to a single letter.
pub fn strip_punctuation(raw: &str) -> String {
    let folded = casefold(raw);
    folded
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_string()
}
