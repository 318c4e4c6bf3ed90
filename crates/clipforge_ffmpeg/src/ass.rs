//! ASS subtitle writer.
//!
//! Renders subtitle cues into an ASS document with one style per palette
//! color, so the ffmpeg `subtitles` filter draws speaker-colored lines.
//!
//! # Timing precision
//!
//! ASS uses centisecond timing (H:MM:SS.cc); cue milliseconds are rounded
//! at write time only.

use std::collections::HashMap;

use clipforge_core::models::{Dimensions, SubtitleCue};

/// ASS color in &HAABBGGRR form (alpha, blue, green, red).
///
/// Alpha 00 is opaque.
fn ass_color(rgb_token: &str) -> String {
    let (r, g, b) = parse_rgb(rgb_token);
    format!("&H00{:02X}{:02X}{:02X}", b, g, r)
}

/// Parse a `#RRGGBB` token, defaulting to white on malformed input.
fn parse_rgb(token: &str) -> (u8, u8, u8) {
    let hex = token.trim().trim_start_matches('#');
    if hex.len() != 6 {
        return (255, 255, 255);
    }
    match u32::from_str_radix(hex, 16) {
        Ok(value) => (
            ((value >> 16) & 0xFF) as u8,
            ((value >> 8) & 0xFF) as u8,
            (value & 0xFF) as u8,
        ),
        Err(_) => (255, 255, 255),
    }
}

/// Format milliseconds as an ASS timestamp (H:MM:SS.cc).
pub fn format_ass_time(ms: i64) -> String {
    let ms = ms.max(0);
    let cs = (ms + 5) / 10;
    let secs = cs / 100;
    format!(
        "{}:{:02}:{:02}.{:02}",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60,
        cs % 100
    )
}

/// Render cues into a complete ASS document.
///
/// Styles are named `Speaker1..N` in order of first color appearance;
/// every cue references the style matching its color.
pub fn write_ass(cues: &[SubtitleCue], play_res: Dimensions) -> String {
    let mut style_names: HashMap<&str, String> = HashMap::new();
    let mut style_order: Vec<(&str, String)> = Vec::new();
    for cue in cues {
        if !style_names.contains_key(cue.color.as_str()) {
            let name = format!("Speaker{}", style_order.len() + 1);
            style_names.insert(cue.color.as_str(), name.clone());
            style_order.push((cue.color.as_str(), name));
        }
    }

    let font_size = (play_res.height / 24).max(24);
    let margin_v = (play_res.height / 12).max(20);

    let mut out = String::new();
    out.push_str("[Script Info]\n");
    out.push_str("Title: clipforge subtitles\n");
    out.push_str("ScriptType: v4.00+\n");
    out.push_str(&format!("PlayResX: {}\n", play_res.width));
    out.push_str(&format!("PlayResY: {}\n", play_res.height));
    out.push_str("WrapStyle: 0\n");
    out.push_str("ScaledBorderAndShadow: yes\n\n");

    out.push_str("[V4+ Styles]\n");
    out.push_str(
        "Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, \
         BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, \
         BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding\n",
    );
    for (color, name) in &style_order {
        out.push_str(&format!(
            "Style: {},Arial,{},{},&H000000FF,&H00000000,&H00000000,-1,0,0,0,100,100,0,0,1,3,1,2,40,40,{},1\n",
            name,
            font_size,
            ass_color(color),
            margin_v
        ));
    }
    out.push('\n');

    out.push_str("[Events]\n");
    out.push_str("Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n");
    for cue in cues {
        if cue.text.is_empty() {
            continue;
        }
        let style = style_names
            .get(cue.color.as_str())
            .map(String::as_str)
            .unwrap_or("Default");
        out.push_str(&format!(
            "Dialogue: 0,{},{},{},{},0,0,0,,{}\n",
            format_ass_time(cue.start_ms),
            format_ass_time(cue.end_ms),
            style,
            cue.speaker_id,
            escape_text(&cue.text)
        ));
    }

    out
}

/// Escape cue text for an ASS dialogue line.
fn escape_text(text: &str) -> String {
    text.replace('\n', "\\N").replace('{', "(").replace('}', ")")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipforge_core::models::SpeakerId;

    fn cue(text: &str, color: &str, speaker: &str, start: i64, end: i64) -> SubtitleCue {
        SubtitleCue {
            text: text.to_string(),
            speaker_id: SpeakerId::new(speaker),
            color: color.to_string(),
            start_ms: start,
            end_ms: end,
        }
    }

    #[test]
    fn ass_time_format() {
        assert_eq!(format_ass_time(0), "0:00:00.00");
        assert_eq!(format_ass_time(1234), "0:00:01.23");
        assert_eq!(format_ass_time(3_661_500), "1:01:01.50");
    }

    #[test]
    fn ass_time_rounds_to_centiseconds() {
        assert_eq!(format_ass_time(995), "0:00:01.00");
        assert_eq!(format_ass_time(994), "0:00:00.99");
    }

    #[test]
    fn color_converts_to_abgr() {
        assert_eq!(ass_color("#FFD700"), "&H0000D7FF");
        assert_eq!(ass_color("#FFFFFF"), "&H00FFFFFF");
    }

    #[test]
    fn malformed_color_falls_back_to_white() {
        assert_eq!(ass_color("gold"), "&H00FFFFFF");
    }

    #[test]
    fn one_style_per_distinct_color() {
        let cues = vec![
            cue("hello", "#FFFFFF", "A", 0, 900),
            cue("hi", "#FFD700", "B", 1000, 1800),
            cue("again", "#FFFFFF", "A", 2000, 2600),
        ];
        let doc = write_ass(&cues, Dimensions::new(1080, 1920));

        assert_eq!(doc.matches("Style: Speaker").count(), 2);
        assert!(doc.contains("Style: Speaker1,Arial"));
        assert!(doc.contains("Style: Speaker2,Arial"));
        // Third cue reuses the first speaker's style.
        assert_eq!(doc.matches(",Speaker1,A,").count(), 2);
    }

    #[test]
    fn empty_text_cues_are_skipped() {
        let cues = vec![cue("", "#FFFFFF", "A", 0, 900)];
        let doc = write_ass(&cues, Dimensions::new(1080, 1920));
        assert!(!doc.contains("Dialogue:"));
    }

    #[test]
    fn braces_are_neutralized() {
        let cues = vec![cue("gg {wp}", "#FFFFFF", "A", 0, 900)];
        let doc = write_ass(&cues, Dimensions::new(1080, 1920));
        assert!(doc.contains("gg (wp)"));
    }
}
