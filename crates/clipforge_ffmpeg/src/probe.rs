//! Source probing using ffprobe.
//!
//! Runs `ffprobe -print_format json -show_format -show_streams` and parses
//! the first video stream into [`SourceMetadata`].

use std::path::Path;
use std::process::Command;

use serde_json::Value;

use clipforge_core::models::SourceMetadata;

use super::error::{FfmpegError, FfmpegResult};

/// Probe a source video for dimensions and duration.
pub fn probe_source(ffprobe: &Path, source: &Path) -> FfmpegResult<SourceMetadata> {
    if !source.exists() {
        return Err(FfmpegError::FileNotFound(source.to_path_buf()));
    }

    tracing::debug!(source = %source.display(), "probing source");

    let output = Command::new(ffprobe)
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(source)
        .output()
        .map_err(|e| FfmpegError::io("running ffprobe", e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(FfmpegError::CommandFailed {
            tool: "ffprobe".to_string(),
            exit_code: output.status.code().unwrap_or(-1),
            message: stderr.to_string(),
        });
    }

    let json: Value = serde_json::from_slice(&output.stdout)
        .map_err(|e| FfmpegError::parse("ffprobe output", e.to_string()))?;

    parse_probe_json(&json)
}

/// Parse the JSON output from ffprobe into source metadata.
pub fn parse_probe_json(json: &Value) -> FfmpegResult<SourceMetadata> {
    let streams = json
        .get("streams")
        .and_then(|s| s.as_array())
        .ok_or_else(|| FfmpegError::parse("ffprobe output", "no streams array"))?;

    let video = streams
        .iter()
        .find(|s| s.get("codec_type").and_then(|t| t.as_str()) == Some("video"))
        .ok_or_else(|| FfmpegError::parse("ffprobe output", "no video stream"))?;

    let width = video
        .get("width")
        .and_then(|w| w.as_u64())
        .ok_or_else(|| FfmpegError::parse("video stream", "missing width"))? as u32;
    let height = video
        .get("height")
        .and_then(|h| h.as_u64())
        .ok_or_else(|| FfmpegError::parse("video stream", "missing height"))? as u32;

    // Duration lives in format.duration as a decimal-seconds string;
    // fall back to the stream's own duration field.
    let duration_secs = json
        .get("format")
        .and_then(|f| f.get("duration"))
        .and_then(|d| d.as_str())
        .or_else(|| video.get("duration").and_then(|d| d.as_str()))
        .and_then(|d| d.parse::<f64>().ok())
        .ok_or_else(|| FfmpegError::parse("ffprobe output", "missing duration"))?;

    Ok(SourceMetadata::new(
        width,
        height,
        (duration_secs * 1000.0).round() as i64,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_video_stream_and_duration() {
        let probe = json!({
            "streams": [
                {"codec_type": "audio", "sample_rate": "44100"},
                {"codec_type": "video", "width": 1920, "height": 1080}
            ],
            "format": {"duration": "63.450"}
        });

        let metadata = parse_probe_json(&probe).unwrap();
        assert_eq!(metadata.width, 1920);
        assert_eq!(metadata.height, 1080);
        assert_eq!(metadata.duration_ms, 63_450);
    }

    #[test]
    fn falls_back_to_stream_duration() {
        let probe = json!({
            "streams": [
                {"codec_type": "video", "width": 1280, "height": 720, "duration": "10.0"}
            ],
            "format": {}
        });
        let metadata = parse_probe_json(&probe).unwrap();
        assert_eq!(metadata.duration_ms, 10_000);
    }

    #[test]
    fn missing_video_stream_is_an_error() {
        let probe = json!({
            "streams": [{"codec_type": "audio"}],
            "format": {"duration": "5.0"}
        });
        assert!(matches!(
            parse_probe_json(&probe),
            Err(FfmpegError::ParseError { .. })
        ));
    }
}
