//! ffmpeg-backed media engine.
//!
//! Implements the core's `MediaEngine` trait: writes the ASS document for
//! any subtitle operations, builds the argument vector, and runs ffmpeg as
//! a child process. The orchestrator wraps the render call in its own
//! timeout; `kill_on_drop` ensures a timed-out render leaves no orphan
//! process.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;

use clipforge_core::compose::{OperationParams, RenderOperation, TimeWindow};
use clipforge_core::models::{ArtifactHandle, SubtitleCue};
use clipforge_core::orchestrator::{EngineError, EngineResult, MediaEngine, RenderRequest};

use super::args_builder::{format_args_pretty, FfmpegArgsBuilder};
use super::ass;
use super::error::{FfmpegError, FfmpegResult};
use super::probe;

/// Media engine that shells out to ffmpeg.
pub struct FfmpegEngine {
    ffmpeg_path: PathBuf,
    ffprobe_path: PathBuf,
}

impl FfmpegEngine {
    /// Create an engine with explicit binary paths.
    pub fn new(ffmpeg_path: PathBuf, ffprobe_path: PathBuf) -> Self {
        Self {
            ffmpeg_path,
            ffprobe_path,
        }
    }

    /// Locate ffmpeg and ffprobe in PATH.
    pub fn discover() -> FfmpegResult<Self> {
        let ffmpeg_path = which::which("ffmpeg").map_err(|_| FfmpegError::ToolNotFound {
            tool: "ffmpeg".to_string(),
        })?;
        let ffprobe_path = which::which("ffprobe").map_err(|_| FfmpegError::ToolNotFound {
            tool: "ffprobe".to_string(),
        })?;
        tracing::debug!(ffmpeg = %ffmpeg_path.display(), "located ffmpeg binaries");
        Ok(Self::new(ffmpeg_path, ffprobe_path))
    }

    /// Probe a source video for dimensions and duration.
    pub fn probe(&self, source: &Path) -> FfmpegResult<clipforge_core::models::SourceMetadata> {
        probe::probe_source(&self.ffprobe_path, source)
    }
}

#[async_trait]
impl MediaEngine for FfmpegEngine {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn render(&self, request: RenderRequest<'_>) -> EngineResult<ArtifactHandle> {
        tokio::fs::create_dir_all(request.output_dir)
            .await
            .map_err(|e| EngineError::io("creating output directory", e))?;

        let cues = cues_from_operations(request.operations);
        let subtitle_path = if cues.is_empty() {
            None
        } else {
            let path = request
                .output_dir
                .join(format!("{}.ass", request.job_name));
            let document = ass::write_ass(&cues, request.output);
            tokio::fs::write(&path, document)
                .await
                .map_err(|e| EngineError::io("writing subtitle file", e))?;
            Some(path)
        };

        let output_path = request
            .output_dir
            .join(format!("{}.mp4", request.job_name));

        let mut builder = FfmpegArgsBuilder::new(
            request.source,
            request.metadata,
            request.operations,
            request.output,
            &output_path,
        );
        if let Some(path) = subtitle_path {
            builder = builder.with_subtitle_file(path);
        }
        let args = builder
            .build()
            .map_err(|e| EngineError::failed("render", e.to_string()))?;

        tracing::debug!("ffmpeg {}", format_args_pretty(&args));

        let output = Command::new(&self.ffmpeg_path)
            .args(&args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| EngineError::io("running ffmpeg", e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let tail: Vec<&str> = stderr.lines().rev().take(10).collect();
            return Err(EngineError::failed(
                "render",
                format!(
                    "ffmpeg exited with {}: {}",
                    output.status.code().unwrap_or(-1),
                    tail.into_iter().rev().collect::<Vec<_>>().join("\n")
                ),
            ));
        }

        Ok(ArtifactHandle::new(
            output_path,
            request.metadata.duration_ms,
        ))
    }
}

/// Rebuild subtitle cues from the operation sequence for the ASS writer.
fn cues_from_operations(operations: &[RenderOperation]) -> Vec<SubtitleCue> {
    operations
        .iter()
        .filter_map(|op| match (&op.params, op.time_window) {
            (
                OperationParams::DrawSubtitle {
                    text,
                    speaker_id,
                    color,
                },
                TimeWindow::Span { start_ms, end_ms },
            ) => Some(SubtitleCue {
                text: text.clone(),
                speaker_id: speaker_id.clone(),
                color: color.clone(),
                start_ms,
                end_ms,
            }),
            _ => None,
        })
        .collect()
}
