//! ffmpeg argument builder.
//!
//! Converts the composed render operation sequence into a single ffmpeg
//! invocation: crop/scale chains for the spatial plan, blurred or solid
//! background for fill, per-interval volume filters for audio muting, and
//! the `subtitles` filter for cue drawing.
//!
//! The builder only produces argument tokens; process execution lives in
//! the engine.

use std::path::{Path, PathBuf};

use clipforge_core::compose::{OperationParams, RenderOperation, TimeWindow};
use clipforge_core::models::{
    even_floor, CameraPlacement, Dimensions, FillMode, Rect, SourceMetadata,
};

use super::error::{FfmpegError, FfmpegResult};

const BLUR_SIGMA: u32 = 12;
const SOLID_FILL_COLOR: &str = "black";

/// Builder for a complete ffmpeg argument vector.
pub struct FfmpegArgsBuilder<'a> {
    source: &'a Path,
    metadata: &'a SourceMetadata,
    operations: &'a [RenderOperation],
    output: Dimensions,
    output_path: &'a Path,
    subtitle_path: Option<PathBuf>,
}

/// Spatial plan distilled from the operation sequence.
struct SpatialOps {
    crop: Rect,
    fill: Option<FillMode>,
    camera: Option<(Rect, CameraPlacement)>,
    mutes: Vec<(i64, i64)>,
    has_subtitles: bool,
}

impl<'a> FfmpegArgsBuilder<'a> {
    /// Create a new builder.
    pub fn new(
        source: &'a Path,
        metadata: &'a SourceMetadata,
        operations: &'a [RenderOperation],
        output: Dimensions,
        output_path: &'a Path,
    ) -> Self {
        Self {
            source,
            metadata,
            operations,
            output,
            output_path,
            subtitle_path: None,
        }
    }

    /// Set the ASS file consumed by the subtitles filter.
    pub fn with_subtitle_file(mut self, path: PathBuf) -> Self {
        self.subtitle_path = Some(path);
        self
    }

    /// Build the complete argument vector.
    pub fn build(&self) -> FfmpegResult<Vec<String>> {
        let spatial = self.collect_operations()?;
        let graph = self.build_filter_graph(&spatial)?;

        let mut args = vec![
            "-i".to_string(),
            self.source.to_string_lossy().to_string(),
            "-filter_complex".to_string(),
            graph,
            "-map".to_string(),
            "[vout]".to_string(),
        ];

        if spatial.mutes.is_empty() {
            args.push("-map".to_string());
            args.push("0:a?".to_string());
        } else {
            args.push("-map".to_string());
            args.push("[aout]".to_string());
        }

        args.extend(
            [
                "-c:v",
                "libx264",
                "-preset",
                "medium",
                "-crf",
                "23",
                "-c:a",
                "aac",
                "-b:a",
                "128k",
                "-movflags",
                "+faststart",
                "-y",
            ]
            .iter()
            .map(|s| s.to_string()),
        );
        args.push(self.output_path.to_string_lossy().to_string());

        Ok(args)
    }

    /// Walk the operation list into the spatial/temporal summary.
    fn collect_operations(&self) -> FfmpegResult<SpatialOps> {
        let mut crop = None;
        let mut fill = None;
        let mut camera = None;
        let mut mutes = Vec::new();
        let mut has_subtitles = false;

        for op in self.operations {
            match &op.params {
                OperationParams::Crop { rect } => crop = Some(*rect),
                OperationParams::FillBackground { mode } => fill = Some(*mode),
                OperationParams::OverlayCamera { rect, placement } => {
                    camera = Some((*rect, *placement));
                }
                OperationParams::MuteAudio { .. } => {
                    if let TimeWindow::Span { start_ms, end_ms } = op.time_window {
                        mutes.push((start_ms, end_ms));
                    }
                }
                OperationParams::DrawSubtitle { .. } => has_subtitles = true,
            }
        }

        let crop = crop.ok_or_else(|| {
            FfmpegError::UnsupportedSequence("sequence has no crop operation".to_string())
        })?;

        Ok(SpatialOps {
            crop,
            fill,
            camera,
            mutes,
            has_subtitles,
        })
    }

    /// Assemble the filter_complex graph.
    fn build_filter_graph(&self, spatial: &SpatialOps) -> FfmpegResult<String> {
        let out_w = self.output.width;
        let out_h = self.output.height;
        let crop = spatial.crop;

        let cam = spatial
            .camera
            .map(|(rect, placement)| (rect, placement, scaled_height(out_w, &rect)));
        let available = out_h - cam.map(|(_, _, h)| h).unwrap_or(0);

        // Even-rounding in the planner can leave the scaled crop a few
        // pixels off the band it was computed for; snap within that slop so
        // exact-fit layouts stay exact.
        let mut main_h = scaled_height(out_w, &crop);
        if (i64::from(main_h) - i64::from(available)).abs() <= 8 {
            main_h = available;
        }

        let used_h = main_h + cam.map(|(_, _, h)| h).unwrap_or(0);
        let residual = i64::from(out_h) - i64::from(used_h);

        let mut chains: Vec<String> = Vec::new();
        chains.push(format!(
            "[0:v]crop={}:{}:{}:{},scale={}:{}[main]",
            crop.width, crop.height, crop.x, crop.y, out_w, main_h
        ));
        if let Some((rect, _, cam_h)) = cam {
            chains.push(format!(
                "[0:v]crop={}:{}:{}:{},scale={}:{}[cam]",
                rect.width, rect.height, rect.x, rect.y, out_w, cam_h
            ));
        }

        let video_label = if residual > 0 {
            // Content does not tile the output: composite onto a
            // background per the fill mode.
            let fill = spatial.fill.unwrap_or(FillMode::Solid);
            match fill {
                FillMode::Blur => chains.push(format!(
                    "[0:v]scale={}:{}:force_original_aspect_ratio=increase,\
                     crop={}:{},gblur=sigma={}[bg]",
                    out_w, out_h, out_w, out_h, BLUR_SIGMA
                )),
                FillMode::Solid | FillMode::None => chains.push(format!(
                    "color=c={}:s={}x{}:d=1[bg]",
                    SOLID_FILL_COLOR, out_w, out_h
                )),
            }

            match cam {
                Some((_, placement, cam_h)) => {
                    let (cam_y, main_y) = match placement {
                        CameraPlacement::Bottom => {
                            (i64::from(out_h) - i64::from(cam_h), 0_i64)
                        }
                        // Camera band on top; main content anchored to
                        // the bottom with the residual between them.
                        _ => (0_i64, i64::from(out_h) - i64::from(main_h)),
                    };
                    chains.push(format!("[bg][main]overlay=0:{}[v1]", main_y));
                    chains.push(format!("[v1][cam]overlay=0:{}[v2]", cam_y));
                    "[v2]"
                }
                None => {
                    // Center the content band vertically.
                    let main_y = residual / 2;
                    chains.push(format!("[bg][main]overlay=0:{}[v1]", main_y));
                    "[v1]"
                }
            }
        } else {
            match cam {
                Some((_, placement, _)) => {
                    match placement {
                        CameraPlacement::Bottom => {
                            chains.push("[main][cam]vstack=inputs=2[v1]".to_string())
                        }
                        _ => chains.push("[cam][main]vstack=inputs=2[v1]".to_string()),
                    }
                    "[v1]"
                }
                None => "[main]",
            }
        };

        // Subtitles burn into the final video chain.
        let final_chain = if spatial.has_subtitles {
            let path = self.subtitle_path.as_ref().ok_or_else(|| {
                FfmpegError::UnsupportedSequence(
                    "subtitle operations present but no subtitle file".to_string(),
                )
            })?;
            format!(
                "{}subtitles='{}'[vout]",
                video_label,
                escape_filter_path(path)
            )
        } else {
            format!("{}null[vout]", video_label)
        };
        chains.push(final_chain);

        if !spatial.mutes.is_empty() {
            let volume_filters: Vec<String> = spatial
                .mutes
                .iter()
                .map(|(start_ms, end_ms)| {
                    format!(
                        "volume=0:enable='between(t,{},{})'",
                        seconds(*start_ms),
                        seconds(*end_ms)
                    )
                })
                .collect();
            chains.push(format!("[0:a]{}[aout]", volume_filters.join(",")));
        }

        tracing::debug!(duration_ms = self.metadata.duration_ms, "filter graph built");
        Ok(chains.join(";"))
    }
}

/// Height of a rect scaled to the given width, kept even.
fn scaled_height(width: u32, rect: &Rect) -> u32 {
    let height = (u64::from(width) * u64::from(rect.height) / u64::from(rect.width)) as u32;
    even_floor(height)
}

/// Milliseconds as decimal seconds for filter expressions.
fn seconds(ms: i64) -> String {
    format!("{:.3}", ms as f64 / 1000.0)
}

/// Escape a path for use inside a quoted filter argument.
///
/// Forward slashes everywhere; colons escaped so drive letters and option
/// separators don't collide.
fn escape_filter_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/").replace(':', "\\:")
}

/// Pretty-print argument tokens for logs, one option per line.
pub fn format_args_pretty(tokens: &[String]) -> String {
    tokens.join(" \\\n  ")
}
