//! clipforge ffmpeg adapter.
//!
//! The default external media engine: probes sources with ffprobe,
//! translates the core's ordered render operation sequence into an ffmpeg
//! filter-graph invocation, and writes the speaker-colored ASS document
//! the `subtitles` filter burns in. All process spawning for rendering
//! lives here, behind the core's `MediaEngine` trait.

mod args_builder;
mod ass;
mod engine;
mod error;
mod probe;

pub use args_builder::{format_args_pretty, FfmpegArgsBuilder};
pub use ass::{format_ass_time, write_ass};
pub use engine::FfmpegEngine;
pub use error::{FfmpegError, FfmpegResult};
pub use probe::{parse_probe_json, probe_source};
