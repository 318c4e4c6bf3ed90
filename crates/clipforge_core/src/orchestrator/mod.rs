//! Job orchestrator.
//!
//! Sequences the transformation stages over one video, manages failure
//! attribution, and exposes the final artifact handle to the upload layer.
//!
//! # Architecture
//!
//! ```text
//! JobRunner
//!     ├── Ingest    (transcription ∥ diarization, timeout-bound)
//!     ├── Fuse ──┐
//!     ├── Policy ─┤─ fan-out with Layout, fan-in at Compose
//!     ├── Layout ─┘
//!     ├── Compose
//!     └── Render   (media engine, timeout-bound)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use clipforge_core::orchestrator::{Context, JobRunner, JobState};
//!
//! let runner = JobRunner::new(transcription, diarization, media, profanity);
//! let ctx = Context::new("clip_01", source, metadata, settings, out_dir, logger);
//! let mut state = JobState::new("job-123");
//!
//! let report = runner.run(&ctx, &mut state).await;
//! assert!(report.is_rendered());
//! ```

mod engines;
mod errors;
mod runner;
mod types;

pub use engines::{
    DiarizationEngine, EngineError, EngineResult, MediaEngine, RenderRequest, TranscriptionEngine,
};
pub use errors::{ErrorKind, JobError, StageError, StageResult};
pub use runner::{CancelHandle, JobRunner};
pub use types::{Context, FailureInfo, JobReport, JobState, ProgressCallback};
