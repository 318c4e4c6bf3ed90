//! Job runner: drives one job through the stage machine.
//!
//! The core stages are pure, in-memory transformations; the only
//! suspension points are the external engine calls, each wrapped in a
//! timeout. Fusion+policy and layout are independent branches joined with
//! a fan-out/fan-in barrier before composition. Any error transitions the
//! job to `Failed` with the originating stage and kind preserved; there is
//! no partial recovery at this layer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{error::Elapsed, timeout};

use crate::models::{ArtifactHandle, JobStage, SpeakerSegment, WordEvent};
use crate::policy::ProfanityList;
use crate::{compose, fusion, layout, policy};

use super::engines::{
    DiarizationEngine, EngineResult, MediaEngine, RenderRequest, TranscriptionEngine,
};
use super::errors::{JobError, StageError, StageResult};
use super::types::{Context, JobReport, JobState};

/// Handle for cancelling a running job.
///
/// Cancellation takes effect at the next stage boundary.
#[derive(Clone)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Request cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Runs jobs through the stage machine.
///
/// Holds the external engine handles and the read-only profanity list;
/// jobs share no mutable state, so distinct jobs may run fully in
/// parallel on clones of this runner's `Arc`s.
pub struct JobRunner {
    transcription: Arc<dyn TranscriptionEngine>,
    diarization: Arc<dyn DiarizationEngine>,
    media: Arc<dyn MediaEngine>,
    profanity: Arc<ProfanityList>,
    cancelled: Arc<AtomicBool>,
}

impl JobRunner {
    /// Create a runner over the given engines and profanity list.
    pub fn new(
        transcription: Arc<dyn TranscriptionEngine>,
        diarization: Arc<dyn DiarizationEngine>,
        media: Arc<dyn MediaEngine>,
        profanity: Arc<ProfanityList>,
    ) -> Self {
        Self {
            transcription,
            diarization,
            media,
            profanity,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Get a cancellation handle for this runner.
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            flag: Arc::clone(&self.cancelled),
        }
    }

    /// Run one job to a terminal stage.
    ///
    /// Returns a report with either the artifact handle (`Rendered`) or
    /// the structured failure (`Failed`).
    pub async fn run(&self, ctx: &Context, state: &mut JobState) -> JobReport {
        match self.run_inner(ctx, state).await {
            Ok(artifact) => {
                state.artifact = Some(artifact.clone());
                state.advance(JobStage::Rendered);
                ctx.report_progress("Rendered", 100, "Job complete");
                ctx.logger
                    .success(&format!("rendered {}", artifact.path.display()));
                JobReport::rendered(&ctx.job_name, artifact)
            }
            Err((stage, source)) => {
                let error = JobError::at_stage(&ctx.job_name, stage, source);
                ctx.logger.error(&error.to_string());
                ctx.logger.show_tail("engine");
                state.advance(JobStage::Failed);
                JobReport::failed(&error)
            }
        }
    }

    async fn run_inner(
        &self,
        ctx: &Context,
        state: &mut JobState,
    ) -> Result<ArtifactHandle, (JobStage, StageError)> {
        let engine_cfg = &ctx.settings.engine;

        // Ingest: both signal engines in parallel, each timeout-bound.
        ctx.logger.stage("Ingest");
        ctx.report_progress("Ingest", 0, "Requesting transcript and diarization");

        let transcribe_call = timeout(
            Duration::from_millis(engine_cfg.transcribe_timeout_ms),
            self.transcription.transcribe(&ctx.source_path),
        );
        let diarize_call = timeout(
            Duration::from_millis(engine_cfg.diarize_timeout_ms),
            self.diarization.diarize(&ctx.source_path),
        );
        let (words_outcome, segments_outcome) = tokio::join!(transcribe_call, diarize_call);

        let words = engine_call_result(
            words_outcome,
            self.transcription.name(),
            engine_cfg.transcribe_timeout_ms,
        )
        .map_err(at(JobStage::Ingested))?;
        let segments = engine_call_result(
            segments_outcome,
            self.diarization.name(),
            engine_cfg.diarize_timeout_ms,
        )
        .map_err(at(JobStage::Ingested))?;

        validate_signals(&words, &segments).map_err(at(JobStage::Ingested))?;
        ctx.logger.info(&format!(
            "ingested {} words, {} speaker segments",
            words.len(),
            segments.len()
        ));
        state.advance(JobStage::Ingested);
        self.check_cancelled().map_err(at(JobStage::Fused))?;

        // Fan-out: fusion+policy and layout are independent branches.
        ctx.report_progress("Transform", 25, "Fusing timeline and planning layout");
        let duration_ms = ctx.metadata.duration_ms;

        let fusion_branch = async {
            let utterances = fusion::fuse(words, segments, &ctx.settings.fusion);
            let derived = policy::derive(
                &utterances,
                &self.profanity,
                &ctx.settings.censor,
                &ctx.settings.subtitles,
                duration_ms,
            );
            (utterances, derived)
        };
        let layout_branch = async {
            layout::plan(
                ctx.metadata.dimensions(),
                ctx.settings.layout.target_aspect(),
                ctx.metadata.camera_region,
                &ctx.settings.layout,
            )
        };
        let ((utterances, derived), layout_outcome) = tokio::join!(fusion_branch, layout_branch);

        ctx.logger.stage("Fuse");
        ctx.logger
            .info(&format!("fused {} utterances", utterances.len()));
        state.utterances = Some(utterances);
        state.advance(JobStage::Fused);

        ctx.logger.stage("Policy");
        ctx.logger.info(&format!(
            "derived {} censor intervals, {} subtitle cues",
            derived.censors.len(),
            derived.cues.len()
        ));
        state.policy = Some(derived.clone());
        state.advance(JobStage::PolicyDerived);

        ctx.logger.stage("Layout");
        let plan = layout_outcome
            .map_err(StageError::from)
            .map_err(at(JobStage::LaidOut))?;
        state.layout = Some(plan);
        state.advance(JobStage::LaidOut);
        self.check_cancelled().map_err(at(JobStage::Composed))?;

        // Join point: compose needs both branches.
        ctx.logger.stage("Compose");
        ctx.report_progress("Compose", 60, "Composing render operations");
        let operations = compose::compose(&plan, &derived.censors, &derived.cues, duration_ms)
            .map_err(StageError::from)
            .map_err(at(JobStage::Composed))?;
        ctx.logger
            .info(&format!("composed {} render operations", operations.len()));
        state.operations = Some(operations.clone());
        state.advance(JobStage::Composed);
        self.check_cancelled().map_err(at(JobStage::Rendered))?;

        // Render via the external media engine.
        ctx.logger.stage("Render");
        ctx.report_progress("Render", 80, "Rendering artifact");
        let request = RenderRequest {
            source: &ctx.source_path,
            metadata: &ctx.metadata,
            operations: &operations,
            output: ctx.settings.layout.output_dimensions(),
            output_dir: &ctx.output_dir,
            job_name: &ctx.job_name,
        };
        let render_outcome = timeout(
            Duration::from_millis(engine_cfg.render_timeout_ms),
            self.media.render(request),
        )
        .await;
        let artifact = engine_call_result(
            render_outcome,
            self.media.name(),
            engine_cfg.render_timeout_ms,
        )
        .map_err(at(JobStage::Rendered))?;

        Ok(artifact)
    }

    fn check_cancelled(&self) -> StageResult<()> {
        if self.cancelled.load(Ordering::SeqCst) {
            Err(StageError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Attach a stage to an error.
fn at(stage: JobStage) -> impl Fn(StageError) -> (JobStage, StageError) {
    move |error| (stage, error)
}

/// Collapse a timeout-wrapped engine call into a stage result.
fn engine_call_result<T>(
    outcome: Result<EngineResult<T>, Elapsed>,
    call: &str,
    timeout_ms: u64,
) -> StageResult<T> {
    match outcome {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(error)) => Err(StageError::Engine(error)),
        Err(_) => Err(StageError::timeout(call, timeout_ms)),
    }
}

/// Validate raw signals. Malformed events fail the whole ingestion.
fn validate_signals(words: &[WordEvent], segments: &[SpeakerSegment]) -> StageResult<()> {
    for word in words {
        word.validate()?;
    }
    for segment in segments {
        segment.validate()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_inverted_word() {
        let words = vec![WordEvent::new("bad", 500, 100)];
        let result = validate_signals(&words, &[]);
        assert!(matches!(result, Err(StageError::MalformedSignal(_))));
    }

    #[test]
    fn validate_accepts_overlapping_segments() {
        // Simultaneous speech is expected input, not an error.
        let segments = vec![
            SpeakerSegment::new("A", 0, 1000),
            SpeakerSegment::new("B", 500, 1500),
        ];
        assert!(validate_signals(&[], &segments).is_ok());
    }

    #[test]
    fn cancel_handle_flags_runner() {
        let flag = Arc::new(AtomicBool::new(false));
        let handle = CancelHandle {
            flag: Arc::clone(&flag),
        };
        assert!(!handle.is_cancelled());
        handle.cancel();
        assert!(handle.is_cancelled());
        assert!(flag.load(Ordering::SeqCst));
    }
}
