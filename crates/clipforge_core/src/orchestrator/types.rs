//! Core types for the job orchestrator.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::compose::RenderOperation;
use crate::config::Settings;
use crate::layout::LayoutPlan;
use crate::logging::JobLogger;
use crate::models::{ArtifactHandle, JobStage, SourceMetadata, Utterance};
use crate::policy::PolicyOutput;

use super::errors::{ErrorKind, JobError};

/// Progress callback type: (stage_name, percent_complete, message).
pub type ProgressCallback = Box<dyn Fn(&str, u32, &str) + Send + Sync>;

/// Read-only context for one job.
///
/// Contains the job configuration and shared resources stages can read but
/// not modify. Mutable accumulation goes in [`JobState`].
pub struct Context {
    /// Job name/identifier.
    pub job_name: String,
    /// Source video path.
    pub source_path: PathBuf,
    /// Probed source metadata.
    pub metadata: SourceMetadata,
    /// Application settings.
    pub settings: Settings,
    /// Output directory for the rendered artifact.
    pub output_dir: PathBuf,
    /// Per-job logger.
    pub logger: Arc<JobLogger>,
    /// Optional progress callback.
    progress_callback: Option<ProgressCallback>,
}

impl Context {
    /// Create a new job context.
    pub fn new(
        job_name: impl Into<String>,
        source_path: PathBuf,
        metadata: SourceMetadata,
        settings: Settings,
        output_dir: PathBuf,
        logger: Arc<JobLogger>,
    ) -> Self {
        Self {
            job_name: job_name.into(),
            source_path,
            metadata,
            settings,
            output_dir,
            logger,
            progress_callback: None,
        }
    }

    /// Set the progress callback.
    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Report progress to the callback (if set).
    pub fn report_progress(&self, stage_name: &str, percent: u32, message: &str) {
        if let Some(ref callback) = self.progress_callback {
            callback(stage_name, percent, message);
        }
    }
}

/// Mutable job state accumulating stage outputs.
///
/// This is a write-once manifest: each stage records its output in its own
/// section exactly once, and nothing is mutated after the producing stage
/// completes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobState {
    /// Unique job identifier.
    pub job_id: String,
    /// Current stage.
    pub stage: JobStage,
    /// When the job started (RFC 3339).
    pub started_at: Option<String>,
    /// When the job reached a terminal stage (RFC 3339).
    pub finished_at: Option<String>,
    /// Fused timeline (from the fusion stage).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utterances: Option<Vec<Utterance>>,
    /// Censor intervals and subtitle cues (from the policy stage).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<PolicyOutput>,
    /// Spatial plan (from the layout stage).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutPlan>,
    /// Ordered operation sequence (from the compose stage).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operations: Option<Vec<RenderOperation>>,
    /// Rendered artifact (from the render stage).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<ArtifactHandle>,
}

impl JobState {
    /// Create a new job state with the given ID.
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            started_at: Some(chrono::Local::now().to_rfc3339()),
            ..Default::default()
        }
    }

    /// Advance to the next stage.
    ///
    /// Stages only move forward; a terminal stage is never left.
    pub fn advance(&mut self, stage: JobStage) {
        debug_assert!(
            !self.stage.is_terminal(),
            "advance called on terminal stage {}",
            self.stage
        );
        tracing::debug!(job_id = %self.job_id, from = %self.stage, to = %stage, "stage transition");
        self.stage = stage;
        if stage.is_terminal() {
            self.finished_at = Some(chrono::Local::now().to_rfc3339());
        }
    }
}

/// Structured failure surfaced to the upload orchestration layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureInfo {
    /// The stage being attempted when the job failed.
    pub stage: JobStage,
    /// Error classification.
    pub kind: ErrorKind,
    /// Human-readable chain of the originating error.
    pub message: String,
}

/// Terminal result of one job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobReport {
    /// Job name.
    pub job_name: String,
    /// Terminal stage: `Rendered` or `Failed`.
    pub stage: JobStage,
    /// Artifact handle on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<ArtifactHandle>,
    /// Structured error on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureInfo>,
}

impl JobReport {
    /// Successful terminal report.
    pub fn rendered(job_name: impl Into<String>, artifact: ArtifactHandle) -> Self {
        Self {
            job_name: job_name.into(),
            stage: JobStage::Rendered,
            artifact: Some(artifact),
            failure: None,
        }
    }

    /// Failed terminal report.
    pub fn failed(error: &JobError) -> Self {
        Self {
            job_name: error.job_name.clone(),
            stage: JobStage::Failed,
            artifact: None,
            failure: Some(FailureInfo {
                stage: error.stage,
                kind: error.source.kind(),
                message: error.to_string(),
            }),
        }
    }

    /// Whether the job rendered successfully.
    pub fn is_rendered(&self) -> bool {
        self.stage == JobStage::Rendered
    }
}
