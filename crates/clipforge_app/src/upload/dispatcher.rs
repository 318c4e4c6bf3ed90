//! Upload dispatch: bounded-concurrency fan-out with per-target retry.
//!
//! Platform protocols live behind [`UploadTarget`]; this layer only owns
//! resilience (retry with exponential backoff, bounded parallelism) and
//! caption mapping. Retry decisions for the whole job stay with the
//! caller.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use clipforge_core::config::UploadSettings;
use clipforge_core::models::ArtifactHandle;

use super::content::PostContent;

/// Failure from one upload attempt.
#[derive(Error, Debug)]
#[error("upload to {platform} failed: {message}")]
pub struct UploadError {
    pub platform: String,
    pub message: String,
}

impl UploadError {
    /// Create an upload error.
    pub fn new(platform: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            message: message.into(),
        }
    }
}

/// One upload destination.
#[async_trait]
pub trait UploadTarget: Send + Sync {
    /// Platform name for logs and outcomes.
    fn name(&self) -> &str;

    /// Caption character limit for this platform.
    fn caption_limit(&self) -> usize;

    /// Upload the artifact with the prepared caption.
    async fn upload(&self, artifact: &ArtifactHandle, caption: &str) -> Result<(), UploadError>;
}

/// Terminal result of dispatching to one platform.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub platform: String,
    pub success: bool,
    pub attempts: u32,
    pub error: Option<String>,
}

/// Fans an artifact out to all enabled targets.
pub struct UploadDispatcher {
    targets: Vec<Arc<dyn UploadTarget>>,
    settings: UploadSettings,
}

impl UploadDispatcher {
    /// Create a dispatcher over the given targets.
    pub fn new(targets: Vec<Arc<dyn UploadTarget>>, settings: UploadSettings) -> Self {
        Self { targets, settings }
    }

    /// Upload to every target with bounded parallelism and per-target
    /// retry. Outcomes are sorted by platform name for stable reporting.
    pub async fn dispatch(
        &self,
        artifact: &ArtifactHandle,
        content: &PostContent,
    ) -> Vec<UploadOutcome> {
        let semaphore = Arc::new(Semaphore::new(self.settings.max_parallel.max(1)));
        let mut tasks = JoinSet::new();

        for target in &self.targets {
            let target = Arc::clone(target);
            let artifact = artifact.clone();
            let caption = content.caption_for(target.caption_limit());
            let semaphore = Arc::clone(&semaphore);
            let max_retries = self.settings.max_retries.max(1);
            let backoff_ms = self.settings.backoff_ms;

            tasks.spawn(async move {
                // Semaphore is never closed while tasks run.
                let Ok(_permit) = semaphore.acquire().await else {
                    return UploadOutcome {
                        platform: target.name().to_string(),
                        success: false,
                        attempts: 0,
                        error: Some("dispatcher shut down".to_string()),
                    };
                };
                upload_with_retry(target, &artifact, &caption, max_retries, backoff_ms).await
            });
        }

        let mut outcomes = Vec::with_capacity(self.targets.len());
        while let Some(joined) = tasks.join_next().await {
            if let Ok(outcome) = joined {
                outcomes.push(outcome);
            }
        }
        outcomes.sort_by(|a, b| a.platform.cmp(&b.platform));
        outcomes
    }
}

async fn upload_with_retry(
    target: Arc<dyn UploadTarget>,
    artifact: &ArtifactHandle,
    caption: &str,
    max_retries: u32,
    backoff_ms: u64,
) -> UploadOutcome {
    let mut last_error = None;
    for attempt in 1..=max_retries {
        match target.upload(artifact, caption).await {
            Ok(()) => {
                tracing::info!(platform = target.name(), attempt, "upload succeeded");
                return UploadOutcome {
                    platform: target.name().to_string(),
                    success: true,
                    attempts: attempt,
                    error: None,
                };
            }
            Err(error) => {
                tracing::warn!(platform = target.name(), attempt, %error, "upload attempt failed");
                last_error = Some(error.to_string());
                if attempt < max_retries {
                    let delay = backoff_ms.saturating_mul(1 << (attempt - 1));
                    tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
                }
            }
        }
    }
    UploadOutcome {
        platform: target.name().to_string(),
        success: false,
        attempts: max_retries,
        error: last_error,
    }
}

/// Logging-only target used until real platform adapters are wired in.
pub struct DryRunTarget {
    name: String,
    caption_limit: usize,
}

impl DryRunTarget {
    /// Create a dry-run target.
    pub fn new(name: impl Into<String>, caption_limit: usize) -> Self {
        Self {
            name: name.into(),
            caption_limit,
        }
    }

    /// The standard set of dry-run platforms.
    pub fn standard_set() -> Vec<Arc<dyn UploadTarget>> {
        vec![
            Arc::new(DryRunTarget::new("youtube", 5000)) as Arc<dyn UploadTarget>,
            Arc::new(DryRunTarget::new("instagram", 2200)),
            Arc::new(DryRunTarget::new("tiktok", 2200)),
            Arc::new(DryRunTarget::new("twitter", 280)),
        ]
    }
}

#[async_trait]
impl UploadTarget for DryRunTarget {
    fn name(&self) -> &str {
        &self.name
    }

    fn caption_limit(&self) -> usize {
        self.caption_limit
    }

    async fn upload(&self, artifact: &ArtifactHandle, caption: &str) -> Result<(), UploadError> {
        tracing::info!(
            platform = %self.name,
            artifact = %artifact.path.display(),
            caption_chars = caption.chars().count(),
            "dry-run upload"
        );
        Ok(())
    }
}
