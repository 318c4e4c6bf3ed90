//! clipforge CLI entry point.

mod cli;
mod signals;
mod upload;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context as _};
use clap::Parser;

use clipforge_core::config::ConfigManager;
use clipforge_core::logging::{init_tracing, JobLogger, LogConfig};
use clipforge_core::models::Rect;
use clipforge_core::orchestrator::{Context, JobRunner, JobState};
use clipforge_core::policy::ProfanityList;
use clipforge_ffmpeg::FfmpegEngine;

use crate::cli::{Cli, Command, ConvertArgs};
use crate::signals::{JsonDiarizationEngine, JsonTranscriptionEngine};
use crate::upload::{DryRunTarget, PostContent, UploadDispatcher};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Convert(args) => convert(args).await,
    }
}

async fn convert(args: ConvertArgs) -> anyhow::Result<()> {
    let config_path = args
        .config
        .clone()
        .unwrap_or_else(default_config_path);
    let mut manager = ConfigManager::new(&config_path);
    manager
        .load_or_create()
        .with_context(|| format!("loading config from {}", config_path.display()))?;
    let settings = manager.settings().clone();

    let logs_dir = PathBuf::from(&settings.paths.logs_folder);
    let _tracing_guard = init_tracing(&logs_dir).context("initializing logging")?;

    let media_engine = FfmpegEngine::discover().context("locating ffmpeg")?;
    let mut metadata = media_engine
        .probe(&args.input)
        .with_context(|| format!("probing {}", args.input.display()))?;
    if args.include_cam {
        metadata = metadata.with_camera_region(Rect::new(
            args.cam_x,
            args.cam_y,
            args.cam_width,
            args.cam_height,
        ));
    }

    let job_name = job_name_for(&args.input);
    let logger = Arc::new(JobLogger::new(
        &job_name,
        &logs_dir,
        LogConfig::from(&settings.logging),
        None,
    )?);

    let ctx = Context::new(
        &job_name,
        args.input.clone(),
        metadata,
        settings.clone(),
        PathBuf::from(&settings.paths.output_folder),
        logger,
    );
    let runner = JobRunner::new(
        Arc::new(JsonTranscriptionEngine::new(args.transcript.clone())),
        Arc::new(JsonDiarizationEngine::new(args.diarization.clone())),
        Arc::new(media_engine),
        Arc::new(ProfanityList::from_settings(&settings.censor)),
    );

    let job_id = format!("{}-{}", job_name, chrono::Utc::now().timestamp());
    let mut state = JobState::new(job_id);
    let report = runner.run(&ctx, &mut state).await;

    println!("{}", serde_json::to_string_pretty(&report)?);

    let Some(artifact) = report.artifact else {
        match report.failure {
            Some(failure) => bail!(
                "job failed at stage {} with {}: {}",
                failure.stage,
                failure.kind,
                failure.message
            ),
            None => bail!("job ended without artifact or failure info"),
        }
    };

    if args.upload {
        let content = PostContent::new(&args.title, &args.description, args.tags.clone());
        let dispatcher = UploadDispatcher::new(DryRunTarget::standard_set(), settings.upload);
        let outcomes = dispatcher.dispatch(&artifact, &content).await;
        for outcome in &outcomes {
            if outcome.success {
                println!("{}: uploaded ({} attempts)", outcome.platform, outcome.attempts);
            } else {
                eprintln!(
                    "{}: failed after {} attempts: {}",
                    outcome.platform,
                    outcome.attempts,
                    outcome.error.as_deref().unwrap_or("unknown error")
                );
            }
        }
        if outcomes.iter().any(|o| !o.success) {
            bail!("one or more uploads failed");
        }
    }

    Ok(())
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("clipforge")
        .join("config.toml")
}

fn job_name_for(input: &Path) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "clip".to_string());
    format!("{}-short", stem)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_name_from_input_stem() {
        assert_eq!(job_name_for(Path::new("/vods/ranked_42.mp4")), "ranked_42-short");
        assert_eq!(job_name_for(Path::new("clip.mkv")), "clip-short");
    }
}
