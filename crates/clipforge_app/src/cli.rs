//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// clipforge - convert gaming VODs into subtitled vertical shorts.
#[derive(Parser, Debug)]
#[command(name = "clipforge", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert a source video into a short-form clip.
    Convert(ConvertArgs),
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Source video file.
    pub input: PathBuf,

    /// Word-level transcript JSON produced by the speech-to-text engine.
    #[arg(long)]
    pub transcript: PathBuf,

    /// Speaker segments JSON produced by the diarization engine.
    /// Omitting it attributes all speech to UNKNOWN.
    #[arg(long)]
    pub diarization: Option<PathBuf>,

    /// Config file path (defaults to the platform config directory).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Host the camera feed in its own output band.
    #[arg(long)]
    pub include_cam: bool,

    /// Camera region left edge in source pixels.
    #[arg(long, default_value_t = 1420)]
    pub cam_x: u32,

    /// Camera region top edge in source pixels.
    #[arg(long, default_value_t = 790)]
    pub cam_y: u32,

    /// Camera region width in source pixels.
    #[arg(long, default_value_t = 480)]
    pub cam_width: u32,

    /// Camera region height in source pixels.
    #[arg(long, default_value_t = 270)]
    pub cam_height: u32,

    /// Dispatch the rendered clip to the upload targets.
    #[arg(long)]
    pub upload: bool,

    /// Post title used by the upload targets.
    #[arg(long, default_value = "Untitled clip")]
    pub title: String,

    /// Post description used by the upload targets.
    #[arg(long, default_value = "")]
    pub description: String,

    /// Post tags, comma separated.
    #[arg(long, value_delimiter = ',')]
    pub tags: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_convert_command() {
        let cli = Cli::parse_from([
            "clipforge",
            "convert",
            "match.mp4",
            "--transcript",
            "words.json",
            "--include-cam",
            "--tags",
            "gaming,fps",
        ]);
        let Command::Convert(args) = cli.command;
        assert_eq!(args.input, PathBuf::from("match.mp4"));
        assert!(args.include_cam);
        assert_eq!(args.cam_x, 1420);
        assert_eq!(args.tags, vec!["gaming", "fps"]);
    }
}
