use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ffconvert")]
#[command(
    about = "Convert a media file to MP4, WebM, MP3 or WAV with ffmpeg",
    long_about = None
)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub convert: ConvertArgs,

    /// More logging on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Args, Debug, Default)]
pub struct ConvertArgs {
    /// Media file to convert
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Output format: mp4, webm, mp3 or wav (prompted when omitted)
    #[arg(value_name = "FORMAT", conflicts_with = "format")]
    pub format_positional: Option<String>,

    /// Output file or directory (defaults to next to the input)
    #[arg(value_name = "DESTINATION", conflicts_with = "output")]
    pub destination: Option<PathBuf>,

    /// Output format: mp4, webm, mp3 or wav
    #[arg(short, long)]
    pub format: Option<String>,

    /// NVENC quality preset: best, balanced or fastest
    #[arg(short, long)]
    pub preset: Option<String>,

    /// Output file or directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Replace an existing output file (overrides config)
    #[arg(long)]
    pub overwrite: bool,

    /// Print the ffmpeg command without running it
    #[arg(long)]
    pub dry_run: bool,

    /// Never show interactive menus
    #[arg(long)]
    pub no_prompt: bool,
}

impl ConvertArgs {
    pub fn format(&self) -> Option<&str> {
        self.format.as_deref().or(self.format_positional.as_deref())
    }

    pub fn destination(&self) -> Option<PathBuf> {
        self.output.clone().or_else(|| self.destination.clone())
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show detected hardware acceleration and system information
    Info,

    /// Probe a media file with ffprobe
    Probe {
        /// Path to the media file
        file: PathBuf,
    },

    /// Write a JSON metadata report for a media file
    Metadata {
        /// Path to the media file
        file: PathBuf,

        /// Where to write the report (defaults to <stem>_metadata.json next to the file)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check if ffmpeg and ffprobe are installed
    CheckFfmpeg,

    /// Show config status and location, or create default config if missing
    InitConfig,
}

pub fn parse() -> Cli {
    Cli::parse()
}
