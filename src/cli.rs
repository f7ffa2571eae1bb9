use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "videotools")]
#[command(author, version, about = "Trim, merge, watermark, and resize videos with ffmpeg")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Cut a clip out of a video
    Trim {
        input: PathBuf,
        output: PathBuf,

        /// Start offset (ss, mm:ss or hh:mm:ss)
        #[arg(short, long, default_value = "0")]
        start: String,

        /// Clip length (ss, mm:ss or hh:mm:ss)
        #[arg(short, long)]
        duration: String,
    },

    /// Save a single frame as an image
    Thumbnail {
        input: PathBuf,
        output: PathBuf,

        /// Frame offset (ss, mm:ss or hh:mm:ss)
        #[arg(short, long, default_value = "1")]
        time: String,
    },

    /// Extract the audio track
    ExtractAudio {
        input: PathBuf,
        output: PathBuf,

        /// Audio format: mp3 or wav (anything else means mp3)
        #[arg(short, long, default_value = "mp3")]
        format: String,
    },

    /// Join videos end to end
    Merge {
        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Input files, in order
        inputs: Vec<PathBuf>,
    },

    /// Overlay an image onto a video
    Watermark {
        input: PathBuf,
        output: PathBuf,
        watermark: PathBuf,

        /// top-left, top-right, bottom-left, bottom-right or center
        #[arg(short, long)]
        position: Option<String>,

        /// Horizontal offset in pixels; may be negative
        #[arg(short, long, default_value_t = 10, allow_negative_numbers = true)]
        x: i32,

        /// Vertical offset in pixels; may be negative
        #[arg(short, long, default_value_t = 10, allow_negative_numbers = true)]
        y: i32,

        /// Scale the watermark to this width
        #[arg(long)]
        width: Option<u32>,

        /// Scale the watermark to this height
        #[arg(long)]
        height: Option<u32>,

        /// 0.0 (invisible) to 1.0 (opaque)
        #[arg(long, default_value_t = 1.0)]
        opacity: f32,
    },

    /// Scale a video
    Resize {
        input: PathBuf,
        output: PathBuf,

        #[arg(short = 'W', long)]
        width: u32,

        #[arg(short = 'H', long)]
        height: u32,

        /// Stretch to exactly WIDTHxHEIGHT instead of fitting inside it
        #[arg(long)]
        no_keep_aspect: bool,
    },

    /// Probe a media file and display information
    Probe {
        /// File to probe
        #[arg(required = true)]
        file: PathBuf,
    },

    /// Check that required external tools are available
    CheckTools,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
