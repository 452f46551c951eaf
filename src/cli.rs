use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use chordscan::{OutputFormat, TimeUnit};

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "chordscan", about = "Detect chord changes in audio recordings")]
pub struct Cli {
    /// Input audio files (WAV, MP3, FLAC, OGG, AAC)
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,

    /// Report event times in seconds instead of track fraction
    #[arg(long)]
    pub seconds: bool,

    /// Write results to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Config file (defaults to ./chordscan.toml or the user config dir)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Analysis sample rate in Hz, applied before decimation
    #[arg(long)]
    pub sample_rate: Option<u32>,

    /// Sample-rate decimation factor
    #[arg(long)]
    pub decimation: Option<usize>,

    /// STFT window size in samples
    #[arg(long)]
    pub window: Option<usize>,

    /// STFT hop size in samples
    #[arg(long)]
    pub hop: Option<usize>,

    /// Median filter length in frames (odd)
    #[arg(long)]
    pub median: Option<usize>,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

impl Cli {
    pub fn time_unit(&self, configured: TimeUnit) -> TimeUnit {
        if self.seconds {
            TimeUnit::Seconds
        } else {
            configured
        }
    }
}
