//! Command-line argument definitions using clap.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::{AudioFormat, Settings};

/// Bandcamp collection synchronizer CLI.
#[derive(Parser, Debug)]
#[command(
    name = "bandcamp-sync",
    version,
    about = "Synchronize your Bandcamp collection to local storage",
    long_about = "A CLI tool that downloads the purchases in your Bandcamp collection.\n\n\
                  Completed items are recorded in the settings file, so re-runs only\n\
                  fetch what is new."
)]
pub struct Args {
    /// Path to the settings file.
    #[arg(short, long, default_value = "settings.json")]
    pub settings: PathBuf,

    /// Directory downloads are placed under (overrides music_path).
    #[arg(short = 'd', long = "directory")]
    pub music_path: Option<PathBuf>,

    /// Identity cookie token.
    #[arg(short, long, env = "BANDCAMP_IDENTITY")]
    pub token: Option<String>,

    /// Audio format for single-track downloads.
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,

    /// Abort the whole run on the first failed item.
    #[arg(long)]
    pub fail_fast: bool,

    /// Hide download progress information.
    #[arg(long, short)]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

/// CLI audio format argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FormatArg {
    #[value(name = "aac-hi")]
    AacHi,
    #[value(name = "aiff-lossless")]
    AiffLossless,
    #[value(name = "alac")]
    Alac,
    #[value(name = "flac")]
    Flac,
    #[value(name = "mp3-320")]
    Mp3_320,
    #[value(name = "mp3-v0")]
    Mp3V0,
    #[value(name = "vorbis")]
    Vorbis,
    #[value(name = "wav")]
    Wav,
}

impl From<FormatArg> for AudioFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::AacHi => AudioFormat::AacHi,
            FormatArg::AiffLossless => AudioFormat::AiffLossless,
            FormatArg::Alac => AudioFormat::Alac,
            FormatArg::Flac => AudioFormat::Flac,
            FormatArg::Mp3_320 => AudioFormat::Mp3_320,
            FormatArg::Mp3V0 => AudioFormat::Mp3V0,
            FormatArg::Vorbis => AudioFormat::Vorbis,
            FormatArg::Wav => AudioFormat::Wav,
        }
    }
}

impl Args {
    /// Merge CLI arguments into loaded settings, overriding where specified.
    pub fn merge_into_settings(&self, settings: &mut Settings) {
        if let Some(token) = &self.token {
            settings.identity = token.clone();
        }

        if let Some(path) = &self.music_path {
            settings.music_path = path.clone();
        }

        if let Some(format) = self.format {
            settings.format = format.into();
        }
    }
}
