//! Target audio format definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Audio encodings offered by the download pages.
///
/// Serialized names match the format keys the server uses, which are also
/// the values accepted in the settings file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AudioFormat {
    #[serde(rename = "aac-hi")]
    AacHi,
    #[serde(rename = "aiff-lossless")]
    AiffLossless,
    #[serde(rename = "alac")]
    Alac,
    #[serde(rename = "flac")]
    Flac,
    #[serde(rename = "mp3-320")]
    Mp3_320,
    #[default]
    #[serde(rename = "mp3-v0")]
    Mp3V0,
    #[serde(rename = "vorbis")]
    Vorbis,
    #[serde(rename = "wav")]
    Wav,
}

impl AudioFormat {
    /// The format key as it appears in server responses and settings.
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioFormat::AacHi => "aac-hi",
            AudioFormat::AiffLossless => "aiff-lossless",
            AudioFormat::Alac => "alac",
            AudioFormat::Flac => "flac",
            AudioFormat::Mp3_320 => "mp3-320",
            AudioFormat::Mp3V0 => "mp3-v0",
            AudioFormat::Vorbis => "vorbis",
            AudioFormat::Wav => "wav",
        }
    }

    /// File extension used for single-track downloads in this format.
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::AacHi => "m4a",
            AudioFormat::AiffLossless => "aiff",
            AudioFormat::Alac => "m4a",
            AudioFormat::Flac => "flac",
            AudioFormat::Mp3_320 => "mp3",
            AudioFormat::Mp3V0 => "mp3",
            AudioFormat::Vorbis => "ogg",
            AudioFormat::Wav => "wav",
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AudioFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "aac-hi" => Ok(AudioFormat::AacHi),
            "aiff-lossless" => Ok(AudioFormat::AiffLossless),
            "alac" => Ok(AudioFormat::Alac),
            "flac" => Ok(AudioFormat::Flac),
            "mp3-320" => Ok(AudioFormat::Mp3_320),
            "mp3-v0" => Ok(AudioFormat::Mp3V0),
            "vorbis" => Ok(AudioFormat::Vorbis),
            "wav" => Ok(AudioFormat::Wav),
            _ => Err(format!("Unknown audio format: {}", s)),
        }
    }
}
