//! Probed audio information and output format selection.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Stream and container information for one audio file, as reported by ffprobe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioInfo {
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Number of audio channels.
    pub channels: u8,
    /// Codec name (e.g., "mp3", "pcm_s16le", "flac").
    pub codec: String,
    /// Bit rate in bits/second, 0 if unknown.
    pub bit_rate: u64,
    /// Container format name (e.g., "wav", "mp3", "ogg").
    pub container: String,
    /// File size in bytes.
    pub size_bytes: u64,
}

impl AudioInfo {
    /// Format duration as MM:SS.mmm for display.
    pub fn duration_display(&self) -> String {
        let minutes = (self.duration_secs / 60.0).floor() as u64;
        let seconds = self.duration_secs % 60.0;
        format!("{:02}:{:06.3}", minutes, seconds)
    }
}

/// Target output formats for encoding operations.
///
/// WMA is accepted as an upload extension but is not an encode target,
/// so it has no variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Wav,
    Mp3,
    Flac,
    Ogg,
    M4a,
    Aac,
}

impl AudioFormat {
    /// Parse a format from a file extension (case-insensitive, no dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "wav" => Some(Self::Wav),
            "mp3" => Some(Self::Mp3),
            "flac" => Some(Self::Flac),
            "ogg" => Some(Self::Ogg),
            "m4a" => Some(Self::M4a),
            "aac" => Some(Self::Aac),
            _ => None,
        }
    }

    /// Parse a format from a file path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// The file extension for this format (no dot).
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
            Self::Flac => "flac",
            Self::Ogg => "ogg",
            Self::M4a => "m4a",
            Self::Aac => "aac",
        }
    }

    /// The ffmpeg encoder used for this format.
    pub fn codec(&self) -> &'static str {
        match self {
            Self::Wav => "pcm_s16le",
            Self::Mp3 => "libmp3lame",
            Self::Flac => "flac",
            Self::Ogg => "libvorbis",
            Self::M4a | Self::Aac => "aac",
        }
    }

    /// Whether this format takes a bitrate. WAV is uncompressed PCM and
    /// FLAC uses a compression level instead.
    pub fn uses_bitrate(&self) -> bool {
        !matches!(self, Self::Wav | Self::Flac)
    }

    /// Default bitrate when the caller does not override it.
    pub fn default_bitrate(&self) -> Option<&'static str> {
        match self {
            Self::Wav | Self::Flac => None,
            Self::Ogg => Some("128k"),
            Self::Mp3 | Self::M4a | Self::Aac => Some("192k"),
        }
    }

    /// Display name for UIs and CLI output.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Wav => "WAV",
            Self::Mp3 => "MP3",
            Self::Flac => "FLAC",
            Self::Ogg => "OGG Vorbis",
            Self::M4a => "M4A (AAC)",
            Self::Aac => "AAC",
        }
    }
}
