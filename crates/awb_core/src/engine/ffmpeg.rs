//! ffmpeg/ffprobe implementation of the media engine.
//!
//! Probing shells out to `ffprobe -show_streams -show_format -of json`
//! and reads the first audio stream. Execution renders the plan's
//! argument list and runs `ffmpeg`, cleaning up the output file when
//! the process fails.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::Value;

use crate::models::AudioInfo;
use crate::plan::OperationPlan;

use super::{EngineError, MediaEngine, ProbeError};

/// Engine adapter invoking the system ffmpeg and ffprobe binaries.
pub struct FfmpegEngine {
    ffmpeg_bin: String,
    ffprobe_bin: String,
}

impl Default for FfmpegEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl FfmpegEngine {
    /// Use `ffmpeg` and `ffprobe` from PATH.
    pub fn new() -> Self {
        Self {
            ffmpeg_bin: "ffmpeg".to_string(),
            ffprobe_bin: "ffprobe".to_string(),
        }
    }

    /// Use explicit binary paths (e.g., a bundled ffmpeg build).
    pub fn with_binaries(ffmpeg_bin: impl Into<String>, ffprobe_bin: impl Into<String>) -> Self {
        Self {
            ffmpeg_bin: ffmpeg_bin.into(),
            ffprobe_bin: ffprobe_bin.into(),
        }
    }
}

impl MediaEngine for FfmpegEngine {
    fn probe(&self, path: &Path) -> Result<AudioInfo, ProbeError> {
        if !path.exists() {
            return Err(ProbeError::FileNotFound(path.to_path_buf()));
        }

        tracing::debug!("Probing file: {}", path.display());

        let output = Command::new(&self.ffprobe_bin)
            .args(["-v", "error", "-show_streams", "-show_format", "-of", "json"])
            .arg(path)
            .output()
            .map_err(|e| ProbeError::Launch {
                tool: "ffprobe",
                source: e,
            })?;

        if !output.status.success() {
            return Err(ProbeError::CommandFailed {
                tool: "ffprobe",
                exit_code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        let json: Value = serde_json::from_slice(&output.stdout)?;
        parse_probe_json(&json, path)
    }

    fn execute(&self, plan: &OperationPlan, output_path: &Path) -> Result<PathBuf, EngineError> {
        let args = plan.to_args(output_path);
        tracing::debug!("Running: {} {}", self.ffmpeg_bin, args.join(" "));

        let output = Command::new(&self.ffmpeg_bin)
            .args(&args)
            .output()
            .map_err(|e| EngineError::Launch {
                tool: "ffmpeg",
                source: e,
            })?;

        if !output.status.success() {
            // Never leave a half-written artifact behind.
            if output_path.exists() {
                if let Err(e) = fs::remove_file(output_path) {
                    tracing::warn!(
                        "Failed to remove partial output {}: {}",
                        output_path.display(),
                        e
                    );
                }
            }
            return Err(EngineError::CommandFailed {
                tool: "ffmpeg",
                exit_code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        Ok(output_path.to_path_buf())
    }
}

/// Parse ffprobe JSON into an `AudioInfo`.
fn parse_probe_json(json: &Value, path: &Path) -> Result<AudioInfo, ProbeError> {
    let streams = json
        .get("streams")
        .and_then(|s| s.as_array())
        .cloned()
        .unwrap_or_default();

    let audio = streams
        .iter()
        .find(|s| {
            s.get("codec_type")
                .and_then(|t| t.as_str())
                .map(|t| t == "audio")
                .unwrap_or(false)
        })
        .ok_or_else(|| ProbeError::NotAudio(path.to_path_buf()))?;

    let format = json.get("format");

    // Duration lives on the stream for most containers, on the format
    // block otherwise (e.g., some MP3s).
    let duration_secs = value_as_f64(audio.get("duration"))
        .or_else(|| value_as_f64(format.and_then(|f| f.get("duration"))))
        .unwrap_or(0.0);

    let sample_rate = value_as_u64(audio.get("sample_rate")).unwrap_or(44_100) as u32;
    let channels = audio
        .get("channels")
        .and_then(|c| c.as_u64())
        .unwrap_or(2) as u8;
    let codec = audio
        .get("codec_name")
        .and_then(|c| c.as_str())
        .unwrap_or("unknown")
        .to_string();
    let bit_rate = value_as_u64(audio.get("bit_rate")).unwrap_or(0);

    let container = format
        .and_then(|f| f.get("format_name"))
        .and_then(|n| n.as_str())
        .unwrap_or("unknown")
        .to_string();
    let size_bytes = value_as_u64(format.and_then(|f| f.get("size"))).unwrap_or(0);

    Ok(AudioInfo {
        duration_secs,
        sample_rate,
        channels,
        codec,
        bit_rate,
        container,
        size_bytes,
    })
}

/// ffprobe emits numbers as JSON strings; accept both.
fn value_as_f64(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn value_as_u64(value: Option<&Value>) -> Option<u64> {
    match value? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_nonexistent_file() {
        let engine = FfmpegEngine::new();
        let result = engine.probe(Path::new("/nonexistent/file.wav"));
        assert!(matches!(result, Err(ProbeError::FileNotFound(_))));
    }

    #[test]
    fn parse_probe_json_reads_audio_stream() {
        let json: Value = serde_json::from_str(
            r#"{
                "streams": [
                    {"codec_type": "video", "codec_name": "mjpeg"},
                    {
                        "codec_type": "audio",
                        "codec_name": "mp3",
                        "duration": "183.27",
                        "sample_rate": "44100",
                        "channels": 2,
                        "bit_rate": "192000"
                    }
                ],
                "format": {"format_name": "mp3", "size": "4403712"}
            }"#,
        )
        .unwrap();

        let info = parse_probe_json(&json, Path::new("/uploads/song.mp3")).unwrap();
        assert_eq!(info.codec, "mp3");
        assert_eq!(info.sample_rate, 44_100);
        assert_eq!(info.channels, 2);
        assert_eq!(info.bit_rate, 192_000);
        assert_eq!(info.container, "mp3");
        assert_eq!(info.size_bytes, 4_403_712);
        assert!((info.duration_secs - 183.27).abs() < 1e-9);
    }

    #[test]
    fn parse_probe_json_falls_back_to_format_duration() {
        let json: Value = serde_json::from_str(
            r#"{
                "streams": [{"codec_type": "audio", "codec_name": "aac"}],
                "format": {"format_name": "mov,mp4,m4a", "duration": "42.5", "size": "100"}
            }"#,
        )
        .unwrap();

        let info = parse_probe_json(&json, Path::new("/uploads/clip.m4a")).unwrap();
        assert!((info.duration_secs - 42.5).abs() < 1e-9);
        // Missing stream fields fall back to sensible defaults.
        assert_eq!(info.sample_rate, 44_100);
        assert_eq!(info.bit_rate, 0);
    }

    #[test]
    fn parse_probe_json_rejects_non_audio() {
        let json: Value = serde_json::from_str(
            r#"{"streams": [{"codec_type": "video", "codec_name": "h264"}], "format": {}}"#,
        )
        .unwrap();
        let result = parse_probe_json(&json, Path::new("/uploads/clip.mkv"));
        assert!(matches!(result, Err(ProbeError::NotAudio(_))));
    }
}
