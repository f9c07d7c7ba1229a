//! Parameter value objects for each operation kind.
//!
//! Validation rejects out-of-range values with a `ValidationError` rather
//! than clamping. Ranges mirror the slider bounds exposed to users.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::media::AudioFormat;

/// A parameter set failed validation. The operation never reaches the engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A numeric field is outside its allowed range.
    #[error("{field} must be within {min}..={max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },

    /// Trim end time does not follow the start time.
    #[error("end time ({end}s) must be greater than start time ({start}s)")]
    EndBeforeStart { start: f64, end: f64 },

    /// Trim window extends past the end of the source.
    #[error("end time ({end}s) exceeds source duration ({duration}s)")]
    BeyondDuration { end: f64, duration: f64 },

    /// A selection-based operation received no inputs.
    #[error("no input files provided")]
    NoInputs,

    /// A bitrate string is not in the expected "<digits>k" form.
    #[error("invalid bitrate '{0}', expected e.g. '128k' or '192k'")]
    InvalidBitrate(String),

    /// The planner was handed parameters for a different operation kind.
    #[error("parameters do not match operation '{expected}'")]
    ParameterMismatch { expected: &'static str },
}

fn check_range(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<(), ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field,
            min,
            max,
            value,
        });
    }
    Ok(())
}

fn check_bitrate(bitrate: &str) -> Result<(), ValidationError> {
    let valid = bitrate
        .strip_suffix('k')
        .map(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or(false);
    if valid {
        Ok(())
    } else {
        Err(ValidationError::InvalidBitrate(bitrate.to_string()))
    }
}

/// Parameters for trimming a file to a time window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrimParams {
    /// Start of the window in seconds.
    pub start_time: f64,
    /// End of the window in seconds.
    pub end_time: f64,
    /// Output format. `None` keeps the input format.
    #[serde(default)]
    pub format: Option<AudioFormat>,
}

impl TrimParams {
    /// Validate against the probed source duration.
    pub fn validate(&self, duration_secs: f64) -> Result<(), ValidationError> {
        if self.start_time < 0.0 {
            return Err(ValidationError::OutOfRange {
                field: "start_time",
                min: 0.0,
                max: duration_secs,
                value: self.start_time,
            });
        }
        if self.end_time <= self.start_time {
            return Err(ValidationError::EndBeforeStart {
                start: self.start_time,
                end: self.end_time,
            });
        }
        if self.end_time > duration_secs {
            return Err(ValidationError::BeyondDuration {
                end: self.end_time,
                duration: duration_secs,
            });
        }
        Ok(())
    }
}

/// Parameters for converting a file to another format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertParams {
    /// Target format.
    pub format: AudioFormat,
    /// Target bitrate (e.g., "192k"). Ignored for WAV and FLAC;
    /// `None` uses the format default.
    #[serde(default)]
    pub bitrate: Option<String>,
    /// Output sample rate override in Hz.
    #[serde(default)]
    pub sample_rate: Option<u32>,
    /// Output channel count override.
    #[serde(default)]
    pub channels: Option<u8>,
}

impl ConvertParams {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(bitrate) = &self.bitrate {
            check_bitrate(bitrate)?;
        }
        Ok(())
    }
}

/// Parameters for merging a selection of files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeParams {
    /// Output format for the merged file.
    pub format: AudioFormat,
}

/// Parameters for volume adjustment and loudness normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeParams {
    /// Linear gain multiplier. 1.0 leaves volume unchanged.
    pub level: f64,
    /// Apply loudness normalization before the gain stage.
    #[serde(default)]
    pub normalize: bool,
}

impl VolumeParams {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_range("volume level", self.level, 0.1, 10.0)
    }
}

/// The nine parameters of the vinyl effect chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VinylParams {
    /// Highpass cutoff in Hz.
    pub highpass_freq: u32,
    /// Lowpass cutoff in Hz.
    pub lowpass_freq: u32,
    /// Echo input gain.
    pub echo_gain: f64,
    /// Echo delay in milliseconds.
    pub echo_delay: u32,
    /// Tremolo modulation frequency in Hz.
    pub tremolo_freq: f64,
    /// Tremolo modulation depth.
    pub tremolo_depth: f64,
    /// Bass band gain at 100 Hz, in dB.
    pub eq_low: f64,
    /// Treble band gain at 3 kHz, in dB.
    pub eq_high: f64,
    /// Output gain multiplier.
    pub volume: f64,
}

impl VinylParams {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_range("highpass_freq", self.highpass_freq as f64, 50.0, 1000.0)?;
        check_range("lowpass_freq", self.lowpass_freq as f64, 3000.0, 20000.0)?;
        check_range("echo_gain", self.echo_gain, 0.1, 2.0)?;
        check_range("echo_delay", self.echo_delay as f64, 1.0, 500.0)?;
        check_range("tremolo_freq", self.tremolo_freq, 0.1, 20.0)?;
        check_range("tremolo_depth", self.tremolo_depth, 0.0, 1.0)?;
        check_range("eq_low", self.eq_low, -12.0, 12.0)?;
        check_range("eq_high", self.eq_high, -12.0, 12.0)?;
        check_range("volume", self.volume, 0.1, 10.0)?;
        Ok(())
    }
}

impl Default for VinylParams {
    fn default() -> Self {
        Self {
            highpass_freq: 500,
            lowpass_freq: 12000,
            echo_gain: 0.8,
            echo_delay: 60,
            tremolo_freq: 8.0,
            tremolo_depth: 0.2,
            eq_low: -6.0,
            eq_high: 3.0,
            volume: 1.2,
        }
    }
}

/// Parameters for one operation invocation, tagged by kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum OperationParams {
    Trim(TrimParams),
    Convert(ConvertParams),
    Merge(MergeParams),
    Volume(VolumeParams),
    Vinyl(VinylParams),
}
