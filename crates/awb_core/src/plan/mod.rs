//! Operation plans: ordered filter stages plus output encoding parameters.
//!
//! Plans are ephemeral - planners rebuild them for every invocation and
//! the engine adapter renders them into ffmpeg command tokens.

use std::path::{Path, PathBuf};

use crate::models::AudioFormat;

/// One stage in an ffmpeg audio filter chain.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterStage {
    /// Keep only the first `duration` seconds of the (already seeked) stream.
    Atrim { duration: f64 },
    /// Drop frequencies below `freq` Hz.
    Highpass { freq: u32 },
    /// Drop frequencies above `freq` Hz.
    Lowpass { freq: u32 },
    /// Reverse the stream.
    Areverse,
    /// Echo with input gain, output gain, delay (ms), and decay.
    Aecho {
        in_gain: f64,
        out_gain: f64,
        delay_ms: u32,
        decay: f64,
    },
    /// Amplitude modulation at `freq` Hz with the given depth.
    Tremolo { freq: f64, depth: f64 },
    /// Peaking equalizer band, octave-width.
    Equalizer {
        freq: u32,
        width_octaves: u32,
        gain_db: f64,
    },
    /// Linear gain.
    Volume { level: f64 },
    /// EBU R128 loudness normalization.
    Loudnorm {
        integrated: f64,
        range: f64,
        peak: f64,
    },
}

impl FilterStage {
    /// Render this stage as an ffmpeg filter expression.
    pub fn render(&self) -> String {
        match self {
            Self::Atrim { duration } => format!("atrim=end={duration}"),
            Self::Highpass { freq } => format!("highpass=f={freq}"),
            Self::Lowpass { freq } => format!("lowpass=f={freq}"),
            Self::Areverse => "areverse".to_string(),
            Self::Aecho {
                in_gain,
                out_gain,
                delay_ms,
                decay,
            } => format!("aecho={in_gain}:{out_gain}:{delay_ms}:{decay}"),
            Self::Tremolo { freq, depth } => format!("tremolo=f={freq}:d={depth}"),
            Self::Equalizer {
                freq,
                width_octaves,
                gain_db,
            } => format!("equalizer=f={freq}:width_type=o:width={width_octaves}:g={gain_db}"),
            Self::Volume { level } => format!("volume={level}"),
            Self::Loudnorm {
                integrated,
                range,
                peak,
            } => format!("loudnorm=I={integrated}:LRA={range}:TP={peak}"),
        }
    }
}

/// Output encoding parameters for a plan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputSpec {
    /// Output file extension (container selector), no dot.
    pub extension: String,
    /// Encoder name. `None` lets ffmpeg pick from the extension.
    pub codec: Option<&'static str>,
    /// Target bitrate (e.g., "192k").
    pub bitrate: Option<String>,
    /// VBR quality (`-q:a`), used instead of bitrate.
    pub quality: Option<u8>,
    /// FLAC compression level.
    pub compression_level: Option<u8>,
    /// Output sample rate in Hz.
    pub sample_rate: Option<u32>,
    /// Output channel count.
    pub channels: Option<u8>,
    /// Write an MP4 compatibility container (`-movflags +faststart`).
    pub faststart: bool,
}

impl OutputSpec {
    /// Bare spec that keeps the given extension and lets ffmpeg choose
    /// the encoder.
    pub fn passthrough(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
            ..Self::default()
        }
    }

    /// The fixed format→codec selection rule used by Convert and Merge.
    ///
    /// WAV takes no bitrate, FLAC uses a fixed compression level instead,
    /// and lossy formats default their bitrate when not overridden. M4A
    /// gets the MP4 compatibility flag.
    pub fn for_format(format: AudioFormat, bitrate: Option<&str>) -> Self {
        let bitrate = if format.uses_bitrate() {
            bitrate
                .map(|b| b.to_string())
                .or_else(|| format.default_bitrate().map(|b| b.to_string()))
        } else {
            None
        };

        Self {
            extension: format.extension().to_string(),
            codec: Some(format.codec()),
            bitrate,
            quality: None,
            compression_level: if format == AudioFormat::Flac {
                Some(5)
            } else {
                None
            },
            sample_rate: None,
            channels: None,
            faststart: format == AudioFormat::M4a,
        }
    }
}

/// A fully specified transformation: inputs, filter chain, output encoding.
///
/// Never persisted; rebuilt per invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationPlan {
    /// Input files in order. More than one means a concat operation.
    pub inputs: Vec<PathBuf>,
    /// Input seek offset in seconds, applied before decoding.
    pub seek_secs: Option<f64>,
    /// Ordered filter chain.
    pub filters: Vec<FilterStage>,
    /// Output encoding parameters.
    pub output: OutputSpec,
}

impl OperationPlan {
    /// Plan over a single input with no filters yet.
    pub fn single(input: impl Into<PathBuf>, output: OutputSpec) -> Self {
        Self {
            inputs: vec![input.into()],
            seek_secs: None,
            filters: Vec::new(),
            output,
        }
    }

    /// Plan concatenating several inputs in order.
    pub fn concat(inputs: Vec<PathBuf>, output: OutputSpec) -> Self {
        Self {
            inputs,
            seek_secs: None,
            filters: Vec::new(),
            output,
        }
    }

    /// Append a filter stage.
    pub fn with_filter(mut self, stage: FilterStage) -> Self {
        self.filters.push(stage);
        self
    }

    /// Set the input seek offset.
    pub fn with_seek(mut self, secs: f64) -> Self {
        self.seek_secs = Some(secs);
        self
    }

    /// Render the complete ffmpeg argument list for this plan.
    ///
    /// Always uses overwrite semantics for the destination.
    pub fn to_args(&self, output_path: &Path) -> Vec<String> {
        let mut args: Vec<String> = vec![
            "-hide_banner".into(),
            "-loglevel".into(),
            "error".into(),
            "-y".into(),
        ];

        if let Some(seek) = self.seek_secs {
            args.push("-ss".into());
            args.push(seek.to_string());
        }
        for input in &self.inputs {
            args.push("-i".into());
            args.push(input.to_string_lossy().into_owned());
        }

        let chain: Vec<String> = self.filters.iter().map(FilterStage::render).collect();

        if self.inputs.len() > 1 {
            // Concat audio streams only; any video streams are dropped.
            let mut graph: String = (0..self.inputs.len())
                .map(|i| format!("[{i}:a]"))
                .collect();
            graph.push_str(&format!("concat=n={}:v=0:a=1", self.inputs.len()));
            if !chain.is_empty() {
                graph.push(',');
                graph.push_str(&chain.join(","));
            }
            graph.push_str("[out]");
            args.push("-filter_complex".into());
            args.push(graph);
            args.push("-map".into());
            args.push("[out]".into());
        } else if !chain.is_empty() {
            args.push("-af".into());
            args.push(chain.join(","));
        }

        if let Some(codec) = self.output.codec {
            args.push("-acodec".into());
            args.push(codec.to_string());
        }
        if let Some(bitrate) = &self.output.bitrate {
            args.push("-b:a".into());
            args.push(bitrate.clone());
        }
        if let Some(quality) = self.output.quality {
            args.push("-q:a".into());
            args.push(quality.to_string());
        }
        if let Some(level) = self.output.compression_level {
            args.push("-compression_level".into());
            args.push(level.to_string());
        }
        if let Some(rate) = self.output.sample_rate {
            args.push("-ar".into());
            args.push(rate.to_string());
        }
        if let Some(channels) = self.output.channels {
            args.push("-ac".into());
            args.push(channels.to_string());
        }
        if self.output.faststart {
            args.push("-movflags".into());
            args.push("+faststart".into());
        }

        args.push(output_path.to_string_lossy().into_owned());
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_stages_render_ffmpeg_syntax() {
        assert_eq!(FilterStage::Highpass { freq: 500 }.render(), "highpass=f=500");
        assert_eq!(
            FilterStage::Aecho {
                in_gain: 0.8,
                out_gain: 0.88,
                delay_ms: 60,
                decay: 0.4
            }
            .render(),
            "aecho=0.8:0.88:60:0.4"
        );
        assert_eq!(
            FilterStage::Equalizer {
                freq: 100,
                width_octaves: 2,
                gain_db: -6.0
            }
            .render(),
            "equalizer=f=100:width_type=o:width=2:g=-6"
        );
        assert_eq!(
            FilterStage::Loudnorm {
                integrated: -23.0,
                range: 7.0,
                peak: -2.0
            }
            .render(),
            "loudnorm=I=-23:LRA=7:TP=-2"
        );
    }

    #[test]
    fn wav_spec_has_no_bitrate() {
        let spec = OutputSpec::for_format(AudioFormat::Wav, Some("192k"));
        assert_eq!(spec.codec, Some("pcm_s16le"));
        assert_eq!(spec.bitrate, None);
        assert_eq!(spec.compression_level, None);
    }

    #[test]
    fn flac_spec_uses_compression_level() {
        let spec = OutputSpec::for_format(AudioFormat::Flac, Some("320k"));
        assert_eq!(spec.codec, Some("flac"));
        assert_eq!(spec.bitrate, None);
        assert_eq!(spec.compression_level, Some(5));
    }

    #[test]
    fn mp3_spec_defaults_to_192k() {
        let spec = OutputSpec::for_format(AudioFormat::Mp3, None);
        assert_eq!(spec.bitrate.as_deref(), Some("192k"));
        let spec = OutputSpec::for_format(AudioFormat::Mp3, Some("320k"));
        assert_eq!(spec.bitrate.as_deref(), Some("320k"));
    }

    #[test]
    fn m4a_spec_sets_faststart() {
        let spec = OutputSpec::for_format(AudioFormat::M4a, None);
        assert_eq!(spec.codec, Some("aac"));
        assert!(spec.faststart);
        assert!(!OutputSpec::for_format(AudioFormat::Aac, None).faststart);
    }

    #[test]
    fn single_input_args_use_af() {
        let plan = OperationPlan::single("/in/a.wav", OutputSpec::for_format(AudioFormat::Mp3, None))
            .with_seek(5.0)
            .with_filter(FilterStage::Atrim { duration: 10.0 });

        let args = plan.to_args(Path::new("/out/a.mp3"));
        let joined = args.join(" ");
        assert!(joined.contains("-y"));
        assert!(joined.contains("-ss 5"));
        assert!(joined.contains("-i /in/a.wav"));
        assert!(joined.contains("-af atrim=end=10"));
        assert!(joined.contains("-acodec libmp3lame"));
        assert!(joined.contains("-b:a 192k"));
        assert!(joined.ends_with("/out/a.mp3"));
    }

    #[test]
    fn concat_args_build_filter_complex() {
        let plan = OperationPlan::concat(
            vec![PathBuf::from("/in/a.wav"), PathBuf::from("/in/b.wav")],
            OutputSpec::for_format(AudioFormat::Mp3, None),
        );
        let args = plan.to_args(Path::new("/out/merged.mp3"));
        let graph = args
            .iter()
            .position(|a| a == "-filter_complex")
            .map(|i| args[i + 1].clone())
            .unwrap();
        assert_eq!(graph, "[0:a][1:a]concat=n=2:v=0:a=1[out]");
        assert!(args.iter().any(|a| a == "-map"));
    }

    #[test]
    fn filter_order_is_preserved() {
        let plan = OperationPlan::single("/in/a.wav", OutputSpec::passthrough("wav"))
            .with_filter(FilterStage::Highpass { freq: 300 })
            .with_filter(FilterStage::Areverse)
            .with_filter(FilterStage::Volume { level: 1.5 });

        let args = plan.to_args(Path::new("/out/a.wav"));
        let chain = args
            .iter()
            .position(|a| a == "-af")
            .map(|i| args[i + 1].clone())
            .unwrap();
        assert_eq!(chain, "highpass=f=300,areverse,volume=1.5");
    }
}
