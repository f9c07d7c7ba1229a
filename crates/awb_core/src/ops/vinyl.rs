//! Vinyl effect planner.
//!
//! A fixed nine-stage chain emulating vintage playback media. The stage
//! order never changes; only the parameter values do. The echo runs
//! between two reversals so the repeats lead into the sound instead of
//! trailing it.

use crate::models::{AudioInfo, OperationParams, ValidationError, VinylParams};
use crate::plan::{FilterStage, OperationPlan, OutputSpec};
use crate::registry::FileDescriptor;

use super::{single_input, PlanOutcome, PlanRequest, Planner};

/// Echo output gain, fixed across presets.
const ECHO_OUT_GAIN: f64 = 0.88;
/// Echo decay, fixed across presets.
const ECHO_DECAY: f64 = 0.4;
/// Bass equalizer band center in Hz.
const EQ_LOW_FREQ: u32 = 100;
/// Treble equalizer band center in Hz.
const EQ_HIGH_FREQ: u32 = 3000;
/// Both equalizer bands are two octaves wide.
const EQ_WIDTH_OCTAVES: u32 = 2;
/// Output is always MP3 at this bitrate.
const OUTPUT_BITRATE: &str = "192k";

/// Build a vinyl effect plan for one input.
///
/// Output is always two-channel MP3 at a fixed bitrate, regardless of
/// the input's format or channel count.
pub fn plan(
    input: &FileDescriptor,
    _info: &AudioInfo,
    params: &VinylParams,
) -> Result<OperationPlan, ValidationError> {
    params.validate()?;

    let output = OutputSpec {
        extension: "mp3".to_string(),
        codec: Some("libmp3lame"),
        bitrate: Some(OUTPUT_BITRATE.to_string()),
        channels: Some(2),
        ..OutputSpec::default()
    };

    Ok(OperationPlan::single(&input.path, output)
        .with_filter(FilterStage::Highpass {
            freq: params.highpass_freq,
        })
        .with_filter(FilterStage::Lowpass {
            freq: params.lowpass_freq,
        })
        .with_filter(FilterStage::Areverse)
        .with_filter(FilterStage::Aecho {
            in_gain: params.echo_gain,
            out_gain: ECHO_OUT_GAIN,
            delay_ms: params.echo_delay,
            decay: ECHO_DECAY,
        })
        .with_filter(FilterStage::Areverse)
        .with_filter(FilterStage::Tremolo {
            freq: params.tremolo_freq,
            depth: params.tremolo_depth,
        })
        .with_filter(FilterStage::Equalizer {
            freq: EQ_LOW_FREQ,
            width_octaves: EQ_WIDTH_OCTAVES,
            gain_db: params.eq_low,
        })
        .with_filter(FilterStage::Equalizer {
            freq: EQ_HIGH_FREQ,
            width_octaves: EQ_WIDTH_OCTAVES,
            gain_db: params.eq_high,
        })
        .with_filter(FilterStage::Volume {
            level: params.volume,
        }))
}

/// Planner adapter for the module registry.
pub struct VinylPlanner;

impl Planner for VinylPlanner {
    fn plan(&self, req: &PlanRequest<'_>) -> Result<PlanOutcome, ValidationError> {
        let OperationParams::Vinyl(params) = req.params else {
            return Err(ValidationError::ParameterMismatch { expected: "vinyl" });
        };
        let (input, info) = single_input(req, "vinyl")?;
        plan(input, info, params).map(PlanOutcome::Plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::test_support::{descriptor, stereo_info};
    use std::path::Path;

    /// The "Classic 50s" stock preset.
    fn classic_50s() -> VinylParams {
        VinylParams {
            highpass_freq: 300,
            lowpass_freq: 8000,
            echo_gain: 1.2,
            echo_delay: 120,
            tremolo_freq: 8.0,
            tremolo_depth: 0.1,
            eq_low: -6.0,
            eq_high: 3.0,
            volume: 1.5,
        }
    }

    #[test]
    fn nine_stages_in_fixed_order() {
        let input = descriptor("/uploads/song.wav");
        let info = stereo_info(120.0, "pcm_s16le", "wav");
        let plan = plan(&input, &info, &classic_50s()).unwrap();

        let rendered: Vec<String> = plan.filters.iter().map(|f| f.render()).collect();
        assert_eq!(
            rendered,
            [
                "highpass=f=300",
                "lowpass=f=8000",
                "areverse",
                "aecho=1.2:0.88:120:0.4",
                "areverse",
                "tremolo=f=8:d=0.1",
                "equalizer=f=100:width_type=o:width=2:g=-6",
                "equalizer=f=3000:width_type=o:width=2:g=3",
                "volume=1.5",
            ]
        );
    }

    #[test]
    fn mono_input_is_forced_to_stereo_mp3() {
        let input = descriptor("/uploads/mono.wav");
        let mut info = stereo_info(120.0, "pcm_s16le", "wav");
        info.channels = 1;
        info.sample_rate = 44_100;

        let plan = plan(&input, &info, &classic_50s()).unwrap();
        assert_eq!(plan.output.channels, Some(2));
        assert_eq!(plan.output.codec, Some("libmp3lame"));
        assert_eq!(plan.output.bitrate.as_deref(), Some("192k"));
        assert_eq!(plan.output.extension, "mp3");
    }

    #[test]
    fn args_carry_full_chain_and_stereo_flag() {
        let input = descriptor("/uploads/song.flac");
        let info = stereo_info(120.0, "flac", "flac");
        let plan = plan(&input, &info, &VinylParams::default()).unwrap();
        let args = plan.to_args(Path::new("/uploads/vinyl_song.mp3"));
        let joined = args.join(" ");
        assert!(joined.contains("-ac 2"));
        assert!(joined.contains("areverse,aecho=0.8:0.88:60:0.4,areverse"));
    }

    #[test]
    fn out_of_range_parameter_is_rejected() {
        let input = descriptor("/uploads/song.wav");
        let info = stereo_info(120.0, "pcm_s16le", "wav");
        let mut params = classic_50s();
        params.highpass_freq = 20;
        assert!(plan(&input, &info, &params).is_err());
    }

    #[test]
    fn every_stock_preset_produces_a_plan() {
        let input = descriptor("/uploads/song.wav");
        let info = stereo_info(120.0, "pcm_s16le", "wav");
        for (name, params) in crate::presets::stock_vinyl_presets() {
            let plan = plan(&input, &info, &params);
            assert!(plan.is_ok(), "preset {name} was rejected");
        }
    }
}
