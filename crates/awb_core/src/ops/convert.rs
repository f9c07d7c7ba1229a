//! Convert planner: re-encode a file to a target format.

use crate::models::{AudioInfo, ConvertParams, OperationParams, ValidationError};
use crate::plan::{OperationPlan, OutputSpec};
use crate::registry::FileDescriptor;

use super::{single_input, PlanOutcome, PlanRequest, Planner};

/// Build a conversion plan for one input.
///
/// The codec comes from the fixed format table; sample-rate and channel
/// overrides are applied on top when the caller asks for them.
pub fn plan(
    input: &FileDescriptor,
    _info: &AudioInfo,
    params: &ConvertParams,
) -> Result<OperationPlan, ValidationError> {
    params.validate()?;

    let mut output = OutputSpec::for_format(params.format, params.bitrate.as_deref());
    output.sample_rate = params.sample_rate;
    output.channels = params.channels;

    Ok(OperationPlan::single(&input.path, output))
}

/// Planner adapter for the module registry.
pub struct ConvertPlanner;

impl Planner for ConvertPlanner {
    fn plan(&self, req: &PlanRequest<'_>) -> Result<PlanOutcome, ValidationError> {
        let OperationParams::Convert(params) = req.params else {
            return Err(ValidationError::ParameterMismatch { expected: "convert" });
        };
        let (input, info) = single_input(req, "convert")?;
        plan(input, info, params).map(PlanOutcome::Plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AudioFormat;
    use crate::ops::test_support::{descriptor, stereo_info};

    fn convert(format: AudioFormat, bitrate: Option<&str>) -> ConvertParams {
        ConvertParams {
            format,
            bitrate: bitrate.map(|b| b.to_string()),
            sample_rate: None,
            channels: None,
        }
    }

    #[test]
    fn wav_plan_never_carries_bitrate() {
        let input = descriptor("/uploads/song.mp3");
        let info = stereo_info(180.0, "mp3", "mp3");
        let plan = plan(&input, &info, &convert(AudioFormat::Wav, Some("320k"))).unwrap();
        assert_eq!(plan.output.codec, Some("pcm_s16le"));
        assert_eq!(plan.output.bitrate, None);
        assert!(plan.filters.is_empty());
    }

    #[test]
    fn flac_plan_uses_compression_level() {
        let input = descriptor("/uploads/song.mp3");
        let info = stereo_info(180.0, "mp3", "mp3");
        let plan = plan(&input, &info, &convert(AudioFormat::Flac, None)).unwrap();
        assert_eq!(plan.output.compression_level, Some(5));
        assert_eq!(plan.output.bitrate, None);
    }

    #[test]
    fn mp3_plan_defaults_bitrate_unless_overridden() {
        let input = descriptor("/uploads/song.flac");
        let info = stereo_info(180.0, "flac", "flac");

        let default = plan(&input, &info, &convert(AudioFormat::Mp3, None)).unwrap();
        assert_eq!(default.output.bitrate.as_deref(), Some("192k"));

        let overridden = plan(&input, &info, &convert(AudioFormat::Mp3, Some("320k"))).unwrap();
        assert_eq!(overridden.output.bitrate.as_deref(), Some("320k"));
    }

    #[test]
    fn overrides_land_in_the_output_spec() {
        let input = descriptor("/uploads/song.wav");
        let info = stereo_info(180.0, "pcm_s16le", "wav");
        let params = ConvertParams {
            format: AudioFormat::Ogg,
            bitrate: None,
            sample_rate: Some(48_000),
            channels: Some(1),
        };
        let plan = plan(&input, &info, &params).unwrap();
        assert_eq!(plan.output.codec, Some("libvorbis"));
        assert_eq!(plan.output.sample_rate, Some(48_000));
        assert_eq!(plan.output.channels, Some(1));
    }

    #[test]
    fn bad_bitrate_is_rejected() {
        let input = descriptor("/uploads/song.wav");
        let info = stereo_info(180.0, "pcm_s16le", "wav");
        let err = plan(&input, &info, &convert(AudioFormat::Mp3, Some("fast"))).unwrap_err();
        assert_eq!(err, ValidationError::InvalidBitrate("fast".to_string()));
    }
}
