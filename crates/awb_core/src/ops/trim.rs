//! Trim planner: cut a file to a start/end window.

use crate::models::{AudioFormat, AudioInfo, OperationParams, TrimParams, ValidationError};
use crate::plan::{FilterStage, OperationPlan, OutputSpec};
use crate::registry::FileDescriptor;

use super::{single_input, PlanOutcome, PlanRequest, Planner};

/// Build a trim plan for one input.
///
/// The plan seeks to `start_time` and keeps `end_time - start_time`
/// seconds. The output codec follows the target format: PCM for WAV
/// (preserving the source's sample rate and channel count), VBR MP3 for
/// MP3, and the engine's own choice for anything else. An unspecified
/// format keeps the input's.
pub fn plan(
    input: &FileDescriptor,
    info: &AudioInfo,
    params: &TrimParams,
) -> Result<OperationPlan, ValidationError> {
    params.validate(info.duration_secs)?;

    let format = params.format.or_else(|| AudioFormat::from_path(&input.path));

    let output = match format {
        Some(AudioFormat::Wav) => OutputSpec {
            sample_rate: Some(info.sample_rate),
            channels: Some(info.channels),
            ..OutputSpec::for_format(AudioFormat::Wav, None)
        },
        Some(AudioFormat::Mp3) => OutputSpec {
            extension: "mp3".to_string(),
            codec: Some("libmp3lame"),
            quality: Some(2),
            ..OutputSpec::default()
        },
        Some(other) => OutputSpec::passthrough(other.extension()),
        // No recognizable extension on either side: fall back to WAV,
        // as the upload layer does for extension-less files.
        None => OutputSpec::passthrough("wav"),
    };

    Ok(OperationPlan::single(&input.path, output)
        .with_seek(params.start_time)
        .with_filter(FilterStage::Atrim {
            duration: params.end_time - params.start_time,
        }))
}

/// Planner adapter for the module registry.
pub struct TrimPlanner;

impl Planner for TrimPlanner {
    fn plan(&self, req: &PlanRequest<'_>) -> Result<PlanOutcome, ValidationError> {
        let OperationParams::Trim(params) = req.params else {
            return Err(ValidationError::ParameterMismatch { expected: "trim" });
        };
        let (input, info) = single_input(req, "trim")?;
        plan(input, info, params).map(PlanOutcome::Plan)
    }
}
