//! Volume planner: loudness normalization and linear gain.

use crate::models::{AudioInfo, OperationParams, ValidationError, VolumeParams};
use crate::plan::{FilterStage, OperationPlan, OutputSpec};
use crate::registry::FileDescriptor;

use super::{single_input, PlanOutcome, PlanRequest, Planner};

/// EBU R128 integrated loudness target in LUFS.
const LOUDNORM_INTEGRATED: f64 = -23.0;
/// Loudness range target in LU.
const LOUDNORM_RANGE: f64 = 7.0;
/// True peak target in dBTP.
const LOUDNORM_PEAK: f64 = -2.0;

/// Build a volume adjustment plan for one input.
///
/// The normalization stage (fixed loudness targets) runs first when
/// requested, then a linear gain stage when the level is not 1.0. The
/// output is always stereo 44.1 kHz WAV at best VBR quality; unity gain
/// without normalization still re-encodes into that container.
pub fn plan(
    input: &FileDescriptor,
    _info: &AudioInfo,
    params: &VolumeParams,
) -> Result<OperationPlan, ValidationError> {
    params.validate()?;

    let output = OutputSpec {
        extension: "wav".to_string(),
        quality: Some(0),
        sample_rate: Some(44_100),
        channels: Some(2),
        ..OutputSpec::default()
    };

    let mut plan = OperationPlan::single(&input.path, output);
    if params.normalize {
        plan = plan.with_filter(FilterStage::Loudnorm {
            integrated: LOUDNORM_INTEGRATED,
            range: LOUDNORM_RANGE,
            peak: LOUDNORM_PEAK,
        });
    }
    if params.level != 1.0 {
        plan = plan.with_filter(FilterStage::Volume {
            level: params.level,
        });
    }
    Ok(plan)
}

/// Planner adapter for the module registry.
pub struct VolumePlanner;

impl Planner for VolumePlanner {
    fn plan(&self, req: &PlanRequest<'_>) -> Result<PlanOutcome, ValidationError> {
        let OperationParams::Volume(params) = req.params else {
            return Err(ValidationError::ParameterMismatch { expected: "volume" });
        };
        let (input, info) = single_input(req, "volume")?;
        plan(input, info, params).map(PlanOutcome::Plan)
    }
}
