//! Merge planner: concatenate a selection into one file.

use crate::models::{MergeParams, OperationParams, ValidationError};
use crate::plan::{OperationPlan, OutputSpec};
use crate::registry::FileDescriptor;

use super::{PlanOutcome, PlanRequest, Planner, PlanScope};

/// Build a merge plan over the selection, in selection order.
///
/// A single-element selection is already "merged": the outcome is the
/// input itself and the engine is never invoked. Two or more inputs
/// produce one concat plan (audio streams only) encoded with the same
/// format rule as Convert.
pub fn plan(
    inputs: &[FileDescriptor],
    params: &MergeParams,
) -> Result<PlanOutcome, ValidationError> {
    match inputs {
        [] => Err(ValidationError::NoInputs),
        [only] => Ok(PlanOutcome::Identity(only.path.clone())),
        many => {
            let paths = many.iter().map(|d| d.path.clone()).collect();
            let output = OutputSpec::for_format(params.format, None);
            Ok(PlanOutcome::Plan(OperationPlan::concat(paths, output)))
        }
    }
}

/// Planner adapter for the module registry.
pub struct MergePlanner;

impl Planner for MergePlanner {
    fn scope(&self) -> PlanScope {
        PlanScope::WholeSelection
    }

    fn plan(&self, req: &PlanRequest<'_>) -> Result<PlanOutcome, ValidationError> {
        let OperationParams::Merge(params) = req.params else {
            return Err(ValidationError::ParameterMismatch { expected: "merge" });
        };
        plan(req.inputs, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AudioFormat;
    use crate::ops::test_support::descriptor;
    use std::path::PathBuf;

    fn merge(format: AudioFormat) -> MergeParams {
        MergeParams { format }
    }

    #[test]
    fn empty_selection_is_rejected() {
        assert_eq!(
            plan(&[], &merge(AudioFormat::Mp3)),
            Err(ValidationError::NoInputs)
        );
    }

    #[test]
    fn single_input_returns_identity() {
        let inputs = [descriptor("/uploads/only.wav")];
        let outcome = plan(&inputs, &merge(AudioFormat::Mp3)).unwrap();
        assert_eq!(
            outcome,
            PlanOutcome::Identity(PathBuf::from("/uploads/only.wav"))
        );
    }

    #[test]
    fn multiple_inputs_concat_in_selection_order() {
        let inputs = [
            descriptor("/uploads/b.wav"),
            descriptor("/uploads/a.wav"),
            descriptor("/uploads/c.wav"),
        ];
        let PlanOutcome::Plan(plan) = plan(&inputs, &merge(AudioFormat::Mp3)).unwrap() else {
            panic!("expected an engine plan");
        };
        let paths: Vec<_> = plan
            .inputs
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect();
        assert_eq!(paths, ["/uploads/b.wav", "/uploads/a.wav", "/uploads/c.wav"]);
        assert_eq!(plan.output.codec, Some("libmp3lame"));
        assert_eq!(plan.output.bitrate.as_deref(), Some("192k"));
    }

    #[test]
    fn merge_to_wav_follows_convert_rule() {
        let inputs = [descriptor("/uploads/a.mp3"), descriptor("/uploads/b.mp3")];
        let PlanOutcome::Plan(plan) = plan(&inputs, &merge(AudioFormat::Wav)).unwrap() else {
            panic!("expected an engine plan");
        };
        assert_eq!(plan.output.codec, Some("pcm_s16le"));
        assert_eq!(plan.output.bitrate, None);
    }
}
