//! Operation planners.
//!
//! Each submodule maps (input descriptors, probed info, parameters) to an
//! `OperationPlan` without touching the filesystem or the engine. The
//! `Planner` trait gives the module registry and batch layer a uniform
//! seam over the per-operation plan functions.

pub mod convert;
pub mod merge;
pub mod trim;
pub mod vinyl;
pub mod volume;

use std::path::PathBuf;

pub use convert::ConvertPlanner;
pub use merge::MergePlanner;
pub use trim::TrimPlanner;
pub use vinyl::VinylPlanner;
pub use volume::VolumePlanner;

use crate::models::{AudioInfo, OperationParams, ValidationError};
use crate::plan::OperationPlan;
use crate::registry::FileDescriptor;

/// How a planner consumes a multi-file selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanScope {
    /// One plan per selected file.
    PerFile,
    /// One plan for the whole selection.
    WholeSelection,
}

/// Inputs to one planning call.
pub struct PlanRequest<'a> {
    /// Selected files, in selection order.
    pub inputs: &'a [FileDescriptor],
    /// Probed info for each input, same order as `inputs`.
    pub infos: &'a [AudioInfo],
    /// Operation parameters.
    pub params: &'a OperationParams,
}

/// Result of planning: either an engine invocation or nothing to do.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanOutcome {
    /// Run the engine with this plan.
    Plan(OperationPlan),
    /// The input already satisfies the request; no engine call.
    Identity(PathBuf),
}

/// A registered operation's planning seam.
pub trait Planner: Send + Sync {
    /// How selections are fed to `plan`.
    fn scope(&self) -> PlanScope {
        PlanScope::PerFile
    }

    /// Build a plan for the request, or reject its parameters.
    fn plan(&self, req: &PlanRequest<'_>) -> Result<PlanOutcome, ValidationError>;
}

fn single_input<'a>(
    req: &'a PlanRequest<'_>,
    expected: &'static str,
) -> Result<(&'a FileDescriptor, &'a AudioInfo), ValidationError> {
    match (req.inputs.first(), req.infos.first()) {
        (Some(input), Some(info)) => Ok((input, info)),
        _ => Err(ValidationError::ParameterMismatch { expected }),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Probed info for a plain stereo 44.1 kHz source of the given duration.
    pub fn stereo_info(duration_secs: f64, codec: &str, container: &str) -> AudioInfo {
        AudioInfo {
            duration_secs,
            sample_rate: 44_100,
            channels: 2,
            codec: codec.to_string(),
            bit_rate: 0,
            container: container.to_string(),
            size_bytes: 1_000_000,
        }
    }

    pub fn descriptor(path: &str) -> FileDescriptor {
        FileDescriptor::from_path(path)
    }
}
