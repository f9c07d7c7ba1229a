//! Media engine adapter.
//!
//! The `MediaEngine` trait is the single seam between planning and the
//! external decode/filter/encode process. Planners and the batch layer
//! depend on the trait, so tests run against an in-memory fake instead
//! of spawning processes.

mod ffmpeg;

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub use ffmpeg::FfmpegEngine;

use crate::models::AudioInfo;
use crate::plan::OperationPlan;

/// Probing failed: the input is missing, unreadable, or not audio.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// The input file does not exist.
    #[error("input file not found: {0}")]
    FileNotFound(PathBuf),

    /// The probe tool could not be launched.
    #[error("failed to run {tool}: {source}")]
    Launch {
        tool: &'static str,
        #[source]
        source: io::Error,
    },

    /// The probe tool exited non-zero.
    #[error("{tool} failed with exit code {exit_code}: {stderr}")]
    CommandFailed {
        tool: &'static str,
        exit_code: i32,
        stderr: String,
    },

    /// The probe output could not be parsed.
    #[error("failed to parse probe output: {0}")]
    Parse(#[from] serde_json::Error),

    /// The file contains no audio stream.
    #[error("no audio stream in {0}")]
    NotAudio(PathBuf),
}

/// Execution failed: the engine process could not run or exited non-zero.
///
/// On failure the adapter removes any partially written output before
/// returning, so callers never see a half-encoded artifact.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The engine binary could not be launched.
    #[error("failed to run {tool}: {source}")]
    Launch {
        tool: &'static str,
        #[source]
        source: io::Error,
    },

    /// The engine exited non-zero. Carries the raw diagnostic text.
    #[error("{tool} failed with exit code {exit_code}: {stderr}")]
    CommandFailed {
        tool: &'static str,
        exit_code: i32,
        stderr: String,
    },
}

/// Abstract decode/filter/encode engine.
///
/// Implementations never retry; callers decide whether to retry or
/// surface the error.
pub trait MediaEngine {
    /// Inspect an audio file.
    fn probe(&self, path: &Path) -> Result<AudioInfo, ProbeError>;

    /// Run a plan, writing the result to `output_path` (overwriting any
    /// existing file). Blocks until the engine process exits.
    fn execute(&self, plan: &OperationPlan, output_path: &Path) -> Result<PathBuf, EngineError>;
}
