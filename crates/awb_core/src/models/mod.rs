//! Data model types shared across the crate.
//!
//! - `media`: probed audio stream information and target formats
//! - `params`: per-operation parameter value objects with validation

pub mod media;
pub mod params;

pub use media::{AudioFormat, AudioInfo};
pub use params::{
    ConvertParams, MergeParams, OperationParams, TrimParams, ValidationError, VinylParams,
    VolumeParams,
};
