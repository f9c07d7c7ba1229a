//! AWB Core - Backend logic for Audio Workbench
//!
//! This crate contains all business logic with zero UI dependencies:
//! the file registry, operation planners, preset stores, and the
//! ffmpeg/ffprobe engine adapter. It can be used by a GUI application
//! or the `awb` CLI tool.

pub mod config;
pub mod engine;
pub mod logging;
pub mod models;
pub mod modules;
pub mod ops;
pub mod plan;
pub mod presets;
pub mod registry;
pub mod session;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_returns_value() {
        assert!(!version().is_empty());
    }
}
