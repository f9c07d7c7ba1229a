//! Settings struct with TOML-based sections.

use serde::{Deserialize, Serialize};

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Path-related settings.
    #[serde(default)]
    pub paths: PathSettings,

    /// Upload limits.
    #[serde(default)]
    pub limits: LimitSettings,

    /// Output handling.
    #[serde(default)]
    pub output: OutputSettings,
}

/// Folder configuration for uploads, outputs, presets, and logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    /// Folder where uploaded files live.
    #[serde(default = "default_upload_folder")]
    pub upload_folder: String,

    /// Folder for operation outputs.
    #[serde(default = "default_output_folder")]
    pub output_folder: String,

    /// Folder holding per-module preset documents.
    #[serde(default = "default_presets_folder")]
    pub presets_folder: String,

    /// Folder for log files.
    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,
}

fn default_upload_folder() -> String {
    "uploads".to_string()
}

fn default_output_folder() -> String {
    "uploads".to_string()
}

fn default_presets_folder() -> String {
    "data".to_string()
}

fn default_logs_folder() -> String {
    ".logs".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            upload_folder: default_upload_folder(),
            output_folder: default_output_folder(),
            presets_folder: default_presets_folder(),
            logs_folder: default_logs_folder(),
        }
    }
}

/// Upload restrictions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitSettings {
    /// Maximum upload size in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size_bytes: u64,

    /// Accepted file extensions, lowercase, without dots.
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
}

fn default_max_file_size() -> u64 {
    100 * 1024 * 1024
}

fn default_allowed_extensions() -> Vec<String> {
    ["wav", "mp3", "ogg", "flac", "m4a", "wma", "aac"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for LimitSettings {
    fn default() -> Self {
        Self {
            max_file_size_bytes: default_max_file_size(),
            allowed_extensions: default_allowed_extensions(),
        }
    }
}

/// What to do when an operation's output path already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionPolicy {
    /// Fail the item without touching the existing file.
    Reject,
    /// Append a timestamp to the output name.
    #[default]
    AutoRename,
    /// Replace the existing file.
    Overwrite,
}

/// Output handling configuration.
///
/// Bitrate defaults are per-format and live with the format table, not
/// here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Policy for colliding output names.
    #[serde(default)]
    pub collision_policy: CollisionPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_serializes() {
        let settings = Settings::default();
        let toml = toml::to_string_pretty(&settings).unwrap();
        assert!(toml.contains("[paths]"));
        assert!(toml.contains("[limits]"));
        assert!(toml.contains("upload_folder"));
    }

    #[test]
    fn settings_round_trip() {
        let settings = Settings::default();
        let toml = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.paths.upload_folder, settings.paths.upload_folder);
        assert_eq!(
            parsed.limits.max_file_size_bytes,
            settings.limits.max_file_size_bytes
        );
    }

    #[test]
    fn missing_fields_use_defaults() {
        let minimal = "[paths]\noutput_folder = \"processed\"";
        let parsed: Settings = toml::from_str(minimal).unwrap();
        assert_eq!(parsed.paths.output_folder, "processed");
        assert_eq!(parsed.limits.max_file_size_bytes, 100 * 1024 * 1024);
        assert_eq!(parsed.output.collision_policy, CollisionPolicy::AutoRename);
        assert!(parsed
            .limits
            .allowed_extensions
            .contains(&"wma".to_string()));
    }

    #[test]
    fn collision_policy_kebab_case() {
        let toml = "[output]\ncollision_policy = \"auto-rename\"";
        let parsed: Settings = toml::from_str(toml).unwrap();
        assert_eq!(parsed.output.collision_policy, CollisionPolicy::AutoRename);
    }

    #[test]
    fn unknown_output_keys_are_tolerated() {
        // Settings files written by older builds may carry extra keys.
        let toml = "[output]\ncollision_policy = \"overwrite\"\ndefault_bitrate = \"192k\"";
        let parsed: Settings = toml::from_str(toml).unwrap();
        assert_eq!(parsed.output.collision_policy, CollisionPolicy::Overwrite);
    }
}
