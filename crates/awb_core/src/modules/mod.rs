//! Module registry.
//!
//! Each transformation module registers a descriptor (for menus and
//! preset file naming) alongside its planner. Registration order is
//! preserved so the UI lists modules the way the application wired them.

use thiserror::Error;

use crate::ops::{
    ConvertPlanner, MergePlanner, Planner, TrimPlanner, VinylPlanner, VolumePlanner,
};

/// Registration or lookup failure.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ModuleError {
    /// A module with this key is already registered.
    #[error("module key already registered: {0}")]
    DuplicateKey(String),

    /// The descriptor is missing its key or display name.
    #[error("module descriptor needs a non-empty {0}")]
    MissingName(&'static str),

    /// No module with this key is registered.
    #[error("unknown module: {0}")]
    NotFound(String),
}

/// Static description of a transformation module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDescriptor {
    /// Stable identifier, also the preset file prefix.
    pub key: String,
    /// Human-readable name for menus.
    pub display_name: String,
    /// One-line description of what the module does.
    pub description: String,
    /// Emoji or glyph shown next to the name.
    pub icon: String,
}

impl ModuleDescriptor {
    pub fn new(
        key: impl Into<String>,
        display_name: impl Into<String>,
        description: impl Into<String>,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            display_name: display_name.into(),
            description: description.into(),
            icon: icon.into(),
        }
    }
}

/// Ordered collection of modules, keyed by their stable identifier.
#[derive(Default)]
pub struct ModuleRegistry {
    modules: Vec<(ModuleDescriptor, Box<dyn Planner>)>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module. Keys must be unique; registration order is the
    /// listing order.
    pub fn register(
        &mut self,
        descriptor: ModuleDescriptor,
        planner: Box<dyn Planner>,
    ) -> Result<(), ModuleError> {
        if descriptor.key.is_empty() {
            return Err(ModuleError::MissingName("key"));
        }
        if descriptor.display_name.is_empty() {
            return Err(ModuleError::MissingName("display name"));
        }
        if self.modules.iter().any(|(d, _)| d.key == descriptor.key) {
            return Err(ModuleError::DuplicateKey(descriptor.key));
        }
        self.modules.push((descriptor, planner));
        Ok(())
    }

    /// Look up a module and its planner by key.
    pub fn resolve(&self, key: &str) -> Result<(&ModuleDescriptor, &dyn Planner), ModuleError> {
        self.modules
            .iter()
            .find(|(d, _)| d.key == key)
            .map(|(d, p)| (d, p.as_ref()))
            .ok_or_else(|| ModuleError::NotFound(key.to_string()))
    }

    /// Descriptors in registration order.
    pub fn list(&self) -> impl Iterator<Item = &ModuleDescriptor> {
        self.modules.iter().map(|(d, _)| d)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// The full set of shipped modules, in menu order.
pub fn standard_registry() -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();

    // register() only fails on duplicates or empty names; the shipped
    // set is static, so failures here are programming errors.
    let entries: Vec<(ModuleDescriptor, Box<dyn Planner>)> = vec![
        (
            ModuleDescriptor::new("trim", "Trim Audio", "Cut a time range out of a file", "✂️"),
            Box::new(TrimPlanner),
        ),
        (
            ModuleDescriptor::new(
                "convert",
                "Convert Format",
                "Re-encode to another format, bitrate, or channel layout",
                "🔄",
            ),
            Box::new(ConvertPlanner),
        ),
        (
            ModuleDescriptor::new(
                "merge",
                "Merge Files",
                "Concatenate the selection into one file",
                "🔗",
            ),
            Box::new(MergePlanner),
        ),
        (
            ModuleDescriptor::new(
                "volume",
                "Adjust Volume",
                "Loudness normalization and linear gain",
                "🔊",
            ),
            Box::new(VolumePlanner),
        ),
        (
            ModuleDescriptor::new(
                "vinyl",
                "Vinyl Effect",
                "Vintage playback emulation with era presets",
                "📀",
            ),
            Box::new(VinylPlanner),
        ),
    ];

    for (descriptor, planner) in entries {
        if let Err(e) = registry.register(descriptor, planner) {
            unreachable!("static module set failed to register: {e}");
        }
    }
    registry
}
