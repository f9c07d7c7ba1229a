//! Named preset persistence.
//!
//! Each module owns a `PresetStore` keyed by its own JSON document, so
//! preset names from different modules never collide. The document maps
//! preset name to a flat parameter object; a `BTreeMap` keeps key
//! ordering stable for diffable files. A missing or corrupt document is
//! replaced with the module's defaults rather than failing the session.

mod vinyl_defaults;

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub use vinyl_defaults::stock_vinyl_presets;

/// Errors from preset store operations.
///
/// On any error the store keeps its last-good in-memory state.
#[derive(Error, Debug)]
pub enum PresetError {
    /// No preset with this name exists.
    #[error("preset not found: {0}")]
    NotFound(String),

    /// The preset document could not be written.
    #[error("failed to write preset file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The presets could not be serialized.
    #[error("failed to serialize presets: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// JSON-backed store of named parameter sets for one module.
pub struct PresetStore<P> {
    path: PathBuf,
    presets: BTreeMap<String, P>,
}

impl<P> PresetStore<P>
where
    P: Serialize + DeserializeOwned + Clone,
{
    /// Load the store from its document, falling back to `defaults` when
    /// the document is missing or unreadable (and writing the defaults
    /// back so the next load succeeds).
    pub fn load_or_default(path: impl Into<PathBuf>, defaults: BTreeMap<String, P>) -> Self {
        let path = path.into();

        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(presets) => {
                        return Self { path, presets };
                    }
                    Err(e) => {
                        tracing::warn!(
                            "Preset file {} is corrupt ({}), restoring defaults",
                            path.display(),
                            e
                        );
                    }
                },
                Err(e) => {
                    tracing::warn!(
                        "Failed to read preset file {} ({}), restoring defaults",
                        path.display(),
                        e
                    );
                }
            }
        }

        let store = Self {
            path,
            presets: defaults,
        };
        if let Err(e) = store.persist() {
            tracing::warn!("Failed to write default presets: {}", e);
        }
        store
    }

    /// The backing document path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Preset names in stable (sorted) order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(|s| s.as_str())
    }

    /// Number of presets.
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    /// Whether the store holds no presets.
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    /// Fetch a copy of a preset's parameters.
    pub fn get(&self, name: &str) -> Result<P, PresetError> {
        self.presets
            .get(name)
            .cloned()
            .ok_or_else(|| PresetError::NotFound(name.to_string()))
    }

    /// Insert or overwrite a preset and persist the whole document.
    pub fn save(&mut self, name: impl Into<String>, params: P) -> Result<(), PresetError> {
        let name = name.into();
        let previous = self.presets.insert(name.clone(), params);
        if let Err(e) = self.persist() {
            // Roll back so memory matches the document on disk.
            match previous {
                Some(old) => {
                    self.presets.insert(name, old);
                }
                None => {
                    self.presets.remove(&name);
                }
            }
            return Err(e);
        }
        Ok(())
    }

    /// Remove a preset and persist the document.
    pub fn delete(&mut self, name: &str) -> Result<(), PresetError> {
        let removed = self
            .presets
            .remove(name)
            .ok_or_else(|| PresetError::NotFound(name.to_string()))?;
        if let Err(e) = self.persist() {
            self.presets.insert(name.to_string(), removed);
            return Err(e);
        }
        Ok(())
    }

    /// Write the document atomically (temp file + rename).
    fn persist(&self) -> Result<(), PresetError> {
        let content = serde_json::to_string_pretty(&self.presets)?;

        let io_err = |source| PresetError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&temp_path).map_err(io_err)?;
            file.write_all(content.as_bytes()).map_err(io_err)?;
            file.sync_all().map_err(io_err)?;
        }
        fs::rename(&temp_path, &self.path).map_err(io_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VinylParams;
    use tempfile::tempdir;

    #[test]
    fn missing_file_is_seeded_with_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vinyl_presets.json");

        let store: PresetStore<VinylParams> =
            PresetStore::load_or_default(&path, stock_vinyl_presets());

        assert!(path.exists());
        assert_eq!(store.len(), 7);
        assert!(store.get("Classic 50s").is_ok());
    }

    #[test]
    fn corrupt_file_self_heals() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vinyl_presets.json");
        fs::write(&path, "{not json").unwrap();

        let store: PresetStore<VinylParams> =
            PresetStore::load_or_default(&path, stock_vinyl_presets());

        assert_eq!(store.len(), 7);
        // The rewritten document parses again.
        let reloaded: PresetStore<VinylParams> =
            PresetStore::load_or_default(&path, BTreeMap::new());
        assert_eq!(reloaded.len(), 7);
    }

    #[test]
    fn save_load_get_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vinyl_presets.json");

        let mut store: PresetStore<VinylParams> =
            PresetStore::load_or_default(&path, BTreeMap::new());
        let params = VinylParams {
            highpass_freq: 250,
            ..VinylParams::default()
        };
        store.save("My Preset", params.clone()).unwrap();
        // Saving identical values again is a no-op on content.
        store.save("My Preset", params.clone()).unwrap();

        let reloaded: PresetStore<VinylParams> =
            PresetStore::load_or_default(&path, BTreeMap::new());
        assert_eq!(reloaded.get("My Preset").unwrap(), params);
    }

    #[test]
    fn delete_removes_and_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vinyl_presets.json");

        let mut store: PresetStore<VinylParams> =
            PresetStore::load_or_default(&path, stock_vinyl_presets());
        store.delete("80s VHS").unwrap();
        assert!(matches!(
            store.get("80s VHS"),
            Err(PresetError::NotFound(_))
        ));

        let reloaded: PresetStore<VinylParams> =
            PresetStore::load_or_default(&path, BTreeMap::new());
        assert_eq!(reloaded.len(), 6);
    }

    #[test]
    fn delete_missing_is_not_found() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vinyl_presets.json");
        let mut store: PresetStore<VinylParams> =
            PresetStore::load_or_default(&path, BTreeMap::new());
        assert!(matches!(
            store.delete("ghost"),
            Err(PresetError::NotFound(_))
        ));
    }

    #[test]
    fn document_keys_are_sorted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vinyl_presets.json");

        let mut store: PresetStore<VinylParams> =
            PresetStore::load_or_default(&path, BTreeMap::new());
        store.save("zeta", VinylParams::default()).unwrap();
        store.save("alpha", VinylParams::default()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let alpha = content.find("alpha").unwrap();
        let zeta = content.find("zeta").unwrap();
        assert!(alpha < zeta);
    }
}
