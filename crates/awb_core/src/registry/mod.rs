//! Session file registry.
//!
//! Tracks the ordered set of files a session is working with, along with
//! the single "active" descriptor that file-scoped operations target.
//! The registry only tracks metadata; deleting backing files is the
//! caller's responsibility.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::LimitSettings;

/// Metadata record for one tracked file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    /// Display name. Not required to be unique.
    pub name: String,
    /// Filesystem path. Unique key within the registry.
    pub path: PathBuf,
    /// Whether this is the active descriptor. At most one is active.
    #[serde(default)]
    pub active: bool,
}

impl FileDescriptor {
    /// Create an inactive descriptor for a path, deriving the display
    /// name from the file name.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self {
            name,
            path,
            active: false,
        }
    }

    /// Create an inactive descriptor with an explicit display name.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            active: false,
        }
    }
}

/// Errors from registry operations. No partial mutation occurs on error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A descriptor with this path is already registered.
    #[error("file already registered: {0}")]
    DuplicatePath(PathBuf),

    /// No descriptor with this path exists.
    #[error("file not registered: {0}")]
    NotFound(PathBuf),

    /// The descriptor is already at the first/last position.
    #[error("cannot move '{path}' {direction}: already at the boundary")]
    BoundaryViolation { path: PathBuf, direction: &'static str },

    /// The file's extension is not in the upload allow-list.
    #[error("unsupported file extension: {0}")]
    UnsupportedExtension(String),

    /// The file exceeds the configured size cap.
    #[error("file too large: {size} bytes (limit {max} bytes)")]
    TooLarge { size: u64, max: u64 },
}

/// Ordered collection of file descriptors with a single active selection.
#[derive(Debug, Clone, Default)]
pub struct FileRegistry {
    files: Vec<FileDescriptor>,
}

impl FileRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tracked files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// The ordered sequence of descriptors.
    pub fn list(&self) -> &[FileDescriptor] {
        &self.files
    }

    /// The active descriptor, if any.
    pub fn active(&self) -> Option<&FileDescriptor> {
        self.files.iter().find(|f| f.active)
    }

    /// Look up a descriptor by path.
    pub fn get(&self, path: &Path) -> Option<&FileDescriptor> {
        self.files.iter().find(|f| f.path == path)
    }

    fn index_of(&self, path: &Path) -> Option<usize> {
        self.files.iter().position(|f| f.path == path)
    }

    /// Add a descriptor at the front of the list and make it active.
    pub fn add(&mut self, descriptor: FileDescriptor) -> Result<(), RegistryError> {
        if self.index_of(&descriptor.path).is_some() {
            return Err(RegistryError::DuplicatePath(descriptor.path));
        }
        let path = descriptor.path.clone();
        self.files.insert(0, descriptor);
        self.set_active(&path)
    }

    /// Remove a descriptor. If it was active, the predecessor (or the new
    /// first element when removing index 0) becomes active; an empty
    /// registry is left with no active descriptor.
    pub fn remove(&mut self, path: &Path) -> Result<FileDescriptor, RegistryError> {
        let index = self
            .index_of(path)
            .ok_or_else(|| RegistryError::NotFound(path.to_path_buf()))?;
        let removed = self.files.remove(index);

        if removed.active && !self.files.is_empty() {
            let next = if index == 0 { 0 } else { index - 1 };
            let next_path = self.files[next].path.clone();
            self.set_active(&next_path)?;
        }
        Ok(removed)
    }

    /// Swap a descriptor with its predecessor.
    pub fn move_up(&mut self, path: &Path) -> Result<(), RegistryError> {
        let index = self
            .index_of(path)
            .ok_or_else(|| RegistryError::NotFound(path.to_path_buf()))?;
        if index == 0 {
            return Err(RegistryError::BoundaryViolation {
                path: path.to_path_buf(),
                direction: "up",
            });
        }
        self.files.swap(index - 1, index);
        Ok(())
    }

    /// Swap a descriptor with its successor.
    pub fn move_down(&mut self, path: &Path) -> Result<(), RegistryError> {
        let index = self
            .index_of(path)
            .ok_or_else(|| RegistryError::NotFound(path.to_path_buf()))?;
        if index + 1 >= self.files.len() {
            return Err(RegistryError::BoundaryViolation {
                path: path.to_path_buf(),
                direction: "down",
            });
        }
        self.files.swap(index, index + 1);
        Ok(())
    }

    /// Make the descriptor at `path` the single active one. Idempotent.
    pub fn set_active(&mut self, path: &Path) -> Result<(), RegistryError> {
        let index = self
            .index_of(path)
            .ok_or_else(|| RegistryError::NotFound(path.to_path_buf()))?;
        for file in &mut self.files {
            file.active = false;
        }
        self.files[index].active = true;
        Ok(())
    }
}

/// Check an upload candidate against the configured extension allow-list
/// and size cap before it enters the registry.
pub fn validate_upload(
    path: &Path,
    size_bytes: u64,
    limits: &LimitSettings,
) -> Result<(), RegistryError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    if !limits.allowed_extensions.iter().any(|a| a == &ext) {
        return Err(RegistryError::UnsupportedExtension(ext));
    }
    if size_bytes > limits.max_file_size_bytes {
        return Err(RegistryError::TooLarge {
            size: size_bytes,
            max: limits.max_file_size_bytes,
        });
    }
    Ok(())
}
