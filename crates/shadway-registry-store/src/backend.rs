// SPDX-License-Identifier: Apache-2.0

use crate::backend_shared_helpers::write_atomic;
use crate::paths::{
    descriptor_path, index_path, is_descriptor_file_name, source_dir, source_path,
};
use shadway_registry_model::{
    ComponentDescriptor, ComponentName, ComponentType, RegistryIndex, RegistryIndexEntry,
};
use std::fmt::{Display, Formatter};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreErrorCode {
    NotFound,
    Validation,
    Io,
    Parse,
    Internal,
}

impl StoreErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Validation => "validation_error",
            Self::Io => "io_error",
            Self::Parse => "parse_error",
            Self::Internal => "internal_error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    pub code: StoreErrorCode,
    pub message: String,
}

impl StoreError {
    #[must_use]
    pub fn new(code: StoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn io(path: &Path, err: &std::io::Error) -> Self {
        let code = if err.kind() == ErrorKind::NotFound {
            StoreErrorCode::NotFound
        } else {
            StoreErrorCode::Io
        };
        Self::new(code, format!("{}: {err}", path.display()))
    }

    #[must_use]
    pub fn parse(path: &Path, err: &serde_json::Error) -> Self {
        Self::new(
            StoreErrorCode::Parse,
            format!("corrupt json in {}: {err}", path.display()),
        )
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.code == StoreErrorCode::NotFound
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for StoreError {}

/// Persistence for descriptors, component sources and the index.
pub trait RegistryStore: Send + Sync {
    fn ensure_root_exists(&self) -> Result<(), StoreError>;
    fn read_descriptor_bytes(&self, name: &ComponentName) -> Result<Vec<u8>, StoreError>;
    fn read_index_bytes(&self) -> Result<Option<Vec<u8>>, StoreError>;
    fn write_source(&self, name: &ComponentName, code: &str) -> Result<(), StoreError>;
    fn write_descriptor(
        &self,
        name: &ComponentName,
        descriptor: &ComponentDescriptor,
    ) -> Result<(), StoreError>;
    fn write_index(&self, index: &RegistryIndex) -> Result<(), StoreError>;
    /// Rebuilds index entries from the descriptor files themselves. Only
    /// `registry:component` descriptors are listed.
    fn scan_descriptor_entries(&self) -> Result<Vec<RegistryIndexEntry>, StoreError>;

    fn read_descriptor(&self, name: &ComponentName) -> Result<ComponentDescriptor, StoreError> {
        let raw = self.read_descriptor_bytes(name)?;
        serde_json::from_slice(&raw).map_err(|e| {
            StoreError::new(
                StoreErrorCode::Parse,
                format!("corrupt descriptor for {name}: {e}"),
            )
        })
    }

    /// Missing index file reads as the empty index.
    fn read_index(&self) -> Result<RegistryIndex, StoreError> {
        match self.read_index_bytes()? {
            None => Ok(RegistryIndex::empty()),
            Some(raw) => serde_json::from_slice(&raw).map_err(|e| {
                StoreError::new(StoreErrorCode::Parse, format!("corrupt registry index: {e}"))
            }),
        }
    }
}

pub struct LocalFsStore {
    pub root: PathBuf,
}

impl LocalFsStore {
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl RegistryStore for LocalFsStore {
    fn ensure_root_exists(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root).map_err(|e| {
            StoreError::new(
                StoreErrorCode::Io,
                format!("{}: {e}", self.root.display()),
            )
        })
    }

    fn read_descriptor_bytes(&self, name: &ComponentName) -> Result<Vec<u8>, StoreError> {
        let path = descriptor_path(&self.root, name);
        fs::read(&path).map_err(|e| StoreError::io(&path, &e))
    }

    fn read_index_bytes(&self) -> Result<Option<Vec<u8>>, StoreError> {
        let path = index_path(&self.root);
        match fs::read(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(&path, &e)),
        }
    }

    fn write_source(&self, name: &ComponentName, code: &str) -> Result<(), StoreError> {
        let dir = source_dir(&self.root, name);
        fs::create_dir_all(&dir).map_err(|e| {
            StoreError::new(StoreErrorCode::Io, format!("{}: {e}", dir.display()))
        })?;
        write_atomic(&source_path(&self.root, name), code.as_bytes())
    }

    fn write_descriptor(
        &self,
        name: &ComponentName,
        descriptor: &ComponentDescriptor,
    ) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(descriptor)
            .map_err(|e| StoreError::new(StoreErrorCode::Internal, e.to_string()))?;
        write_atomic(&descriptor_path(&self.root, name), &bytes)
    }

    fn write_index(&self, index: &RegistryIndex) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(index)
            .map_err(|e| StoreError::new(StoreErrorCode::Internal, e.to_string()))?;
        write_atomic(&index_path(&self.root), &bytes)
    }

    fn scan_descriptor_entries(&self) -> Result<Vec<RegistryIndexEntry>, StoreError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&self.root, &e)),
        };

        let mut out = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(&self.root, &e))?;
            let path = entry.path();
            let file_type = entry.file_type().map_err(|e| StoreError::io(&path, &e))?;
            if !file_type.is_file() {
                continue;
            }
            let Some(file_name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if !is_descriptor_file_name(&file_name) {
                continue;
            }
            let raw = fs::read(&path).map_err(|e| StoreError::io(&path, &e))?;
            let value: serde_json::Value =
                serde_json::from_slice(&raw).map_err(|e| StoreError::parse(&path, &e))?;
            let Some(name) = value.get("name").and_then(serde_json::Value::as_str) else {
                debug!(file = %file_name, "descriptor without name skipped");
                continue;
            };
            if value.get("type").and_then(serde_json::Value::as_str)
                != Some(ComponentType::Component.as_str())
            {
                continue;
            }
            out.push(RegistryIndexEntry {
                name: name.to_string(),
                kind: ComponentType::Component,
                category: value
                    .get("category")
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            });
        }
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_not_found_maps_to_not_found_code() {
        let err = std::io::Error::new(ErrorKind::NotFound, "gone");
        assert!(StoreError::io(Path::new("x.json"), &err).is_not_found());
        let err = std::io::Error::new(ErrorKind::PermissionDenied, "nope");
        assert_eq!(
            StoreError::io(Path::new("x.json"), &err).code,
            StoreErrorCode::Io
        );
    }

    #[test]
    fn display_prefixes_stable_code() {
        let err = StoreError::new(StoreErrorCode::Parse, "bad");
        assert_eq!(err.to_string(), "parse_error: bad");
    }
}
