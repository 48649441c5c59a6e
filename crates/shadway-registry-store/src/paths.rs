// SPDX-License-Identifier: Apache-2.0

use shadway_registry_model::{ComponentName, SOURCE_EXTENSION};
use std::path::{Path, PathBuf};

pub const INDEX_FILE: &str = "registry.json";
pub const DESCRIPTOR_EXTENSION: &str = "json";

#[must_use]
pub fn descriptor_key(name: &ComponentName) -> String {
    format!("{name}.{DESCRIPTOR_EXTENSION}")
}

#[must_use]
pub fn source_key(name: &ComponentName) -> String {
    format!("{name}/{name}.{SOURCE_EXTENSION}")
}

#[must_use]
pub fn descriptor_path(root: &Path, name: &ComponentName) -> PathBuf {
    root.join(descriptor_key(name))
}

#[must_use]
pub fn source_dir(root: &Path, name: &ComponentName) -> PathBuf {
    root.join(name.as_str())
}

#[must_use]
pub fn source_path(root: &Path, name: &ComponentName) -> PathBuf {
    root.join(source_key(name))
}

#[must_use]
pub fn index_path(root: &Path) -> PathBuf {
    root.join(INDEX_FILE)
}

/// True for files the index scan should parse: `*.json` directly under the
/// root, excluding the index itself.
#[must_use]
pub fn is_descriptor_file_name(file_name: &str) -> bool {
    file_name != INDEX_FILE
        && !file_name.starts_with('.')
        && Path::new(file_name)
            .extension()
            .is_some_and(|ext| ext == DESCRIPTOR_EXTENSION)
}
