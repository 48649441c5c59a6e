// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! Registry model SSOT: the descriptor and index documents consumed by the
//! component installer, plus the validated name every store path derives from.

mod component;
mod descriptor;
mod index;

pub use component::{
    ComponentName, ComponentType, ValidationError, COMPONENT_NAME_MAX_LEN, RESERVED_NAMES,
};
pub use descriptor::{
    ComponentDescriptor, ComponentFile, ComponentSubmission, PublishedComponent,
    DEFAULT_CATEGORY, SOURCE_EXTENSION, SOURCE_PATH_PREFIX, UI_CATEGORY,
};
pub use index::{RegistryIndex, RegistryIndexEntry, REGISTRY_NAME};

pub const CRATE_NAME: &str = "shadway-registry-model";
