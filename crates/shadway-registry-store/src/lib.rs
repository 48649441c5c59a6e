// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod backend;
mod backend_shared_helpers;
mod paths;
mod writer;

pub use backend::{LocalFsStore, RegistryStore, StoreError, StoreErrorCode};
pub use paths::{
    descriptor_key, descriptor_path, index_path, is_descriptor_file_name, source_dir, source_key,
    source_path, DESCRIPTOR_EXTENSION, INDEX_FILE,
};
pub use writer::RegistryWriter;

pub const CRATE_NAME: &str = "shadway-registry-store";
