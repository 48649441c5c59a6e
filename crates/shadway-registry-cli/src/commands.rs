// SPDX-License-Identifier: Apache-2.0

use crate::{emit_ok, CliError, OutputMode};
use shadway_registry_api::{parse_publish_request, PublishRequest, PublishResponse};
use shadway_registry_model::{ComponentName, RegistryIndex};
use shadway_registry_store::{LocalFsStore, RegistryStore, RegistryWriter};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

pub(crate) struct PublishArgs {
    pub root: PathBuf,
    pub name: String,
    pub code_file: PathBuf,
    pub category: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

fn read_code_file(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|e| {
        let message = format!("code file {}: {e}", path.display());
        match e.kind() {
            ErrorKind::NotFound => CliError::not_found(&message),
            ErrorKind::InvalidData => CliError::validation(&message),
            _ => CliError::internal(&message),
        }
    })
}

fn parse_name(raw: &str) -> Result<ComponentName, CliError> {
    ComponentName::parse(raw)
        .map_err(|e| CliError::validation(&format!("invalid component name '{raw}': {}", e.0)))
}

pub(crate) fn run_publish(args: PublishArgs, output_mode: OutputMode) -> Result<(), CliError> {
    let code = read_code_file(&args.code_file)?;
    let submission = parse_publish_request(PublishRequest {
        name: Some(args.name),
        title: args.title,
        description: args.description,
        category: args.category,
        code: Some(code),
    })
    .map_err(|e| CliError::from_api(&e))?;

    let writer = RegistryWriter::new(Arc::new(LocalFsStore::new(args.root.clone())));
    let handle = writer
        .publish(&submission)
        .map_err(|e| CliError::from_store(&e))?;
    info!(root = %args.root.display(), component = %handle.name, "published from cli");
    emit_ok(output_mode, &PublishResponse::from_handle(&handle))
}

pub(crate) fn run_show(root: &Path, name: &str, output_mode: OutputMode) -> Result<(), CliError> {
    let name = parse_name(name)?;
    let store = LocalFsStore::new(root.to_path_buf());
    let descriptor = store
        .read_descriptor(&name)
        .map_err(|e| CliError::from_store(&e))?;
    emit_ok(output_mode, &descriptor)
}

pub(crate) fn run_index(root: &Path, rescan: bool, output_mode: OutputMode) -> Result<(), CliError> {
    let store = LocalFsStore::new(root.to_path_buf());
    let index = if rescan {
        let items = store
            .scan_descriptor_entries()
            .map_err(|e| CliError::from_store(&e))?;
        debug!(items = items.len(), "index rebuilt from descriptors");
        RegistryIndex {
            items,
            ..RegistryIndex::empty()
        }
    } else {
        store.read_index().map_err(|e| CliError::from_store(&e))?
    };
    emit_ok(output_mode, &index)
}
