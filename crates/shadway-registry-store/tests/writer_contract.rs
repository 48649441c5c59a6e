// SPDX-License-Identifier: Apache-2.0

use shadway_registry_model::{
    ComponentDescriptor, ComponentName, ComponentSubmission, RegistryIndex, RegistryIndexEntry,
};
use shadway_registry_store::{
    source_path, LocalFsStore, RegistryStore, RegistryWriter, StoreError, StoreErrorCode,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread;
use tempfile::tempdir;

fn name(raw: &str) -> ComponentName {
    ComponentName::parse(raw).expect("component name")
}

/// Delegates to a real store but refuses descriptor writes.
struct DescriptorWriteFails(LocalFsStore);

impl RegistryStore for DescriptorWriteFails {
    fn ensure_root_exists(&self) -> Result<(), StoreError> {
        self.0.ensure_root_exists()
    }
    fn read_descriptor_bytes(&self, name: &ComponentName) -> Result<Vec<u8>, StoreError> {
        self.0.read_descriptor_bytes(name)
    }
    fn read_index_bytes(&self) -> Result<Option<Vec<u8>>, StoreError> {
        self.0.read_index_bytes()
    }
    fn write_source(&self, name: &ComponentName, code: &str) -> Result<(), StoreError> {
        self.0.write_source(name, code)
    }
    fn write_descriptor(
        &self,
        _name: &ComponentName,
        _descriptor: &ComponentDescriptor,
    ) -> Result<(), StoreError> {
        Err(StoreError::new(StoreErrorCode::Io, "disk full"))
    }
    fn write_index(&self, index: &RegistryIndex) -> Result<(), StoreError> {
        self.0.write_index(index)
    }
    fn scan_descriptor_entries(&self) -> Result<Vec<RegistryIndexEntry>, StoreError> {
        self.0.scan_descriptor_entries()
    }
}

#[test]
fn failed_descriptor_write_leaves_orphan_source_that_scans_ignore() {
    let tmp = tempdir().expect("tempdir");
    let root = tmp.path().to_path_buf();
    let writer = RegistryWriter::new(Arc::new(DescriptorWriteFails(LocalFsStore::new(
        root.clone(),
    ))));

    let err = writer
        .publish(&ComponentSubmission::new(name("Ghost"), "orphan"))
        .expect_err("descriptor write fails");
    assert_eq!(err.code, StoreErrorCode::Io);

    assert!(source_path(&root, &name("Ghost")).is_file(), "no rollback of the source");
    let store = LocalFsStore::new(root);
    assert_eq!(
        store.read_descriptor(&name("Ghost")).expect_err("no descriptor").code,
        StoreErrorCode::NotFound
    );
    assert!(store.read_index().expect("index").items.is_empty());
    assert!(store.scan_descriptor_entries().expect("scan").is_empty());
}

#[test]
fn concurrent_publishes_never_lose_index_entries() {
    let tmp = tempdir().expect("tempdir");
    let writer = Arc::new(RegistryWriter::new(Arc::new(LocalFsStore::new(
        tmp.path().to_path_buf(),
    ))));

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let writer = Arc::clone(&writer);
            thread::spawn(move || {
                writer
                    .publish(&ComponentSubmission::new(name(&format!("c{i}")), format!("v{i}")))
                    .expect("publish")
            })
        })
        .collect();
    for h in handles {
        h.join().expect("publisher thread");
    }

    let index = writer.store().read_index().expect("index");
    let names: BTreeSet<_> = index.items.iter().map(|i| i.name.clone()).collect();
    assert_eq!(names.len(), 16);
    assert_eq!(index.items.len(), 16);
}

#[test]
fn concurrent_republish_of_one_name_keeps_a_single_entry() {
    let tmp = tempdir().expect("tempdir");
    let writer = Arc::new(RegistryWriter::new(Arc::new(LocalFsStore::new(
        tmp.path().to_path_buf(),
    ))));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let writer = Arc::clone(&writer);
            thread::spawn(move || {
                writer
                    .publish(&ComponentSubmission::new(name("Shared"), format!("v{i}")))
                    .expect("publish")
            })
        })
        .collect();
    for h in handles {
        h.join().expect("publisher thread");
    }

    let index = writer.store().read_index().expect("index");
    assert_eq!(index.items.len(), 1);
    let content = writer
        .store()
        .read_descriptor(&name("Shared"))
        .expect("descriptor")
        .files[0]
        .content
        .clone();
    assert!(content.starts_with('v'));
}

#[test]
fn names_shadowing_root_files_never_reach_the_store() {
    for raw in ["registry.json", "Registry.JSON", "Alert.json", "registry"] {
        assert!(ComponentName::parse(raw).is_err(), "{raw:?} must be rejected");
    }

    let tmp = tempdir().expect("tempdir");
    let root = tmp.path().to_path_buf();
    let writer = RegistryWriter::new(Arc::new(LocalFsStore::new(root.clone())));
    for raw in ["registry-json", "registry.jsonx", "Alert"] {
        writer
            .publish(&ComponentSubmission::new(name(raw), "export {}"))
            .expect("publish");
    }

    assert!(root.join("registry.json").is_file());
    let index = writer.store().read_index().expect("index stays readable");
    let names: Vec<&str> = index.items.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["registry-json", "registry.jsonx", "Alert"]);
    assert!(root.join("Alert.json").is_file());
    assert!(root.join("Alert").is_dir());
}

#[test]
fn publish_keeps_whitespace_only_code_verbatim() {
    let tmp = tempdir().expect("tempdir");
    let store = Arc::new(LocalFsStore::new(tmp.path().to_path_buf()));
    let writer = RegistryWriter::new(store.clone());
    writer
        .publish(&ComponentSubmission::new(name("Spacer"), "  \n"))
        .expect("publish");
    let descriptor = store.read_descriptor(&name("Spacer")).expect("descriptor");
    assert_eq!(descriptor.files[0].content, "  \n");
}
