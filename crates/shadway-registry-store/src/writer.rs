// SPDX-License-Identifier: Apache-2.0

use crate::backend::{RegistryStore, StoreError};
use shadway_registry_model::{
    ComponentDescriptor, ComponentSubmission, PublishedComponent, RegistryIndexEntry,
};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tracing::info;

/// Publish-time orchestration: source, then descriptor, then index.
///
/// All publishes through one writer are serialized, which makes the index
/// read-modify-write single-writer. Steps are not rolled back: a failure after
/// the source write leaves an orphaned source directory that index scans
/// ignore because it has no descriptor.
pub struct RegistryWriter {
    store: Arc<dyn RegistryStore>,
    publish_lock: Mutex<()>,
}

impl RegistryWriter {
    #[must_use]
    pub fn new(store: Arc<dyn RegistryStore>) -> Self {
        Self {
            store,
            publish_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn RegistryStore> {
        &self.store
    }

    pub fn publish(
        &self,
        submission: &ComponentSubmission,
    ) -> Result<PublishedComponent, StoreError> {
        let started = Instant::now();
        // The lock guards no data, so a panic in another publish leaves nothing to repair.
        let _guard = self
            .publish_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        self.store.ensure_root_exists()?;
        self.store.write_source(&submission.name, &submission.code)?;

        let descriptor = ComponentDescriptor::from_submission(submission);
        self.store.write_descriptor(&submission.name, &descriptor)?;

        let mut index = self.store.read_index()?;
        let added = index.register(RegistryIndexEntry::from_descriptor(&descriptor));
        self.store.write_index(&index)?;

        info!(
            component = %submission.name,
            kind = %descriptor.kind,
            category = %descriptor.category,
            index_entry_added = added,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "component published"
        );
        Ok(PublishedComponent::new(&submission.name, descriptor.category))
    }
}
