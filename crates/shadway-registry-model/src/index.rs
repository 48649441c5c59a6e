// SPDX-License-Identifier: Apache-2.0

use crate::component::ComponentType;
use crate::descriptor::ComponentDescriptor;
use serde::{Deserialize, Serialize};

pub const REGISTRY_NAME: &str = "shadway";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryIndexEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ComponentType,
    pub category: String,
}

impl RegistryIndexEntry {
    #[must_use]
    pub fn from_descriptor(descriptor: &ComponentDescriptor) -> Self {
        Self {
            name: descriptor.name.clone(),
            kind: descriptor.kind,
            category: descriptor.category.clone(),
        }
    }
}

/// Aggregate catalog, one entry per distinct name in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryIndex {
    pub name: String,
    #[serde(default)]
    pub items: Vec<RegistryIndexEntry>,
}

impl Default for RegistryIndex {
    fn default() -> Self {
        Self::empty()
    }
}

impl RegistryIndex {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            name: REGISTRY_NAME.to_string(),
            items: Vec::new(),
        }
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.items.iter().any(|item| item.name == name)
    }

    /// Appends `entry` unless its name is already listed. An existing entry
    /// keeps its original type and category. Returns whether it was added.
    pub fn register(&mut self, entry: RegistryIndexEntry) -> bool {
        if self.contains(&entry.name) {
            return false;
        }
        self.items.push(entry);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, kind: ComponentType, category: &str) -> RegistryIndexEntry {
        RegistryIndexEntry {
            name: name.to_string(),
            kind,
            category: category.to_string(),
        }
    }

    #[test]
    fn register_is_append_only_by_name() {
        let mut index = RegistryIndex::empty();
        assert!(index.register(entry("a", ComponentType::Ui, "ui")));
        assert!(index.register(entry("b", ComponentType::Component, "general")));
        assert!(!index.register(entry("a", ComponentType::Component, "forms")));

        let names: Vec<_> = index.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(index.items[0].kind, ComponentType::Ui);
        assert_eq!(index.items[0].category, "ui");
    }
}
