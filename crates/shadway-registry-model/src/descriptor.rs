// SPDX-License-Identifier: Apache-2.0

use crate::component::{ComponentName, ComponentType};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CATEGORY: &str = "general";
pub const UI_CATEGORY: &str = "ui";
pub const SOURCE_EXTENSION: &str = "tsx";
/// Prefix of `files[].path` as the installer sees it, independent of where
/// the store root lives on disk.
pub const SOURCE_PATH_PREFIX: &str = "registry";

/// Caller input to a publish, after the name has been validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentSubmission {
    pub name: ComponentName,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub code: String,
}

impl ComponentSubmission {
    #[must_use]
    pub fn new(name: ComponentName, code: impl Into<String>) -> Self {
        Self {
            name,
            title: None,
            description: None,
            category: None,
            code: code.into(),
        }
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Empty strings count as absent.
    #[must_use]
    pub fn resolved_category(&self) -> &str {
        non_empty(self.category.as_deref()).unwrap_or(DEFAULT_CATEGORY)
    }

    #[must_use]
    pub fn component_type(&self) -> ComponentType {
        ComponentType::from_category(Some(self.resolved_category()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentFile {
    pub path: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: ComponentType,
}

/// The per-component JSON document fetched by the installer.
///
/// Field order is part of the wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ComponentType,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub files: Vec<ComponentFile>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default, rename = "registryDependencies")]
    pub registry_dependencies: Vec<String>,
}

impl ComponentDescriptor {
    #[must_use]
    pub fn from_submission(submission: &ComponentSubmission) -> Self {
        let name = submission.name.as_str();
        Self {
            name: name.to_string(),
            kind: submission.component_type(),
            title: non_empty(submission.title.as_deref())
                .unwrap_or(name)
                .to_string(),
            description: submission.description.clone().unwrap_or_default(),
            category: submission.resolved_category().to_string(),
            files: vec![ComponentFile {
                path: Self::source_path(&submission.name),
                content: submission.code.clone(),
                kind: ComponentType::Component,
            }],
            dependencies: Vec::new(),
            registry_dependencies: Vec::new(),
        }
    }

    #[must_use]
    pub fn source_path(name: &ComponentName) -> String {
        format!("{SOURCE_PATH_PREFIX}/{name}/{name}.{SOURCE_EXTENSION}")
    }
}

/// Handle returned by a publish; `path` is the public fetch path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedComponent {
    pub name: String,
    pub path: String,
    pub category: String,
}

impl PublishedComponent {
    #[must_use]
    pub fn new(name: &ComponentName, category: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            path: format!("/r/{name}.json"),
            category: category.into(),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
