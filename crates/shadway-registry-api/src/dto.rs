// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use shadway_registry_model::PublishedComponent;

/// Inbound publish body. Every field is optional at the wire level so that
/// missing fields surface as `InvalidRequest` rather than a decoder error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishResponse {
    pub success: bool,
    pub message: String,
    pub endpoint: String,
}

impl PublishResponse {
    #[must_use]
    pub fn from_handle(handle: &PublishedComponent) -> Self {
        Self {
            success: true,
            message: format!(
                "Component '{}' published to the registry in category '{}'. Install it from {}",
                handle.name, handle.category, handle.path
            ),
            endpoint: handle.path.clone(),
        }
    }
}
