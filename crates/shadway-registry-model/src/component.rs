// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ValidationError {}

pub const COMPONENT_NAME_MAX_LEN: usize = 128;

/// Names that would collide with files the store owns at its root.
pub const RESERVED_NAMES: [&str; 1] = ["registry"];

/// A name ending in the descriptor suffix would collide with another
/// component's descriptor or with the index file.
const DESCRIPTOR_SUFFIX: &str = ".json";

/// A component name that is safe to use as a directory and file key.
///
/// Parsing is the only path from caller input to the file system, so the
/// checks here are what keeps every derived path inside the store root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct ComponentName(String);

impl ComponentName {
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError("component name must not be empty".to_string()));
        }
        if s.len() > COMPONENT_NAME_MAX_LEN {
            return Err(ValidationError(format!(
                "component name exceeds max length {COMPONENT_NAME_MAX_LEN}"
            )));
        }
        if s.contains('/') || s.contains('\\') || s.contains("..") {
            return Err(ValidationError(
                "component name must not contain path separators or '..'".to_string(),
            ));
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        {
            return Err(ValidationError(
                "component name must match [A-Za-z0-9._-]+".to_string(),
            ));
        }
        if s.starts_with('.') {
            return Err(ValidationError(
                "component name must not start with '.'".to_string(),
            ));
        }
        if s.len() >= DESCRIPTOR_SUFFIX.len()
            && s[s.len() - DESCRIPTOR_SUFFIX.len()..].eq_ignore_ascii_case(DESCRIPTOR_SUFFIX)
        {
            return Err(ValidationError(format!(
                "component name must not end with '{DESCRIPTOR_SUFFIX}'"
            )));
        }
        if RESERVED_NAMES.iter().any(|r| r.eq_ignore_ascii_case(s)) {
            return Err(ValidationError(format!("component name '{s}' is reserved")));
        }
        Ok(Self(s.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for ComponentName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ComponentName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ComponentName> for String {
    fn from(value: ComponentName) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentType {
    #[serde(rename = "registry:ui")]
    Ui,
    #[serde(rename = "registry:component")]
    Component,
}

impl ComponentType {
    /// `"ui"` is the only category that marks a primitive; everything else,
    /// including no category at all, is a composed component.
    #[must_use]
    pub fn from_category(category: Option<&str>) -> Self {
        match category {
            Some(crate::UI_CATEGORY) => Self::Ui,
            _ => Self::Component,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ui => "registry:ui",
            Self::Component => "registry:component",
        }
    }
}

impl Display for ComponentType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_url_safe_names() {
        for ok in ["Alert", "hero-section", "card_v2", "button.primary", "a"] {
            assert_eq!(ComponentName::parse(ok).expect(ok).as_str(), ok);
        }
    }

    #[test]
    fn rejects_traversal_and_separators() {
        for bad in [
            "", "  ", "../etc", "a/b", "a\\b", "..", "a..b", ".hidden", "a b", "é", " Alert",
            "Alert\n",
        ] {
            assert!(ComponentName::parse(bad).is_err(), "{bad:?} must be rejected");
        }
    }

    #[test]
    fn rejects_reserved_index_name() {
        assert!(ComponentName::parse("registry").is_err());
        assert!(ComponentName::parse("Registry").is_err());
        assert!(ComponentName::parse("registry-button").is_ok());
        for bad in ["registry.json", "REGISTRY.JSON", "Registry.Json", "card.json"] {
            assert!(ComponentName::parse(bad).is_err(), "{bad:?} must be rejected");
        }
        assert!(ComponentName::parse("card.jsonx").is_ok());
        assert!(ComponentName::parse("json").is_ok());
    }

    #[test]
    fn surrounding_whitespace_is_rejected_not_trimmed() {
        for bad in [" Alert ", "Alert ", "\tAlert"] {
            assert!(ComponentName::parse(bad).is_err(), "{bad:?} must be rejected");
        }
    }

    #[test]
    fn rejects_overlong_names() {
        let long = "a".repeat(COMPONENT_NAME_MAX_LEN + 1);
        assert!(ComponentName::parse(&long).is_err());
        assert!(ComponentName::parse(&long[1..]).is_ok());
    }

    #[test]
    fn type_is_derived_from_category() {
        assert_eq!(ComponentType::from_category(Some("ui")), ComponentType::Ui);
        assert_eq!(
            ComponentType::from_category(Some("marketing")),
            ComponentType::Component
        );
        assert_eq!(ComponentType::from_category(Some("UI")), ComponentType::Component);
        assert_eq!(ComponentType::from_category(None), ComponentType::Component);
    }
}
