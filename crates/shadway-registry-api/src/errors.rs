// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt::{Display, Formatter};

pub const UNKNOWN_REQUEST_ID: &str = "req-unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ApiErrorCode {
    InvalidRequest,
    NotFound,
    InternalFailure,
}

impl ApiErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidRequest => "InvalidRequest",
            Self::NotFound => "NotFound",
            Self::InternalFailure => "InternalFailure",
        }
    }
}

/// Error body returned to callers. Messages are opaque; store and file-system
/// detail never appears here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
    pub details: Value,
    pub request_id: String,
}

impl ApiError {
    #[must_use]
    pub fn new(code: ApiErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            request_id: UNKNOWN_REQUEST_ID.to_string(),
        }
    }

    #[must_use]
    pub fn invalid_request(message: impl Into<String>, field_errors: Value) -> Self {
        Self::new(
            ApiErrorCode::InvalidRequest,
            message,
            json!({"field_errors": field_errors}),
        )
    }

    #[must_use]
    pub fn invalid_name(value: &str, reason: &str) -> Self {
        Self::invalid_request(
            "invalid component name",
            json!([{"field": "name", "reason": reason, "value": value}]),
        )
    }

    #[must_use]
    pub fn not_found(name: &str) -> Self {
        Self::new(
            ApiErrorCode::NotFound,
            "component not found",
            json!({"name": name}),
        )
    }

    #[must_use]
    pub fn internal() -> Self {
        Self::new(
            ApiErrorCode::InternalFailure,
            "internal failure",
            json!({}),
        )
    }

    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for ApiError {}
