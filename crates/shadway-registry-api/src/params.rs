// SPDX-License-Identifier: Apache-2.0

use crate::dto::PublishRequest;
use crate::errors::ApiError;
use serde_json::{json, Value};
use shadway_registry_model::{ComponentName, ComponentSubmission};

/// Resolves the `{name}` path segment of a descriptor read. A trailing
/// `.json` is optional; anything that could leave the store root is rejected.
pub fn parse_descriptor_name(raw: &str) -> Result<ComponentName, ApiError> {
    let stem = raw.strip_suffix(".json").unwrap_or(raw);
    ComponentName::parse(stem).map_err(|e| ApiError::invalid_name(raw, &e.0))
}

pub fn parse_publish_body(body: &[u8]) -> Result<ComponentSubmission, ApiError> {
    let request: PublishRequest = serde_json::from_slice(body).map_err(|_| {
        ApiError::invalid_request(
            "request body must be a JSON object",
            json!([{"field": "body", "reason": "malformed json"}]),
        )
    })?;
    parse_publish_request(request)
}

pub fn parse_publish_request(request: PublishRequest) -> Result<ComponentSubmission, ApiError> {
    let mut field_errors: Vec<Value> = Vec::new();
    let name = request.name.filter(|v| !v.trim().is_empty());
    // Code is stored verbatim; only an absent or zero-length value is missing.
    let code = request.code.filter(|v| !v.is_empty());
    if name.is_none() {
        field_errors.push(json!({"field": "name", "reason": "required"}));
    }
    if code.is_none() {
        field_errors.push(json!({"field": "code", "reason": "required"}));
    }
    let (Some(name), Some(code)) = (name, code) else {
        return Err(ApiError::invalid_request(
            "name and code are required",
            Value::Array(field_errors),
        ));
    };

    let name = ComponentName::parse(&name).map_err(|e| ApiError::invalid_name(&name, &e.0))?;
    Ok(ComponentSubmission {
        name,
        title: request.title,
        description: request.description,
        category: request.category,
        code,
    })
}
