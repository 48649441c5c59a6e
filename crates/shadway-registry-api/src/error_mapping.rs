// SPDX-License-Identifier: Apache-2.0

use crate::{ApiError, ApiErrorCode};
use serde_json::json;
use shadway_registry_store::{StoreError, StoreErrorCode};

#[must_use]
pub fn status_code(code: ApiErrorCode) -> u16 {
    match code {
        ApiErrorCode::InvalidRequest => 400,
        ApiErrorCode::NotFound => 404,
        ApiErrorCode::InternalFailure => 500,
    }
}

/// Store errors become opaque API errors; the caller logs `err` itself.
#[must_use]
pub fn from_store_error(err: &StoreError, name: Option<&str>) -> ApiError {
    match err.code {
        StoreErrorCode::NotFound => ApiError::not_found(name.unwrap_or_default()),
        StoreErrorCode::Validation => {
            ApiError::new(ApiErrorCode::InvalidRequest, "invalid request", json!({}))
        }
        _ => ApiError::internal(),
    }
}
