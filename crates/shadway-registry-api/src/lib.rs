// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod dto;
mod error_mapping;
mod errors;
mod params;

pub use dto::{PublishRequest, PublishResponse};
pub use error_mapping::{from_store_error, status_code};
pub use errors::{ApiError, ApiErrorCode, UNKNOWN_REQUEST_ID};
pub use params::{parse_descriptor_name, parse_publish_body, parse_publish_request};

pub const CRATE_NAME: &str = "shadway-registry-api";
