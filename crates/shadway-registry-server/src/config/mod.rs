// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;
use std::time::Duration;

pub const CONFIG_SCHEMA_VERSION: &str = "1";

#[derive(Debug, Clone, Serialize)]
pub struct ApiConfig {
    pub max_body_bytes: usize,
    pub descriptor_shared_max_age: Duration,
    pub descriptor_stale_while_revalidate: Duration,
    pub index_max_age: Duration,
    /// Empty means any origin may read.
    pub cors_allowed_origins: Vec<String>,
    /// Serve reads only; the intake route is not mounted.
    pub read_only: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 512 * 1024,
            descriptor_shared_max_age: Duration::from_secs(365 * 24 * 60 * 60),
            descriptor_stale_while_revalidate: Duration::from_secs(24 * 60 * 60),
            index_max_age: Duration::from_secs(60),
            cors_allowed_origins: Vec::new(),
            read_only: false,
        }
    }
}

impl ApiConfig {
    #[must_use]
    pub fn descriptor_cache_control(&self) -> String {
        format!(
            "public, s-maxage={}, stale-while-revalidate={}",
            self.descriptor_shared_max_age.as_secs(),
            self.descriptor_stale_while_revalidate.as_secs()
        )
    }

    #[must_use]
    pub fn index_cache_control(&self) -> String {
        format!("public, max-age={}", self.index_max_age.as_secs())
    }
}

pub fn validate_startup_config(api: &ApiConfig) -> Result<(), String> {
    if api.max_body_bytes == 0 {
        return Err("max_body_bytes must be > 0".to_string());
    }
    if api.descriptor_shared_max_age.is_zero() {
        return Err("descriptor shared max-age must be > 0".to_string());
    }
    if api
        .cors_allowed_origins
        .iter()
        .any(|o| o.trim().is_empty() || o == "*")
    {
        return Err(
            "cors_allowed_origins entries must be explicit origins; leave empty to allow any"
                .to_string(),
        );
    }
    Ok(())
}
