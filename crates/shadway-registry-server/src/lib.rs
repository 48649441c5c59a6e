// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;
use shadway_registry_store::{LocalFsStore, RegistryStore, RegistryWriter};
use std::path::PathBuf;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;

mod config;
mod http;
mod middleware;

pub use config::{validate_startup_config, ApiConfig, CONFIG_SCHEMA_VERSION};

pub const CRATE_NAME: &str = "shadway-registry-server";
pub const PUBLISH_ROUTE: &str = "/api/registry/components";

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RegistryStore>,
    pub writer: Arc<RegistryWriter>,
    pub api: ApiConfig,
    pub(crate) request_id_seed: Arc<AtomicU64>,
}

impl AppState {
    /// Reads and publishes go through the same store; the writer owns the
    /// publish lock, so one `AppState` per store root.
    #[must_use]
    pub fn new(store: Arc<dyn RegistryStore>, api: ApiConfig) -> Self {
        Self {
            writer: Arc::new(RegistryWriter::new(store.clone())),
            store,
            api,
            request_id_seed: Arc::new(AtomicU64::new(1)),
        }
    }

    #[must_use]
    pub fn for_root(root: PathBuf) -> Self {
        Self::new(Arc::new(LocalFsStore::new(root)), ApiConfig::default())
    }
}

pub fn build_router(state: AppState) -> Router {
    let reads = Router::new()
        .route("/r/registry.json", get(http::handlers::maintained_index_handler))
        .route("/r/:file", get(http::handlers::descriptor_handler))
        .route("/component/:name", get(http::handlers::descriptor_handler))
        .route("/registry.json", get(http::handlers::registry_index_handler))
        .route("/registry-index", get(http::handlers::registry_index_handler))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::cors::cors_middleware,
        ));

    let mut app = Router::new()
        .route("/healthz", get(http::handlers::healthz_handler))
        .merge(reads);
    if !state.api.read_only {
        app = app.route(PUBLISH_ROUTE, post(http::handlers::publish_handler));
    }

    app.layer(DefaultBodyLimit::max(state.api.max_body_bytes))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::request_tracing::request_tracing_middleware,
        ))
        .with_state(state)
}
