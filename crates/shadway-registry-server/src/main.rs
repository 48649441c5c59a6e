// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

use shadway_registry_server::{
    build_router, validate_startup_config, ApiConfig, AppState, CONFIG_SCHEMA_VERSION,
    PUBLISH_ROUTE,
};
use shadway_registry_store::{LocalFsStore, RegistryStore};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

fn env_list(name: &str) -> Vec<String> {
    env::var(name)
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).expect("register SIGTERM");
        let mut sigint = signal(SignalKind::interrupt()).expect("register SIGINT");
        tokio::select! {
            _ = sigterm.recv() => {}
            _ = sigint.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if env_bool("SHADWAY_LOG_JSON", true) {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    init_tracing();

    let bind_addr = env::var("SHADWAY_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let registry_root = PathBuf::from(
        env::var("SHADWAY_REGISTRY_ROOT").unwrap_or_else(|_| "public/r".to_string()),
    );

    let defaults = ApiConfig::default();
    let api = ApiConfig {
        max_body_bytes: env_usize("SHADWAY_MAX_BODY_BYTES", defaults.max_body_bytes),
        descriptor_shared_max_age: Duration::from_secs(env_u64(
            "SHADWAY_DESCRIPTOR_SMAXAGE_SECS",
            defaults.descriptor_shared_max_age.as_secs(),
        )),
        descriptor_stale_while_revalidate: Duration::from_secs(env_u64(
            "SHADWAY_DESCRIPTOR_SWR_SECS",
            defaults.descriptor_stale_while_revalidate.as_secs(),
        )),
        index_max_age: Duration::from_secs(env_u64(
            "SHADWAY_INDEX_MAX_AGE_SECS",
            defaults.index_max_age.as_secs(),
        )),
        cors_allowed_origins: env_list("SHADWAY_CORS_ALLOWED_ORIGINS"),
        read_only: env_bool("SHADWAY_READ_ONLY", false),
    };
    validate_startup_config(&api).map_err(|e| format!("invalid configuration: {e}"))?;

    let store = Arc::new(LocalFsStore::new(registry_root.clone()));
    if !api.read_only {
        store
            .ensure_root_exists()
            .map_err(|e| format!("registry root unavailable: {e}"))?;
    }
    let read_only = api.read_only;
    let app = build_router(AppState::new(store, api));

    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| format!("bind {bind_addr} failed: {e}"))?;
    info!(
        bind = %bind_addr,
        registry_root = %registry_root.display(),
        read_only,
        publish_route = PUBLISH_ROUTE,
        config_schema_version = CONFIG_SCHEMA_VERSION,
        "shadway-registry-server listening"
    );

    let drain_ms = env_u64("SHADWAY_SHUTDOWN_DRAIN_MS", 2000);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            wait_for_shutdown_signal().await;
            info!(drain_ms, "shutdown signal received, draining");
            tokio::time::sleep(Duration::from_millis(drain_ms)).await;
        })
        .await
        .map_err(|e| format!("server failed: {e}"))
}
