// SPDX-License-Identifier: Apache-2.0

use crate::http::request_tracing::RequestId;
use crate::http::response_contract::{api_error_response, json_bytes_response, put_header};
use crate::AppState;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use sha2::{Digest, Sha256};
use shadway_registry_api::{
    from_store_error, parse_descriptor_name, parse_publish_body, ApiError, PublishResponse,
};
use shadway_registry_model::RegistryIndex;
use shadway_registry_store::StoreError;
use tracing::{error, info, warn};

fn strong_etag(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("\"{:x}\"", hasher.finalize())
}

fn if_none_match_hits(headers: &HeaderMap, etag: &str) -> bool {
    headers
        .get("if-none-match")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|raw| {
            raw.split(',')
                .map(str::trim)
                .any(|candidate| candidate == etag || candidate == "*")
        })
}

/// Runs store work on the blocking pool. A panicked or cancelled task is an
/// internal failure like any store error.
async fn run_blocking<T, F>(f: F) -> Result<T, StoreError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, StoreError> + Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        StoreError::new(
            shadway_registry_store::StoreErrorCode::Internal,
            format!("blocking task failed: {e}"),
        )
    })?
}

fn store_failure(err: &StoreError, name: Option<&str>, request_id: &RequestId) -> Response {
    if err.is_not_found() {
        info!(name = name.unwrap_or_default(), "descriptor not found");
    } else {
        error!(error = %err, name = name.unwrap_or_default(), "registry store failure");
    }
    api_error_response(from_store_error(err, name).with_request_id(request_id.0.clone()))
}

fn rejected(err: ApiError, request_id: &RequestId) -> Response {
    warn!(code = err.code.as_str(), message = %err.message, "request rejected");
    api_error_response(err.with_request_id(request_id.0.clone()))
}

pub(crate) async fn healthz_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// `GET /r/{name}.json` and `GET /component/{name}`.
pub(crate) async fn descriptor_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(raw_name): Path<String>,
    headers: HeaderMap,
) -> Response {
    let name = match parse_descriptor_name(&raw_name) {
        Ok(name) => name,
        Err(err) => return rejected(err, &request_id),
    };

    let store = state.store.clone();
    let lookup = name.clone();
    let bytes = match run_blocking(move || store.read_descriptor_bytes(&lookup)).await {
        Ok(bytes) => bytes,
        Err(err) => return store_failure(&err, Some(name.as_str()), &request_id),
    };

    let etag = strong_etag(&bytes);
    let cache_control = state.api.descriptor_cache_control();
    let mut response = if if_none_match_hits(&headers, &etag) {
        StatusCode::NOT_MODIFIED.into_response()
    } else {
        json_bytes_response(bytes)
    };
    put_header(&mut response, "cache-control", &cache_control);
    put_header(&mut response, "etag", &etag);
    response
}

/// `GET /r/registry.json`: the index file as maintained by publishes.
pub(crate) async fn maintained_index_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> Response {
    let store = state.store.clone();
    let bytes = match run_blocking(move || store.read_index_bytes()).await {
        Ok(Some(bytes)) => bytes,
        Ok(None) => match serde_json::to_vec(&RegistryIndex::empty()) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(error = %e, "empty index serialization failed");
                return api_error_response(
                    ApiError::internal().with_request_id(request_id.0.clone()),
                );
            }
        },
        Err(err) => return store_failure(&err, None, &request_id),
    };
    let mut response = json_bytes_response(bytes);
    put_header(&mut response, "cache-control", &state.api.index_cache_control());
    response
}

/// `GET /registry.json` and `GET /registry-index`: index recomputed from the
/// descriptor files on disk.
pub(crate) async fn registry_index_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> Response {
    let store = state.store.clone();
    match run_blocking(move || store.scan_descriptor_entries()).await {
        Ok(items) => {
            let mut response = Json(RegistryIndex {
                items,
                ..RegistryIndex::empty()
            })
            .into_response();
            put_header(&mut response, "cache-control", &state.api.index_cache_control());
            response
        }
        Err(err) => store_failure(&err, None, &request_id),
    }
}

/// `POST /api/registry/components`.
pub(crate) async fn publish_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    body: Bytes,
) -> Response {
    let submission = match parse_publish_body(&body) {
        Ok(submission) => submission,
        Err(err) => return rejected(err, &request_id),
    };

    let writer = state.writer.clone();
    let name = submission.name.to_string();
    match run_blocking(move || writer.publish(&submission)).await {
        Ok(handle) => Json(PublishResponse::from_handle(&handle)).into_response(),
        Err(err) => {
            error!(error = %err, name = %name, "publish failed");
            api_error_response(ApiError::internal().with_request_id(request_id.0.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn etag_is_quoted_sha256() {
        let etag = strong_etag(b"{}");
        assert_eq!(etag.len(), 66);
        assert!(etag.starts_with('"') && etag.ends_with('"'));
    }

    #[test]
    fn if_none_match_accepts_lists_and_wildcard() {
        let etag = strong_etag(b"x");
        let mut headers = HeaderMap::new();
        assert!(!if_none_match_hits(&headers, &etag));

        let list = format!("\"other\", {etag}");
        headers.insert("if-none-match", HeaderValue::from_str(&list).expect("header"));
        assert!(if_none_match_hits(&headers, &etag));

        headers.insert("if-none-match", HeaderValue::from_static("*"));
        assert!(if_none_match_hits(&headers, &etag));

        headers.insert("if-none-match", HeaderValue::from_static("\"stale\""));
        assert!(!if_none_match_hits(&headers, &etag));
    }
}
