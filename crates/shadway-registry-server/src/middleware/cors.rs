// SPDX-License-Identifier: Apache-2.0

use crate::AppState;
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderValue, Method, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

/// Descriptors are public artifacts: any origin may read unless an allow-list
/// is configured. Credentials are never allowed.
fn allowed_origin(state: &AppState, origin: Option<&str>) -> Option<HeaderValue> {
    if state.api.cors_allowed_origins.is_empty() {
        return Some(HeaderValue::from_static("*"));
    }
    let origin = origin?;
    state
        .api
        .cors_allowed_origins
        .iter()
        .any(|x| x == origin)
        .then(|| HeaderValue::from_str(origin).ok())
        .flatten()
}

pub(crate) async fn cors_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let origin = req
        .headers()
        .get("origin")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty() && v.len() <= 256)
        .map(ToString::to_string);
    let allow = allowed_origin(&state, origin.as_deref());

    let mut resp = if req.method() == Method::OPTIONS {
        let mut resp = StatusCode::NO_CONTENT.into_response();
        if allow.is_some() {
            resp.headers_mut().insert(
                "access-control-allow-methods",
                HeaderValue::from_static("GET,OPTIONS"),
            );
            resp.headers_mut().insert(
                "access-control-allow-headers",
                HeaderValue::from_static("if-none-match,x-request-id"),
            );
            resp.headers_mut()
                .insert("access-control-max-age", HeaderValue::from_static("86400"));
        }
        resp
    } else {
        next.run(req).await
    };

    if let Some(value) = allow {
        let per_origin = value != "*";
        resp.headers_mut()
            .insert("access-control-allow-origin", value);
        resp.headers_mut().insert(
            "access-control-expose-headers",
            HeaderValue::from_static("etag,x-request-id"),
        );
        if per_origin {
            resp.headers_mut()
                .insert("vary", HeaderValue::from_static("Origin"));
        }
    }
    resp
}
