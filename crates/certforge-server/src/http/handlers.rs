// SPDX-License-Identifier: Apache-2.0

use crate::AppState;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use certforge_api::{ApiError, ApiErrorCode};
use certforge_store::StoreError;
use serde_json::json;
use std::sync::atomic::Ordering;

pub(crate) fn make_request_id(state: &AppState) -> String {
    let id = state.request_id_seed.fetch_add(1, Ordering::Relaxed);
    format!("req-{id:016x}")
}

/// Caller-supplied `x-request-id` wins; otherwise mint one from the
/// process-local seed.
pub(crate) fn propagated_request_id(headers: &HeaderMap, state: &AppState) -> String {
    if let Some(raw) = headers.get("x-request-id").and_then(|v| v.to_str().ok()) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() && trimmed.len() <= 128 {
            return trimmed.to_string();
        }
    }
    make_request_id(state)
}

pub(crate) fn with_request_id(mut response: Response, request_id: &str) -> Response {
    if let Ok(v) = HeaderValue::from_str(request_id) {
        response.headers_mut().insert("x-request-id", v);
    }
    response
}

pub(crate) fn is_draining(state: &AppState) -> bool {
    !state.accepting_requests.load(Ordering::Relaxed)
}

#[must_use]
pub(crate) fn api_error_response(err: ApiError) -> Response {
    let status =
        StatusCode::from_u16(err.code.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = Json(json!({"error": err}));
    let mut resp = (status, body).into_response();
    if status == StatusCode::SERVICE_UNAVAILABLE {
        resp.headers_mut()
            .insert("retry-after", HeaderValue::from_static("3"));
    }
    resp
}

#[must_use]
pub(crate) fn store_error_response(err: StoreError) -> Response {
    let api_err = match err {
        StoreError::NotFound(what) => ApiError::not_found(what),
        StoreError::Conflict(msg) => ApiError::conflict(msg),
        StoreError::Invalid(msg) => ApiError::validation_failed(msg),
        StoreError::Io(msg) => ApiError::transient_io(msg),
    };
    api_error_response(api_err)
}

#[must_use]
pub(crate) fn draining_response() -> Response {
    api_error_response(ApiError::new(
        ApiErrorCode::TransientIo,
        "server draining; refusing new requests",
        json!({}),
    ))
}

pub(crate) async fn healthz_handler() -> impl IntoResponse {
    Json(json!({"status": "ok", "crate": crate::CRATE_NAME}))
}

pub(crate) async fn readyz_handler(State(state): State<AppState>) -> Response {
    if is_draining(&state) {
        return api_error_response(ApiError::transient_io("server draining"));
    }
    Json(json!({"ready": true})).into_response()
}
