// SPDX-License-Identifier: Apache-2.0

use super::handlers::{
    api_error_response, draining_response, is_draining, propagated_request_id, store_error_response,
    with_request_id,
};
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use certforge_api::{draft_from_body, norm_to_dto, ApiError, NormBodyDto};
use certforge_model::{Category, NormId};
use std::collections::HashMap;
use tracing::info;

pub(crate) async fn list_norms_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    axum::extract::Query(params): axum::extract::Query<HashMap<String, String>>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let categories: Vec<Category> = match params.get("category") {
        Some(raw) => match Category::parse(raw) {
            Ok(category) => vec![category],
            Err(e) => {
                return with_request_id(
                    api_error_response(ApiError::validation_failed(e.0)),
                    &request_id,
                )
            }
        },
        None => Category::ALL.to_vec(),
    };
    let mut out = Vec::new();
    for category in categories {
        out.extend(state.norms.list(category).await.iter().map(norm_to_dto));
    }
    with_request_id(Json(out).into_response(), &request_id)
}

pub(crate) async fn create_norm_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<NormBodyDto>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    if is_draining(&state) {
        return with_request_id(draining_response(), &request_id);
    }
    let draft = match draft_from_body(&body) {
        Ok(draft) => draft,
        Err(e) => {
            return with_request_id(
                api_error_response(ApiError::validation_failed(e.0)),
                &request_id,
            )
        }
    };
    match state.norms.create(draft).await {
        Ok(norm) => {
            info!(request_id = %request_id, norm = %norm.id, "norm created");
            with_request_id(
                (StatusCode::CREATED, Json(norm_to_dto(&norm))).into_response(),
                &request_id,
            )
        }
        Err(e) => with_request_id(store_error_response(e), &request_id),
    }
}

pub(crate) async fn update_norm_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<NormBodyDto>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    if is_draining(&state) {
        return with_request_id(draining_response(), &request_id);
    }
    let draft = match draft_from_body(&body) {
        Ok(draft) => draft,
        Err(e) => {
            return with_request_id(
                api_error_response(ApiError::validation_failed(e.0)),
                &request_id,
            )
        }
    };
    match state
        .norms
        .update(NormId(id), draft, body.expected_version)
        .await
    {
        Ok(norm) => {
            info!(request_id = %request_id, norm = %norm.id, version = norm.version, "norm updated");
            with_request_id(Json(norm_to_dto(&norm)).into_response(), &request_id)
        }
        Err(e) => with_request_id(store_error_response(e), &request_id),
    }
}

pub(crate) async fn delete_norm_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    if is_draining(&state) {
        return with_request_id(draining_response(), &request_id);
    }
    match state.norms.delete(NormId(id)).await {
        Ok(()) => {
            info!(request_id = %request_id, norm = id, "norm deleted");
            with_request_id(StatusCode::NO_CONTENT.into_response(), &request_id)
        }
        Err(e) => with_request_id(store_error_response(e), &request_id),
    }
}
