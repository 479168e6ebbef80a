// SPDX-License-Identifier: Apache-2.0

use super::handlers::{
    api_error_response, draining_response, is_draining, propagated_request_id, store_error_response,
    with_request_id,
};
use crate::AppState;
use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use certforge_api::{record_to_dto, summary_to_dto, ApiError, UploadResponseDto};
use certforge_model::{Category, Document, ValidationId};
use certforge_query::{filter_records, StatusFilter, ValidationFilter};
use serde_json::json;
use std::collections::HashMap;
use tracing::{info, warn};

/// Certificate intake. Documents are persisted and a `pending` record
/// is created before the 202 goes out; evaluation happens on the
/// engine's workers afterwards.
pub(crate) async fn upload_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    if is_draining(&state) {
        return with_request_id(draining_response(), &request_id);
    }

    let mut category_raw: Option<String> = None;
    let mut documents: Vec<Document> = Vec::new();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return with_request_id(
                    api_error_response(ApiError::validation_failed(format!(
                        "malformed multipart body: {e}"
                    ))),
                    &request_id,
                )
            }
        };
        let name = field.name().unwrap_or_default().to_string();
        if let Some(file_name) = field.file_name().map(ToString::to_string) {
            let bytes = match field.bytes().await {
                Ok(bytes) => bytes,
                Err(e) => {
                    return with_request_id(
                        api_error_response(ApiError::validation_failed(format!(
                            "failed to read document part: {e}"
                        ))),
                        &request_id,
                    )
                }
            };
            if bytes.is_empty() {
                return with_request_id(
                    api_error_response(ApiError::validation_failed(format!(
                        "empty file part: {file_name}"
                    ))),
                    &request_id,
                );
            }
            documents.push(Document {
                file_name,
                bytes: bytes.to_vec(),
            });
        } else if name == "category" {
            match field.text().await {
                Ok(text) => category_raw = Some(text),
                Err(e) => {
                    return with_request_id(
                        api_error_response(ApiError::validation_failed(format!(
                            "failed to read category field: {e}"
                        ))),
                        &request_id,
                    )
                }
            }
        }
        // Unknown text fields are ignored; browser clients send extras.
    }

    let Some(category_raw) = category_raw else {
        return with_request_id(
            api_error_response(ApiError::validation_failed("category field is required")),
            &request_id,
        );
    };
    let category = match Category::parse(&category_raw) {
        Ok(category) => category,
        Err(e) => {
            return with_request_id(
                api_error_response(ApiError::validation_failed(e.0)),
                &request_id,
            )
        }
    };
    if documents.is_empty() {
        return with_request_id(
            api_error_response(ApiError::validation_failed(
                "at least one certificate document is required",
            )),
            &request_id,
        );
    }
    if documents.len() > state.api.max_documents_per_upload {
        return with_request_id(
            api_error_response(ApiError::new(
                certforge_api::ApiErrorCode::ValidationFailed,
                "too many documents in one upload",
                json!({"max": state.api.max_documents_per_upload, "actual": documents.len()}),
            )),
            &request_id,
        );
    }

    let certificate_name = documents[0].file_name.clone();
    let record = match state
        .validations
        .create_pending(category, &certificate_name)
        .await
    {
        Ok(record) => record,
        Err(e) => return with_request_id(store_error_response(e), &request_id),
    };

    if let Err(e) = state.documents.store(record.id, &documents).await {
        warn!(request_id = %request_id, validation = %record.id, "document persistence failed: {e}");
        discard_intake_record(&state, record.id).await;
        return with_request_id(store_error_response(e), &request_id);
    }
    if let Err(e) = state.engine.enqueue(record.id).await {
        warn!(request_id = %request_id, validation = %record.id, "enqueue failed: {e}");
        discard_intake_record(&state, record.id).await;
        return with_request_id(
            api_error_response(ApiError::transient_io(e.to_string())),
            &request_id,
        );
    }

    info!(
        request_id = %request_id,
        validation = %record.id,
        category = %record.category,
        documents = documents.len(),
        "certificate accepted"
    );
    with_request_id(
        (
            StatusCode::ACCEPTED,
            Json(UploadResponseDto {
                message: format!("certificate {certificate_name} accepted for validation"),
            }),
        )
            .into_response(),
        &request_id,
    )
}

// A failed submission leaves no trace: the caller gets the error and
// retries, without a dangling record polluting the list.
async fn discard_intake_record(state: &AppState, id: ValidationId) {
    if let Err(e) = state.validations.discard(id).await {
        warn!(validation = %id, "failed to discard incomplete intake: {e}");
    }
}

pub(crate) async fn list_validations_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    axum::extract::Query(params): axum::extract::Query<HashMap<String, String>>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let status = match StatusFilter::parse(params.get("status").map_or("", String::as_str)) {
        Ok(status) => status,
        Err(e) => {
            return with_request_id(
                api_error_response(ApiError::validation_failed(e.0)),
                &request_id,
            )
        }
    };
    let filter = ValidationFilter {
        text: params.get("q").cloned(),
        status,
    };
    let records = state.validations.list().await;
    let matched = filter_records(&records, &filter);
    if matched.len() > state.api.max_validations_page {
        warn!(
            request_id = %request_id,
            matched = matched.len(),
            cap = state.api.max_validations_page,
            "validation list truncated to newest records"
        );
    }
    let page: Vec<_> = matched
        .iter()
        .take(state.api.max_validations_page)
        .map(summary_to_dto)
        .collect();
    with_request_id(Json(page).into_response(), &request_id)
}

pub(crate) async fn validation_detail_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    match state.validations.get(ValidationId(id)).await {
        Ok((record, detail)) => with_request_id(
            Json(record_to_dto(&record, detail.as_ref())).into_response(),
            &request_id,
        ),
        Err(e) => with_request_id(store_error_response(e), &request_id),
    }
}
