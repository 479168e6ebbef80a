#![forbid(unsafe_code)]
//! HTTP surface for the certificate compliance service.
//!
//! Wires the norm registry, validation registry, document store and
//! the evaluation engine behind an axum router. Intake returns before
//! evaluation runs; clients poll `/validations` for the outcome.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use certforge_engine::EngineHandle;
use certforge_store::{DocumentStore, NormStore, ValidationStore};
use std::sync::atomic::{AtomicBool, AtomicU64};
use std::sync::Arc;

mod config;
mod http;

pub use config::{validate_startup_config_contract, ApiConfig, CONFIG_SCHEMA_VERSION};

pub const CRATE_NAME: &str = "certforge-server";

#[derive(Clone)]
pub struct AppState {
    pub norms: Arc<NormStore>,
    pub validations: Arc<ValidationStore>,
    pub documents: Arc<dyn DocumentStore>,
    pub engine: EngineHandle,
    pub api: Arc<ApiConfig>,
    pub accepting_requests: Arc<AtomicBool>,
    pub request_id_seed: Arc<AtomicU64>,
}

impl AppState {
    #[must_use]
    pub fn new(
        norms: Arc<NormStore>,
        validations: Arc<ValidationStore>,
        documents: Arc<dyn DocumentStore>,
        engine: EngineHandle,
        api: ApiConfig,
    ) -> Self {
        Self {
            norms,
            validations,
            documents,
            engine,
            api: Arc::new(api),
            accepting_requests: Arc::new(AtomicBool::new(true)),
            request_id_seed: Arc::new(AtomicU64::new(1)),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let max_body_bytes = state.api.max_body_bytes;
    Router::new()
        .route("/healthz", get(http::handlers::healthz_handler))
        .route("/readyz", get(http::handlers::readyz_handler))
        .route("/upload", post(http::validations::upload_handler))
        .route(
            "/validations",
            get(http::validations::list_validations_handler),
        )
        .route(
            "/validations/:id",
            get(http::validations::validation_detail_handler),
        )
        .route(
            "/norms",
            get(http::norms::list_norms_handler).post(http::norms::create_norm_handler),
        )
        .route(
            "/norms/:id",
            axum::routing::put(http::norms::update_norm_handler)
                .delete(http::norms::delete_norm_handler),
        )
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}
