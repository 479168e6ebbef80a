#![forbid(unsafe_code)]

use certforge_engine::{EngineConfig, InlineTableExtractor, ValidationEngine};
use certforge_server::{build_router, validate_startup_config_contract, ApiConfig, AppState};
use certforge_store::{DirDocumentStore, NormStore, ValidationStore};
use std::env;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
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

fn env_u32(name: &str, default: u32) -> u32 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

fn env_duration_ms(name: &str, default_ms: u64) -> Duration {
    Duration::from_millis(env_u64(name, default_ms))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if env_bool("CERTFORGE_LOG_JSON", true) {
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

#[tokio::main]
async fn main() -> Result<(), String> {
    init_tracing();

    let bind_addr = env::var("CERTFORGE_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let document_root = PathBuf::from(
        env::var("CERTFORGE_DOCUMENT_ROOT").unwrap_or_else(|_| "artifacts/documents".to_string()),
    );

    let api_cfg = ApiConfig {
        max_body_bytes: env_usize("CERTFORGE_MAX_BODY_BYTES", 8 * 1024 * 1024),
        max_documents_per_upload: env_usize("CERTFORGE_MAX_DOCUMENTS_PER_UPLOAD", 8),
        max_validations_page: env_usize("CERTFORGE_MAX_VALIDATIONS_PAGE", 500),
        request_timeout: env_duration_ms("CERTFORGE_REQUEST_TIMEOUT_MS", 10_000),
        shutdown_drain: env_duration_ms("CERTFORGE_SHUTDOWN_DRAIN_MS", 5000),
    };
    let engine_cfg = EngineConfig {
        workers: env_usize("CERTFORGE_ENGINE_WORKERS", 2),
        queue_depth: env_usize("CERTFORGE_ENGINE_QUEUE_DEPTH", 256),
        max_attempts: env_u32("CERTFORGE_ENGINE_MAX_ATTEMPTS", 3),
        retry_backoff: env_duration_ms("CERTFORGE_ENGINE_RETRY_BACKOFF_MS", 200),
        evaluation_deadline: env_duration_ms("CERTFORGE_ENGINE_DEADLINE_MS", 30_000),
    };
    validate_startup_config_contract(&api_cfg, &engine_cfg)?;

    let norms = Arc::new(NormStore::new());
    let validations = Arc::new(ValidationStore::new());
    let documents = Arc::new(DirDocumentStore::new(document_root));
    let engine = ValidationEngine::new(
        Arc::clone(&norms),
        Arc::clone(&validations),
        documents.clone(),
        Arc::new(InlineTableExtractor::default()),
        engine_cfg,
    );
    let handle = engine.spawn();

    let state = AppState::new(norms, validations, documents, handle, api_cfg);
    let app = build_router(state.clone());

    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| format!("bind {bind_addr} failed: {e}"))?;
    info!("certforge-server listening on {bind_addr}");

    let accepting = state.accepting_requests.clone();
    let drain = state.api.shutdown_drain;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            wait_for_shutdown_signal().await;
            // Refuse new uploads first, then drain in-flight requests
            // and already queued evaluations.
            accepting.store(false, Ordering::Relaxed);
            tokio::time::sleep(drain).await;
        })
        .await
        .map_err(|e| format!("server failed: {e}"))
}
