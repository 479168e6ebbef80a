use serde::Serialize;
use std::time::Duration;

pub const CONFIG_SCHEMA_VERSION: &str = "1";

#[derive(Debug, Clone, Serialize)]
pub struct ApiConfig {
    pub max_body_bytes: usize,
    /// Upper bound on document parts in one upload request.
    pub max_documents_per_upload: usize,
    /// Cap on `/validations` responses; only the newest records up to
    /// this count are returned, and truncation is logged.
    pub max_validations_page: usize,
    pub request_timeout: Duration,
    pub shutdown_drain: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 8 * 1024 * 1024,
            max_documents_per_upload: 8,
            max_validations_page: 500,
            request_timeout: Duration::from_secs(10),
            shutdown_drain: Duration::from_secs(5),
        }
    }
}

pub fn validate_startup_config_contract(
    api: &ApiConfig,
    engine: &certforge_engine::EngineConfig,
) -> Result<(), String> {
    if api.max_body_bytes == 0 {
        return Err("max_body_bytes must be > 0".to_string());
    }
    if api.max_documents_per_upload == 0 {
        return Err("max_documents_per_upload must be > 0".to_string());
    }
    if api.request_timeout.is_zero() {
        return Err("request_timeout must be > 0".to_string());
    }
    if engine.workers == 0 || engine.queue_depth == 0 {
        return Err("engine worker pool requires workers and queue_depth > 0".to_string());
    }
    if engine.max_attempts == 0 {
        return Err("engine max_attempts must be > 0".to_string());
    }
    if engine.evaluation_deadline.is_zero() {
        return Err("engine evaluation_deadline must be > 0".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startup_config_validation_accepts_defaults() {
        let api = ApiConfig::default();
        let engine = certforge_engine::EngineConfig::default();
        assert!(validate_startup_config_contract(&api, &engine).is_ok());
    }

    #[test]
    fn startup_config_validation_rejects_zero_limits() {
        let api = ApiConfig {
            max_body_bytes: 0,
            ..ApiConfig::default()
        };
        let engine = certforge_engine::EngineConfig::default();
        let err = validate_startup_config_contract(&api, &engine).expect_err("zero body limit");
        assert!(err.contains("max_body_bytes"));

        let api = ApiConfig::default();
        let engine = certforge_engine::EngineConfig {
            workers: 0,
            ..certforge_engine::EngineConfig::default()
        };
        let err = validate_startup_config_contract(&api, &engine).expect_err("zero workers");
        assert!(err.contains("worker pool"));
    }
}
