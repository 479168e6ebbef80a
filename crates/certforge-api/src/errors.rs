// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Machine-readable error kinds. The client shows one generic failure
/// message per action; programmatic callers branch on the code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorCode {
    ValidationFailed,
    NotFound,
    Conflict,
    TransientIo,
    Internal,
}

impl ApiErrorCode {
    /// HTTP status the server maps this code to.
    #[must_use]
    pub fn http_status(self) -> u16 {
        match self {
            ApiErrorCode::ValidationFailed => 400,
            ApiErrorCode::NotFound => 404,
            ApiErrorCode::Conflict => 409,
            ApiErrorCode::TransientIo => 503,
            ApiErrorCode::Internal => 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
    pub details: Value,
}

impl ApiError {
    #[must_use]
    pub fn new(code: ApiErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
        }
    }

    #[must_use]
    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::ValidationFailed, message, json!({}))
    }

    #[must_use]
    pub fn not_found(what: impl Into<String>) -> Self {
        let what = what.into();
        Self::new(
            ApiErrorCode::NotFound,
            format!("{what} not found"),
            json!({"what": what}),
        )
    }

    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::Conflict, message, json!({}))
    }

    #[must_use]
    pub fn transient_io(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::TransientIo, message, json!({}))
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::Internal, message, json!({}))
    }
}

const _: fn() = || {
    fn assert_traits<T: Serialize + for<'de> Deserialize<'de>>() {}
    assert_traits::<ApiErrorCode>();
    assert_traits::<ApiError>();
};
