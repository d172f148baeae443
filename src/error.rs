//! Error types for the gateway
//!
//! Every component converts its failures into [`AppError`] before they cross a
//! component boundary, so the response-mapping stage only ever sees these kinds.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Map, Value};
use thiserror::Error;

// == Field Error ==
/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

// == App Error Enum ==
/// Unified error type for the gateway.
#[derive(Error, Debug)]
pub enum AppError {
    /// Request input rejected before any handler logic ran
    #[error("{message}")]
    ValidationFailed {
        message: String,
        details: Vec<FieldError>,
    },

    /// Entity does not exist
    #[error("{0}")]
    NotFound(String),

    /// Client exhausted its request budget for the current window
    #[error("{message}")]
    RateLimited { message: String, retry_after_ms: u64 },

    /// The JSON-RPC node failed or answered with an error object
    #[error("RPC Error: {0}")]
    ChainUnavailable(String),

    /// Anything else, including storage failures
    #[error("{0}")]
    InternalFailure(String),
}

impl AppError {
    // == Constructors ==
    /// Validation failure carrying field-level details.
    pub fn validation(details: Vec<FieldError>) -> Self {
        AppError::ValidationFailed {
            message: "Validation failed".to_string(),
            details,
        }
    }

    /// Validation failure with a custom message and no field details.
    pub fn invalid(message: impl Into<String>) -> Self {
        AppError::ValidationFailed {
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AppError::InternalFailure(message.into())
    }

    // == Status Code ==
    /// HTTP status rendered for this error kind.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::ChainUnavailable(_) | AppError::InternalFailure(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// `"fail"` for client errors, `"error"` for server errors.
    pub fn status_label(&self) -> &'static str {
        if self.status_code().is_client_error() {
            "fail"
        } else {
            "error"
        }
    }

    fn data(&self) -> Option<Value> {
        match self {
            AppError::ValidationFailed { details, .. } if !details.is_empty() => {
                Some(json!({ "errors": details }))
            }
            AppError::RateLimited { retry_after_ms, .. } => {
                Some(json!({ "retryAfterMs": retry_after_ms }))
            }
            _ => None,
        }
    }

    // == Render ==
    /// Renders the error body and status.
    ///
    /// With `include_detail` set, a `stack` field carries the debug rendering
    /// of the error. Only non-production configurations ask for it.
    pub fn to_response(&self, include_detail: bool) -> Response {
        let status = self.status_code();

        let mut body = Map::new();
        body.insert("status".into(), Value::from(self.status_label()));
        body.insert("message".into(), Value::from(self.to_string()));
        if include_detail {
            body.insert("stack".into(), Value::from(format!("{self:?}")));
        }
        if let Some(data) = self.data() {
            body.insert("data".into(), data);
        }

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "request rejected");
        }

        let mut response = (status, Json(Value::Object(body))).into_response();
        if let AppError::RateLimited { retry_after_ms, .. } = self {
            let secs = retry_after_ms.div_ceil(1000);
            if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }
        response
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_response(false)
    }
}

// == Result Type Alias ==
/// Convenience Result type for the gateway.
pub type Result<T> = std::result::Result<T, AppError>;
