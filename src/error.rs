// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict
    Conflict(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 502 Bad Gateway (directory or store faults)
    BadGateway(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::Forbidden(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::Conflict(_) => 409,
            ApiError::InternalServerError(_) => 500,
            ApiError::BadGateway(_) => 502,
            ApiError::ServiceUnavailable(_) => 503,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::Conflict(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
            ApiError::BadGateway(msg) => msg,
            ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        json!({
            "error": true,
            "message": self.message(),
            "code": self.error_code()
        })
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::BadGateway(_) => "BAD_GATEWAY",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        ApiError::BadGateway(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

// Convert capability errors to ApiError
impl From<crate::directory::DirectoryError> for ApiError {
    fn from(err: crate::directory::DirectoryError) -> Self {
        match err {
            crate::directory::DirectoryError::NotFound(what) => {
                ApiError::not_found(format!("{} not found", what))
            }
            crate::directory::DirectoryError::AlreadyExists(what) => {
                ApiError::conflict(format!("{} already exists", what))
            }
            crate::directory::DirectoryError::Unavailable(msg) => {
                tracing::error!("Directory unavailable: {}", msg);
                ApiError::service_unavailable("Directory temporarily unavailable")
            }
            crate::directory::DirectoryError::Service(msg) => {
                // Don't expose wire-level directory errors to clients
                tracing::error!("Directory service error: {}", msg);
                ApiError::bad_gateway("Directory request failed")
            }
        }
    }
}

impl From<crate::store::StoreError> for ApiError {
    fn from(err: crate::store::StoreError) -> Self {
        match err {
            crate::store::StoreError::NotFound(key) => {
                ApiError::not_found(format!("Backup object '{}' not found", key))
            }
            crate::store::StoreError::InvalidKey(key) => {
                ApiError::bad_request(format!("Invalid backup key '{}'", key))
            }
            crate::store::StoreError::Io(err) => {
                tracing::error!("Backup store I/O error: {}", err);
                ApiError::internal_server_error("Backup store error occurred")
            }
        }
    }
}

impl From<crate::services::backup::BackupError> for ApiError {
    fn from(err: crate::services::backup::BackupError) -> Self {
        match err {
            crate::services::backup::BackupError::Directory(e) => e.into(),
            crate::services::backup::BackupError::Store(e) => e.into(),
            crate::services::backup::BackupError::Serialize(e) => {
                tracing::error!("Backup serialization error: {}", e);
                ApiError::internal_server_error("Failed to encode backup")
            }
        }
    }
}

impl From<crate::services::restore::RestoreError> for ApiError {
    fn from(err: crate::services::restore::RestoreError) -> Self {
        match err {
            crate::services::restore::RestoreError::MissingFile => {
                ApiError::bad_request("No backup file specified")
            }
            crate::services::restore::RestoreError::Store(e) => e.into(),
            crate::services::restore::RestoreError::Corrupt(msg) => {
                tracing::error!("Backup file corrupt: {}", msg);
                ApiError::bad_request("Backup file is not a valid snapshot")
            }
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}
