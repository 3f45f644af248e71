/// Error types for litaria-server
///
/// Every handler-level failure is mapped to a structured JSON body with a
/// stable `error` kind string, a human-readable `message`, and an HTTP
/// status code. Store-level detail is logged but never leaked to clients
/// outside development.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

/// Result type for litaria-server operations
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or missing input
    #[error("Validation failed: {0}")]
    Validation(String),

    /// No or invalid credentials/session
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but not the resource owner
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// No such post/category/subcategory/user
    #[error("Not found: {0}")]
    NotFound(String),

    /// Uniqueness violation or delete blocked by existing references
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// Anything else
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable kind string for the JSON error body.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::Unauthorized(_) => "authentication_error",
            AppError::Forbidden(_) => "authorization_error",
            AppError::NotFound(_) => "not_found",
            AppError::Conflict(_) => "conflict",
            AppError::Database(_) => "database_error",
            AppError::Internal(_) => "internal_error",
        }
    }

    fn client_message(&self) -> String {
        match self {
            // Store-level detail stays in the logs unless we are in development.
            AppError::Database(msg) | AppError::Internal(msg) => {
                if development_mode() {
                    msg.clone()
                } else {
                    "Internal server error".to_string()
                }
            }
            AppError::Validation(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg) => msg.clone(),
        }
    }
}

fn development_mode() -> bool {
    std::env::var("APP_ENV")
        .map(|env| env.eq_ignore_ascii_case("development"))
        .unwrap_or(true)
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(kind = self.kind(), "request failed: {}", self);
        }

        HttpResponse::build(status).json(serde_json::json!({
            "error": self.kind(),
            "message": self.client_message(),
            "status": status.as_u16(),
        }))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        // Constraint violations are client-visible conflicts, not server
        // faults: uniqueness races that slip past the application-level
        // duplicate checks are stopped by the indexes and must surface
        // as 409.
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                tracing::warn!("Unique constraint violation: {}", db_err);
                return AppError::Conflict("A conflicting record already exists".to_string());
            }
            if db_err.is_foreign_key_violation() {
                tracing::warn!("Foreign key violation: {}", db_err);
                return AppError::Conflict(
                    "The record is still referenced by other data".to_string(),
                );
            }
        }
        tracing::error!("Database error: {}", err);
        AppError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        AppError::Unauthorized(format!("Invalid token: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(
            AppError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Unauthorized("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Forbidden("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Database("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn kind_strings_are_stable() {
        assert_eq!(AppError::Validation("x".into()).kind(), "validation_error");
        assert_eq!(AppError::Conflict("x".into()).kind(), "conflict");
        assert_eq!(AppError::NotFound("x".into()).kind(), "not_found");
    }

    #[derive(Debug)]
    struct FakeDbError {
        unique: bool,
    }

    impl std::fmt::Display for FakeDbError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("duplicate key value violates unique constraint")
        }
    }

    impl std::error::Error for FakeDbError {}

    impl sqlx::error::DatabaseError for FakeDbError {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            if self.unique {
                sqlx::error::ErrorKind::UniqueViolation
            } else {
                sqlx::error::ErrorKind::Other
            }
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }
    }

    #[test]
    fn unique_violations_map_to_conflict() {
        let err = sqlx::Error::Database(Box::new(FakeDbError { unique: true }));
        let app_err = AppError::from(err);
        assert!(matches!(app_err, AppError::Conflict(_)));
        assert_eq!(app_err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn other_database_errors_stay_internal() {
        let err = sqlx::Error::Database(Box::new(FakeDbError { unique: false }));
        assert!(matches!(AppError::from(err), AppError::Database(_)));
    }
}
