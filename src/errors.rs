use crate::{auth::AuthError, services::ServiceError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// A lightweight wrapper for general errors that keeps the message local.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    /// Create a new AppError with a specific status and message.
    pub fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            message: msg.into(),
        }
    }

    /// Shortcut for 422 Unprocessable Entity
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, msg)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.message,
            "status": self.status.as_u16()
        }));

        (self.status, body).into_response()
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        let status = match &err {
            ServiceError::ValidationFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::DuplicateRecord { .. } => StatusCode::CONFLICT,
            ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
            ServiceError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ServiceError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        AppError::new(status, err.to_string())
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        let status = match &err {
            AuthError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AuthError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        AppError::new(status, err.to_string())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::invalid(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_statuses() {
        let cases = [
            (
                ServiceError::ValidationFailed("bad".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ServiceError::DuplicateRecord { kind: "like" },
                StatusCode::CONFLICT,
            ),
            (
                ServiceError::NotFound {
                    kind: "like",
                    id: "x".into(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                ServiceError::Forbidden {
                    kind: "like",
                    id: "x".into(),
                },
                StatusCode::FORBIDDEN,
            ),
            (
                ServiceError::ServiceUnavailable("down".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).status, status);
        }
    }

    #[test]
    fn auth_errors_map_to_statuses() {
        assert_eq!(
            AppError::from(AuthError::Unauthorized("expired".into())).status,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::from(AuthError::ServiceUnavailable("down".into())).status,
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn not_found_message_names_the_record() {
        let err = AppError::from(ServiceError::NotFound {
            kind: "review",
            id: "abc".into(),
        });
        assert_eq!(err.message, "review `abc` not found");
    }
}
