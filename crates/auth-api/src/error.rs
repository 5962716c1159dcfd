//! Domain errors as HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;
use validator::ValidationErrors;

use auth_core::DomainError;

use crate::response::ApiResponse;

#[derive(Debug)]
pub struct HttpError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl HttpError {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self { status, code, message: message.into() }
    }

    pub fn validation(errors: ValidationErrors) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", errors.to_string())
    }
}

impl From<DomainError> for HttpError {
    fn from(e: DomainError) -> Self {
        use DomainError::*;

        let unauthorized = StatusCode::UNAUTHORIZED;
        match e {
            InvalidCredentials => Self::new(unauthorized, "INVALID_CREDENTIALS", "Invalid credentials"),
            TokenMissing => Self::new(unauthorized, "TOKEN_MISSING", "Token not found"),
            Malformed => Self::new(unauthorized, "TOKEN_MALFORMED", "Invalid token"),
            InvalidSignature => Self::new(unauthorized, "INVALID_SIGNATURE", "Invalid token"),
            Expired => Self::new(unauthorized, "TOKEN_EXPIRED", "Token expired"),
            SessionExpired => Self::new(unauthorized, "SESSION_EXPIRED", "Session expired"),
            UserNotFound => Self::new(unauthorized, "USER_NOT_FOUND", "User not found"),
            EmailAlreadyExists(_) => Self::new(StatusCode::CONFLICT, "EMAIL_EXISTS", "Email already exists"),
            CollaboratorUnavailable(detail) => {
                error!("Collaborator unavailable: {}", detail);
                Self::new(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SERVICE_UNAVAILABLE",
                    "Service temporarily unavailable",
                )
            }
            TokenGenerationError(detail) | Configuration(detail) => {
                error!("Internal auth failure: {}", detail);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", "Internal server error")
            }
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status, Json(ApiResponse::error(self.code, &self.message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_failures_stay_distinguishable() {
        let codes: Vec<&str> = [
            DomainError::TokenMissing,
            DomainError::Malformed,
            DomainError::InvalidSignature,
            DomainError::Expired,
            DomainError::SessionExpired,
            DomainError::UserNotFound,
        ]
        .into_iter()
        .map(|e| {
            let http = HttpError::from(e);
            assert_eq!(http.status, StatusCode::UNAUTHORIZED);
            http.code
        })
        .collect();

        let mut unique = codes.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), codes.len());
    }

    #[test]
    fn test_internal_detail_not_exposed() {
        let http = HttpError::from(DomainError::Configuration("secret=hunter2".into()));
        assert_eq!(http.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!http.message.contains("hunter2"));

        let http = HttpError::from(DomainError::CollaboratorUnavailable("db down".into()));
        assert_eq!(http.status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
