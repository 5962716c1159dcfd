//! Domain errors

use thiserror::Error;

use auth_security::TokenError;

/// One variant per failure cause so the boundary can tell them apart,
/// even when it answers all of them with the same status.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token missing")]
    TokenMissing,

    #[error("Token is malformed")]
    Malformed,

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token expired")]
    Expired,

    #[error("Session expired")]
    SessionExpired,

    #[error("User not found")]
    UserNotFound,

    #[error("Collaborator unavailable: {0}")]
    CollaboratorUnavailable(String),

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("Token generation error: {0}")]
    TokenGenerationError(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<TokenError> for DomainError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Malformed => DomainError::Malformed,
            TokenError::InvalidSignature => DomainError::InvalidSignature,
            TokenError::Expired => DomainError::Expired,
            TokenError::WeakSecret { .. } | TokenError::InvalidLifetime(_) => {
                DomainError::Configuration(e.to_string())
            }
            TokenError::CreationError(msg) => DomainError::TokenGenerationError(msg),
        }
    }
}
