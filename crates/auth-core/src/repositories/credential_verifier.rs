//! Credential verifier trait (port)

use async_trait::async_trait;

use crate::error::DomainError;

/// Implementations must compare hashed secrets in constant time.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn check(&self, identifier: &str, secret: &str) -> Result<bool, DomainError>;
}
