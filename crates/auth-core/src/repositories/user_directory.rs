//! User directory trait (port)

use async_trait::async_trait;

use crate::domain::UserRecord;
use crate::error::DomainError;

/// Looked up on every verification, never cached by the authenticator.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<UserRecord>, DomainError>;
}
