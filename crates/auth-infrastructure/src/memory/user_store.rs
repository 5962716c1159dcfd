// ============================================================================
// Auth Infrastructure - In-Memory User Store
// File: crates/auth-infrastructure/src/memory/user_store.rs
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{error, info};

use auth_core::domain::{Role, UserRecord};
use auth_core::error::DomainError;
use auth_core::repositories::{CredentialVerifier, UserDirectory};
use auth_security::PasswordService;
use auth_shared::utils::mask_email;

struct StoredUser {
    record: UserRecord,
    password_hash: String,
}

/// Users keyed by lowercase email, passwords kept only as Argon2 hashes.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, StoredUser>>,
}

/// Hash checked against when the identifier is unknown, so a missing
/// account costs the same Argon2 work as a wrong password.
fn dummy_hash() -> Option<&'static str> {
    static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();
    DUMMY_HASH
        .get_or_init(|| PasswordService::hash("unknown-account-placeholder").ok())
        .as_deref()
}

fn key(email: &str) -> String {
    email.trim().to_lowercase()
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<UserRecord, DomainError> {
        let password_hash = hash_blocking(password.to_string()).await?;

        let mut users = self.users.write().await;
        let key = key(email);
        if users.contains_key(&key) {
            return Err(DomainError::EmailAlreadyExists(email.to_string()));
        }

        let record = UserRecord::new(username.to_string(), email.trim().to_string(), role);
        users.insert(
            key,
            StoredUser {
                record: record.clone(),
                password_hash,
            },
        );

        info!("Registered user: {}", mask_email(email));
        Ok(record)
    }

    pub async fn remove(&self, email: &str) -> Option<UserRecord> {
        self.users.write().await.remove(&key(email)).map(|u| u.record)
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserStore {
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<UserRecord>, DomainError> {
        Ok(self
            .users
            .read()
            .await
            .get(&key(identifier))
            .map(|u| u.record.clone()))
    }
}

#[async_trait]
impl CredentialVerifier for InMemoryUserStore {
    async fn check(&self, identifier: &str, secret: &str) -> Result<bool, DomainError> {
        let password_hash = self
            .users
            .read()
            .await
            .get(&key(identifier))
            .map(|user| user.password_hash.clone());

        // Argon2 is CPU bound, keep it off the async workers.
        let secret = secret.to_string();
        tokio::task::spawn_blocking(move || match password_hash {
            Some(hash) => PasswordService::verify(&secret, &hash),
            None => {
                if let Some(hash) = dummy_hash() {
                    let _ = PasswordService::verify(&secret, hash);
                }
                Ok(false)
            }
        })
        .await
        .map_err(|e| DomainError::CollaboratorUnavailable(e.to_string()))?
        .map_err(|e| {
            error!("Stored hash unusable for {}: {}", mask_email(identifier), e);
            DomainError::CollaboratorUnavailable(e.to_string())
        })
    }
}

async fn hash_blocking(password: String) -> Result<String, DomainError> {
    tokio::task::spawn_blocking(move || PasswordService::hash(&password))
        .await
        .map_err(|e| DomainError::CollaboratorUnavailable(e.to_string()))?
        .map_err(|e| DomainError::CollaboratorUnavailable(e.to_string()))
}
