//! Demo accounts for local development

use auth_core::domain::Role;
use auth_core::error::DomainError;

use super::InMemoryUserStore;

/// (email, password, role)
pub const DEMO_USERS: &[(&str, &str, Role)] = &[
    ("user@example.com", "password123", Role::User),
    ("admin@example.com", "admin123", Role::Admin),
];

impl InMemoryUserStore {
    /// Register the demo accounts that are not present yet.
    pub async fn seed_demo_users(&self) -> Result<usize, DomainError> {
        let mut created = 0;
        for (email, password, role) in DEMO_USERS {
            match self.register(email, email, password, *role).await {
                Ok(_) => created += 1,
                Err(DomainError::EmailAlreadyExists(_)) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(created)
    }
}
