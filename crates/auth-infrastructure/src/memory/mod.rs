//! In-process adapters

pub mod user_store;
pub mod seed;

pub use user_store::InMemoryUserStore;
pub use seed::DEMO_USERS;
