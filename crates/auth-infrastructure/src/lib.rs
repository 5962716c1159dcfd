//! # Auth Infrastructure
//! 
//! Adapters behind the core's collaborator ports.

pub mod memory;

pub use memory::{InMemoryUserStore, DEMO_USERS};
