//! # Auth Core - Domain Module
//! 
//! Users as the authenticator sees them, and what it hands back to callers.

pub mod user;
pub mod credentials;

pub use user::{Role, UserInfo, UserRecord};
pub use credentials::Credentials;
