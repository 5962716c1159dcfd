//! Domain services (business logic)

pub mod session_service;

pub use session_service::{
    AuthConfig, LoginResult, LogoutAck, RefreshResult, SessionAuthenticator, VerifiedSession,
};
