//! # Auth API
//! 
//! HTTP handlers, DTOs, error mapping, and the router.

pub mod handlers;
pub mod dto;
pub mod error;
pub mod extract;
pub mod cors;
pub mod response;
pub mod routes;
pub mod state;

pub use routes::router;
pub use state::AppState;
