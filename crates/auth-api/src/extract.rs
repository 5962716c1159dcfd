//! Token transport: the core only ever sees the bare token string.

use axum::http::{header::AUTHORIZATION, HeaderMap};

use auth_shared::utils::strip_bearer;

/// Token from `Authorization: Bearer <token>`; `None` when absent or empty.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = strip_bearer(value);
    (!token.is_empty()).then_some(token)
}
