// ============================================================================
// Auth API - Auth Handlers
// File: crates/auth-api/src/handlers/auth.rs
// ============================================================================
//! Authentication HTTP handlers (login, refresh, verify, me, logout)

use axum::{extract::State, http::HeaderMap, Json};
use validator::Validate;

use auth_core::domain::{Credentials, UserInfo};

use crate::dto::{AuthResponse, LoginRequest, RefreshResponse, VerifyResponse};
use crate::error::HttpError;
use crate::extract::bearer_token;
use crate::response::ApiResponse;
use crate::state::AppState;

type ApiResult<T> = Result<Json<ApiResponse<T>>, HttpError>;

/// Login handler - POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<AuthResponse> {
    payload.validate().map_err(HttpError::validation)?;

    let result = state
        .auth
        .login(&Credentials::new(payload.email, payload.password))
        .await?;

    Ok(Json(ApiResponse::success(
        "Login successful",
        AuthResponse {
            access_token: result.access_token,
            refresh_token: result.refresh_token,
            token_type: result.token_type,
            expires_in: result.expires_in,
            user: result.user,
        },
    )))
}

/// Refresh token handler - POST /api/auth/refresh
pub async fn refresh(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<RefreshResponse> {
    let result = state.auth.refresh(bearer_token(&headers)).await?;

    Ok(Json(ApiResponse::success(
        "Token refreshed successfully",
        RefreshResponse {
            access_token: result.access_token,
            token_type: result.token_type,
            expires_in: result.expires_in,
        },
    )))
}

/// Session check handler - GET /api/auth/verify
pub async fn verify(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<VerifyResponse> {
    let verified = state.auth.verify(bearer_token(&headers)).await?;

    Ok(Json(ApiResponse::success(
        "Session valid",
        VerifyResponse {
            status: "ok",
            user: verified.user,
            session: verified.session,
        },
    )))
}

/// Current user handler - GET /api/auth/me
pub async fn me(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<UserInfo> {
    let verified = state.auth.verify(bearer_token(&headers)).await?;
    Ok(Json(ApiResponse::success("User profile retrieved", verified.user)))
}

/// Logout handler - POST /api/auth/logout
///
/// Tokens are not tracked server side; the client discards them.
pub async fn logout(State(state): State<AppState>) -> Json<ApiResponse<&'static str>> {
    let ack = state.auth.logout();
    Json(ApiResponse::success(ack.message, "Token invalidated"))
}
