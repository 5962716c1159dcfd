use axum::{routing::get, routing::post, Router};
use tower_http::trace::TraceLayer;

use auth_shared::config::CorsSettings;

use crate::cors::cors_layer;
use crate::handlers::{auth, health};
use crate::state::AppState;

pub fn router(state: AppState, cors: &CorsSettings) -> Router {
    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh))
        .route("/verify", get(auth::verify))
        .route("/me", get(auth::me))
        .route("/logout", post(auth::logout))
        .layer(cors_layer(cors));

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/auth", auth_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
