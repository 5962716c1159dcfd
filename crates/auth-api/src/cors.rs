//! CORS policy for `/api/*`

use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use auth_shared::config::CorsSettings;

pub fn cors_layer(settings: &CorsSettings) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(Duration::from_secs(settings.max_age_secs));

    // tower-http panics on a wildcard origin combined with credentials.
    if settings.allows_any_origin() {
        if settings.allow_credentials {
            warn!("Wildcard CORS origin configured, credentials disabled");
        }
        return layer.allow_origin(AllowOrigin::any()).allow_credentials(false);
    }

    let origins: Vec<HeaderValue> = settings
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    layer
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(settings.allow_credentials)
}
