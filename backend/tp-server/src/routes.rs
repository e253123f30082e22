use crate::{AppState, health, login, me, oauth_callback, oauth_start, signup};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

/// Build the application router with all endpoints
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.oauth.frontend_url);

    Router::new()
        // Email/password accounts
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
        // OAuth (static routes above take priority over the provider segment)
        .route("/api/auth/{provider}", get(oauth_start))
        .route("/api/auth/{provider}/callback", get(oauth_callback))
        // Profile
        .route("/api/user/me", get(me))
        // Health check endpoints
        .route("/health", get(health::health_check))
        .route("/live", get(health::liveness_check))
        .route("/ready", get(health::readiness_check))
        .with_state(state)
        .layer(cors)
}

/// CORS for the browser frontend: its origin only, with credentials
fn cors_layer(frontend_url: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    let origin = url::Url::parse(frontend_url)
        .ok()
        .map(|url| url.origin().ascii_serialization())
        .and_then(|origin| HeaderValue::from_str(&origin).ok());

    match origin {
        Some(origin) => layer.allow_origin(origin),
        None => {
            log::warn!(
                "Frontend URL '{}' has no usable origin; cross-origin requests will be refused",
                frontend_url
            );
            layer
        }
    }
}
