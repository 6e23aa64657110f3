//! Router assembly.

pub mod admin;
pub mod portal;

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{api::handlers, config::Config, state::AppState};

/// Assemble the application router. Record CRUD is nested under `/admin`,
/// the base path the management frontend is built against; the patient
/// portal lives at the root. Callers wrap the result in a trailing-slash
/// normalizer so `/admin/patients` and `/admin/patients/` both resolve.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(state.config.as_ref());

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/admin", admin::admin_routes())
        .merge(portal::portal_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    // `*` means any origin; `AllowOrigin::list` rejects the wildcard, so it
    // gets its own branch.
    let allow_origin = if config.server.cors_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let mut origins = Vec::new();
        for origin in &config.server.cors_origins {
            match origin.parse::<HeaderValue>() {
                Ok(value) => origins.push(value),
                Err(_) => tracing::warn!(origin = %origin, "Ignoring unparseable CORS origin"),
            }
        }
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}
