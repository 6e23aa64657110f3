use axum::{
    routing::{get, post},
    Router,
};

use crate::api::handlers::portal;
use crate::state::AppState;

/// Patient-facing surface at the root: login, the weekly summary, and full
/// per-patient record listings.
pub fn portal_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(portal::login))
        .route("/summary/:patient_id", get(portal::summary))
        .route(
            "/appointments/:patient_id",
            get(portal::appointments_for_patient),
        )
        .route(
            "/medications/:patient_id",
            get(portal::medications_for_patient),
        )
}
