use axum::{
    routing::{get, post},
    Router,
};

use crate::api::handlers::{appointments, medications, patients, portal};
use crate::state::AppState;

/// Record-management surface consumed by the admin frontend.
///
/// Patients have no delete route here; removing a patient is a
/// service-level operation used by seeding and future tooling.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/patients",
            get(patients::list_patients).post(patients::create_patient),
        )
        .route(
            "/patients/:id",
            get(patients::get_patient).put(patients::update_patient),
        )
        .route(
            "/medications",
            get(medications::list_medications).post(medications::create_medication),
        )
        .route(
            "/medications/:id",
            get(medications::get_medication)
                .put(medications::update_medication)
                .delete(medications::delete_medication),
        )
        .route(
            "/appointments",
            get(appointments::list_appointments).post(appointments::create_appointment),
        )
        .route(
            "/appointments/:id",
            get(appointments::get_appointment)
                .put(appointments::update_appointment)
                .delete(appointments::delete_appointment),
        )
        .route("/login", post(portal::login))
}
