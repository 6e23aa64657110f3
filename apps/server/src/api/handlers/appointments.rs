//! Appointment record handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::decode;
use crate::{
    models::{CreateAppointment, UpdateAppointment},
    state::AppState,
    Result,
};

pub async fn list_appointments(State(state): State<AppState>) -> Result<Response> {
    let appointments = state.query_service.list_appointments().await?;
    Ok((StatusCode::OK, Json(appointments)).into_response())
}

pub async fn create_appointment(
    State(state): State<AppState>,
    body: std::result::Result<Json<CreateAppointment>, JsonRejection>,
) -> Result<Response> {
    let payload = decode(body)?;
    let appointment = state.mutation_service.create_appointment(payload).await?;
    Ok((StatusCode::CREATED, Json(appointment)).into_response())
}

pub async fn get_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    let appointment = state.query_service.get_appointment(&id).await?;
    Ok((StatusCode::OK, Json(appointment)).into_response())
}

pub async fn update_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: std::result::Result<Json<UpdateAppointment>, JsonRejection>,
) -> Result<Response> {
    let payload = decode(body)?;
    let appointment = state
        .mutation_service
        .update_appointment(&id, payload)
        .await?;
    Ok((StatusCode::OK, Json(appointment)).into_response())
}

pub async fn delete_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    state.mutation_service.delete_appointment(&id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
