//! Patient record handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::decode;
use crate::{
    models::{CreatePatient, UpdatePatient},
    state::AppState,
    Result,
};

pub async fn list_patients(State(state): State<AppState>) -> Result<Response> {
    let patients = state.query_service.list_patients().await?;
    Ok((StatusCode::OK, Json(patients)).into_response())
}

pub async fn create_patient(
    State(state): State<AppState>,
    body: std::result::Result<Json<CreatePatient>, JsonRejection>,
) -> Result<Response> {
    let payload = decode(body)?;
    let patient = state.mutation_service.create_patient(payload).await?;
    Ok((StatusCode::CREATED, Json(patient)).into_response())
}

pub async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    let patient = state.query_service.get_patient(&id).await?;
    Ok((StatusCode::OK, Json(patient)).into_response())
}

pub async fn update_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: std::result::Result<Json<UpdatePatient>, JsonRejection>,
) -> Result<Response> {
    let payload = decode(body)?;
    let patient = state.mutation_service.update_patient(&id, payload).await?;
    Ok((StatusCode::OK, Json(patient)).into_response())
}
