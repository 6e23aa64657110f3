//! Medication record handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::decode;
use crate::{
    models::{CreateMedication, UpdateMedication},
    state::AppState,
    Result,
};

pub async fn list_medications(State(state): State<AppState>) -> Result<Response> {
    let medications = state.query_service.list_medications().await?;
    Ok((StatusCode::OK, Json(medications)).into_response())
}

pub async fn create_medication(
    State(state): State<AppState>,
    body: std::result::Result<Json<CreateMedication>, JsonRejection>,
) -> Result<Response> {
    let payload = decode(body)?;
    let medication = state.mutation_service.create_medication(payload).await?;
    Ok((StatusCode::CREATED, Json(medication)).into_response())
}

pub async fn get_medication(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    let medication = state.query_service.get_medication(&id).await?;
    Ok((StatusCode::OK, Json(medication)).into_response())
}

pub async fn update_medication(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: std::result::Result<Json<UpdateMedication>, JsonRejection>,
) -> Result<Response> {
    let payload = decode(body)?;
    let medication = state
        .mutation_service
        .update_medication(&id, payload)
        .await?;
    Ok((StatusCode::OK, Json(medication)).into_response())
}

pub async fn delete_medication(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    state.mutation_service.delete_medication(&id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
