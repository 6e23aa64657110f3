//! Patient portal handlers: login, weekly summary, per-patient listings.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;

use super::decode;
use crate::{models::LoginRequest, state::AppState, Result};

pub async fn login(
    State(state): State<AppState>,
    body: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response> {
    let request = decode(body)?;
    let response = state.auth_service.login(request).await?;
    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Seven-day lookahead, anchored at the time of the request.
pub async fn summary(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> Result<Response> {
    let summary = state
        .summary_service
        .week_ahead(&patient_id, Utc::now())
        .await?;
    Ok((StatusCode::OK, Json(summary)).into_response())
}

pub async fn appointments_for_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> Result<Response> {
    let appointments = state
        .query_service
        .appointments_for_patient(&patient_id)
        .await?;
    Ok((StatusCode::OK, Json(appointments)).into_response())
}

pub async fn medications_for_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> Result<Response> {
    let medications = state
        .query_service
        .medications_for_patient(&patient_id)
        .await?;
    Ok((StatusCode::OK, Json(medications)).into_response())
}
