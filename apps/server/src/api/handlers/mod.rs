//! Request handlers.

pub mod appointments;
pub mod medications;
pub mod patients;
pub mod portal;

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::{Error, Result};

/// Unwrap an extracted JSON body. Axum's own rejection would answer 415/422;
/// the API contract wants a plain 400 with the parse detail.
fn decode<T>(body: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(Error::BadRequest(rejection.body_text())),
    }
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
