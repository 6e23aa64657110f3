//! Crate-wide error taxonomy and its HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::collections::BTreeMap;

pub type Result<T> = std::result::Result<T, Error>;

/// The record kinds managed by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Patient,
    Medication,
    Appointment,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Patient => "Patient",
            Self::Medication => "Medication",
            Self::Appointment => "Appointment",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application error taxonomy.
///
/// `NotFound`, `Validation` and `InvalidCredentials` carry the API error
/// contract; everything else collapses to a 500 with the detail logged,
/// never leaked to the client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0} not found")]
    NotFound(RecordKind),

    /// Field-keyed validation details, returned verbatim as the 400 body.
    #[error("validation failed: {0:?}")]
    Validation(BTreeMap<String, String>),

    /// Deliberately generic: unknown email and wrong password are
    /// indistinguishable to the caller.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("database error: {0}")]
    Database(sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Single-field validation error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut details = BTreeMap::new();
        details.insert(field.into(), message.into());
        Self::Validation(details)
    }
}

/// Flatten derive-produced validation errors into one message per field.
pub(crate) fn validation_messages(errors: validator::ValidationErrors) -> BTreeMap<String, String> {
    let mut details = BTreeMap::new();
    for (field, kind) in errors.into_errors() {
        if let validator::ValidationErrorsKind::Field(field_errors) = kind {
            if let Some(first) = field_errors.into_iter().next() {
                let message = first
                    .message
                    .map(|m| m.into_owned())
                    .unwrap_or_else(|| format!("Invalid value for {field}."));
                details.insert(field.to_string(), message);
            }
        }
    }
    details
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(validation_messages(errors))
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound(kind) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": format!("{kind} not found") })),
            )
                .into_response(),
            Error::Validation(details) => {
                (StatusCode::BAD_REQUEST, Json(json!(details))).into_response()
            }
            Error::InvalidCredentials => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Invalid credentials" })),
            )
                .into_response(),
            Error::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            Error::Database(e) => {
                tracing::error!(error = %e, "Database error");
                internal_error_response()
            }
            Error::Migration(e) => {
                tracing::error!(error = %e, "Migration error");
                internal_error_response()
            }
            Error::Internal(message) => {
                tracing::error!(error = %message, "Internal error");
                internal_error_response()
            }
        }
    }
}

fn internal_error_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error" })),
    )
        .into_response()
}
