//! Shared helpers for the HTTP integration tests.
//!
//! Every test gets a fresh in-memory database behind the same stack the
//! binary serves: the full router, the trailing-slash normalizer, and the
//! JSON error bodies. Requests go through `tower::ServiceExt::oneshot`, so
//! no port is bound.

use std::future::Future;
use std::pin::Pin;

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderName, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::{Layer, ServiceExt};
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

use emr::api::create_router;
use emr::config::{AuthConfig, Config, DatabaseConfig, LoggingConfig, ServerConfig};
use emr::state::AppState;

/// Router under test, wrapped the way `main` wraps it.
pub struct TestApp {
    app: NormalizePath<Router>,
}

impl TestApp {
    /// Send one JSON request and return status, headers, and collected body.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> anyhow::Result<(StatusCode, HeaderMap, Vec<u8>)> {
        self.request_with_headers(method, path, &[], body).await
    }

    pub async fn request_with_headers(
        &self,
        method: Method,
        path: &str,
        extra_headers: &[(HeaderName, &str)],
        body: Option<Vec<u8>>,
    ) -> anyhow::Result<(StatusCode, HeaderMap, Vec<u8>)> {
        let mut builder = Request::builder().method(method).uri(path);
        for (name, value) in extra_headers {
            builder = builder.header(name, *value);
        }
        let request = match body {
            Some(bytes) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(bytes))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.app.clone().oneshot(request).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        Ok((status, headers, bytes.to_vec()))
    }
}

/// In-memory configuration. The pool is capped at one connection since every
/// `sqlite::memory:` connection opens its own database, and the PBKDF2 cost
/// is lowered to keep login tests fast.
fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["http://localhost:3000".to_string()],
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            pool_min_size: 1,
            pool_max_size: 1,
            pool_timeout_seconds: 5,
        },
        auth: AuthConfig {
            pbkdf2_iterations: 1_000,
        },
        logging: LoggingConfig {
            level: "warn".to_string(),
            json: false,
        },
    }
}

async fn run_with_config<F>(config: Config, f: F) -> anyhow::Result<()>
where
    F: FnOnce(TestApp) -> Pin<Box<dyn Future<Output = anyhow::Result<()>>>>,
{
    let state = AppState::new(config).await?;
    let app = TestApp {
        app: NormalizePathLayer::trim_trailing_slash().layer(create_router(state)),
    };
    f(app).await
}

/// Run one test body against a freshly migrated application.
pub async fn with_test_app<F>(f: F) -> anyhow::Result<()>
where
    F: FnOnce(TestApp) -> Pin<Box<dyn Future<Output = anyhow::Result<()>>>>,
{
    run_with_config(test_config(), f).await
}

/// Like [`with_test_app`], with a configuration tweak applied first.
pub async fn with_test_app_with_config<M, F>(mutate: M, f: F) -> anyhow::Result<()>
where
    M: FnOnce(&mut Config),
    F: FnOnce(TestApp) -> Pin<Box<dyn Future<Output = anyhow::Result<()>>>>,
{
    let mut config = test_config();
    mutate(&mut config);
    run_with_config(config, f).await
}

pub fn to_json_body<T: serde::Serialize>(value: &T) -> anyhow::Result<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

pub fn assert_status(actual: StatusCode, expected: StatusCode, context: &str) {
    assert_eq!(actual, expected, "unexpected status for: {context}");
}

// ============================================================================
// Payloads and fixtures
// ============================================================================

/// A complete, valid patient creation payload.
pub fn patient_payload(email: &str) -> Value {
    json!({
        "first_name": "Mark",
        "last_name": "Smith",
        "email": email,
        "password": "Password123!",
        "dob": "1984-06-02",
        "phone": "555-0100",
        "address": "12 Main St"
    })
}

pub fn medication_payload(patient_id: &str) -> Value {
    json!({
        "patient": patient_id,
        "name": "Lisinopril",
        "dosage": "10mg",
        "quantity": 30,
        "refill_date": "2026-09-01",
        "refill_schedule": "monthly"
    })
}

pub fn appointment_payload(patient_id: &str, appointment_date: &str) -> Value {
    json!({
        "patient": patient_id,
        "provider_name": "Dr. Reyes",
        "appointment_date": appointment_date
    })
}

/// Create a patient through the API and return the response body.
pub async fn create_patient(app: &TestApp, email: &str) -> anyhow::Result<Value> {
    let (status, _headers, body) = app
        .request(
            Method::POST,
            "/admin/patients/",
            Some(to_json_body(&patient_payload(email))?),
        )
        .await?;
    assert_status(status, StatusCode::CREATED, "create patient fixture");
    Ok(serde_json::from_slice(&body)?)
}

/// Create a medication for `patient_id` and return the response body.
pub async fn create_medication(app: &TestApp, patient_id: &str) -> anyhow::Result<Value> {
    let (status, _headers, body) = app
        .request(
            Method::POST,
            "/admin/medications/",
            Some(to_json_body(&medication_payload(patient_id))?),
        )
        .await?;
    assert_status(status, StatusCode::CREATED, "create medication fixture");
    Ok(serde_json::from_slice(&body)?)
}

/// Create an appointment for `patient_id` and return the response body.
pub async fn create_appointment(
    app: &TestApp,
    patient_id: &str,
    appointment_date: &str,
) -> anyhow::Result<Value> {
    let (status, _headers, body) = app
        .request(
            Method::POST,
            "/admin/appointments/",
            Some(to_json_body(&appointment_payload(patient_id, appointment_date))?),
        )
        .await?;
    assert_status(status, StatusCode::CREATED, "create appointment fixture");
    Ok(serde_json::from_slice(&body)?)
}

/// The id of a created record, as an owned string.
pub fn id_of(record: &Value) -> String {
    record["id"]
        .as_str()
        .expect("record id should be a string")
        .to_string()
}
