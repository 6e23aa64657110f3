use serde::{Deserialize, Serialize};

use super::{Appointment, Medication, PatientView};

/// Body of `POST /login/`.
///
/// Fields are `Option` so that a missing field behaves like a failed lookup
/// rather than a malformed request.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Successful login: the authenticated patient's identity, nothing more.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// `GET /summary/{patientId}/` response: the full patient projection plus
/// the appointments and medication refills falling in the next seven days.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryView {
    pub patient: PatientView,
    pub appointments: Vec<Appointment>,
    pub medications: Vec<Medication>,
}
