use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Stored Appointment record.
///
/// `patient_id` serializes as `patient`, the bare owner id, per the wire
/// contract. `repeat_schedule` and `end_date` are `null` when unset.
#[derive(Debug, Clone, Serialize)]
pub struct Appointment {
    pub id: String,
    #[serde(rename = "patient")]
    pub patient_id: String,
    pub provider_name: String,
    pub appointment_date: DateTime<Utc>,
    pub repeat_schedule: Option<String>,
    pub end_date: Option<NaiveDate>,
}

/// Payload for `POST /admin/appointments/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateAppointment {
    pub patient: Option<String>,
    pub provider_name: Option<String>,
    pub appointment_date: Option<DateTime<Utc>>,
    pub repeat_schedule: Option<String>,
    pub end_date: Option<NaiveDate>,
}

/// Partial-update payload for `PUT /admin/appointments/{id}/`.
///
/// A supplied `patient` must resolve to an existing Patient.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAppointment {
    pub patient: Option<String>,
    pub provider_name: Option<String>,
    pub appointment_date: Option<DateTime<Utc>>,
    pub repeat_schedule: Option<String>,
    pub end_date: Option<NaiveDate>,
}
