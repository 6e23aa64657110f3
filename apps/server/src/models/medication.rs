use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Stored Medication record.
///
/// `patient_id` serializes as `patient`, the bare owner id, per the wire
/// contract.
#[derive(Debug, Clone, Serialize)]
pub struct Medication {
    pub id: String,
    #[serde(rename = "patient")]
    pub patient_id: String,
    pub name: String,
    pub dosage: String,
    pub quantity: i64,
    pub refill_date: NaiveDate,
    pub refill_schedule: String,
}

/// Payload for `POST /admin/medications/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateMedication {
    pub patient: Option<String>,
    pub name: Option<String>,
    pub dosage: Option<String>,
    pub quantity: Option<i64>,
    pub refill_date: Option<NaiveDate>,
    pub refill_schedule: Option<String>,
}

/// Partial-update payload for `PUT /admin/medications/{id}/`.
///
/// A supplied `patient` must resolve to an existing Patient.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMedication {
    pub patient: Option<String>,
    pub name: Option<String>,
    pub dosage: Option<String>,
    pub quantity: Option<i64>,
    pub refill_date: Option<NaiveDate>,
    pub refill_schedule: Option<String>,
}
