use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{Appointment, Medication};

/// Stored Patient record.
///
/// Deliberately not `Serialize`: credential material must never reach the
/// wire. API output goes through [`PatientView`].
#[derive(Debug, Clone)]
pub struct Patient {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Hex-encoded PBKDF2-HMAC-SHA256 digest of the password.
    pub password_hash: String,
    /// Hex-encoded per-patient random salt.
    pub password_salt: String,
    pub dob: Option<NaiveDate>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// API representation of a Patient, embedding its dependent records.
#[derive(Debug, Clone, Serialize)]
pub struct PatientView {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub dob: Option<NaiveDate>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub medications: Vec<Medication>,
    pub appointments: Vec<Appointment>,
}

/// Payload for `POST /admin/patients/`.
///
/// Required fields are `Option` at the type level so that missing ones
/// surface as field-keyed validation errors instead of a deserialization
/// failure. Unknown keys (`medications`, `appointments`, ...) are ignored.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreatePatient {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
    pub password: Option<String>,
    pub dob: Option<NaiveDate>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Partial-update payload for `PUT /admin/patients/{id}/`.
///
/// Only supplied fields overwrite stored values. The password is replaced
/// only when non-blank after trimming.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePatient {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
    pub password: Option<String>,
    pub dob: Option<NaiveDate>,
    pub phone: Option<String>,
    pub address: Option<String>,
}
