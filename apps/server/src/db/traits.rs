//! Storage abstraction for the record store.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::{
    models::{Appointment, Medication, Patient},
    Result,
};

/// Column values for a new Patient row. The store assigns the identity.
#[derive(Debug, Clone)]
pub struct NewPatient {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub password_salt: String,
    pub dob: Option<NaiveDate>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewMedication {
    pub patient_id: String,
    pub name: String,
    pub dosage: String,
    pub quantity: i64,
    pub refill_date: NaiveDate,
    pub refill_schedule: String,
}

#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub patient_id: String,
    pub provider_name: String,
    pub appointment_date: DateTime<Utc>,
    pub repeat_schedule: Option<String>,
    pub end_date: Option<NaiveDate>,
}

/// Partial column updates for a Patient. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct PatientChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub password_salt: Option<String>,
    pub dob: Option<NaiveDate>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Partial column updates for a Medication. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct MedicationChanges {
    pub patient_id: Option<String>,
    pub name: Option<String>,
    pub dosage: Option<String>,
    pub quantity: Option<i64>,
    pub refill_date: Option<NaiveDate>,
    pub refill_schedule: Option<String>,
}

/// Partial column updates for an Appointment. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct AppointmentChanges {
    pub patient_id: Option<String>,
    pub provider_name: Option<String>,
    pub appointment_date: Option<DateTime<Utc>>,
    pub repeat_schedule: Option<String>,
    pub end_date: Option<NaiveDate>,
}

/// Persistence contract for the three record kinds.
///
/// `create_*` assigns identity and enforces unique constraints. `update_*`
/// merges the change set into the stored row and returns `None` when the id
/// is absent. `delete_patient` removes the patient's medications and
/// appointments in the same transaction as the patient row itself, so
/// dependents can never outlive their owner.
#[async_trait]
pub trait RecordStore: Send + Sync {
    // Patients
    async fn create_patient(&self, new: NewPatient) -> Result<Patient>;
    async fn get_patient(&self, id: &str) -> Result<Option<Patient>>;
    async fn get_patient_by_email(&self, email: &str) -> Result<Option<Patient>>;
    async fn list_patients(&self) -> Result<Vec<Patient>>;
    async fn patient_exists(&self, id: &str) -> Result<bool>;
    async fn update_patient(&self, id: &str, changes: PatientChanges) -> Result<Option<Patient>>;
    async fn delete_patient(&self, id: &str) -> Result<bool>;

    // Medications
    async fn create_medication(&self, new: NewMedication) -> Result<Medication>;
    async fn get_medication(&self, id: &str) -> Result<Option<Medication>>;
    /// All medications whose patient reference currently resolves.
    async fn list_medications(&self) -> Result<Vec<Medication>>;
    async fn list_medications_for_patient(&self, patient_id: &str) -> Result<Vec<Medication>>;
    /// Medications for a patient with `refill_date` in `[start, end]`, inclusive.
    async fn list_medications_refill_between(
        &self,
        patient_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Medication>>;
    async fn update_medication(
        &self,
        id: &str,
        changes: MedicationChanges,
    ) -> Result<Option<Medication>>;
    async fn delete_medication(&self, id: &str) -> Result<bool>;

    // Appointments
    async fn create_appointment(&self, new: NewAppointment) -> Result<Appointment>;
    async fn get_appointment(&self, id: &str) -> Result<Option<Appointment>>;
    /// All appointments whose patient reference currently resolves.
    async fn list_appointments(&self) -> Result<Vec<Appointment>>;
    /// All appointments for a patient, ordered by `appointment_date` ascending.
    async fn list_appointments_for_patient(&self, patient_id: &str) -> Result<Vec<Appointment>>;
    /// Appointments for a patient with `appointment_date` in `[start, end]`, inclusive.
    async fn list_appointments_between(
        &self,
        patient_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>>;
    async fn update_appointment(
        &self,
        id: &str,
        changes: AppointmentChanges,
    ) -> Result<Option<Appointment>>;
    async fn delete_appointment(&self, id: &str) -> Result<bool>;
}
