//! Domain records and their API payload/projection types.

pub mod appointment;
pub mod medication;
pub mod patient;
pub mod portal;

pub use appointment::{Appointment, CreateAppointment, UpdateAppointment};
pub use medication::{CreateMedication, Medication, UpdateMedication};
pub use patient::{CreatePatient, Patient, PatientView, UpdatePatient};
pub use portal::{LoginRequest, LoginResponse, SummaryView};
