//! Patient-records (mini EMR) backend.
//!
//! Manages Patients and their Medications and Appointments, and exposes the
//! admin CRUD API plus the patient-portal API (login, 7-day summary, full
//! per-patient listings) over HTTP.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{Error, Result};
