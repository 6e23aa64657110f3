//! Read operations over the record store.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
    db::RecordStore,
    error::RecordKind,
    models::{Appointment, Medication, PatientView},
    services::projection,
    Error, Result,
};

/// Windowed lookahead results for one patient.
#[derive(Debug, Clone)]
pub struct UpcomingRecords {
    pub appointments: Vec<Appointment>,
    pub medications: Vec<Medication>,
}

pub struct QueryService {
    store: Arc<dyn RecordStore>,
}

impl QueryService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Every patient with embedded medications and appointments. There is no
    /// pagination; callers own the cost of a full scan.
    pub async fn list_patients(&self) -> Result<Vec<PatientView>> {
        let patients = self.store.list_patients().await?;
        let mut views = Vec::with_capacity(patients.len());
        for patient in patients {
            views.push(projection::patient_view(self.store.as_ref(), patient).await?);
        }
        Ok(views)
    }

    pub async fn get_patient(&self, id: &str) -> Result<PatientView> {
        let patient = self
            .store
            .get_patient(id)
            .await?
            .ok_or(Error::NotFound(RecordKind::Patient))?;
        projection::patient_view(self.store.as_ref(), patient).await
    }

    pub async fn list_medications(&self) -> Result<Vec<Medication>> {
        self.store.list_medications().await
    }

    pub async fn get_medication(&self, id: &str) -> Result<Medication> {
        self.store
            .get_medication(id)
            .await?
            .ok_or(Error::NotFound(RecordKind::Medication))
    }

    pub async fn list_appointments(&self) -> Result<Vec<Appointment>> {
        self.store.list_appointments().await
    }

    pub async fn get_appointment(&self, id: &str) -> Result<Appointment> {
        self.store
            .get_appointment(id)
            .await?
            .ok_or(Error::NotFound(RecordKind::Appointment))
    }

    /// Full appointment history for one patient, earliest first. The patient
    /// must resolve; an unknown id is NotFound rather than an empty list.
    pub async fn appointments_for_patient(&self, patient_id: &str) -> Result<Vec<Appointment>> {
        self.require_patient(patient_id).await?;
        self.store.list_appointments_for_patient(patient_id).await
    }

    pub async fn medications_for_patient(&self, patient_id: &str) -> Result<Vec<Medication>> {
        self.require_patient(patient_id).await?;
        self.store.list_medications_for_patient(patient_id).await
    }

    /// Appointments falling in `[window_start, window_end]` and medications
    /// with a refill date in the matching date window, both ends inclusive.
    pub async fn list_upcoming(
        &self,
        patient_id: &str,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<UpcomingRecords> {
        self.require_patient(patient_id).await?;

        let appointments = self
            .store
            .list_appointments_between(patient_id, window_start, window_end)
            .await?;
        let medications = self
            .store
            .list_medications_refill_between(
                patient_id,
                window_start.date_naive(),
                window_end.date_naive(),
            )
            .await?;

        Ok(UpcomingRecords {
            appointments,
            medications,
        })
    }

    async fn require_patient(&self, patient_id: &str) -> Result<()> {
        if self.store.patient_exists(patient_id).await? {
            Ok(())
        } else {
            Err(Error::NotFound(RecordKind::Patient))
        }
    }
}
