//! Seven-day lookahead for the patient portal.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::{
    db::RecordStore,
    error::RecordKind,
    models::SummaryView,
    services::projection,
    Error, Result,
};

pub struct SummaryService {
    store: Arc<dyn RecordStore>,
}

impl SummaryService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Full patient projection plus the appointments in `[now, now + 7d]`
    /// and the medications with a refill date in the matching date window,
    /// all ends inclusive. `now` is a parameter so the window boundary is
    /// testable; the handler passes wall-clock time.
    pub async fn week_ahead(&self, patient_id: &str, now: DateTime<Utc>) -> Result<SummaryView> {
        let patient = self
            .store
            .get_patient(patient_id)
            .await?
            .ok_or(Error::NotFound(RecordKind::Patient))?;

        let window_end = now + Duration::days(7);
        let appointments = self
            .store
            .list_appointments_between(patient_id, now, window_end)
            .await?;
        let medications = self
            .store
            .list_medications_refill_between(
                patient_id,
                now.date_naive(),
                window_end.date_naive(),
            )
            .await?;

        let patient = projection::patient_view(self.store.as_ref(), patient).await?;
        Ok(SummaryView {
            patient,
            appointments,
            medications,
        })
    }
}
