//! Read-side assembly of the patient wire shape.

use crate::{
    db::RecordStore,
    models::{Patient, PatientView},
    Result,
};

/// Expand a stored patient into its API representation, embedding the
/// medications and appointments that reference it. Credentials never cross
/// this boundary; [`PatientView`] has no hash or salt fields.
pub async fn patient_view(store: &dyn RecordStore, patient: Patient) -> Result<PatientView> {
    let medications = store.list_medications_for_patient(&patient.id).await?;
    let appointments = store.list_appointments_for_patient(&patient.id).await?;

    Ok(PatientView {
        id: patient.id,
        first_name: patient.first_name,
        last_name: patient.last_name,
        email: patient.email,
        dob: patient.dob,
        phone: patient.phone,
        address: patient.address,
        medications,
        appointments,
    })
}
