//! Write operations: presence checks, reference resolution, credential
//! hashing. Every operation that takes a patient reference resolves it
//! before any row is written.

use std::collections::BTreeMap;
use std::sync::Arc;

use validator::Validate;

use crate::{
    db::{
        AppointmentChanges, MedicationChanges, NewAppointment, NewMedication, NewPatient,
        PatientChanges, RecordStore,
    },
    error::{validation_messages, RecordKind},
    models::{
        Appointment, CreateAppointment, CreateMedication, CreatePatient, Medication, PatientView,
        UpdateAppointment, UpdateMedication, UpdatePatient,
    },
    services::{password, projection},
    Error, Result,
};

const REQUIRED: &str = "This field is required.";
const PASSWORD_REQUIRED: &str = "Password is required when creating a patient";
const PATIENT_NOT_FOUND: &str = "Patient not found";

fn non_blank(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

pub struct MutationService {
    store: Arc<dyn RecordStore>,
    pbkdf2_iterations: u32,
}

impl MutationService {
    pub fn new(store: Arc<dyn RecordStore>, pbkdf2_iterations: u32) -> Self {
        Self {
            store,
            pbkdf2_iterations,
        }
    }

    /// Register a patient. Name, email and a non-blank password are
    /// required; every missing field is reported in one response. The
    /// password is hashed before it reaches the store.
    pub async fn create_patient(&self, payload: CreatePatient) -> Result<PatientView> {
        let mut errors = match payload.validate() {
            Ok(()) => BTreeMap::new(),
            Err(e) => validation_messages(e),
        };
        for (field, present) in [
            ("first_name", non_blank(&payload.first_name)),
            ("last_name", non_blank(&payload.last_name)),
            ("email", non_blank(&payload.email)),
        ] {
            if !present {
                errors.insert(field.to_string(), REQUIRED.to_string());
            }
        }
        if !non_blank(&payload.password) {
            errors.insert("password".to_string(), PASSWORD_REQUIRED.to_string());
        }
        if !errors.is_empty() {
            return Err(Error::Validation(errors));
        }

        let CreatePatient {
            first_name: Some(first_name),
            last_name: Some(last_name),
            email: Some(email),
            password: Some(password),
            dob,
            phone,
            address,
        } = payload
        else {
            return Err(Error::Internal(
                "patient payload failed presence check".to_string(),
            ));
        };

        let (password_salt, password_hash) =
            password::hash_password(&password, self.pbkdf2_iterations);
        let patient = self
            .store
            .create_patient(NewPatient {
                first_name,
                last_name,
                email,
                password_hash,
                password_salt,
                dob,
                phone,
                address,
            })
            .await?;
        projection::patient_view(self.store.as_ref(), patient).await
    }

    /// Merge supplied fields into an existing patient. The password column
    /// is rewritten only when the new value is non-blank after trimming;
    /// derived fields in the payload are ignored by deserialization.
    pub async fn update_patient(&self, id: &str, payload: UpdatePatient) -> Result<PatientView> {
        if self.store.get_patient(id).await?.is_none() {
            return Err(Error::NotFound(RecordKind::Patient));
        }
        payload.validate().map_err(Error::from)?;

        // Trimming decides whether a replacement was supplied; the stored
        // hash covers the password exactly as sent, whitespace included.
        let credentials = payload
            .password
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .map(|p| password::hash_password(p, self.pbkdf2_iterations));
        let (password_salt, password_hash) = match credentials {
            Some((salt, hash)) => (Some(salt), Some(hash)),
            None => (None, None),
        };

        let updated = self
            .store
            .update_patient(
                id,
                PatientChanges {
                    first_name: payload.first_name,
                    last_name: payload.last_name,
                    email: payload.email,
                    password_hash,
                    password_salt,
                    dob: payload.dob,
                    phone: payload.phone,
                    address: payload.address,
                },
            )
            .await?
            .ok_or(Error::NotFound(RecordKind::Patient))?;
        projection::patient_view(self.store.as_ref(), updated).await
    }

    /// Remove a patient and, in the same transaction, every medication and
    /// appointment referencing it.
    pub async fn delete_patient(&self, id: &str) -> Result<()> {
        if self.store.delete_patient(id).await? {
            Ok(())
        } else {
            Err(Error::NotFound(RecordKind::Patient))
        }
    }

    pub async fn create_medication(&self, payload: CreateMedication) -> Result<Medication> {
        let mut errors = BTreeMap::new();
        for (field, present) in [
            ("patient", non_blank(&payload.patient)),
            ("name", non_blank(&payload.name)),
            ("dosage", non_blank(&payload.dosage)),
            ("quantity", payload.quantity.is_some()),
            ("refill_date", payload.refill_date.is_some()),
            ("refill_schedule", non_blank(&payload.refill_schedule)),
        ] {
            if !present {
                errors.insert(field.to_string(), REQUIRED.to_string());
            }
        }
        if !errors.is_empty() {
            return Err(Error::Validation(errors));
        }

        let CreateMedication {
            patient: Some(patient_id),
            name: Some(name),
            dosage: Some(dosage),
            quantity: Some(quantity),
            refill_date: Some(refill_date),
            refill_schedule: Some(refill_schedule),
        } = payload
        else {
            return Err(Error::Internal(
                "medication payload failed presence check".to_string(),
            ));
        };

        self.require_patient(&patient_id).await?;
        self.store
            .create_medication(NewMedication {
                patient_id,
                name,
                dosage,
                quantity,
                refill_date,
                refill_schedule,
            })
            .await
    }

    pub async fn update_medication(
        &self,
        id: &str,
        payload: UpdateMedication,
    ) -> Result<Medication> {
        if self.store.get_medication(id).await?.is_none() {
            return Err(Error::NotFound(RecordKind::Medication));
        }
        if let Some(patient_id) = &payload.patient {
            self.require_patient(patient_id).await?;
        }

        self.store
            .update_medication(
                id,
                MedicationChanges {
                    patient_id: payload.patient,
                    name: payload.name,
                    dosage: payload.dosage,
                    quantity: payload.quantity,
                    refill_date: payload.refill_date,
                    refill_schedule: payload.refill_schedule,
                },
            )
            .await?
            .ok_or(Error::NotFound(RecordKind::Medication))
    }

    pub async fn delete_medication(&self, id: &str) -> Result<()> {
        if self.store.delete_medication(id).await? {
            Ok(())
        } else {
            Err(Error::NotFound(RecordKind::Medication))
        }
    }

    pub async fn create_appointment(&self, payload: CreateAppointment) -> Result<Appointment> {
        let mut errors = BTreeMap::new();
        for (field, present) in [
            ("patient", non_blank(&payload.patient)),
            ("provider_name", non_blank(&payload.provider_name)),
            ("appointment_date", payload.appointment_date.is_some()),
        ] {
            if !present {
                errors.insert(field.to_string(), REQUIRED.to_string());
            }
        }
        if !errors.is_empty() {
            return Err(Error::Validation(errors));
        }

        let CreateAppointment {
            patient: Some(patient_id),
            provider_name: Some(provider_name),
            appointment_date: Some(appointment_date),
            repeat_schedule,
            end_date,
        } = payload
        else {
            return Err(Error::Internal(
                "appointment payload failed presence check".to_string(),
            ));
        };

        self.require_patient(&patient_id).await?;
        self.store
            .create_appointment(NewAppointment {
                patient_id,
                provider_name,
                appointment_date,
                repeat_schedule,
                end_date,
            })
            .await
    }

    pub async fn update_appointment(
        &self,
        id: &str,
        payload: UpdateAppointment,
    ) -> Result<Appointment> {
        if self.store.get_appointment(id).await?.is_none() {
            return Err(Error::NotFound(RecordKind::Appointment));
        }
        if let Some(patient_id) = &payload.patient {
            self.require_patient(patient_id).await?;
        }

        self.store
            .update_appointment(
                id,
                AppointmentChanges {
                    patient_id: payload.patient,
                    provider_name: payload.provider_name,
                    appointment_date: payload.appointment_date,
                    repeat_schedule: payload.repeat_schedule,
                    end_date: payload.end_date,
                },
            )
            .await?
            .ok_or(Error::NotFound(RecordKind::Appointment))
    }

    pub async fn delete_appointment(&self, id: &str) -> Result<()> {
        if self.store.delete_appointment(id).await? {
            Ok(())
        } else {
            Err(Error::NotFound(RecordKind::Appointment))
        }
    }

    async fn require_patient(&self, patient_id: &str) -> Result<()> {
        if self.store.patient_exists(patient_id).await? {
            Ok(())
        } else {
            Err(Error::validation("patient", PATIENT_NOT_FOUND))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_store;
    use chrono::{NaiveDate, TimeZone, Utc};

    const TEST_ITERATIONS: u32 = 1_000;

    async fn service() -> (MutationService, Arc<dyn RecordStore>) {
        let store: Arc<dyn RecordStore> = Arc::new(memory_store().await);
        (
            MutationService::new(store.clone(), TEST_ITERATIONS),
            store,
        )
    }

    fn patient_payload(email: &str) -> CreatePatient {
        CreatePatient {
            first_name: Some("Mark".into()),
            last_name: Some("Hughes".into()),
            email: Some(email.into()),
            password: Some("Password123!".into()),
            dob: None,
            phone: None,
            address: None,
        }
    }

    #[tokio::test]
    async fn empty_patient_payload_reports_every_missing_field() {
        let (service, _) = service().await;
        let err = service
            .create_patient(CreatePatient::default())
            .await
            .unwrap_err();

        let Error::Validation(fields) = err else {
            panic!("expected validation error");
        };
        assert_eq!(fields.len(), 4);
        assert_eq!(fields.get("first_name").map(String::as_str), Some(REQUIRED));
        assert_eq!(fields.get("last_name").map(String::as_str), Some(REQUIRED));
        assert_eq!(fields.get("email").map(String::as_str), Some(REQUIRED));
        assert_eq!(
            fields.get("password").map(String::as_str),
            Some(PASSWORD_REQUIRED)
        );
    }

    #[tokio::test]
    async fn malformed_email_is_rejected() {
        let (service, _) = service().await;
        let err = service
            .create_patient(CreatePatient {
                email: Some("not-an-address".into()),
                ..patient_payload("unused@example.net")
            })
            .await
            .unwrap_err();

        let Error::Validation(fields) = err else {
            panic!("expected validation error");
        };
        assert_eq!(
            fields.get("email").map(String::as_str),
            Some("Enter a valid email address.")
        );
    }

    #[tokio::test]
    async fn created_patient_stores_a_hash_not_the_password() {
        let (service, store) = service().await;
        let view = service
            .create_patient(patient_payload("mark@example.net"))
            .await
            .unwrap();

        let stored = store.get_patient(&view.id).await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "Password123!");
        assert!(!stored.password_salt.is_empty());
        assert!(password::verify_password(
            "Password123!",
            &stored.password_salt,
            &stored.password_hash,
            TEST_ITERATIONS
        ));
    }

    #[tokio::test]
    async fn passwords_keep_their_surrounding_whitespace() {
        let (service, store) = service().await;
        let view = service
            .create_patient(CreatePatient {
                password: Some("  padded pass  ".into()),
                ..patient_payload("mark@example.net")
            })
            .await
            .unwrap();

        let stored = store.get_patient(&view.id).await.unwrap().unwrap();
        assert!(password::verify_password(
            "  padded pass  ",
            &stored.password_salt,
            &stored.password_hash,
            TEST_ITERATIONS
        ));
        assert!(!password::verify_password(
            "padded pass",
            &stored.password_salt,
            &stored.password_hash,
            TEST_ITERATIONS
        ));

        service
            .update_patient(
                &view.id,
                UpdatePatient {
                    password: Some(" other pass ".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let updated = store.get_patient(&view.id).await.unwrap().unwrap();
        assert!(password::verify_password(
            " other pass ",
            &updated.password_salt,
            &updated.password_hash,
            TEST_ITERATIONS
        ));
        assert!(!password::verify_password(
            "other pass",
            &updated.password_salt,
            &updated.password_hash,
            TEST_ITERATIONS
        ));
    }

    #[tokio::test]
    async fn blank_password_on_update_keeps_the_old_hash() {
        let (service, store) = service().await;
        let view = service
            .create_patient(patient_payload("mark@example.net"))
            .await
            .unwrap();
        let before = store.get_patient(&view.id).await.unwrap().unwrap();

        service
            .update_patient(
                &view.id,
                UpdatePatient {
                    password: Some("   ".into()),
                    phone: Some("555-0100".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let after_blank = store.get_patient(&view.id).await.unwrap().unwrap();
        assert_eq!(after_blank.password_hash, before.password_hash);
        assert_eq!(after_blank.phone.as_deref(), Some("555-0100"));

        service
            .update_patient(
                &view.id,
                UpdatePatient {
                    password: Some("Fresh456!".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let after_change = store.get_patient(&view.id).await.unwrap().unwrap();
        assert_ne!(after_change.password_hash, before.password_hash);
        assert!(password::verify_password(
            "Fresh456!",
            &after_change.password_salt,
            &after_change.password_hash,
            TEST_ITERATIONS
        ));
    }

    #[tokio::test]
    async fn updating_a_missing_patient_is_not_found_before_validation() {
        let (service, _) = service().await;
        let err = service
            .update_patient(
                "no-such-id",
                UpdatePatient {
                    email: Some("broken".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(RecordKind::Patient)));
    }

    #[tokio::test]
    async fn medication_needs_a_resolvable_patient() {
        let (service, _) = service().await;
        let err = service
            .create_medication(CreateMedication {
                patient: Some("ghost".into()),
                name: Some("Atorvastatin".into()),
                dosage: Some("20mg".into()),
                quantity: Some(30),
                refill_date: NaiveDate::from_ymd_opt(2026, 3, 1),
                refill_schedule: Some("monthly".into()),
            })
            .await
            .unwrap_err();

        let Error::Validation(fields) = err else {
            panic!("expected validation error");
        };
        assert_eq!(
            fields.get("patient").map(String::as_str),
            Some(PATIENT_NOT_FOUND)
        );
    }

    #[tokio::test]
    async fn reassigning_a_medication_to_an_unknown_patient_fails() {
        let (service, _) = service().await;
        let owner = service
            .create_patient(patient_payload("mark@example.net"))
            .await
            .unwrap();
        let medication = service
            .create_medication(CreateMedication {
                patient: Some(owner.id.clone()),
                name: Some("Atorvastatin".into()),
                dosage: Some("20mg".into()),
                quantity: Some(30),
                refill_date: NaiveDate::from_ymd_opt(2026, 3, 1),
                refill_schedule: Some("monthly".into()),
            })
            .await
            .unwrap();

        for bad_reference in ["ghost", ""] {
            let err = service
                .update_medication(
                    &medication.id,
                    UpdateMedication {
                        patient: Some(bad_reference.into()),
                        ..Default::default()
                    },
                )
                .await
                .unwrap_err();
            assert!(matches!(err, Error::Validation(_)));
        }

        // The failed updates left the row untouched.
        let unchanged = service
            .update_medication(&medication.id, UpdateMedication::default())
            .await
            .unwrap();
        assert_eq!(unchanged.patient_id, owner.id);
    }

    #[tokio::test]
    async fn appointment_update_merges_supplied_fields() {
        let (service, _) = service().await;
        let owner = service
            .create_patient(patient_payload("mark@example.net"))
            .await
            .unwrap();
        let date = Utc.with_ymd_and_hms(2026, 3, 10, 14, 30, 0).unwrap();
        let appointment = service
            .create_appointment(CreateAppointment {
                patient: Some(owner.id.clone()),
                provider_name: Some("Dr. Reyes".into()),
                appointment_date: Some(date),
                repeat_schedule: None,
                end_date: None,
            })
            .await
            .unwrap();

        let updated = service
            .update_appointment(
                &appointment.id,
                UpdateAppointment {
                    provider_name: Some("Dr. Carter".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.provider_name, "Dr. Carter");
        assert_eq!(updated.appointment_date, date);
        assert_eq!(updated.patient_id, owner.id);
    }

    #[tokio::test]
    async fn deleting_missing_records_is_not_found() {
        let (service, _) = service().await;
        assert!(matches!(
            service.delete_patient("missing").await,
            Err(Error::NotFound(RecordKind::Patient))
        ));
        assert!(matches!(
            service.delete_medication("missing").await,
            Err(Error::NotFound(RecordKind::Medication))
        ));
        assert!(matches!(
            service.delete_appointment("missing").await,
            Err(Error::NotFound(RecordKind::Appointment))
        ));
    }
}
