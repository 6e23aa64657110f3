//! SQLite-backed implementation of [`RecordStore`].
//!
//! Rows are mapped by hand so the schema stays visible in one place. Owner
//! references are plain columns; the store keeps writes dumb and leaves
//! reference validation to the service layer, with two exceptions it can
//! express better than callers can: listings join on `patients` so rows whose
//! owner has disappeared mid-request never surface, and patient deletion runs
//! as a single transaction across all three tables.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

use crate::{
    db::traits::{
        AppointmentChanges, MedicationChanges, NewAppointment, NewMedication, NewPatient,
        PatientChanges, RecordStore,
    },
    models::{Appointment, Medication, Patient},
    Error, Result,
};

#[derive(Clone)]
pub struct SqliteRecordStore {
    pub(crate) pool: SqlitePool,
}

impl SqliteRecordStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn patient_from_row(r: &SqliteRow) -> Patient {
    Patient {
        id: r.get("id"),
        first_name: r.get("first_name"),
        last_name: r.get("last_name"),
        email: r.get("email"),
        password_hash: r.get("password_hash"),
        password_salt: r.get("password_salt"),
        dob: r.get("dob"),
        phone: r.get("phone"),
        address: r.get("address"),
    }
}

fn medication_from_row(r: &SqliteRow) -> Medication {
    Medication {
        id: r.get("id"),
        patient_id: r.get("patient_id"),
        name: r.get("name"),
        dosage: r.get("dosage"),
        quantity: r.get("quantity"),
        refill_date: r.get("refill_date"),
        refill_schedule: r.get("refill_schedule"),
    }
}

fn appointment_from_row(r: &SqliteRow) -> Appointment {
    Appointment {
        id: r.get("id"),
        patient_id: r.get("patient_id"),
        provider_name: r.get("provider_name"),
        appointment_date: r.get("appointment_date"),
        repeat_schedule: r.get("repeat_schedule"),
        end_date: r.get("end_date"),
    }
}

/// The only unique constraint reachable from user input is the patient email
/// column, so a unique violation on a patient write is reported as a field
/// error rather than a 500.
fn patient_write_error(e: sqlx::Error) -> Error {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            Error::validation("email", "patient with this email already exists.")
        }
        _ => Error::Database(e),
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn create_patient(&self, new: NewPatient) -> Result<Patient> {
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO patients \
             (id, first_name, last_name, email, password_hash, password_salt, dob, phone, address) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(&new.password_salt)
        .bind(new.dob)
        .bind(&new.phone)
        .bind(&new.address)
        .execute(&self.pool)
        .await
        .map_err(patient_write_error)?;

        Ok(Patient {
            id,
            first_name: new.first_name,
            last_name: new.last_name,
            email: new.email,
            password_hash: new.password_hash,
            password_salt: new.password_salt,
            dob: new.dob,
            phone: new.phone,
            address: new.address,
        })
    }

    async fn get_patient(&self, id: &str) -> Result<Option<Patient>> {
        let row = sqlx::query("SELECT * FROM patients WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(row.map(|r| patient_from_row(&r)))
    }

    async fn get_patient_by_email(&self, email: &str) -> Result<Option<Patient>> {
        let row = sqlx::query("SELECT * FROM patients WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(row.map(|r| patient_from_row(&r)))
    }

    async fn list_patients(&self) -> Result<Vec<Patient>> {
        let rows = sqlx::query("SELECT * FROM patients")
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(rows.iter().map(patient_from_row).collect())
    }

    async fn patient_exists(&self, id: &str) -> Result<bool> {
        let row = sqlx::query("SELECT 1 FROM patients WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(row.is_some())
    }

    async fn update_patient(&self, id: &str, changes: PatientChanges) -> Result<Option<Patient>> {
        let row = sqlx::query(
            "UPDATE patients SET \
             first_name = COALESCE(?, first_name), \
             last_name = COALESCE(?, last_name), \
             email = COALESCE(?, email), \
             password_hash = COALESCE(?, password_hash), \
             password_salt = COALESCE(?, password_salt), \
             dob = COALESCE(?, dob), \
             phone = COALESCE(?, phone), \
             address = COALESCE(?, address) \
             WHERE id = ? \
             RETURNING *",
        )
        .bind(&changes.first_name)
        .bind(&changes.last_name)
        .bind(&changes.email)
        .bind(&changes.password_hash)
        .bind(&changes.password_salt)
        .bind(changes.dob)
        .bind(&changes.phone)
        .bind(&changes.address)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(patient_write_error)?;
        Ok(row.map(|r| patient_from_row(&r)))
    }

    async fn delete_patient(&self, id: &str) -> Result<bool> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        sqlx::query("DELETE FROM appointments WHERE patient_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        sqlx::query("DELETE FROM medications WHERE patient_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        let deleted = sqlx::query("DELETE FROM patients WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?
            .rows_affected();

        tx.commit().await.map_err(Error::Database)?;
        Ok(deleted > 0)
    }

    async fn create_medication(&self, new: NewMedication) -> Result<Medication> {
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO medications \
             (id, patient_id, name, dosage, quantity, refill_date, refill_schedule) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&new.patient_id)
        .bind(&new.name)
        .bind(&new.dosage)
        .bind(new.quantity)
        .bind(new.refill_date)
        .bind(&new.refill_schedule)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(Medication {
            id,
            patient_id: new.patient_id,
            name: new.name,
            dosage: new.dosage,
            quantity: new.quantity,
            refill_date: new.refill_date,
            refill_schedule: new.refill_schedule,
        })
    }

    async fn get_medication(&self, id: &str) -> Result<Option<Medication>> {
        let row = sqlx::query("SELECT * FROM medications WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(row.map(|r| medication_from_row(&r)))
    }

    async fn list_medications(&self) -> Result<Vec<Medication>> {
        let rows = sqlx::query(
            "SELECT m.* FROM medications m \
             INNER JOIN patients p ON p.id = m.patient_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(rows.iter().map(medication_from_row).collect())
    }

    async fn list_medications_for_patient(&self, patient_id: &str) -> Result<Vec<Medication>> {
        let rows = sqlx::query("SELECT * FROM medications WHERE patient_id = ?")
            .bind(patient_id)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(rows.iter().map(medication_from_row).collect())
    }

    async fn list_medications_refill_between(
        &self,
        patient_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Medication>> {
        let rows = sqlx::query(
            "SELECT * FROM medications \
             WHERE patient_id = ? AND refill_date BETWEEN ? AND ? \
             ORDER BY refill_date ASC",
        )
        .bind(patient_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(rows.iter().map(medication_from_row).collect())
    }

    async fn update_medication(
        &self,
        id: &str,
        changes: MedicationChanges,
    ) -> Result<Option<Medication>> {
        let row = sqlx::query(
            "UPDATE medications SET \
             patient_id = COALESCE(?, patient_id), \
             name = COALESCE(?, name), \
             dosage = COALESCE(?, dosage), \
             quantity = COALESCE(?, quantity), \
             refill_date = COALESCE(?, refill_date), \
             refill_schedule = COALESCE(?, refill_schedule) \
             WHERE id = ? \
             RETURNING *",
        )
        .bind(&changes.patient_id)
        .bind(&changes.name)
        .bind(&changes.dosage)
        .bind(changes.quantity)
        .bind(changes.refill_date)
        .bind(&changes.refill_schedule)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(row.map(|r| medication_from_row(&r)))
    }

    async fn delete_medication(&self, id: &str) -> Result<bool> {
        let deleted = sqlx::query("DELETE FROM medications WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?
            .rows_affected();
        Ok(deleted > 0)
    }

    async fn create_appointment(&self, new: NewAppointment) -> Result<Appointment> {
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO appointments \
             (id, patient_id, provider_name, appointment_date, repeat_schedule, end_date) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&new.patient_id)
        .bind(&new.provider_name)
        .bind(new.appointment_date)
        .bind(&new.repeat_schedule)
        .bind(new.end_date)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(Appointment {
            id,
            patient_id: new.patient_id,
            provider_name: new.provider_name,
            appointment_date: new.appointment_date,
            repeat_schedule: new.repeat_schedule,
            end_date: new.end_date,
        })
    }

    async fn get_appointment(&self, id: &str) -> Result<Option<Appointment>> {
        let row = sqlx::query("SELECT * FROM appointments WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(row.map(|r| appointment_from_row(&r)))
    }

    async fn list_appointments(&self) -> Result<Vec<Appointment>> {
        let rows = sqlx::query(
            "SELECT a.* FROM appointments a \
             INNER JOIN patients p ON p.id = a.patient_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(rows.iter().map(appointment_from_row).collect())
    }

    async fn list_appointments_for_patient(&self, patient_id: &str) -> Result<Vec<Appointment>> {
        let rows = sqlx::query(
            "SELECT * FROM appointments WHERE patient_id = ? \
             ORDER BY appointment_date ASC",
        )
        .bind(patient_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(rows.iter().map(appointment_from_row).collect())
    }

    async fn list_appointments_between(
        &self,
        patient_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>> {
        let rows = sqlx::query(
            "SELECT * FROM appointments \
             WHERE patient_id = ? AND appointment_date BETWEEN ? AND ? \
             ORDER BY appointment_date ASC",
        )
        .bind(patient_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(rows.iter().map(appointment_from_row).collect())
    }

    async fn update_appointment(
        &self,
        id: &str,
        changes: AppointmentChanges,
    ) -> Result<Option<Appointment>> {
        let row = sqlx::query(
            "UPDATE appointments SET \
             patient_id = COALESCE(?, patient_id), \
             provider_name = COALESCE(?, provider_name), \
             appointment_date = COALESCE(?, appointment_date), \
             repeat_schedule = COALESCE(?, repeat_schedule), \
             end_date = COALESCE(?, end_date) \
             WHERE id = ? \
             RETURNING *",
        )
        .bind(&changes.patient_id)
        .bind(&changes.provider_name)
        .bind(changes.appointment_date)
        .bind(&changes.repeat_schedule)
        .bind(changes.end_date)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(row.map(|r| appointment_from_row(&r)))
    }

    async fn delete_appointment(&self, id: &str) -> Result<bool> {
        let deleted = sqlx::query("DELETE FROM appointments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?
            .rows_affected();
        Ok(deleted > 0)
    }
}
