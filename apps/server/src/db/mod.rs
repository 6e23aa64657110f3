//! Persistence layer: pool construction plus the [`RecordStore`] contract and
//! its SQLite implementation.

pub mod store;
pub mod traits;

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

pub use store::SqliteRecordStore;
pub use traits::{
    AppointmentChanges, MedicationChanges, NewAppointment, NewMedication, NewPatient,
    PatientChanges, RecordStore,
};

use crate::{Config, Error, Result};

/// Open the server's connection pool. The database file is created on first
/// start so a fresh checkout runs without any manual setup.
pub async fn create_db_pool(config: &Config) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.database.url)
        .map_err(Error::Database)?
        .create_if_missing(true);

    SqlitePoolOptions::new()
        .min_connections(config.database.pool_min_size)
        .max_connections(config.database.pool_max_size)
        .acquire_timeout(Duration::from_secs(config.database.pool_timeout_seconds))
        .connect_with(options)
        .await
        .map_err(Error::Database)
}

/// Migrated in-memory store for unit tests. Capped at one connection since
/// every `sqlite::memory:` connection is its own database.
#[cfg(test)]
pub(crate) async fn memory_store() -> SqliteRecordStore {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("open in-memory database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("run migrations");
    SqliteRecordStore::new(pool)
}
