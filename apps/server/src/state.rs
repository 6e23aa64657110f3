//! Shared application state

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::{
    config::Config,
    db::{create_db_pool, RecordStore, SqliteRecordStore},
    services::{AuthService, MutationService, QueryService, SummaryService},
    Result,
};

/// Shared application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db_pool: SqlitePool,
    pub store: Arc<dyn RecordStore>,
    pub query_service: Arc<QueryService>,
    pub mutation_service: Arc<MutationService>,
    pub summary_service: Arc<SummaryService>,
    pub auth_service: Arc<AuthService>,
}

impl AppState {
    /// Initialize the application state: open the pool, run migrations,
    /// wire up the services.
    pub async fn new(config: Config) -> Result<Self> {
        tracing::info!("Initializing application state...");

        let config = Arc::new(config);
        let db_pool = create_db_pool(config.as_ref()).await?;

        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&db_pool).await?;

        let store: Arc<dyn RecordStore> = Arc::new(SqliteRecordStore::new(db_pool.clone()));
        let iterations = config.auth.pbkdf2_iterations;

        let query_service = Arc::new(QueryService::new(store.clone()));
        let mutation_service = Arc::new(MutationService::new(store.clone(), iterations));
        let summary_service = Arc::new(SummaryService::new(store.clone()));
        let auth_service = Arc::new(AuthService::new(store.clone(), iterations));

        tracing::info!("Application state initialized");

        Ok(Self {
            config,
            db_pool,
            store,
            query_service,
            mutation_service,
            summary_service,
            auth_service,
        })
    }
}
