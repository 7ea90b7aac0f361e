// --- File: crates/services/inkwell_backend/src/app_state.rs ---
use std::sync::Arc;

use inkwell_common::services::ServiceFactory;
use inkwell_config::AppConfig;
use inkwell_db::{BookingRepository, DbClient, DbError, SqlBookingRepository};

use crate::service_factory::InkwellServiceFactory;

/// Application state shared across all routes: the loaded configuration,
/// the booking repository over the database pool, and the service factory
/// holding the external-collaborator adapters.
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub repo: Arc<SqlBookingRepository>,
    pub service_factory: Arc<dyn ServiceFactory>,
}

impl AppState {
    /// Connect the database, ensure the schema exists, and build the
    /// service adapters from configuration.
    pub async fn new(config: Arc<AppConfig>) -> Result<Self, DbError> {
        let db_client = DbClient::new(&config).await?;
        let repo = SqlBookingRepository::new(db_client);
        repo.init_schema().await?;

        let service_factory = Arc::new(InkwellServiceFactory::new(config.clone()));

        Ok(Self {
            config,
            repo: Arc::new(repo),
            service_factory,
        })
    }
}
