use std::sync::Arc;

use axum::Router;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::api::rest::routes;
use crate::config::TimeTrackingConfig;
use crate::domain::service::TimeTrackingService;
use crate::domain::user_service::UserService;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::sea_orm_repo::SeaOrmTimeTrackingDatabase;

/// Entry point of the module: owns the connection handle and builds
/// request-scoped services on demand.
#[derive(Clone)]
pub struct TimeTracking {
    db: DatabaseConnection,
    config: TimeTrackingConfig,
}

impl TimeTracking {
    pub fn new(db: DatabaseConnection, config: TimeTrackingConfig) -> Self {
        Self { db, config }
    }

    pub fn config(&self) -> &TimeTrackingConfig {
        &self.config
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        info!("Running time_tracking database migrations");
        Migrator::up(&self.db, None).await?;
        info!("Time tracking database migrations completed successfully");
        Ok(())
    }

    /// Wire a storage adapter for `access_token` into a fresh service.
    pub fn service_for(&self, access_token: Option<String>) -> TimeTrackingService {
        let storage = Arc::new(
            SeaOrmTimeTrackingDatabase::new(self.db.clone()).with_access_token(access_token),
        );
        let users = UserService::new(storage.clone());
        TimeTrackingService::new(users, storage, self.config.service_config())
    }

    pub fn router(&self) -> Router {
        info!("Registering time_tracking REST routes");
        routes::register_routes(Router::new(), Arc::new(self.clone()))
    }
}
