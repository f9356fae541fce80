use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use tenancy_backend::config::Config;
use tenancy_backend::domain::models::tenant::{CreateTenantRequest, TenantRecord};
use tenancy_backend::domain::ports::{
    DatabaseProvisioner, RoleRepository, SeedStep, TenantStore, UserRepository,
};
use tenancy_backend::domain::services::messages::Messages;
use tenancy_backend::domain::services::seeder::{SeedDefaults, TenantDbSeeder};
use tenancy_backend::domain::services::tenant_service::TenantLifecycleService;
use tenancy_backend::error::AppError;
use tenancy_backend::infra::provisioner::SqliteDatabaseProvisioner;
use tenancy_backend::infra::repositories::{
    sqlite_role_repo::SqliteRoleRepo, sqlite_tenant_repo::SqliteTenantRepo,
    sqlite_user_repo::SqliteUserRepo,
};
use tenancy_backend::state::AppState;

/// Provisioner that always fails, for exercising Create-time compensation.
#[allow(dead_code)]
pub struct FailingProvisioner;

#[async_trait]
impl DatabaseProvisioner for FailingProvisioner {
    async fn initialize(
        &self,
        _tenant: &TenantRecord,
        _cancel: CancellationToken,
    ) -> Result<(), AppError> {
        Err(AppError::Internal("Simulated provisioning outage".to_string()))
    }
}

/// Provisioner that succeeds without touching any database, for tests that
/// only care about the registry side of Create.
#[allow(dead_code)]
pub struct NoopProvisioner;

#[async_trait]
impl DatabaseProvisioner for NoopProvisioner {
    async fn initialize(
        &self,
        _tenant: &TenantRecord,
        _cancel: CancellationToken,
    ) -> Result<(), AppError> {
        Ok(())
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub state: AppState,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::build(None, Vec::new()).await
    }

    #[allow(dead_code)]
    pub async fn with_provisioner(provisioner: Arc<dyn DatabaseProvisioner>) -> Self {
        Self::build(Some(provisioner), Vec::new()).await
    }

    #[allow(dead_code)]
    pub async fn with_seed_steps(steps: Vec<Arc<dyn SeedStep>>) -> Self {
        Self::build(None, steps).await
    }

    async fn build(
        provisioner_override: Option<Arc<dyn DatabaseProvisioner>>,
        steps: Vec<Arc<dyn SeedStep>>,
    ) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            max_connections: 5,
        };

        let messages = Arc::new(Messages::new());

        let mut seeder = TenantDbSeeder::new(SeedDefaults::default());
        for step in steps {
            seeder = seeder.with_step(step);
        }
        let seeder = Arc::new(seeder);

        let provisioner: Arc<dyn DatabaseProvisioner> = provisioner_override
            .unwrap_or_else(|| Arc::new(SqliteDatabaseProvisioner::new(pool.clone(), seeder)));

        let tenant_repo: Arc<dyn TenantStore> = Arc::new(SqliteTenantRepo::new(pool.clone()));
        let role_repo: Arc<dyn RoleRepository> = Arc::new(SqliteRoleRepo::new(pool.clone()));
        let user_repo: Arc<dyn UserRepository> = Arc::new(SqliteUserRepo::new(pool.clone()));

        let tenant_service = Arc::new(TenantLifecycleService::new(
            tenant_repo.clone(),
            provisioner.clone(),
            messages.clone(),
            config.database_url.clone(),
        ));

        let state = AppState {
            config,
            tenant_repo,
            role_repo,
            user_repo,
            provisioner,
            tenant_service,
            messages,
        };

        Self {
            state,
            pool,
            db_filename,
        }
    }
}

#[allow(dead_code)]
pub fn create_request(id: &str, name: &str, admin_email: &str) -> CreateTenantRequest {
    CreateTenantRequest {
        id: id.to_string(),
        name: name.to_string(),
        connection_string: None,
        admin_email: admin_email.to_string(),
        issuer: None,
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
