use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{PgPool, SqlitePool};
use tracing::info;

use crate::config::Config;
use crate::domain::services::messages::Messages;
use crate::domain::services::seeder::{SeedDefaults, TenantDbSeeder};
use crate::domain::services::tenant_service::TenantLifecycleService;
use crate::infra::provisioner::{PostgresDatabaseProvisioner, SqliteDatabaseProvisioner};
use crate::infra::repositories::{
    postgres_role_repo::PostgresRoleRepo, postgres_tenant_repo::PostgresTenantRepo,
    postgres_user_repo::PostgresUserRepo, sqlite_role_repo::SqliteRoleRepo,
    sqlite_tenant_repo::SqliteTenantRepo, sqlite_user_repo::SqliteUserRepo,
};
use crate::state::AppState;

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;
    let messages = Arc::new(Messages::new());
    let seeder = Arc::new(TenantDbSeeder::new(SeedDefaults::default()));

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(database_url)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        let provisioner = Arc::new(PostgresDatabaseProvisioner::new(pool.clone(), seeder));
        let tenant_repo = Arc::new(PostgresTenantRepo::new(pool.clone()));
        let tenant_service = Arc::new(TenantLifecycleService::new(
            tenant_repo.clone(),
            provisioner.clone(),
            messages.clone(),
            config.database_url.clone(),
        ));

        AppState {
            config: config.clone(),
            tenant_repo,
            role_repo: Arc::new(PostgresRoleRepo::new(pool.clone())),
            user_repo: Arc::new(PostgresUserRepo::new(pool.clone())),
            provisioner,
            tenant_service,
            messages,
        }
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        let provisioner = Arc::new(SqliteDatabaseProvisioner::new(pool.clone(), seeder));
        let tenant_repo = Arc::new(SqliteTenantRepo::new(pool.clone()));
        let tenant_service = Arc::new(TenantLifecycleService::new(
            tenant_repo.clone(),
            provisioner.clone(),
            messages.clone(),
            config.database_url.clone(),
        ));

        AppState {
            config: config.clone(),
            tenant_repo,
            role_repo: Arc::new(SqliteRoleRepo::new(pool.clone())),
            user_repo: Arc::new(SqliteUserRepo::new(pool.clone())),
            provisioner,
            tenant_service,
            messages,
        }
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
