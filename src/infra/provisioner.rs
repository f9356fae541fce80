use crate::domain::models::tenant::TenantRecord;
use crate::domain::ports::{DatabaseProvisioner, SeedContext};
use crate::domain::services::seeder::TenantDbSeeder;
use crate::error::AppError;
use crate::infra::repositories::{
    postgres_role_repo::PostgresRoleRepo, postgres_user_repo::PostgresUserRepo,
    sqlite_role_repo::SqliteRoleRepo, sqlite_user_repo::SqliteUserRepo,
};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{PgPool, SqlitePool};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Provisions SQLite-backed tenant databases. A tenant with an empty
/// connection string is seeded into the shared (already migrated) pool;
/// otherwise a dedicated database file is created and migrated first.
pub struct SqliteDatabaseProvisioner {
    shared_pool: SqlitePool,
    seeder: Arc<TenantDbSeeder>,
}

impl SqliteDatabaseProvisioner {
    pub fn new(shared_pool: SqlitePool, seeder: Arc<TenantDbSeeder>) -> Self {
        Self {
            shared_pool,
            seeder,
        }
    }
}

#[async_trait]
impl DatabaseProvisioner for SqliteDatabaseProvisioner {
    async fn initialize(
        &self,
        tenant: &TenantRecord,
        cancel: CancellationToken,
    ) -> Result<(), AppError> {
        if cancel.is_cancelled() {
            return Err(AppError::Cancelled);
        }

        let pool = if tenant.connection_string.is_empty() {
            self.shared_pool.clone()
        } else {
            info!(
                "Creating dedicated SQLite database for tenant '{}'",
                tenant.id
            );
            let opts = SqliteConnectOptions::from_str(&tenant.connection_string)?
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .busy_timeout(Duration::from_secs(5));

            let pool = SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(opts)
                .await
                .map_err(AppError::Database)?;

            sqlx::migrate!("./migrations/sqlite")
                .run(&pool)
                .await
                .map_err(sqlx::Error::from)?;
            pool
        };

        if cancel.is_cancelled() {
            return Err(AppError::Cancelled);
        }

        let ctx = SeedContext {
            tenant: tenant.clone(),
            roles: Arc::new(SqliteRoleRepo::new(pool.clone())),
            users: Arc::new(SqliteUserRepo::new(pool.clone())),
        };

        self.seeder
            .seed(&ctx, &cancel)
            .await
            .map_err(|source| AppError::Seeding {
                tenant_id: tenant.id.clone(),
                source: Box::new(source),
            })
    }
}

/// Postgres counterpart. The dedicated database must already exist on the
/// target server; migration and seeding bring it up to the current schema.
pub struct PostgresDatabaseProvisioner {
    shared_pool: PgPool,
    seeder: Arc<TenantDbSeeder>,
}

impl PostgresDatabaseProvisioner {
    pub fn new(shared_pool: PgPool, seeder: Arc<TenantDbSeeder>) -> Self {
        Self {
            shared_pool,
            seeder,
        }
    }
}

#[async_trait]
impl DatabaseProvisioner for PostgresDatabaseProvisioner {
    async fn initialize(
        &self,
        tenant: &TenantRecord,
        cancel: CancellationToken,
    ) -> Result<(), AppError> {
        if cancel.is_cancelled() {
            return Err(AppError::Cancelled);
        }

        let pool = if tenant.connection_string.is_empty() {
            self.shared_pool.clone()
        } else {
            info!(
                "Migrating dedicated Postgres database for tenant '{}'",
                tenant.id
            );
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(&tenant.connection_string)
                .await
                .map_err(AppError::Database)?;

            sqlx::migrate!("./migrations/postgres")
                .run(&pool)
                .await
                .map_err(sqlx::Error::from)?;
            pool
        };

        if cancel.is_cancelled() {
            return Err(AppError::Cancelled);
        }

        let ctx = SeedContext {
            tenant: tenant.clone(),
            roles: Arc::new(PostgresRoleRepo::new(pool.clone())),
            users: Arc::new(PostgresUserRepo::new(pool.clone())),
        };

        self.seeder
            .seed(&ctx, &cancel)
            .await
            .map_err(|source| AppError::Seeding {
                tenant_id: tenant.id.clone(),
                source: Box::new(source),
            })
    }
}
