use crate::domain::{models::tenant::TenantRecord, ports::TenantStore};
use crate::error::{is_unique_violation, AppError};
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteTenantRepo {
    pool: SqlitePool,
}

impl SqliteTenantRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TenantStore for SqliteTenantRepo {
    async fn get_all(&self) -> Result<Vec<TenantRecord>, AppError> {
        sqlx::query_as::<_, TenantRecord>("SELECT * FROM tenants ORDER BY created_at")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn try_get(&self, id: &str) -> Result<Option<TenantRecord>, AppError> {
        sqlx::query_as::<_, TenantRecord>("SELECT * FROM tenants WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn try_add(&self, tenant: &TenantRecord) -> Result<TenantRecord, AppError> {
        sqlx::query_as::<_, TenantRecord>(
            "INSERT INTO tenants (id, name, connection_string, admin_email, issuer, is_active, valid_until, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&tenant.id)
            .bind(&tenant.name)
            .bind(&tenant.connection_string)
            .bind(&tenant.admin_email)
            .bind(&tenant.issuer)
            .bind(tenant.is_active)
            .bind(tenant.valid_until)
            .bind(tenant.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::Conflict(format!("Tenant '{}' already exists", tenant.id))
                } else {
                    AppError::Database(e)
                }
            })
    }

    async fn try_update(&self, tenant: &TenantRecord) -> Result<TenantRecord, AppError> {
        sqlx::query_as::<_, TenantRecord>(
            "UPDATE tenants SET name=?, connection_string=?, admin_email=?, issuer=?, is_active=?, valid_until=? WHERE id=? RETURNING *"
        )
            .bind(&tenant.name)
            .bind(&tenant.connection_string)
            .bind(&tenant.admin_email)
            .bind(&tenant.issuer)
            .bind(tenant.is_active)
            .bind(tenant.valid_until)
            .bind(&tenant.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn try_remove(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM tenants WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Tenant '{}' not found", id)));
        }
        Ok(())
    }
}
