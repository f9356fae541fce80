use crate::domain::{
    models::role::{Role, RoleClaim},
    ports::RoleRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresRoleRepo {
    pool: PgPool,
}

impl PostgresRoleRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleRepository for PostgresRoleRepo {
    async fn find_by_name(&self, tenant_id: &str, name: &str) -> Result<Option<Role>, AppError> {
        sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE tenant_id = $1 AND name = $2")
            .bind(tenant_id)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, tenant_id: &str) -> Result<Vec<Role>, AppError> {
        sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE tenant_id = $1 ORDER BY name")
            .bind(tenant_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn create(&self, role: &Role) -> Result<Role, AppError> {
        sqlx::query_as::<_, Role>(
            "INSERT INTO roles (id, tenant_id, name, description) VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(&role.id)
        .bind(&role.tenant_id)
        .bind(&role.name)
        .bind(&role.description)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn get_claims(&self, role_id: &str) -> Result<Vec<RoleClaim>, AppError> {
        sqlx::query_as::<_, RoleClaim>("SELECT * FROM role_claims WHERE role_id = $1")
            .bind(role_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn add_claim(&self, claim: &RoleClaim) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO role_claims (role_id, claim_type, claim_value) VALUES ($1, $2, $3) ON CONFLICT DO NOTHING",
        )
        .bind(&claim.role_id)
        .bind(&claim.claim_type)
        .bind(&claim.claim_value)
        .execute(&self.pool)
        .await
        .map_err(AppError::Database)?;
        Ok(())
    }
}
