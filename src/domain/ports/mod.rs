use crate::domain::models::{
    role::{Role, RoleClaim},
    tenant::TenantRecord,
    user::User,
};
use crate::error::AppError;
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Durable registry of tenant records, keyed by tenant id. Uniqueness of the
/// id is enforced by the store itself, not by callers.
#[async_trait]
pub trait TenantStore: Send + Sync {
    async fn get_all(&self) -> Result<Vec<TenantRecord>, AppError>;
    async fn try_get(&self, id: &str) -> Result<Option<TenantRecord>, AppError>;
    /// Fails with [`AppError::Conflict`] if the id is already registered.
    async fn try_add(&self, tenant: &TenantRecord) -> Result<TenantRecord, AppError>;
    async fn try_update(&self, tenant: &TenantRecord) -> Result<TenantRecord, AppError>;
    async fn try_remove(&self, id: &str) -> Result<(), AppError>;
}

/// Creates and migrates the dedicated (or shared) database for a tenant and
/// runs the seeding pipeline against it before returning.
///
/// Behind a trait so a future background-job implementation can be swapped in
/// without touching the lifecycle service.
#[async_trait]
pub trait DatabaseProvisioner: Send + Sync {
    async fn initialize(
        &self,
        tenant: &TenantRecord,
        cancel: CancellationToken,
    ) -> Result<(), AppError>;
}

#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn find_by_name(&self, tenant_id: &str, name: &str) -> Result<Option<Role>, AppError>;
    async fn list(&self, tenant_id: &str) -> Result<Vec<Role>, AppError>;
    async fn create(&self, role: &Role) -> Result<Role, AppError>;
    async fn get_claims(&self, role_id: &str) -> Result<Vec<RoleClaim>, AppError>;
    async fn add_claim(&self, claim: &RoleClaim) -> Result<(), AppError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_username(
        &self,
        tenant_id: &str,
        username: &str,
    ) -> Result<Option<User>, AppError>;
    async fn find_by_email(&self, tenant_id: &str, email: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, tenant_id: &str, id: &str) -> Result<Option<User>, AppError>;
    async fn create(&self, user: &User) -> Result<User, AppError>;
    /// Returns false when the user already holds the role.
    async fn assign_role(
        &self,
        tenant_id: &str,
        user_id: &str,
        role_name: &str,
    ) -> Result<bool, AppError>;
    async fn list_roles(&self, tenant_id: &str, user_id: &str) -> Result<Vec<String>, AppError>;
}

/// Everything a seeding run needs, scoped to one tenant's database.
/// Constructed fresh per run, never persisted.
#[derive(Clone)]
pub struct SeedContext {
    pub tenant: TenantRecord,
    pub roles: Arc<dyn RoleRepository>,
    pub users: Arc<dyn UserRepository>,
}

/// Extension hook run at the end of the seeding pipeline, in registration order.
#[async_trait]
pub trait SeedStep: Send + Sync {
    async fn run(&self, ctx: &SeedContext, cancel: &CancellationToken) -> Result<(), AppError>;
}
