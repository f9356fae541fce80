use crate::domain::models::tenant::{CreateTenantRequest, TenantRecord};
use crate::domain::ports::{DatabaseProvisioner, TenantStore};
use crate::domain::services::connection_guard;
use crate::domain::services::messages::Messages;
use crate::error::AppError;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Orchestrates the tenant state machine against the registry and the
/// database provisioner. Registry insert and provisioning cannot share a
/// transaction, so a provisioning failure is compensated by a best-effort
/// delete of the just-inserted record.
pub struct TenantLifecycleService {
    store: Arc<dyn TenantStore>,
    provisioner: Arc<dyn DatabaseProvisioner>,
    messages: Arc<Messages>,
    default_connection_string: String,
}

impl TenantLifecycleService {
    pub fn new(
        store: Arc<dyn TenantStore>,
        provisioner: Arc<dyn DatabaseProvisioner>,
        messages: Arc<Messages>,
        default_connection_string: String,
    ) -> Self {
        Self {
            store,
            provisioner,
            messages,
            default_connection_string,
        }
    }

    /// All registered tenants, connection strings redacted for display.
    pub async fn list_all(&self) -> Result<Vec<TenantRecord>, AppError> {
        let mut tenants = self.store.get_all().await?;
        for tenant in &mut tenants {
            tenant.connection_string = connection_guard::secure(&tenant.connection_string);
        }
        Ok(tenants)
    }

    pub async fn exists_by_id(&self, id: &str) -> Result<bool, AppError> {
        Ok(self.store.try_get(id).await?.is_some())
    }

    pub async fn exists_by_name(&self, name: &str) -> Result<bool, AppError> {
        Ok(self.store.get_all().await?.iter().any(|t| t.name == name))
    }

    pub async fn get_by_id(&self, id: &str) -> Result<TenantRecord, AppError> {
        self.get_tenant(id).await
    }

    /// Registers the tenant (inactive), then provisions and seeds its
    /// database inline. On provisioning failure the record is removed again
    /// and the failure surfaces as [`AppError::Provisioning`].
    pub async fn create(
        &self,
        request: CreateTenantRequest,
        cancel: CancellationToken,
    ) -> Result<String, AppError> {
        let mut connection_string = request.connection_string.unwrap_or_default();
        if connection_string.trim() == self.default_connection_string.trim() {
            // Same database as the platform default: store the sentinel form.
            connection_string = String::new();
        }

        let tenant = TenantRecord::new(
            request.id,
            request.name,
            connection_string,
            request.admin_email,
            request.issuer,
        );
        let tenant = self.store.try_add(&tenant).await?;
        info!("Tenant '{}' registered, provisioning database...", tenant.id);

        // TODO: run provisioning in a background job and notify the tenant
        // admin by mail once the database is ready or has failed.
        if let Err(source) = self.provisioner.initialize(&tenant, cancel).await {
            if let Err(remove_err) = self.store.try_remove(&tenant.id).await {
                error!(
                    "Failed to remove tenant '{}' after provisioning failure: {}",
                    tenant.id, remove_err
                );
            }
            return Err(AppError::Provisioning {
                tenant_id: tenant.id,
                source: Box::new(source),
            });
        }

        info!("Tenant '{}' provisioned successfully.", tenant.id);
        Ok(tenant.id)
    }

    pub async fn activate(&self, id: &str) -> Result<String, AppError> {
        let mut tenant = self.get_tenant(id).await?;
        if tenant.is_active {
            return Err(AppError::InvalidState(
                self.messages.tenant_already_active(id),
            ));
        }

        tenant.activate();
        self.store.try_update(&tenant).await?;
        info!("Tenant '{}' activated.", id);
        Ok(self.messages.tenant_activated(id))
    }

    pub async fn deactivate(&self, id: &str) -> Result<String, AppError> {
        let mut tenant = self.get_tenant(id).await?;
        if !tenant.is_active {
            return Err(AppError::InvalidState(
                self.messages.tenant_already_inactive(id),
            ));
        }

        tenant.deactivate();
        self.store.try_update(&tenant).await?;
        info!("Tenant '{}' deactivated.", id);
        Ok(self.messages.tenant_deactivated(id))
    }

    /// Unconditionally overwrites the tenant's subscription expiry.
    pub async fn update_subscription(
        &self,
        id: &str,
        extended_expiry: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let mut tenant = self.get_tenant(id).await?;
        tenant.set_validity(extended_expiry);
        self.store.try_update(&tenant).await?;
        info!("Tenant '{}' subscription extended to {}.", id, extended_expiry);
        Ok(self.messages.subscription_extended(id, extended_expiry))
    }

    async fn get_tenant(&self, id: &str) -> Result<TenantRecord, AppError> {
        self.store
            .try_get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(self.messages.tenant_not_found(id)))
    }
}
