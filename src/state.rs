use crate::config::Config;
use crate::domain::ports::{DatabaseProvisioner, RoleRepository, TenantStore, UserRepository};
use crate::domain::services::messages::Messages;
use crate::domain::services::tenant_service::TenantLifecycleService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub tenant_repo: Arc<dyn TenantStore>,
    pub role_repo: Arc<dyn RoleRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    pub provisioner: Arc<dyn DatabaseProvisioner>,
    pub tenant_service: Arc<TenantLifecycleService>,
    pub messages: Arc<Messages>,
}
