use crate::domain::models::role::{Role, RoleClaim, DEFAULT_ROLES, PERMISSION_CLAIM_TYPE};
use crate::domain::models::user::User;
use crate::domain::ports::{SeedContext, SeedStep};
use crate::error::AppError;
use argon2::{password_hash::SaltString, Argon2, PasswordHasher};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Immutable seeding configuration. The first entry of `roles` is the
/// reserved super-admin role and is excluded from bulk assignment to the
/// seeded default administrator.
#[derive(Clone)]
pub struct SeedDefaults {
    pub roles: Vec<String>,
    pub admin_username: String,
    pub admin_display_name: String,
    pub admin_initial_password: String,
    /// Permission claims granted to every seeded role. Empty until a
    /// permission catalog exists, which makes the claim hook a no-op.
    pub role_permissions: Vec<String>,
}

impl Default for SeedDefaults {
    fn default() -> Self {
        Self {
            roles: DEFAULT_ROLES.iter().map(|r| r.to_string()).collect(),
            admin_username: "admin".to_string(),
            admin_display_name: "Administrator".to_string(),
            admin_initial_password: "ChangeMe@12345".to_string(),
            role_permissions: Vec::new(),
        }
    }
}

/// Bootstraps a freshly provisioned tenant database: baseline roles, the
/// default administrator, then any registered custom steps.
pub struct TenantDbSeeder {
    defaults: SeedDefaults,
    steps: Vec<Arc<dyn SeedStep>>,
}

impl TenantDbSeeder {
    pub fn new(defaults: SeedDefaults) -> Self {
        Self {
            defaults,
            steps: Vec::new(),
        }
    }

    pub fn with_step(mut self, step: Arc<dyn SeedStep>) -> Self {
        self.steps.push(step);
        self
    }

    /// Runs the full pipeline. Safe to run repeatedly against the same
    /// database: every creation is guarded by an existence check.
    pub async fn seed(
        &self,
        ctx: &SeedContext,
        cancel: &CancellationToken,
    ) -> Result<(), AppError> {
        self.seed_roles(ctx).await?;
        self.seed_admin_user(ctx).await?;
        self.run_custom_steps(ctx, cancel).await
    }

    async fn seed_roles(&self, ctx: &SeedContext) -> Result<(), AppError> {
        for role_name in &self.defaults.roles {
            let role = match ctx.roles.find_by_name(&ctx.tenant.id, role_name).await? {
                Some(role) => role,
                None => {
                    info!("Seeding {} role for '{}' tenant.", role_name, ctx.tenant.id);
                    let role = Role::new(
                        ctx.tenant.id.clone(),
                        role_name.clone(),
                        format!("{} role for tenant {}", role_name, ctx.tenant.id),
                    );
                    ctx.roles.create(&role).await?
                }
            };

            self.assign_permissions_to_role(ctx, &role).await?;
        }
        Ok(())
    }

    async fn assign_permissions_to_role(
        &self,
        ctx: &SeedContext,
        role: &Role,
    ) -> Result<(), AppError> {
        if self.defaults.role_permissions.is_empty() {
            return Ok(());
        }

        let current = ctx.roles.get_claims(&role.id).await?;
        for permission in &self.defaults.role_permissions {
            let already_granted = current
                .iter()
                .any(|c| c.claim_type == PERMISSION_CLAIM_TYPE && &c.claim_value == permission);
            if !already_granted {
                info!(
                    "Seeding {} permission '{}' for '{}' tenant.",
                    role.name, permission, ctx.tenant.id
                );
                ctx.roles
                    .add_claim(&RoleClaim {
                        role_id: role.id.clone(),
                        claim_type: PERMISSION_CLAIM_TYPE.to_string(),
                        claim_value: permission.clone(),
                    })
                    .await?;
            }
        }
        Ok(())
    }

    /// Skipped entirely when the tenant has no id or no admin email.
    async fn seed_admin_user(&self, ctx: &SeedContext) -> Result<(), AppError> {
        if ctx.tenant.id.trim().is_empty() || ctx.tenant.admin_email.trim().is_empty() {
            return Ok(());
        }

        let admin = match ctx
            .users
            .find_by_email(&ctx.tenant.id, &ctx.tenant.admin_email)
            .await?
        {
            Some(user) => user,
            None => {
                match ctx
                    .users
                    .find_by_username(&ctx.tenant.id, &self.defaults.admin_username)
                    .await?
                {
                    Some(user) => user,
                    None => {
                        info!("Seeding default admin user for '{}' tenant.", ctx.tenant.id);
                        let user = User::new(
                            ctx.tenant.id.clone(),
                            self.defaults.admin_username.clone(),
                            self.defaults.admin_display_name.clone(),
                            ctx.tenant.admin_email.clone(),
                            self.hash_password(&self.defaults.admin_initial_password)?,
                        );
                        ctx.users.create(&user).await?
                    }
                }
            }
        };

        self.assign_roles_to_admin(ctx, &admin.id).await
    }

    /// Assigns every default role except the reserved first one. A rejected
    /// assignment is logged and skipped; an unexpected repository error is
    /// logged and re-raised, ending the loop early.
    async fn assign_roles_to_admin(&self, ctx: &SeedContext, admin_id: &str) -> Result<(), AppError> {
        let Some(admin) = ctx.users.find_by_id(&ctx.tenant.id, admin_id).await? else {
            return Ok(());
        };

        for role_name in self.defaults.roles.iter().skip(1) {
            match ctx
                .users
                .assign_role(&ctx.tenant.id, &admin.id, role_name)
                .await
            {
                Ok(true) => {
                    info!("Role '{}' assigned to user '{}'.", role_name, admin.username);
                }
                Ok(false) => {
                    error!(
                        "Failed to assign role '{}' to user '{}'.",
                        role_name, admin.username
                    );
                }
                Err(e) => {
                    error!(
                        "Unexpected error assigning role '{}' to user '{}': {}",
                        role_name, admin.username, e
                    );
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    async fn run_custom_steps(
        &self,
        ctx: &SeedContext,
        cancel: &CancellationToken,
    ) -> Result<(), AppError> {
        for step in &self.steps {
            if cancel.is_cancelled() {
                return Err(AppError::Cancelled);
            }
            step.run(ctx, cancel).await?;
        }
        Ok(())
    }

    fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut rand::thread_rng());
        Ok(Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {e}")))?
            .to_string())
    }
}
