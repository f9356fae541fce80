use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Baseline roles seeded into every tenant database, in seed order.
/// The first entry is the reserved super-admin role and is never
/// bulk-assigned to the seeded default administrator.
pub const DEFAULT_ROLES: [&str; 3] = ["SuperAdmin", "Admin", "Basic"];

pub const PERMISSION_CLAIM_TYPE: &str = "permission";

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Role {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    pub description: String,
}

impl Role {
    pub fn new(tenant_id: String, name: String, description: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tenant_id,
            name,
            description,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct RoleClaim {
    pub role_id: String,
    pub claim_type: String,
    pub claim_value: String,
}
