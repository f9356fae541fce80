use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct TenantRecord {
    pub id: String,
    pub name: String,
    /// Empty means "use the platform default database".
    pub connection_string: String,
    pub admin_email: String,
    pub issuer: Option<String>,
    pub is_active: bool,
    pub valid_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl TenantRecord {
    pub fn new(
        id: String,
        name: String,
        connection_string: String,
        admin_email: String,
        issuer: Option<String>,
    ) -> Self {
        Self {
            id,
            name,
            connection_string,
            admin_email,
            issuer,
            is_active: false,
            valid_until: None,
            created_at: Utc::now(),
        }
    }

    pub fn activate(&mut self) {
        self.is_active = true;
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    pub fn set_validity(&mut self, valid_until: DateTime<Utc>) {
        self.valid_until = Some(valid_until);
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateTenantRequest {
    pub id: String,
    pub name: String,
    pub connection_string: Option<String>,
    pub admin_email: String,
    pub issuer: Option<String>,
}
