use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid state: {0}")]
    InvalidState(String),
    #[error("Provisioning failed for tenant '{tenant_id}'")]
    Provisioning {
        tenant_id: String,
        #[source]
        source: Box<AppError>,
    },
    #[error("Seeding failed for tenant '{tenant_id}'")]
    Seeding {
        tenant_id: String,
        #[source]
        source: Box<AppError>,
    },
    #[error("Operation cancelled")]
    Cancelled,
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Checks whether a sqlx error is a unique-constraint violation.
///
/// 1555/2067 = SQLite primary key / unique index violation
/// 23505 = PostgreSQL unique violation
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = e {
        let code = db_err.code().unwrap_or_default();
        return code == "1555" || code == "2067" || code == "23505";
    }
    false
}
