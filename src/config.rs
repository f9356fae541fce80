use std::env;

#[derive(Clone)]
pub struct Config {
    /// Platform default connection string. Tenants registered with an empty
    /// connection string share this database, partitioned by tenant id.
    pub database_url: String,
    pub max_connections: u32,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            max_connections: env::var("MAX_DB_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .expect("MAX_DB_CONNECTIONS must be a number"),
        }
    }
}
