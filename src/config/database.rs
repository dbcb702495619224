use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::env;
use std::time::Duration;

/// Connection pool settings. DATABASE_URL itself is checked by the startup
/// `validate_config()` pass; here it is required.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
}

impl DatabaseConfig {
    pub fn from_env() -> Self {
        let url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        Self {
            url,
            max_connections: pool_size_from_env("DB_MAX_CONNECTIONS", 10),
            min_connections: pool_size_from_env("DB_MIN_CONNECTIONS", 2),
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(300),
        }
    }

    fn connect_options(&self) -> ConnectOptions {
        let mut opt = ConnectOptions::new(self.url.clone());
        opt.max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .connect_timeout(self.connect_timeout)
            .idle_timeout(self.idle_timeout)
            .sqlx_logging(true);
        opt
    }
}

fn pool_size_from_env(var_name: &str, default: u32) -> u32 {
    match env::var(var_name) {
        Ok(raw) => match raw.trim().parse::<u32>() {
            Ok(n) if n > 0 => n,
            _ => {
                tracing::warn!("Invalid {} '{}', using {}", var_name, raw, default);
                default
            }
        },
        Err(_) => default,
    }
}

pub async fn get_database() -> Result<DatabaseConnection, DbErr> {
    let config = DatabaseConfig::from_env();
    Database::connect(config.connect_options()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_size_defaults_when_unset() {
        assert_eq!(pool_size_from_env("DB_POOL_VAR_THAT_IS_NOT_SET", 10), 10);
    }

    #[test]
    fn pool_size_rejects_zero() {
        std::env::set_var("DB_TEST_POOL_ZERO", "0");
        assert_eq!(pool_size_from_env("DB_TEST_POOL_ZERO", 7), 7);
    }

    #[test]
    fn pool_size_parses_valid_value() {
        std::env::set_var("DB_TEST_POOL_VALID", "25");
        assert_eq!(pool_size_from_env("DB_TEST_POOL_VALID", 10), 25);
    }
}
