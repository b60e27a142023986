use std::env;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a number, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    /// Username of the fallback owner/editor for deleted accounts
    pub sentinel_username: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let max_connections = env::var("DATABASE_MAX_CONNECTIONS").unwrap_or_else(|_| "5".to_string());

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:kitchen.db?mode=rwc".to_string()),
            max_connections: max_connections
                .parse()
                .map_err(|_| ConfigError::InvalidNumber {
                    name: "DATABASE_MAX_CONNECTIONS",
                    value: max_connections.clone(),
                })?,
            sentinel_username: env::var("SENTINEL_USERNAME")
                .unwrap_or_else(|_| "admin".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure config tests run serially (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        env::remove_var("DATABASE_URL");
        env::remove_var("DATABASE_MAX_CONNECTIONS");
        env::remove_var("SENTINEL_USERNAME");
    }

    #[test]
    fn test_config_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();

        let config = Config::from_env().unwrap();

        assert_eq!(config.database_url, "sqlite:kitchen.db?mode=rwc");
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.sentinel_username, "admin");
    }

    #[test]
    fn test_config_from_env() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();

        env::set_var("DATABASE_URL", "sqlite:test.db");
        env::set_var("DATABASE_MAX_CONNECTIONS", "2");
        env::set_var("SENTINEL_USERNAME", "deleted-user");

        let config = Config::from_env().unwrap();

        assert_eq!(config.database_url, "sqlite:test.db");
        assert_eq!(config.max_connections, 2);
        assert_eq!(config.sentinel_username, "deleted-user");

        // Clean up
        clear_env();
    }

    #[test]
    fn test_config_rejects_invalid_pool_size() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();

        env::set_var("DATABASE_MAX_CONNECTIONS", "many");

        let err = Config::from_env().unwrap_err();
        assert_eq!(
            err.to_string(),
            "DATABASE_MAX_CONNECTIONS must be a number, got \"many\""
        );

        clear_env();
    }
}
