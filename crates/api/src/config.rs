use consign_database::{ConfigError, DatabaseConfig};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub database: DatabaseConfig,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    /// Requests per client per window on `/api`
    pub rate_limit_max_requests: u32,
    pub rate_limit_window: Duration,
    /// Largest accepted request body
    pub body_limit_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Every missing required variable is reported at once
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database = DatabaseConfig::from_lookup(&lookup);
        let jwt_secret = lookup("JWT_SECRET").filter(|v| !v.is_empty());

        let (database, jwt_secret) = match (database, jwt_secret) {
            (Ok(database), Some(secret)) => (database, secret),
            (Ok(_), None) => return Err(ConfigError::Missing(vec!["JWT_SECRET".to_string()])),
            (Err(ConfigError::Missing(mut missing)), secret) => {
                if secret.is_none() {
                    missing.push("JWT_SECRET".to_string());
                }
                return Err(ConfigError::Missing(missing));
            }
        };

        Ok(Self {
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            server_port: lookup("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(5000),
            database,
            jwt_secret,
            jwt_expiration_hours: lookup("JWT_EXPIRATION_HOURS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(consign_auth::jwt::DEFAULT_EXPIRATION_HOURS),
            rate_limit_max_requests: lookup("RATE_LIMIT_MAX_REQUESTS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),
            rate_limit_window: lookup("RATE_LIMIT_WINDOW_SECS")
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(Duration::from_secs(15 * 60)),
            body_limit_bytes: lookup("BODY_LIMIT_BYTES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(10 * 1024),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_missing_everything() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        let ConfigError::Missing(names) = err;
        assert_eq!(
            names,
            vec!["DB_HOST", "DB_USER", "DB_PASS", "DB_NAME", "JWT_SECRET"]
        );
    }

    #[test]
    fn test_missing_jwt_secret_only() {
        let err = Config::from_lookup(lookup_from(&[
            ("DB_HOST", "db"),
            ("DB_USER", "shop"),
            ("DB_PASS", "secret"),
            ("DB_NAME", "consignment"),
        ]))
        .unwrap_err();
        assert_eq!(err.to_string(), "Missing required environment variables: JWT_SECRET");
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("DB_HOST", "db"),
            ("DB_USER", "shop"),
            ("DB_PASS", "secret"),
            ("DB_NAME", "consignment"),
            ("JWT_SECRET", "jwt-secret"),
        ]))
        .unwrap();

        assert_eq!(config.server_host, "0.0.0.0");
        assert_eq!(config.server_port, 5000);
        assert_eq!(config.jwt_expiration_hours, 168);
        assert_eq!(config.database.tenant_database_prefix, "consignment_");
        assert_eq!(config.rate_limit_max_requests, 100);
        assert_eq!(config.rate_limit_window, Duration::from_secs(900));
        assert_eq!(config.body_limit_bytes, 10 * 1024);
    }
}
