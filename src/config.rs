use anyhow::{ensure, Context};
use serde::Deserialize;

/// Upper bound for `JWT_TTL_MINUTES`: one hundred years.
pub const MAX_TTL_MINUTES: i64 = 525_600 * 100;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    /// Token lifetime. `None` issues tokens without an `exp` claim.
    pub ttl_minutes: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests never touch the process environment.
    pub fn from_vars<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).with_context(|| format!("{key} must be set"));

        let database_url = required("DATABASE_URL")?;
        let ttl_minutes = lookup("JWT_TTL_MINUTES")
            .map(|v| v.parse::<i64>())
            .transpose()
            .context("JWT_TTL_MINUTES must be an integer")?;
        if let Some(minutes) = ttl_minutes {
            ensure!(
                (1..=MAX_TTL_MINUTES).contains(&minutes),
                "JWT_TTL_MINUTES must be between 1 and {MAX_TTL_MINUTES}, got {minutes}"
            );
        }
        let jwt = JwtConfig {
            secret: required("JWT_SECRET")?,
            issuer: lookup("JWT_ISSUER").unwrap_or_else(|| "movies-api".into()),
            audience: lookup("JWT_AUDIENCE").unwrap_or_else(|| "movies-api-users".into()),
            ttl_minutes,
        };
        let db_max_connections = lookup("DB_MAX_CONNECTIONS")
            .map(|v| v.parse::<u32>())
            .transpose()
            .context("DB_MAX_CONNECTIONS must be a positive integer")?
            .unwrap_or(10);
        let port = lookup("APP_PORT")
            .map(|v| v.parse::<u16>())
            .transpose()
            .context("APP_PORT must be a port number")?
            .unwrap_or(8080);

        Ok(Self {
            database_url,
            db_max_connections,
            host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            jwt,
        })
    }
}
