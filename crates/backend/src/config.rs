use anyhow::{bail, Context, Result};
use std::env;

use crate::auth::password::DEFAULT_COST;
use crate::auth::{AuthConfig, JwtSecret, PasswordHasher};

pub const DEFAULT_PORT: u16 = 3042;

/// Server configuration, read once at startup.
///
/// Required env vars:
/// - `DATABASE_URL`: Postgres connection string
/// - `JWT_SECRET`: Secret key for signing JWTs
///
/// Optional: `PORT`, `TOKEN_ISSUER`, `TOKEN_TTL_SECS`, `BCRYPT_COST`,
/// `DATABASE_TLS`, `CORS_ALLOWED_ORIGINS`.
#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_tls: bool,
    pub port: u16,
    pub auth: AuthConfig,
    pub hasher: PasswordHasher,
    pub cors_allowed_origins: Option<Vec<String>>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let database_url = var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let jwt_secret = JwtSecret::new(var("JWT_SECRET").unwrap_or_default())?;

        let port = match var("PORT") {
            Some(port) => port.parse().context("PORT must be a valid number")?,
            None => DEFAULT_PORT,
        };

        let database_tls = match var("DATABASE_TLS") {
            Some(value) => parse_bool(&value).context("DATABASE_TLS must be true or false")?,
            None => true,
        };

        let mut auth = AuthConfig::new(jwt_secret);
        if let Some(issuer) = var("TOKEN_ISSUER") {
            auth = auth.with_issuer(issuer);
        }
        if let Some(ttl) = var("TOKEN_TTL_SECS") {
            let secs: i64 = ttl
                .parse()
                .context("TOKEN_TTL_SECS must be a whole number of seconds")?;
            if secs <= 0 {
                bail!("TOKEN_TTL_SECS must be positive");
            }
            auth = auth.with_token_ttl(chrono::Duration::seconds(secs));
        }

        let cost = match var("BCRYPT_COST") {
            Some(cost) => cost.parse().context("BCRYPT_COST must be a valid number")?,
            None => DEFAULT_COST,
        };
        let hasher = PasswordHasher::new(cost)?;

        let cors_allowed_origins = var("CORS_ALLOWED_ORIGINS").map(|origins| {
            origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        Ok(Self {
            database_url,
            database_tls,
            port,
            auth,
            hasher,
            cors_allowed_origins,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "disable" => Some(false),
        _ => None,
    }
}
