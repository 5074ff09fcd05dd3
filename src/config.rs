use anyhow::{Context, Result};
use std::env;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::rate_limit::{parse_route_rules, GovernorConfig, RateRule, DEFAULT_SCOPE};

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub rate_limit: RateLimitConfig,
    pub admin: AdminConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Persistence is optional; without a URL the API runs without a pool.
    pub url: Option<String>,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub governor: GovernorConfig,
    /// Honour `X-Forwarded-For` / `X-Real-IP` when deriving the client key.
    pub trust_proxy: bool,
    pub sweep_interval: Duration,
}

#[derive(Clone, Default)]
pub struct AdminConfig {
    pub token: Option<String>,
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("token", &self.token.as_ref().map(|_| "***"))
            .finish()
    }
}

fn var_or<T>(name: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .trim()
        .parse()
        .with_context(|| format!("invalid value for {}", name))
}

impl Config {
    /// Loads `.env` from the working directory (if any) and reads the process
    /// environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::read_env()
    }

    /// Like [`from_env`](Self::from_env) but loads the given dotenv file,
    /// which must exist.
    pub fn from_env_file(path: &Path) -> Result<Self> {
        dotenvy::from_path(path)
            .with_context(|| format!("failed to load env file {}", path.display()))?;
        Self::read_env()
    }

    fn read_env() -> Result<Self> {
        Ok(Self {
            server: ServerConfig {
                port: var_or("PORT", "3000")?,
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                cors_allowed_origins: env::var("ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| "http://localhost:3000,http://localhost:5173".to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
                max_connections: var_or("DB_MAX_CONNECTIONS", "10")?,
                min_connections: var_or("DB_MIN_CONNECTIONS", "1")?,
            },
            rate_limit: RateLimitConfig::from_env()?,
            admin: AdminConfig {
                token: env::var("ADMIN_TOKEN").ok().filter(|s| !s.is_empty()),
            },
        })
    }
}

impl RateLimitConfig {
    /// Reads the `RATE_LIMIT_*` variables. Also used by the admin reload
    /// endpoint, so it does not touch the dotenv file.
    pub fn from_env() -> Result<Self> {
        let default_rule = RateRule::new(
            DEFAULT_SCOPE,
            var_or("RATE_LIMIT_DEFAULT_LIMIT", "1000")?,
            Duration::from_secs(var_or("RATE_LIMIT_DEFAULT_WINDOW_SECS", "3600")?),
        );
        let per_route_rules = parse_route_rules(&env::var("RATE_LIMIT_ROUTES").unwrap_or_default())?;

        let governor = GovernorConfig {
            enabled: var_or("RATE_LIMIT_ENABLED", "true")?,
            default_rule,
            per_route_rules,
        };
        governor.validate()?;

        Ok(Self {
            governor,
            trust_proxy: var_or("RATE_LIMIT_TRUST_PROXY", "false")?,
            sweep_interval: Duration::from_secs(
                var_or::<u64>("RATE_LIMIT_SWEEP_INTERVAL_SECS", "60")?.max(1),
            ),
        })
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            governor: GovernorConfig::default(),
            trust_proxy: false,
            sweep_interval: Duration::from_secs(60),
        }
    }
}
