use anyhow::{Context, Result};
use serde::Deserialize;

/// Process-wide authentication configuration.
///
/// Loaded once at startup and never mutated; the signing key and hashing cost
/// live here rather than in ambient global state.
#[derive(Clone, Debug, Deserialize)]
pub struct AuthConfig {
    /// Symmetric HS256 signing secret. Required.
    pub jwt_secret: String,
    /// Token lifetime in seconds (default 24h).
    pub token_ttl_secs: i64,
    /// `iss` claim stamped into and required from every token.
    pub issuer: String,
    /// Argon2id memory cost in KiB.
    pub hash_memory_kib: u32,
    /// Argon2id iteration count.
    pub hash_iterations: u32,
    /// Argon2id lane count.
    pub hash_parallelism: u32,
}

pub const DEFAULT_TOKEN_TTL_SECS: i64 = 86_400;
pub const DEFAULT_ISSUER: &str = "cikulche-auth";

// Argon2id defaults per the argon2 crate's recommended parameters, tuned so a
// single hash stays within an interactive latency budget.
pub const DEFAULT_HASH_MEMORY_KIB: u32 = 19_456;
pub const DEFAULT_HASH_ITERATIONS: u32 = 2;
pub const DEFAULT_HASH_PARALLELISM: u32 = 1;

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>, token_ttl_secs: i64) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl_secs,
            issuer: DEFAULT_ISSUER.to_string(),
            hash_memory_kib: DEFAULT_HASH_MEMORY_KIB,
            hash_iterations: DEFAULT_HASH_ITERATIONS,
            hash_parallelism: DEFAULT_HASH_PARALLELISM,
        }
    }

    /// Load from the environment. `JWT_SECRET` is mandatory; everything else
    /// falls back to defaults.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let jwt_secret = std::env::var("JWT_SECRET")
            .context("JWT_SECRET must be set")?;

        Ok(Self {
            jwt_secret,
            token_ttl_secs: env_parse("TOKEN_TTL_SECS", DEFAULT_TOKEN_TTL_SECS),
            issuer: std::env::var("TOKEN_ISSUER")
                .unwrap_or_else(|_| DEFAULT_ISSUER.to_string()),
            hash_memory_kib: env_parse("HASH_MEMORY_KIB", DEFAULT_HASH_MEMORY_KIB),
            hash_iterations: env_parse("HASH_ITERATIONS", DEFAULT_HASH_ITERATIONS),
            hash_parallelism: env_parse("HASH_PARALLELISM", DEFAULT_HASH_PARALLELISM),
        })
    }
}

fn env_parse<T: std::str::FromStr + Copy>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring unparsable {}: {:?}", key, raw);
            default
        }),
        Err(_) => default,
    }
}

/// Database connection settings for the Postgres-backed user store.
#[derive(Clone, Debug, Deserialize)]
pub struct DatabaseConfig {
    pub database_url: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .context("DATABASE_URL must be set")?,
            max_connections: env_parse("DATABASE_MAX_CONNECTIONS", 10),
        })
    }
}
