use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

/// Argon2 cost parameters.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct HashConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            memory_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_path: String,
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    pub hash: HashConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_path = std::env::var("DB").context("DB must point at the sqlite database file")?;
        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = env_or("PORT", 8080)?;
        let request_timeout_secs = env_or("REQUEST_TIMEOUT_SECS", 10)?;

        let defaults = HashConfig::default();
        let hash = HashConfig {
            memory_kib: env_or("HASH_MEMORY_KIB", defaults.memory_kib)?,
            iterations: env_or("HASH_ITERATIONS", defaults.iterations)?,
            parallelism: env_or("HASH_PARALLELISM", defaults.parallelism)?,
        };

        Ok(Self {
            database_path,
            host,
            port,
            request_timeout_secs,
            hash,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Reads `key` and parses it, falling back to `default` when unset.
/// A set but unparsable value is an error rather than silently ignored.
fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid value for {key}: {raw:?}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_or_falls_back_when_unset() {
        let v: u16 = env_or("USERS_API_TEST_SURELY_UNSET", 8080).unwrap();
        assert_eq!(v, 8080);
    }

    #[test]
    fn env_or_rejects_garbage() {
        std::env::set_var("USERS_API_TEST_BAD_PORT", "eighty");
        let err = env_or::<u16>("USERS_API_TEST_BAD_PORT", 8080).unwrap_err();
        assert!(err.to_string().contains("USERS_API_TEST_BAD_PORT"));
    }

    #[test]
    fn env_or_parses_set_value() {
        std::env::set_var("USERS_API_TEST_TIMEOUT", " 25 ");
        let v: u64 = env_or("USERS_API_TEST_TIMEOUT", 10).unwrap();
        assert_eq!(v, 25);
    }

    #[test]
    fn hash_defaults_match_argon2() {
        let h = HashConfig::default();
        assert_eq!(h.memory_kib, argon2::Params::DEFAULT_M_COST);
        assert_eq!(h.iterations, argon2::Params::DEFAULT_T_COST);
        assert_eq!(h.parallelism, argon2::Params::DEFAULT_P_COST);
    }
}
