use argon2::{
    password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use tracing::error;

use crate::config::HashConfig;

#[derive(Debug, thiserror::Error)]
pub enum HashError {
    #[error("invalid hash cost parameters: {0}")]
    Params(argon2::Error),
    #[error("password hashing failed: {0}")]
    Hash(argon2::password_hash::Error),
}

/// Salted argon2id hashing with configurable cost.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    pub fn new(cfg: HashConfig) -> Result<Self, HashError> {
        let params = Params::new(cfg.memory_kib, cfg.iterations, cfg.parallelism, None)
            .map_err(HashError::Params)?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    pub fn hash(&self, plain: &str) -> Result<String, HashError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| {
                error!(error = %e, "argon2 hash_password error");
                HashError::Hash(e)
            })?
            .to_string();
        Ok(hash)
    }

    /// Checks `plain` against a stored PHC string. Cost parameters are read
    /// from the hash itself, so hashes made under older settings still verify.
    #[allow(dead_code)]
    pub fn verify(&self, plain: &str, hash: &str) -> Result<bool, HashError> {
        let parsed = PasswordHash::new(hash).map_err(|e| {
            error!(error = %e, "argon2 parse hash error");
            HashError::Hash(e)
        })?;
        Ok(self
            .argon2
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
pub(crate) fn cheap_hasher() -> PasswordHasher {
    PasswordHasher::new(HashConfig {
        memory_kib: Params::MIN_M_COST,
        iterations: 1,
        parallelism: 1,
    })
    .expect("minimal argon2 params are valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let hasher = cheap_hasher();
        let password = "Secur3P@ssw0rd!";
        let hash = hasher.hash(password).expect("hashing should succeed");
        assert_ne!(hash, password);
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hasher = cheap_hasher();
        let hash = hasher.hash("correct-horse-battery-staple").unwrap();
        assert!(!hasher.verify("wrong-password", &hash).expect("verify should not error"));
    }

    #[test]
    fn same_password_gets_fresh_salt() {
        let hasher = cheap_hasher();
        let a = hasher.hash("repeat-me").unwrap();
        let b = hasher.hash("repeat-me").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = cheap_hasher().verify("anything", "not-a-valid-hash").unwrap_err();
        assert!(matches!(err, HashError::Hash(_)));
    }

    #[test]
    fn zero_iterations_is_rejected() {
        let err = PasswordHasher::new(HashConfig {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: 0,
            parallelism: 1,
        })
        .err()
        .expect("t_cost of zero is invalid");
        assert!(matches!(err, HashError::Params(_)));
    }

    #[test]
    fn default_costs_hash_and_verify() {
        let hasher = PasswordHasher::new(HashConfig::default()).unwrap();
        let hash = hasher.hash("default-cost").unwrap();
        assert!(hasher.verify("default-cost", &hash).unwrap());
    }
}
