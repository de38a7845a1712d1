use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use tracing::error;

use crate::config::PasswordConfig;

/// Salted Argon2id hashing with a tunable cost. Digests are PHC strings, so
/// the salt and parameters travel inside the digest.
#[derive(Clone)]
pub struct PasswordHashing {
    params: Params,
}

impl PasswordHashing {
    pub fn new(config: &PasswordConfig) -> anyhow::Result<Self> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            None,
        )
        .map_err(|e| anyhow::anyhow!("invalid argon2 params: {e}"))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    pub fn hash(&self, plain: &str) -> anyhow::Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| {
                error!(error = %e, "argon2 hash_password error");
                anyhow::anyhow!(e.to_string())
            })?
            .to_string();
        Ok(hash)
    }

    /// `Ok(false)` on mismatch, `Err` only when the digest cannot be parsed.
    pub fn verify(&self, plain: &str, hash: &str) -> anyhow::Result<bool> {
        let parsed = PasswordHash::new(hash).map_err(|e| {
            error!(error = %e, "argon2 parse hash error");
            anyhow::anyhow!(e.to_string())
        })?;
        // parameters are read back from the digest itself
        Ok(self
            .argon2()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok())
    }

    pub async fn hash_blocking(&self, plain: String) -> anyhow::Result<String> {
        let this = self.clone();
        tokio::task::spawn_blocking(move || this.hash(&plain))
            .await
            .map_err(|e| anyhow::anyhow!("hash task join error: {e}"))?
    }

    pub async fn verify_blocking(&self, plain: String, hash: String) -> anyhow::Result<bool> {
        let this = self.clone();
        tokio::task::spawn_blocking(move || this.verify(&plain, &hash))
            .await
            .map_err(|e| anyhow::anyhow!("verify task join error: {e}"))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> PasswordHashing {
        PasswordHashing::new(&PasswordConfig {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .expect("valid params")
    }

    #[test]
    fn hash_and_verify_roundtrip() {
        let hasher = cheap();
        let password = "Secur3P@ssw0rd!";
        let hash = hasher.hash(password).expect("hashing should succeed");
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn same_password_hashes_differently() {
        let hasher = cheap();
        let a = hasher.hash("password1").expect("hash");
        let b = hasher.hash("password1").expect("hash");
        assert_ne!(a, b);
        assert!(hasher.verify("password1", &a).expect("verify"));
        assert!(hasher.verify("password1", &b).expect("verify"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hasher = cheap();
        let hash = hasher.hash("correct-horse-battery-staple").expect("hash");
        assert!(!hasher.verify("wrong-password", &hash).expect("verify should not error"));
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = cheap().verify("anything", "not-a-valid-hash").unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn digest_from_other_cost_still_verifies() {
        let stronger = PasswordHashing::new(&PasswordConfig {
            memory_kib: 2048,
            iterations: 2,
            parallelism: 1,
        })
        .expect("valid params");
        let hash = stronger.hash("password1").expect("hash");
        assert!(cheap().verify("password1", &hash).expect("verify"));
    }

    #[test]
    fn rejects_invalid_params() {
        assert!(PasswordHashing::new(&PasswordConfig {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        })
        .is_err());
    }

    #[tokio::test]
    async fn blocking_wrappers_roundtrip() {
        let hasher = cheap();
        let hash = hasher.hash_blocking("password1".into()).await.expect("hash");
        assert!(hasher
            .verify_blocking("password1".into(), hash.clone())
            .await
            .expect("verify"));
        assert!(!hasher
            .verify_blocking("password2".into(), hash)
            .await
            .expect("verify"));
    }
}
