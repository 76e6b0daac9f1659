use anyhow::Context as _;
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand_core::OsRng;

use crate::domain::repository::PasswordPort;
use crate::error::AccountsServiceError;

/// Argon2id with the crate defaults, producing PHC strings.
///
/// Hashing is CPU-bound, so both operations run on the blocking pool.
#[derive(Clone, Copy, Default)]
pub struct Argon2Hasher;

impl PasswordPort for Argon2Hasher {
    async fn hash(&self, raw: &str) -> Result<String, AccountsServiceError> {
        let raw = raw.to_owned();
        let encoded = tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            Argon2::default()
                .hash_password(raw.as_bytes(), &salt)
                .map(|hash| hash.to_string())
        })
        .await
        .context("join password hashing task")?
        .map_err(|e| anyhow::anyhow!("hash password: {e}"))?;
        Ok(encoded)
    }

    /// A stored value that is not a PHC string never verifies.
    async fn verify(&self, raw: &str, encoded: &str) -> Result<bool, AccountsServiceError> {
        let raw = raw.to_owned();
        let encoded = encoded.to_owned();
        let ok = tokio::task::spawn_blocking(move || {
            PasswordHash::new(&encoded).is_ok_and(|parsed| {
                Argon2::default()
                    .verify_password(raw.as_bytes(), &parsed)
                    .is_ok()
            })
        })
        .await
        .context("join password verification task")?;
        Ok(ok)
    }
}
