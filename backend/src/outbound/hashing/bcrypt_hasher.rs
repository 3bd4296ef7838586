//! bcrypt-backed `PasswordHasher`.
//!
//! bcrypt is CPU bound, so both operations run on the blocking pool.

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::PasswordHash;
use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Lowest cost accepted for stored hashes.
pub const MIN_BCRYPT_COST: u32 = 10;
/// Cost used when none is configured.
pub const DEFAULT_BCRYPT_COST: u32 = 12;
/// Highest cost bcrypt accepts (mirrors the crate's private `MAX_COST`).
const MAX_BCRYPT_COST: u32 = 31;

/// Hashes passwords with bcrypt at a fixed cost.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// Create a hasher; costs below [`MIN_BCRYPT_COST`] are raised to it.
    #[must_use]
    pub fn new(cost: u32) -> Self {
        Self {
            cost: cost.clamp(MIN_BCRYPT_COST, MAX_BCRYPT_COST),
        }
    }

    /// Cost in effect after clamping.
    #[must_use]
    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_BCRYPT_COST)
    }
}

async fn run_blocking<T, F>(task: F) -> Result<T, PasswordHashError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, bcrypt::BcryptError> + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| PasswordHashError::hashing(format!("hashing task failed: {err}")))?
        .map_err(|err| PasswordHashError::hashing(err.to_string()))
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError> {
        let password = Zeroizing::new(password.to_owned());
        let cost = self.cost;
        let hashed = run_blocking(move || bcrypt::hash(password.as_bytes(), cost)).await?;
        Ok(PasswordHash::new(hashed))
    }

    async fn verify(
        &self,
        password: &str,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHashError> {
        let password = Zeroizing::new(password.to_owned());
        let hash = hash.as_ref().to_owned();
        run_blocking(move || bcrypt::verify(password.as_bytes(), &hash)).await
    }
}
