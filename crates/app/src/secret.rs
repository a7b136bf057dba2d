//! Secret hashing and generation.
//!
//! Device secrets and user passwords are stored as bcrypt hashes. Hashing and
//! verification are CPU-bound, so both run on tokio's blocking pool.

use std::sync::OnceLock;

use rand::Rng;
use rand::distributions::Alphanumeric;

use potbot_domain::credentials::{PlainSecret, SecretHash};
use potbot_domain::error::PotbotError;

/// Smallest cost bcrypt accepts. Only meant for tests.
pub const MIN_COST: u32 = 4;
/// Largest cost bcrypt accepts.
pub const MAX_COST: u32 = 31;

/// Errors raised while hashing a secret.
#[derive(Debug, thiserror::Error)]
pub enum HashingError {
    #[error("bcrypt cost {0} is outside the supported range 4..=31")]
    InvalidCost(u32),

    #[error("bcrypt failure")]
    Bcrypt(#[from] bcrypt::BcryptError),

    #[error("hashing task failed")]
    Join(#[from] tokio::task::JoinError),
}

impl From<HashingError> for PotbotError {
    fn from(err: HashingError) -> Self {
        Self::Internal(Box::new(err))
    }
}

/// bcrypt with a fixed work factor.
#[derive(Debug, Clone, Copy)]
pub struct SecretHasher {
    cost: u32,
}

impl Default for SecretHasher {
    fn default() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl SecretHasher {
    /// # Errors
    ///
    /// Returns [`HashingError::InvalidCost`] when `cost` is outside what
    /// bcrypt supports.
    pub fn new(cost: u32) -> Result<Self, HashingError> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(HashingError::InvalidCost(cost));
        }
        Ok(Self { cost })
    }

    #[must_use]
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash `secret` with a fresh salt.
    ///
    /// # Errors
    ///
    /// Returns a [`HashingError`] if bcrypt fails or the blocking task panics.
    pub async fn hash(&self, secret: PlainSecret) -> Result<SecretHash, HashingError> {
        let cost = self.cost;
        let hashed =
            tokio::task::spawn_blocking(move || bcrypt::hash(secret.expose(), cost)).await??;
        Ok(SecretHash::new(hashed))
    }

    /// Check `secret` against `hash` in constant time.
    ///
    /// Any failure, including a malformed stored hash, counts as a mismatch.
    pub async fn verify(&self, secret: PlainSecret, hash: SecretHash) -> bool {
        let outcome =
            tokio::task::spawn_blocking(move || bcrypt::verify(secret.expose(), hash.as_str()))
                .await;
        match outcome {
            Ok(Ok(matches)) => matches,
            Ok(Err(err)) => {
                tracing::warn!(%err, "stored secret hash could not be checked");
                false
            }
            Err(err) => {
                tracing::error!(%err, "secret verification task failed");
                false
            }
        }
    }
}

/// A hash of a throwaway secret.
///
/// Lookups that find no identity compare the presented secret against it so
/// they cost the same bcrypt work as a real mismatch. Call [`Self::warm`]
/// before serving so the first miss does not pay for building it.
#[derive(Debug, Default)]
pub(crate) struct DecoyHash {
    cell: OnceLock<SecretHash>,
}

impl DecoyHash {
    /// Build the decoy now. A no-op once it exists.
    pub(crate) async fn warm(&self, hasher: &SecretHasher) -> Result<(), HashingError> {
        self.get_or_build(hasher).await.map(drop)
    }

    pub(crate) async fn compare(&self, hasher: &SecretHasher, secret: PlainSecret) {
        match self.get_or_build(hasher).await {
            Ok(decoy) => {
                let _ = hasher.verify(secret, decoy).await;
            }
            Err(err) => tracing::warn!(%err, "could not build decoy hash"),
        }
    }

    async fn get_or_build(&self, hasher: &SecretHasher) -> Result<SecretHash, HashingError> {
        if let Some(hash) = self.cell.get() {
            return Ok(hash.clone());
        }
        let hash = hasher.hash(PlainSecret::new("potbot-decoy")).await?;
        Ok(self.cell.get_or_init(|| hash).clone())
    }

    #[cfg(test)]
    pub(crate) fn is_built(&self) -> bool {
        self.cell.get().is_some()
    }
}

/// Generate a random alphanumeric secret of `len` characters.
#[must_use]
pub fn generate_secret(len: usize) -> PlainSecret {
    let value: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect();
    PlainSecret::new(value)
}
