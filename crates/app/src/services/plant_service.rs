//! Plant service: provisioning, claiming and listing plants.

use rand::Rng;

use potbot_domain::credentials::{IssuedCredentials, PLANT_SECRET_LENGTH};
use potbot_domain::error::{ConflictError, NotFoundError, PotbotError, ValidationError};
use potbot_domain::id::{PLANT_SERIAL_SPACE, PlantId, UserId};
use potbot_domain::plant::{Plant, PlantClaim, PlantSummary};

use crate::ports::PlantRepository;
use crate::secret::{SecretHasher, generate_secret};

/// Number of plants created by one provisioning run when unspecified.
pub const DEFAULT_PROVISION_BATCH: usize = 10;
/// Largest provisioning run accepted at once.
pub const MAX_PROVISION_BATCH: usize = 100;

/// Random ids tried per requested plant before giving up on a crowded id space.
const MAX_ATTEMPTS_PER_PLANT: usize = 50;

#[derive(Debug, thiserror::Error)]
#[error("could not find a free plant id after {attempts} attempts")]
struct IdSpaceExhausted {
    attempts: usize,
}

/// Application service for the plant lifecycle.
pub struct PlantService<R> {
    repo: R,
    hasher: SecretHasher,
}

impl<R: PlantRepository> PlantService<R> {
    pub fn new(repo: R, hasher: SecretHasher) -> Self {
        Self { repo, hasher }
    }

    /// Create `count` unclaimed plants with fresh random ids and secrets.
    ///
    /// The plaintext secrets are only ever returned here; the store keeps
    /// their hashes.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidBatchSize`] when `count` is zero or
    /// above [`MAX_PROVISION_BATCH`], a storage or hashing error, or
    /// [`PotbotError::Internal`] when no free id can be found.
    #[tracing::instrument(skip(self))]
    pub async fn provision(&self, count: usize) -> Result<Vec<IssuedCredentials>, PotbotError> {
        if !(1..=MAX_PROVISION_BATCH).contains(&count) {
            return Err(ValidationError::InvalidBatchSize {
                max: MAX_PROVISION_BATCH,
            }
            .into());
        }

        let mut issued = Vec::with_capacity(count);
        let max_attempts = count.saturating_mul(MAX_ATTEMPTS_PER_PLANT);
        let mut attempts = 0;

        while issued.len() < count {
            if attempts >= max_attempts {
                return Err(PotbotError::Internal(Box::new(IdSpaceExhausted { attempts })));
            }
            attempts += 1;

            let plant_id = random_plant_id();
            let secret = generate_secret(PLANT_SECRET_LENGTH);
            let hash = self.hasher.hash(secret.clone()).await?;
            if self.repo.insert_provisioned(&plant_id, &hash).await? {
                issued.push(IssuedCredentials { plant_id, secret });
            } else {
                tracing::debug!(%plant_id, "plant id already taken, retrying");
            }
        }

        tracing::info!(count = issued.len(), "plants provisioned");
        Ok(issued)
    }

    /// Give `owner` a provisioned plant that nobody owns yet.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownPlant`] when the id was never
    /// provisioned, [`ConflictError::PlantAlreadyClaimed`] when someone owns
    /// it, or a storage error.
    #[tracing::instrument(skip(self, claim), fields(plant_id = %claim.plant_id))]
    pub async fn claim(&self, owner: UserId, claim: PlantClaim) -> Result<(), PotbotError> {
        let Some(plant) = self.repo.get_by_id(&claim.plant_id).await? else {
            return Err(ValidationError::UnknownPlant.into());
        };
        if plant.owner.is_some() {
            return Err(ConflictError::PlantAlreadyClaimed.into());
        }
        // Another request may have claimed it since the read above.
        if !self.repo.claim(owner, &claim).await? {
            return Err(ConflictError::PlantAlreadyClaimed.into());
        }
        tracing::info!(%owner, "plant claimed");
        Ok(())
    }

    /// List the plants owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_for_owner(&self, owner: UserId) -> Result<Vec<PlantSummary>, PotbotError> {
        let plants = self.repo.list_by_owner(owner).await?;
        Ok(plants.into_iter().map(PlantSummary::from).collect())
    }
}

/// Load `plant_id` and check that `user` owns it.
///
/// # Errors
///
/// Returns [`PotbotError::NotFound`] when the plant does not exist and
/// [`PotbotError::Forbidden`] when it belongs to someone else or to nobody.
pub(crate) async fn owned_plant<R: PlantRepository>(
    repo: &R,
    user: UserId,
    plant_id: &PlantId,
) -> Result<Plant, PotbotError> {
    let plant = repo.get_by_id(plant_id).await?.ok_or_else(|| NotFoundError {
        entity: "Plant",
        id: plant_id.to_string(),
    })?;
    plant.ensure_owner(user)?;
    Ok(plant)
}

fn random_plant_id() -> PlantId {
    PlantId::from_serial(rand::thread_rng().gen_range(0..PLANT_SERIAL_SPACE))
}
