//! Storage port: repository traits for persistence.

use std::future::Future;

use potbot_domain::credentials::SecretHash;
use potbot_domain::error::PotbotError;
use potbot_domain::id::{PlantId, UserId};
use potbot_domain::plant::{Plant, PlantClaim};
use potbot_domain::reading::{ReadingRange, SensorReading};
use potbot_domain::user::{NewUser, User, UserRecord};

/// The single read the credential verifier needs from the relational store.
pub trait PlantIdentityStore {
    /// Fetch the stored secret hash for `plant_id`, or `None` when the
    /// plant was never provisioned.
    fn find_secret_hash(
        &self,
        plant_id: &PlantId,
    ) -> impl Future<Output = Result<Option<SecretHash>, PotbotError>> + Send;
}

/// Plant provisioning, ownership and lookup.
pub trait PlantRepository {
    /// Insert a new unclaimed plant.
    ///
    /// Returns `false` without writing when the id is already taken.
    fn insert_provisioned(
        &self,
        plant_id: &PlantId,
        secret_hash: &SecretHash,
    ) -> impl Future<Output = Result<bool, PotbotError>> + Send;

    fn get_by_id(
        &self,
        plant_id: &PlantId,
    ) -> impl Future<Output = Result<Option<Plant>, PotbotError>> + Send;

    /// Assign `owner` to a plant that has no owner yet.
    ///
    /// Returns `false` when the plant does not exist or is already owned.
    fn claim(
        &self,
        owner: UserId,
        claim: &PlantClaim,
    ) -> impl Future<Output = Result<bool, PotbotError>> + Send;

    fn list_by_owner(
        &self,
        owner: UserId,
    ) -> impl Future<Output = Result<Vec<Plant>, PotbotError>> + Send;

    /// Email of the user owning `plant_id`, if the plant is claimed.
    fn owner_email(
        &self,
        plant_id: &PlantId,
    ) -> impl Future<Output = Result<Option<String>, PotbotError>> + Send;
}

/// User accounts.
pub trait UserRepository {
    /// Persist a new account.
    ///
    /// Implementations return [`PotbotError::Conflict`] when the email or
    /// username is already in use.
    fn create(&self, user: NewUser) -> impl Future<Output = Result<User, PotbotError>> + Send;

    fn get_by_id(
        &self,
        id: UserId,
    ) -> impl Future<Output = Result<Option<User>, PotbotError>> + Send;

    fn find_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<UserRecord>, PotbotError>> + Send;
}

/// Append-only sensor reading log.
pub trait ReadingRepository {
    fn record(
        &self,
        reading: SensorReading,
    ) -> impl Future<Output = Result<(), PotbotError>> + Send;

    /// Readings of `plant_id` inside `range`, newest first.
    fn find_in_range(
        &self,
        plant_id: &PlantId,
        range: ReadingRange,
    ) -> impl Future<Output = Result<Vec<SensorReading>, PotbotError>> + Send;
}
