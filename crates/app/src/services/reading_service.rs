//! Reading service: sensor log ingestion and history queries.

use potbot_domain::error::PotbotError;
use potbot_domain::id::{PlantId, UserId};
use potbot_domain::reading::{LogType, ReadingRange, ReadingsByType, SensorReading};
use potbot_domain::time::now;

use crate::ports::{PlantRepository, ReadingRepository};
use crate::services::credential_verifier::VerifiedPlant;
use crate::services::plant_service::owned_plant;

pub struct ReadingService<P, L> {
    plants: P,
    readings: L,
}

impl<P: PlantRepository, L: ReadingRepository> ReadingService<P, L> {
    pub fn new(plants: P, readings: L) -> Self {
        Self { plants, readings }
    }

    /// Store a measurement from a verified device, stamped with server time.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self, plant), fields(plant_id = %plant.plant_id()))]
    pub async fn record(
        &self,
        plant: &VerifiedPlant,
        log_type: LogType,
        value: f64,
    ) -> Result<(), PotbotError> {
        let reading = SensorReading {
            plant_id: plant.plant_id().clone(),
            log_type,
            value,
            recorded_at: now(),
        };
        self.readings.record(reading).await?;
        tracing::debug!("reading stored");
        Ok(())
    }

    /// Readings of a plant owned by `user` within `range`, newest first and
    /// grouped by type.
    ///
    /// # Errors
    ///
    /// Returns [`PotbotError::NotFound`] or [`PotbotError::Forbidden`] when
    /// the ownership check fails, or a storage error.
    #[tracing::instrument(skip(self))]
    pub async fn history(
        &self,
        user: UserId,
        plant_id: &PlantId,
        range: ReadingRange,
    ) -> Result<ReadingsByType, PotbotError> {
        owned_plant(&self.plants, user, plant_id).await?;
        let readings = self.readings.find_in_range(plant_id, range).await?;
        Ok(ReadingsByType::group(readings))
    }
}
