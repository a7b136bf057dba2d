//! Notification service: relays device alerts to the plant owner.

use potbot_domain::error::{PotbotError, ValidationError};
use potbot_domain::notification::{Email, NotificationKind};

use crate::ports::{Notifier, PlantRepository};
use crate::services::credential_verifier::VerifiedPlant;

pub struct NotificationService<R, N> {
    plants: R,
    notifier: N,
}

impl<R: PlantRepository, N: Notifier> NotificationService<R, N> {
    pub fn new(plants: R, notifier: N) -> Self {
        Self { plants, notifier }
    }

    /// Email the owner of a verified plant.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnclaimedPlant`] when nobody owns the
    /// plant, or any error from storage or the notifier.
    #[tracing::instrument(
        skip(self, plant, kind),
        fields(plant_id = %plant.plant_id(), kind = %kind)
    )]
    pub async fn notify(
        &self,
        plant: &VerifiedPlant,
        kind: NotificationKind,
    ) -> Result<(), PotbotError> {
        let owner_email = self
            .plants
            .owner_email(plant.plant_id())
            .await?
            .ok_or(ValidationError::UnclaimedPlant)?;

        let email = Email::plant_notification(&owner_email, plant.plant_id(), &kind);
        self.notifier.send(email).await?;
        tracing::info!("owner notified");
        Ok(())
    }
}
