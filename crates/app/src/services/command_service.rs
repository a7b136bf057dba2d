//! Command service: the two guarded entry points into the command queue.
//!
//! Users enqueue only for plants they own; devices drain only their own
//! mailbox, proven by a [`VerifiedPlant`].

use potbot_domain::command::Command;
use potbot_domain::error::PotbotError;
use potbot_domain::id::{PlantId, UserId};

use crate::ports::{CommandMailbox, PlantRepository};
use crate::services::credential_verifier::VerifiedPlant;
use crate::services::plant_service::owned_plant;

pub struct CommandService<R, Q> {
    plants: R,
    queue: Q,
}

impl<R: PlantRepository, Q: CommandMailbox> CommandService<R, Q> {
    pub fn new(plants: R, queue: Q) -> Self {
        Self { plants, queue }
    }

    /// Queue `command` for a plant owned by `user`.
    ///
    /// # Errors
    ///
    /// Returns [`PotbotError::NotFound`] for an unknown plant,
    /// [`PotbotError::Forbidden`] when `user` is not the owner, or a storage
    /// error from the ownership lookup.
    #[tracing::instrument(
        skip(self, plant_id, command),
        fields(plant_id = %plant_id, command = %command)
    )]
    pub async fn issue(
        &self,
        user: UserId,
        plant_id: PlantId,
        command: Command,
    ) -> Result<(), PotbotError> {
        owned_plant(&self.plants, user, &plant_id).await?;
        self.queue.enqueue(plant_id, command);
        tracing::info!("command queued");
        Ok(())
    }

    /// Hand the device every command queued since its last poll.
    #[must_use]
    pub fn fetch(&self, plant: &VerifiedPlant) -> Vec<Command> {
        let commands = self.queue.drain(plant.plant_id());
        if !commands.is_empty() {
            tracing::debug!(
                plant_id = %plant.plant_id(),
                count = commands.len(),
                "commands delivered"
            );
        }
        commands
    }
}
