//! Plant: a physical monitoring device that a user can claim.

use serde::{Deserialize, Serialize};

use crate::error::{PotbotError, ValidationError};
use crate::id::{PlantId, UserId};

/// A provisioned plant device, optionally claimed by an owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plant {
    pub id: PlantId,
    pub owner: Option<UserId>,
    pub name: Option<String>,
    pub kind: Option<String>,
}

impl Plant {
    /// A freshly provisioned plant, not yet claimed by anyone.
    #[must_use]
    pub fn unclaimed(id: PlantId) -> Self {
        Self {
            id,
            owner: None,
            name: None,
            kind: None,
        }
    }

    #[must_use]
    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.owner == Some(user)
    }

    /// Check that `user` may act on this plant.
    ///
    /// Unclaimed plants belong to nobody, so every user is refused.
    ///
    /// # Errors
    ///
    /// Returns [`PotbotError::Forbidden`] when `user` is not the owner.
    pub fn ensure_owner(&self, user: UserId) -> Result<(), PotbotError> {
        if self.is_owned_by(user) {
            Ok(())
        } else {
            Err(PotbotError::Forbidden)
        }
    }
}

/// Listing row returned to the owner of a plant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantSummary {
    #[serde(rename = "plantName")]
    pub name: String,
    #[serde(rename = "plantID")]
    pub id: PlantId,
    #[serde(rename = "type")]
    pub kind: String,
}

impl From<Plant> for PlantSummary {
    fn from(plant: Plant) -> Self {
        Self {
            name: plant.name.unwrap_or_default(),
            id: plant.id,
            kind: plant.kind.unwrap_or_default(),
        }
    }
}

/// A user's request to take ownership of a provisioned plant.
#[derive(Debug, Clone)]
pub struct PlantClaim {
    pub plant_id: PlantId,
    pub name: String,
    pub kind: String,
}

impl PlantClaim {
    /// Validate raw claim input.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] when the plant id or the
    /// plant type is blank. The display name may be empty.
    pub fn new(
        plant_id: &str,
        name: impl Into<String>,
        kind: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let plant_id = PlantId::new(plant_id)?;
        let kind = kind.into();
        if kind.trim().is_empty() {
            return Err(ValidationError::MissingField("type"));
        }
        Ok(Self {
            plant_id,
            name: name.into(),
            kind,
        })
    }
}
