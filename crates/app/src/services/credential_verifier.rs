//! Credential verifier: authenticates plant devices.
//!
//! Every device-originated operation starts here. A successful check yields a
//! [`VerifiedPlant`], which the other services demand as proof that the
//! caller is the device it claims to be.

use potbot_domain::credentials::DeviceCredentials;
use potbot_domain::error::PotbotError;
use potbot_domain::id::PlantId;

use crate::ports::PlantIdentityStore;
use crate::secret::{DecoyHash, SecretHasher};

/// Proof that a device presented valid credentials for `plant_id`.
///
/// Only [`CredentialVerifier::verify`] can construct one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedPlant {
    plant_id: PlantId,
}

impl VerifiedPlant {
    #[must_use]
    pub fn plant_id(&self) -> &PlantId {
        &self.plant_id
    }

    #[cfg(test)]
    pub(crate) fn for_tests(plant_id: PlantId) -> Self {
        Self { plant_id }
    }
}

/// Checks device secrets against the salted hashes in the identity store.
pub struct CredentialVerifier<S> {
    store: S,
    hasher: SecretHasher,
    decoy: DecoyHash,
}

impl<S: PlantIdentityStore> CredentialVerifier<S> {
    pub fn new(store: S, hasher: SecretHasher) -> Self {
        Self {
            store,
            hasher,
            decoy: DecoyHash::default(),
        }
    }

    /// Precompute the decoy hash compared against for unknown plants, so
    /// the first unknown id costs no more than later ones.
    ///
    /// # Errors
    ///
    /// Returns [`PotbotError::Internal`] if hashing fails.
    pub async fn warm(&self) -> Result<(), PotbotError> {
        self.decoy.warm(&self.hasher).await?;
        Ok(())
    }

    /// Authenticate a device.
    ///
    /// An unknown plant and a wrong secret both yield
    /// [`PotbotError::Unauthorized`] after the same amount of hashing work.
    ///
    /// # Errors
    ///
    /// Returns [`PotbotError::Unauthorized`] when the credentials do not
    /// match, or a storage error when the identity lookup itself fails.
    #[tracing::instrument(skip(self, credentials), fields(plant_id = %credentials.plant_id))]
    pub async fn verify(
        &self,
        credentials: DeviceCredentials,
    ) -> Result<VerifiedPlant, PotbotError> {
        let DeviceCredentials { plant_id, secret } = credentials;

        let Some(stored) = self.store.find_secret_hash(&plant_id).await? else {
            self.decoy.compare(&self.hasher, secret).await;
            tracing::debug!("device rejected");
            return Err(PotbotError::Unauthorized);
        };

        if self.hasher.verify(secret, stored).await {
            Ok(VerifiedPlant { plant_id })
        } else {
            tracing::debug!("device rejected");
            Err(PotbotError::Unauthorized)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secret::MIN_COST;
    use potbot_domain::credentials::{PlainSecret, SecretHash};
    use std::collections::HashMap;
    use std::future::Future;

    struct InMemoryIdentityStore {
        hashes: HashMap<PlantId, SecretHash>,
        broken: bool,
    }

    impl PlantIdentityStore for InMemoryIdentityStore {
        fn find_secret_hash(
            &self,
            plant_id: &PlantId,
        ) -> impl Future<Output = Result<Option<SecretHash>, PotbotError>> + Send {
            let result = if self.broken {
                Err(PotbotError::Storage("connection refused".into()))
            } else {
                Ok(self.hashes.get(plant_id).cloned())
            };
            async { result }
        }
    }

    fn hasher() -> SecretHasher {
        SecretHasher::new(MIN_COST).unwrap()
    }

    async fn verifier_with(
        plant: &PlantId,
        secret: &str,
    ) -> CredentialVerifier<InMemoryIdentityStore> {
        let hash = hasher().hash(PlainSecret::new(secret)).await.unwrap();
        let store = InMemoryIdentityStore {
            hashes: HashMap::from([(plant.clone(), hash)]),
            broken: false,
        };
        CredentialVerifier::new(store, hasher())
    }

    fn creds(plant_id: PlantId, secret: &str) -> DeviceCredentials {
        DeviceCredentials {
            plant_id,
            secret: PlainSecret::new(secret),
        }
    }

    #[tokio::test]
    async fn should_verify_device_with_matching_secret() {
        let plant = PlantId::from_serial(42);
        let verifier = verifier_with(&plant, "abcdEFGH12345678").await;

        let verified = verifier
            .verify(creds(plant.clone(), "abcdEFGH12345678"))
            .await
            .unwrap();
        assert_eq!(verified.plant_id(), &plant);
    }

    #[tokio::test]
    async fn should_reject_wrong_secret_as_unauthorized() {
        let plant = PlantId::from_serial(42);
        let verifier = verifier_with(&plant, "right").await;

        let result = verifier.verify(creds(plant, "wrong")).await;
        assert!(matches!(result, Err(PotbotError::Unauthorized)));
    }

    #[tokio::test]
    async fn should_reject_unknown_plant_exactly_like_wrong_secret() {
        let plant = PlantId::from_serial(42);
        let verifier = verifier_with(&plant, "right").await;

        let unknown = verifier
            .verify(creds(PlantId::from_serial(1), "anything"))
            .await
            .unwrap_err();
        let wrong = verifier.verify(creds(plant, "wrong")).await.unwrap_err();

        assert!(matches!(unknown, PotbotError::Unauthorized));
        assert!(matches!(wrong, PotbotError::Unauthorized));
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[tokio::test]
    async fn should_reuse_decoy_hash_across_unknown_plants() {
        let verifier = verifier_with(&PlantId::from_serial(42), "right").await;
        for serial in 0..3 {
            let result = verifier
                .verify(creds(PlantId::from_serial(serial), "x"))
                .await;
            assert!(matches!(result, Err(PotbotError::Unauthorized)));
        }
        assert!(verifier.decoy.is_built());
    }

    #[tokio::test]
    async fn should_build_decoy_before_first_lookup_when_warmed() {
        let verifier = verifier_with(&PlantId::from_serial(42), "right").await;
        assert!(!verifier.decoy.is_built());
        verifier.warm().await.unwrap();
        assert!(verifier.decoy.is_built());

        let result = verifier.verify(creds(PlantId::from_serial(7), "x")).await;
        assert!(matches!(result, Err(PotbotError::Unauthorized)));
    }

    #[tokio::test]
    async fn should_propagate_storage_failure_instead_of_unauthorized() {
        let verifier = CredentialVerifier::new(
            InMemoryIdentityStore {
                hashes: HashMap::new(),
                broken: true,
            },
            hasher(),
        );
        let result = verifier.verify(creds(PlantId::from_serial(1), "x")).await;
        assert!(matches!(result, Err(PotbotError::Storage(_))));
    }
}
