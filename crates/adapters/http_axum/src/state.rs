//! Shared application state for axum handlers.

use std::sync::Arc;

use potbot_app::ports::{
    CommandMailbox, Notifier, PlantIdentityStore, PlantRepository, ReadingRepository,
    UserRepository,
};
use potbot_app::secret::SecretHasher;
use potbot_app::services::command_service::CommandService;
use potbot_app::services::credential_verifier::CredentialVerifier;
use potbot_app::services::notification_service::NotificationService;
use potbot_app::services::plant_service::PlantService;
use potbot_app::services::reading_service::ReadingService;
use potbot_app::services::user_service::UserService;
use potbot_app::session::SessionStore;
use potbot_domain::error::PotbotError;

/// How session cookies are emitted.
#[derive(Debug, Clone, Copy, Default)]
pub struct CookieSettings {
    /// Mark the session cookie `Secure` (HTTPS only).
    pub secure: bool,
}

/// Application state shared across all axum handlers.
///
/// Generic over the plant repository, user repository, reading repository,
/// notifier and command mailbox to avoid dynamic dispatch. The plant
/// repository is shared by several services, so it must be `Clone`.
/// `Clone` is implemented manually so the other types do not need to be
/// `Clone`; only the `Arc` wrappers are cloned.
pub struct AppState<PR, UR, LR, N, Q> {
    /// Device authentication.
    pub credential_verifier: Arc<CredentialVerifier<PR>>,
    /// Provisioning, claiming and listing plants.
    pub plant_service: Arc<PlantService<PR>>,
    /// Ownership-gated enqueue and verified drain.
    pub command_service: Arc<CommandService<PR, Q>>,
    /// Sensor reading ingestion and history.
    pub reading_service: Arc<ReadingService<PR, LR>>,
    /// Device notifications relayed to owners.
    pub notification_service: Arc<NotificationService<PR, N>>,
    /// Account registration and login.
    pub user_service: Arc<UserService<UR>>,
    /// Logged-in browser sessions.
    pub sessions: Arc<SessionStore>,
    pub cookies: CookieSettings,
}

impl<PR, UR, LR, N, Q> Clone for AppState<PR, UR, LR, N, Q> {
    fn clone(&self) -> Self {
        Self {
            credential_verifier: Arc::clone(&self.credential_verifier),
            plant_service: Arc::clone(&self.plant_service),
            command_service: Arc::clone(&self.command_service),
            reading_service: Arc::clone(&self.reading_service),
            notification_service: Arc::clone(&self.notification_service),
            user_service: Arc::clone(&self.user_service),
            sessions: Arc::clone(&self.sessions),
            cookies: self.cookies,
        }
    }
}

impl<PR, UR, LR, N, Q> AppState<PR, UR, LR, N, Q>
where
    PR: PlantRepository + PlantIdentityStore + Clone + Send + Sync + 'static,
    UR: UserRepository + Send + Sync + 'static,
    LR: ReadingRepository + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
    Q: CommandMailbox + Send + Sync + 'static,
{
    /// Wire every service from its ports.
    ///
    /// Sessions use the default TTL and cookies are not marked `Secure`;
    /// see [`Self::with_sessions`] and [`Self::with_cookie_settings`].
    pub fn new(
        plants: PR,
        users: UR,
        readings: LR,
        notifier: N,
        queue: Q,
        hasher: SecretHasher,
    ) -> Self {
        Self {
            credential_verifier: Arc::new(CredentialVerifier::new(plants.clone(), hasher)),
            plant_service: Arc::new(PlantService::new(plants.clone(), hasher)),
            command_service: Arc::new(CommandService::new(plants.clone(), queue)),
            reading_service: Arc::new(ReadingService::new(plants.clone(), readings)),
            notification_service: Arc::new(NotificationService::new(plants, notifier)),
            user_service: Arc::new(UserService::new(users, hasher)),
            sessions: Arc::new(SessionStore::default()),
            cookies: CookieSettings::default(),
        }
    }

    /// Share an existing session store, e.g. one purged by a background task.
    #[must_use]
    pub fn with_sessions(mut self, sessions: Arc<SessionStore>) -> Self {
        self.sessions = sessions;
        self
    }

    #[must_use]
    pub fn with_cookie_settings(mut self, cookies: CookieSettings) -> Self {
        self.cookies = cookies;
        self
    }

    /// Build the decoy hashes used for unknown plants and usernames before
    /// the first request arrives.
    ///
    /// # Errors
    ///
    /// Returns [`PotbotError::Internal`] if hashing fails.
    pub async fn warm(&self) -> Result<(), PotbotError> {
        self.credential_verifier.warm().await?;
        self.user_service.warm().await
    }
}
