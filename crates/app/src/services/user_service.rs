//! User service: registration, login and account lookup.

use potbot_domain::credentials::PlainSecret;
use potbot_domain::error::{NotFoundError, PotbotError, ValidationError};
use potbot_domain::id::UserId;
use potbot_domain::user::{NewUser, Registration, User};

use crate::ports::UserRepository;
use crate::secret::{DecoyHash, SecretHasher};

pub struct UserService<U> {
    repo: U,
    hasher: SecretHasher,
    decoy: DecoyHash,
}

impl<U: UserRepository> UserService<U> {
    pub fn new(repo: U, hasher: SecretHasher) -> Self {
        Self {
            repo,
            hasher,
            decoy: DecoyHash::default(),
        }
    }

    /// Precompute the decoy hash compared against for unknown usernames.
    ///
    /// # Errors
    ///
    /// Returns [`PotbotError::Internal`] if hashing fails.
    pub async fn warm(&self) -> Result<(), PotbotError> {
        self.decoy.warm(&self.hasher).await?;
        Ok(())
    }

    /// Create an account with a hashed password.
    ///
    /// # Errors
    ///
    /// Returns [`PotbotError::Conflict`] when the email or username is taken,
    /// or a storage or hashing error.
    #[tracing::instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register(&self, registration: Registration) -> Result<User, PotbotError> {
        let Registration {
            email,
            password,
            username,
        } = registration;
        let password_hash = self.hasher.hash(password).await?;
        let user = self
            .repo
            .create(NewUser {
                email,
                username,
                password_hash,
            })
            .await?;
        tracing::info!(user_id = %user.user_id, "account created");
        Ok(user)
    }

    /// Check a username and password pair.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] for blank input and
    /// [`PotbotError::Unauthorized`] for an unknown user or a wrong password,
    /// without telling the two apart.
    #[tracing::instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: PlainSecret) -> Result<User, PotbotError> {
        if username.is_empty() {
            return Err(ValidationError::MissingField("username").into());
        }
        if password.is_empty() {
            return Err(ValidationError::MissingField("password").into());
        }

        let Some(record) = self.repo.find_by_username(username).await? else {
            self.decoy.compare(&self.hasher, password).await;
            return Err(PotbotError::Unauthorized);
        };
        if !self.hasher.verify(password, record.password_hash).await {
            return Err(PotbotError::Unauthorized);
        }
        tracing::info!(user_id = %record.user.user_id, "user logged in");
        Ok(record.user)
    }

    /// # Errors
    ///
    /// Returns [`PotbotError::NotFound`] when the account no longer exists.
    pub async fn get(&self, id: UserId) -> Result<User, PotbotError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "User",
                id: id.to_string(),
            }
            .into()
        })
    }
}
