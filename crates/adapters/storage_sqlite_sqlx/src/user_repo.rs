//! `SQLite` implementation of [`UserRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use potbot_app::ports::UserRepository;
use potbot_domain::credentials::SecretHash;
use potbot_domain::error::PotbotError;
use potbot_domain::id::UserId;
use potbot_domain::user::{NewUser, User, UserRecord};

use crate::error::StorageError;

struct Wrapper(UserRecord);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let user_id: i64 = row.try_get("user_id")?;
        let email: String = row.try_get("email")?;
        let username: Option<String> = row.try_get("username")?;
        let password_hash: String = row.try_get("password_hash")?;

        Ok(Self(UserRecord {
            user: User {
                user_id: UserId::new(user_id),
                email,
                username: username.unwrap_or_default(),
            },
            password_hash: SecretHash::new(password_hash),
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO users (email, password_hash, username)
    VALUES (?, ?, ?)
    RETURNING user_id
";
const SELECT_BY_ID: &str = "SELECT * FROM users WHERE user_id = ?";
const SELECT_BY_USERNAME: &str = "SELECT * FROM users WHERE username = ?";

/// `SQLite`-backed user repository.
#[derive(Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl UserRepository for SqliteUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, PotbotError> {
        let (user_id,): (i64,) = sqlx::query_as(INSERT)
            .bind(&user.email)
            .bind(user.password_hash.as_str())
            .bind(user.username.as_deref())
            .fetch_one(&self.pool)
            .await
            .map_err(|err| StorageError::from(err).into_account_error())?;

        Ok(User {
            user_id: UserId::new(user_id),
            email: user.email,
            username: user.username.unwrap_or_default(),
        })
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, PotbotError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0.user))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, PotbotError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_USERNAME)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0))
    }
}
