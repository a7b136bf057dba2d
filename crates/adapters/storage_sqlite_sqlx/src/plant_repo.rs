//! `SQLite` implementation of [`PlantRepository`] and [`PlantIdentityStore`].

use std::future::Future;
use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use potbot_app::ports::{PlantIdentityStore, PlantRepository};
use potbot_domain::credentials::SecretHash;
use potbot_domain::error::PotbotError;
use potbot_domain::id::{PlantId, UserId};
use potbot_domain::plant::{Plant, PlantClaim};

use crate::error::{StorageError, decode_error};

/// Wrapper for converting database rows into domain [`Plant`].
struct Wrapper(Plant);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("plant_id")?;
        let owner: Option<i64> = row.try_get("user_id")?;
        let name: Option<String> = row.try_get("plant_name")?;
        let kind: Option<String> = row.try_get("plant_type")?;

        let id = PlantId::from_str(&id).map_err(decode_error)?;

        Ok(Self(Plant {
            id,
            owner: owner.map(UserId::new),
            name,
            kind,
        }))
    }
}

const INSERT_PROVISIONED: &str =
    "INSERT OR IGNORE INTO plants (plant_id, plant_secret_hash) VALUES (?, ?)";
const SELECT_SECRET_HASH: &str = "SELECT plant_secret_hash FROM plants WHERE plant_id = ?";
const SELECT_BY_ID: &str = r"
    SELECT plant_id, user_id, plant_name, plant_type
    FROM plants
    WHERE plant_id = ?
";
const CLAIM: &str = r"
    UPDATE plants SET user_id = ?, plant_name = ?, plant_type = ?
    WHERE plant_id = ? AND user_id IS NULL
";
const SELECT_BY_OWNER: &str = r"
    SELECT plant_id, user_id, plant_name, plant_type
    FROM plants
    WHERE user_id = ?
    ORDER BY plant_id
";
const SELECT_OWNER_EMAIL: &str = r"
    SELECT users.email
    FROM plants
    JOIN users ON users.user_id = plants.user_id
    WHERE plants.plant_id = ?
";

/// `SQLite`-backed plant repository.
#[derive(Clone)]
pub struct SqlitePlantRepository {
    pool: SqlitePool,
}

impl SqlitePlantRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl PlantIdentityStore for SqlitePlantRepository {
    fn find_secret_hash(
        &self,
        plant_id: &PlantId,
    ) -> impl Future<Output = Result<Option<SecretHash>, PotbotError>> + Send {
        let pool = self.pool.clone();
        let plant_id = plant_id.to_string();
        async move {
            let hash: Option<(String,)> = sqlx::query_as(SELECT_SECRET_HASH)
                .bind(plant_id)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(hash.map(|(value,)| SecretHash::new(value)))
        }
    }
}

impl PlantRepository for SqlitePlantRepository {
    async fn insert_provisioned(
        &self,
        plant_id: &PlantId,
        secret_hash: &SecretHash,
    ) -> Result<bool, PotbotError> {
        let result = sqlx::query(INSERT_PROVISIONED)
            .bind(plant_id.as_str())
            .bind(secret_hash.as_str())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(result.rows_affected() == 1)
    }

    async fn get_by_id(&self, plant_id: &PlantId) -> Result<Option<Plant>, PotbotError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(plant_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0))
    }

    async fn claim(&self, owner: UserId, claim: &PlantClaim) -> Result<bool, PotbotError> {
        let result = sqlx::query(CLAIM)
            .bind(owner.as_i64())
            .bind(&claim.name)
            .bind(&claim.kind)
            .bind(claim.plant_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(result.rows_affected() == 1)
    }

    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Plant>, PotbotError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_OWNER)
            .bind(owner.as_i64())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn owner_email(&self, plant_id: &PlantId) -> Result<Option<String>, PotbotError> {
        let row: Option<(String,)> = sqlx::query_as(SELECT_OWNER_EMAIL)
            .bind(plant_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|(email,)| email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::tests::memory_db;

    async fn setup() -> SqlitePlantRepository {
        let db = memory_db().await;
        sqlx::query("INSERT INTO users (user_id, email, password_hash, username) VALUES (1, 'ann@example.com', 'x', 'ann'), (2, 'bob@example.com', 'x', 'bob')")
            .execute(db.pool())
            .await
            .unwrap();
        SqlitePlantRepository::new(db.pool().clone())
    }

    fn claim(serial: u32) -> PlantClaim {
        PlantClaim::new(PlantId::from_serial(serial).as_str(), "Basil", "herb").unwrap()
    }

    #[tokio::test]
    async fn should_refuse_duplicate_provisioned_id() {
        let repo = setup().await;
        let id = PlantId::from_serial(1);

        assert!(repo.insert_provisioned(&id, &SecretHash::new("h1")).await.unwrap());
        assert!(!repo.insert_provisioned(&id, &SecretHash::new("h2")).await.unwrap());

        let stored = repo.find_secret_hash(&id).await.unwrap().unwrap();
        assert_eq!(stored.as_str(), "h1");
    }

    #[tokio::test]
    async fn should_return_none_when_secret_hash_missing() {
        let repo = setup().await;
        let result = repo.find_secret_hash(&PlantId::from_serial(9)).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn should_store_provisioned_plant_as_unclaimed() {
        let repo = setup().await;
        let id = PlantId::from_serial(1);
        repo.insert_provisioned(&id, &SecretHash::new("h")).await.unwrap();

        let plant = repo.get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(plant, Plant::unclaimed(id));
    }

    #[tokio::test]
    async fn should_claim_only_once() {
        let repo = setup().await;
        repo.insert_provisioned(&PlantId::from_serial(1), &SecretHash::new("h"))
            .await
            .unwrap();

        assert!(repo.claim(UserId::new(1), &claim(1)).await.unwrap());
        assert!(!repo.claim(UserId::new(2), &claim(1)).await.unwrap());

        let plant = repo.get_by_id(&PlantId::from_serial(1)).await.unwrap().unwrap();
        assert_eq!(plant.owner, Some(UserId::new(1)));
        assert_eq!(plant.name.as_deref(), Some("Basil"));
        assert_eq!(plant.kind.as_deref(), Some("herb"));
    }

    #[tokio::test]
    async fn should_not_claim_missing_plant() {
        let repo = setup().await;
        assert!(!repo.claim(UserId::new(1), &claim(3)).await.unwrap());
    }

    #[tokio::test]
    async fn should_list_plants_of_owner_only() {
        let repo = setup().await;
        for serial in 1..=3 {
            repo.insert_provisioned(&PlantId::from_serial(serial), &SecretHash::new("h"))
                .await
                .unwrap();
        }
        repo.claim(UserId::new(1), &claim(1)).await.unwrap();
        repo.claim(UserId::new(1), &claim(2)).await.unwrap();
        repo.claim(UserId::new(2), &claim(3)).await.unwrap();

        let mine = repo.list_by_owner(UserId::new(1)).await.unwrap();
        let ids: Vec<_> = mine.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["plant_00001", "plant_00002"]);
    }

    #[tokio::test]
    async fn should_resolve_owner_email_only_when_claimed() {
        let repo = setup().await;
        let id = PlantId::from_serial(1);
        repo.insert_provisioned(&id, &SecretHash::new("h")).await.unwrap();
        assert!(repo.owner_email(&id).await.unwrap().is_none());

        repo.claim(UserId::new(2), &claim(1)).await.unwrap();
        assert_eq!(
            repo.owner_email(&id).await.unwrap().as_deref(),
            Some("bob@example.com")
        );
    }
}
