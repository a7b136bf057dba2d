//! `SQLite` implementation of [`ReadingRepository`].

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use potbot_app::ports::ReadingRepository;
use potbot_domain::error::PotbotError;
use potbot_domain::id::PlantId;
use potbot_domain::reading::{LogType, ReadingRange, SensorReading};
use potbot_domain::time::to_sortable;

use crate::error::{StorageError, decode_error};

struct Wrapper(SensorReading);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let plant_id: String = row.try_get("plant_id")?;
        let log_type: String = row.try_get("log_type")?;
        let value: f64 = row.try_get("log_value")?;
        let log_time: String = row.try_get("log_time")?;

        let plant_id = PlantId::from_str(&plant_id).map_err(decode_error)?;
        let log_type = LogType::from_str(&log_type).map_err(decode_error)?;
        let recorded_at = chrono::DateTime::parse_from_rfc3339(&log_time)
            .map_err(decode_error)?
            .to_utc();

        Ok(Self(SensorReading {
            plant_id,
            log_type,
            value,
            recorded_at,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO plant_logs (plant_id, log_type, log_value, log_time)
    VALUES (?, ?, ?, ?)
";

const SELECT_BY_PLANT_IN_RANGE: &str = r"
    SELECT plant_id, log_type, log_value, log_time
    FROM plant_logs
    WHERE plant_id = ? AND log_time >= ? AND log_time <= ?
    ORDER BY log_time DESC, id DESC
";

/// `SQLite`-backed sensor reading log.
#[derive(Clone)]
pub struct SqliteReadingRepository {
    pool: SqlitePool,
}

impl SqliteReadingRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ReadingRepository for SqliteReadingRepository {
    async fn record(&self, reading: SensorReading) -> Result<(), PotbotError> {
        sqlx::query(INSERT)
            .bind(reading.plant_id.as_str())
            .bind(reading.log_type.as_str())
            .bind(reading.value)
            .bind(to_sortable(reading.recorded_at))
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }

    async fn find_in_range(
        &self,
        plant_id: &PlantId,
        range: ReadingRange,
    ) -> Result<Vec<SensorReading>, PotbotError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_PLANT_IN_RANGE)
            .bind(plant_id.as_str())
            .bind(to_sortable(range.start))
            .bind(to_sortable(range.end))
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::tests::memory_db;
    use chrono::{Duration, TimeZone, Utc};
    use potbot_domain::time::Timestamp;

    async fn setup() -> SqliteReadingRepository {
        let db = memory_db().await;
        sqlx::query("INSERT INTO plants (plant_id, plant_secret_hash) VALUES ('plant_00001', 'h'), ('plant_00002', 'h')")
            .execute(db.pool())
            .await
            .unwrap();
        SqliteReadingRepository::new(db.pool().clone())
    }

    fn base() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn reading(serial: u32, log_type: LogType, value: f64, offset_mins: i64) -> SensorReading {
        SensorReading {
            plant_id: PlantId::from_serial(serial),
            log_type,
            value,
            recorded_at: base() + Duration::minutes(offset_mins),
        }
    }

    #[tokio::test]
    async fn should_return_readings_in_range_newest_first() {
        let repo = setup().await;
        repo.record(reading(1, LogType::Temp, 20.0, 0)).await.unwrap();
        repo.record(reading(1, LogType::Temp, 21.0, 10)).await.unwrap();
        repo.record(reading(1, LogType::Light, 300.0, 5)).await.unwrap();

        let range = ReadingRange::new(base(), base() + Duration::hours(1)).unwrap();
        let found = repo
            .find_in_range(&PlantId::from_serial(1), range)
            .await
            .unwrap();

        let offsets: Vec<_> = found.iter().map(|r| r.recorded_at - base()).collect();
        assert_eq!(
            offsets,
            vec![Duration::minutes(10), Duration::minutes(5), Duration::zero()]
        );
        assert_eq!(found[1].log_type, LogType::Light);
    }

    #[tokio::test]
    async fn should_include_range_bounds() {
        let repo = setup().await;
        repo.record(reading(1, LogType::Moisture, 0.3, 0)).await.unwrap();
        repo.record(reading(1, LogType::Moisture, 0.4, 60)).await.unwrap();

        let range = ReadingRange::new(base(), base() + Duration::hours(1)).unwrap();
        let found = repo
            .find_in_range(&PlantId::from_serial(1), range)
            .await
            .unwrap();
        assert_eq!(found.len(), 2);
    }

    #[tokio::test]
    async fn should_exclude_other_plants_and_out_of_range_readings() {
        let repo = setup().await;
        repo.record(reading(1, LogType::Temp, 20.0, -5)).await.unwrap();
        repo.record(reading(2, LogType::Temp, 25.0, 5)).await.unwrap();

        let range = ReadingRange::new(base(), base() + Duration::hours(1)).unwrap();
        let found = repo
            .find_in_range(&PlantId::from_serial(1), range)
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn should_preserve_value_and_time_through_storage() {
        let repo = setup().await;
        let original = reading(1, LogType::Light, 123.5, 7);
        repo.record(original.clone()).await.unwrap();

        let range = ReadingRange::new(base(), base() + Duration::hours(1)).unwrap();
        let found = repo
            .find_in_range(&PlantId::from_serial(1), range)
            .await
            .unwrap();
        assert_eq!(found, vec![original]);
    }
}
