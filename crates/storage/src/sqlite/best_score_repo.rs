use async_trait::async_trait;
use exam_core::model::BestScore;

use super::SqliteRepository;
use crate::repository::{BestScoreRepository, StorageError};

/// Key the best score is stored under in `key_values`.
pub const BEST_SCORE_KEY: &str = "best_score";

#[async_trait]
impl BestScoreRepository for SqliteRepository {
    async fn get_best_score(&self) -> Result<Option<BestScore>, StorageError> {
        let raw: Option<String> =
            sqlx::query_scalar("SELECT value FROM key_values WHERE key = ?1")
                .bind(BEST_SCORE_KEY)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| StorageError::Connection(e.to_string()))?;

        raw.map(|value| {
            BestScore::parse(&value).map_err(|e| StorageError::Serialization(e.to_string()))
        })
        .transpose()
    }

    async fn record_score(&self, score: f64) -> Result<BestScore, StorageError> {
        // An absent value reads as 0.00, so the first write is max(0, score).
        let candidate = BestScore::ZERO.max_with(score);

        // Read-max-write as a single statement: only overwrite a lower value.
        sqlx::query(
            r"
            INSERT INTO key_values (key, value)
            VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value
            WHERE CAST(excluded.value AS REAL) > CAST(key_values.value AS REAL)
            ",
        )
        .bind(BEST_SCORE_KEY)
        .bind(candidate.format())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        self.get_best_score().await?.ok_or(StorageError::NotFound)
    }
}
