//! Read-only repository for the staged predecessor log.

use smslog_core::message::Direction;
use sqlx::PgPool;

use crate::models::legacy::LegacyMessage;

/// Column list for `legacy_messages` SELECT queries.
const COLUMNS: &str = "id, date, direction, text, backend, identity, contact_id";

/// Query operations over the staged predecessor log. The import never
/// modifies these rows.
pub struct LegacyRepo;

impl LegacyRepo {
    /// Total number of staged predecessor rows.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*)::BIGINT FROM legacy_messages")
            .fetch_one(pool)
            .await
    }

    /// A random sample of up to `n` predecessor rows, for the
    /// duplicate-import guard.
    pub async fn sample_random(pool: &PgPool, n: i64) -> Result<Vec<LegacyMessage>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM legacy_messages ORDER BY RANDOM() LIMIT $1");
        sqlx::query_as::<_, LegacyMessage>(&query)
            .bind(n)
            .fetch_all(pool)
            .await
    }

    /// All predecessor rows in one direction, in insertion order.
    pub async fn list_by_direction(
        pool: &PgPool,
        direction: Direction,
    ) -> Result<Vec<LegacyMessage>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM legacy_messages WHERE direction = $1 ORDER BY id");
        sqlx::query_as::<_, LegacyMessage>(&query)
            .bind(direction.as_str())
            .fetch_all(pool)
            .await
    }
}
