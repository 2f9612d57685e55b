//! Repository for the `logged_messages` table.

use smslog_core::message::{Direction, MessageStatus};
use smslog_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::message::{
    CreateLoggedMessage, ImportedMessage, ListedMessage, LogFilter, LoggedMessage,
};

// ---------------------------------------------------------------------------
// Column lists
// ---------------------------------------------------------------------------

/// Column list for `logged_messages` SELECT queries.
const COLUMNS: &str = "\
    id, timestamp, direction, text, backend, identity, \
    contact_id, status, response_to";

/// Column list for listing queries that join the contact's display fields.
const LISTED_COLUMNS: &str = "\
    m.id, m.timestamp, m.direction, m.text, m.backend, m.identity, \
    m.contact_id, m.status, m.response_to, \
    c.first_name AS contact_first_name, c.last_name AS contact_last_name, \
    c.location AS contact_location";

// ---------------------------------------------------------------------------
// MessageRepo
// ---------------------------------------------------------------------------

/// Provides insert, update, and listing operations for logged messages.
pub struct MessageRepo;

impl MessageRepo {
    /// Insert a live message. The database assigns the timestamp.
    pub async fn create(
        pool: &PgPool,
        dto: &CreateLoggedMessage,
    ) -> Result<LoggedMessage, sqlx::Error> {
        let query = format!(
            "INSERT INTO logged_messages \
             (direction, text, backend, identity, contact_id, status, response_to) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LoggedMessage>(&query)
            .bind(dto.direction.as_str())
            .bind(&dto.text)
            .bind(&dto.backend)
            .bind(&dto.identity)
            .bind(dto.contact_id)
            .bind(dto.status.map(|s| s.as_str()))
            .bind(dto.response_to)
            .fetch_one(pool)
            .await
    }

    /// Insert a historical message with an explicit timestamp. Only the
    /// legacy import uses this.
    pub async fn insert_imported(
        pool: &PgPool,
        dto: &ImportedMessage,
    ) -> Result<LoggedMessage, sqlx::Error> {
        let query = format!(
            "INSERT INTO logged_messages \
             (timestamp, direction, text, backend, identity, contact_id, response_to) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LoggedMessage>(&query)
            .bind(dto.timestamp)
            .bind(dto.direction.as_str())
            .bind(&dto.text)
            .bind(&dto.backend)
            .bind(&dto.identity)
            .bind(dto.contact_id)
            .bind(dto.response_to)
            .fetch_one(pool)
            .await
    }

    /// Find a message by id, either direction.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<LoggedMessage>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM logged_messages WHERE id = $1");
        sqlx::query_as::<_, LoggedMessage>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an incoming message by id.
    ///
    /// This is the lookup behind reply linking: resolving a watermark
    /// through it guarantees `response_to` only ever references incoming
    /// entries.
    pub async fn find_incoming_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<LoggedMessage>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM logged_messages WHERE id = $1 AND direction = $2");
        sqlx::query_as::<_, LoggedMessage>(&query)
            .bind(id)
            .bind(Direction::Incoming.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Set the status of a message. Returns whether a row was updated;
    /// an unknown id is a no-op, not an error.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: MessageStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE logged_messages SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List one page of top-level log entries, newest first.
    ///
    /// Outgoing messages that answer another entry are excluded here; the
    /// view threads them beneath their inbound message via
    /// [`Self::list_responses`].
    pub async fn list_page(
        pool: &PgPool,
        filter: &LogFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ListedMessage>, sqlx::Error> {
        let (where_clause, binds, bind_idx) = build_log_filter(filter);
        let query = format!(
            "SELECT {LISTED_COLUMNS} FROM logged_messages m \
             LEFT JOIN contacts c ON c.id = m.contact_id \
             {where_clause} \
             ORDER BY m.timestamp DESC, m.direction ASC \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1
        );

        let mut q = sqlx::query_as::<_, ListedMessage>(&query);
        for val in &binds {
            q = q.bind(val.as_str());
        }
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Count top-level log entries matching the filter (for pagination).
    pub async fn count(pool: &PgPool, filter: &LogFilter) -> Result<i64, sqlx::Error> {
        let (where_clause, binds, _) = build_log_filter(filter);
        let query = format!(
            "SELECT COUNT(*)::BIGINT FROM logged_messages m \
             LEFT JOIN contacts c ON c.id = m.contact_id \
             {where_clause}"
        );

        let mut q = sqlx::query_scalar::<_, i64>(&query);
        for val in &binds {
            q = q.bind(val.as_str());
        }
        q.fetch_one(pool).await
    }

    /// List the responses to a set of entries, oldest first, for threading
    /// beneath their inbound messages.
    pub async fn list_responses(
        pool: &PgPool,
        parent_ids: &[DbId],
    ) -> Result<Vec<ListedMessage>, sqlx::Error> {
        if parent_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {LISTED_COLUMNS} FROM logged_messages m \
             LEFT JOIN contacts c ON c.id = m.contact_id \
             WHERE m.response_to = ANY($1) \
             ORDER BY m.timestamp ASC, m.id ASC"
        );
        sqlx::query_as::<_, ListedMessage>(&query)
            .bind(parent_ids)
            .fetch_all(pool)
            .await
    }

    /// List top-level entries newer than a known id, oldest first. Used by
    /// the live view to poll for new messages.
    pub async fn list_since(
        pool: &PgPool,
        after_id: DbId,
        limit: i64,
    ) -> Result<Vec<ListedMessage>, sqlx::Error> {
        let query = format!(
            "SELECT {LISTED_COLUMNS} FROM logged_messages m \
             LEFT JOIN contacts c ON c.id = m.contact_id \
             WHERE m.id > $1 \
             AND NOT (m.direction = 'outgoing' AND m.response_to IS NOT NULL) \
             ORDER BY m.id ASC \
             LIMIT $2"
        );
        sqlx::query_as::<_, ListedMessage>(&query)
            .bind(after_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Ids of incoming entries on the given channel whose timestamp lies
    /// in `[start, end]`, both ends inclusive. Fetches at most two rows;
    /// the pairing heuristic only needs to distinguish "exactly one" from
    /// "none or several".
    pub async fn find_pair_candidates(
        pool: &PgPool,
        identity: &str,
        backend: &str,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT id FROM logged_messages \
             WHERE direction = 'incoming' \
             AND identity = $1 AND backend = $2 \
             AND timestamp >= $3 AND timestamp <= $4 \
             ORDER BY id \
             LIMIT 2",
        )
        .bind(identity)
        .bind(backend)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await
    }

    /// Whether an entry equivalent to the given legacy row already exists.
    /// The duplicate-import guard probes with this before any writes.
    pub async fn exists_equivalent(
        pool: &PgPool,
        identity: &str,
        backend: &str,
        text: &str,
        timestamp: Timestamp,
        direction: &str,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS ( \
                 SELECT 1 FROM logged_messages \
                 WHERE identity = $1 AND backend = $2 AND text = $3 \
                 AND timestamp = $4 AND direction = $5 \
             )",
        )
        .bind(identity)
        .bind(backend)
        .bind(text)
        .bind(timestamp)
        .bind(direction)
        .fetch_one(pool)
        .await
    }
}

// ---------------------------------------------------------------------------
// Internal helpers for dynamic query building
// ---------------------------------------------------------------------------

/// Build a WHERE clause and bind values from the log view filter.
///
/// Returns `(where_clause, bind_values, next_bind_index)`. The clause is
/// never empty: the top-level listing always hides outgoing messages that
/// answer another entry.
fn build_log_filter(filter: &LogFilter) -> (String, Vec<String>, u32) {
    let mut conditions =
        vec!["NOT (m.direction = 'outgoing' AND m.response_to IS NOT NULL)".to_string()];
    let mut bind_idx = 1u32;
    let mut binds: Vec<String> = Vec::new();

    if let Some(ref search) = filter.search {
        if !search.is_empty() {
            conditions.push(format!(
                "(m.identity ILIKE ${bind_idx} OR m.text ILIKE ${bind_idx} \
                 OR c.first_name ILIKE ${bind_idx} OR c.last_name ILIKE ${bind_idx})"
            ));
            bind_idx += 1;
            binds.push(format!("%{}%", escape_like(search)));
        }
    }

    if let Some(direction) = filter.direction {
        conditions.push(format!("m.direction = ${bind_idx}"));
        bind_idx += 1;
        binds.push(direction.as_str().to_string());
    }

    (
        format!("WHERE {}", conditions.join(" AND ")),
        binds,
        bind_idx,
    )
}

/// Escape LIKE/ILIKE metacharacters so a search term matches literally.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
