//! One-shot import of the predecessor app's message log.
//!
//! The predecessor log is staged in the `legacy_messages` table; this crate
//! moves it into `logged_messages` with timestamps and contact attribution
//! preserved. The predecessor never recorded reply links, so outgoing rows
//! are paired with their inbound counterparts heuristically (see
//! [`smslog_core::pairing`]).
//!
//! The import refuses to run twice: before writing anything it samples a
//! handful of staged rows and aborts if any of them already has an
//! equivalent logged entry.

use smslog_core::message::Direction;
use smslog_core::pairing::{decide_pair, window_start};
use smslog_db::models::legacy::LegacyMessage;
use smslog_db::models::message::ImportedMessage;
use smslog_db::repositories::{LegacyRepo, MessageRepo};
use smslog_db::DbPool;

/// Number of random staged rows probed by the duplicate-import guard.
pub const IMPORT_GUARD_SAMPLE: i64 = 5;

// ---------------------------------------------------------------------------
// Error and report types
// ---------------------------------------------------------------------------

/// Error type for import failures. The guard errors fire before any write.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// The staging table holds no rows at all.
    #[error("The legacy message store is empty; nothing to import")]
    Empty,

    /// A sampled staged row already has an equivalent logged entry.
    #[error("The legacy log appears to have been imported already")]
    AlreadyImported,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Counts reported by a completed import run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub incoming_imported: u64,
    pub outgoing_imported: u64,
    pub outgoing_paired: u64,
    pub skipped_missing_channel: u64,
}

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

/// Import the staged predecessor log into `logged_messages`.
///
/// Incoming rows are imported first so the outgoing pass can pair against
/// them. `window_secs` is the width of the pairing window; 0 disables
/// pairing. Rows whose connection record was lost (no backend/identity)
/// are skipped with a warning.
pub async fn run_import(pool: &DbPool, window_secs: i64) -> Result<ImportReport, ImportError> {
    let total = LegacyRepo::count(pool).await?;
    if total == 0 {
        return Err(ImportError::Empty);
    }
    tracing::info!(total, window_secs, "Starting legacy log import");

    guard_against_rerun(pool).await?;

    let mut report = ImportReport::default();

    for row in LegacyRepo::list_by_direction(pool, Direction::Incoming).await? {
        let Some((backend, identity)) = row.channel() else {
            tracing::warn!(legacy_id = row.id, "Staged row has no channel, skipping");
            report.skipped_missing_channel += 1;
            continue;
        };
        MessageRepo::insert_imported(
            pool,
            &imported(&row, Direction::Incoming, backend, identity, None),
        )
        .await?;
        report.incoming_imported += 1;
    }

    for row in LegacyRepo::list_by_direction(pool, Direction::Outgoing).await? {
        let Some((backend, identity)) = row.channel() else {
            tracing::warn!(legacy_id = row.id, "Staged row has no channel, skipping");
            report.skipped_missing_channel += 1;
            continue;
        };

        let mut response_to = None;
        if window_secs > 0 {
            let candidates = MessageRepo::find_pair_candidates(
                pool,
                identity,
                backend,
                window_start(row.date, window_secs),
                row.date,
            )
            .await?;
            response_to = decide_pair(&candidates);
        }
        if response_to.is_some() {
            report.outgoing_paired += 1;
        }

        MessageRepo::insert_imported(
            pool,
            &imported(&row, Direction::Outgoing, backend, identity, response_to),
        )
        .await?;
        report.outgoing_imported += 1;
    }

    tracing::info!(
        incoming = report.incoming_imported,
        outgoing = report.outgoing_imported,
        paired = report.outgoing_paired,
        skipped = report.skipped_missing_channel,
        "Legacy log import finished"
    );
    Ok(report)
}

/// Abort if any sampled staged row already has an equivalent logged entry.
///
/// Staged rows without a channel cannot be probed; they are reported and
/// left out of the check, same as the import itself will skip them.
async fn guard_against_rerun(pool: &DbPool) -> Result<(), ImportError> {
    for row in LegacyRepo::sample_random(pool, IMPORT_GUARD_SAMPLE).await? {
        let Some((backend, identity)) = row.channel() else {
            tracing::warn!(
                legacy_id = row.id,
                "Sampled staged row has no channel, leaving it out of the duplicate check"
            );
            continue;
        };
        let exists = MessageRepo::exists_equivalent(
            pool,
            identity,
            backend,
            &row.text,
            row.date,
            &row.direction,
        )
        .await?;
        if exists {
            return Err(ImportError::AlreadyImported);
        }
    }
    Ok(())
}

fn imported(
    row: &LegacyMessage,
    direction: Direction,
    backend: &str,
    identity: &str,
    response_to: Option<smslog_core::types::DbId>,
) -> ImportedMessage {
    ImportedMessage {
        timestamp: row.date,
        direction,
        text: row.text.clone(),
        backend: backend.to_string(),
        identity: identity.to_string(),
        contact_id: row.contact_id,
        response_to,
    }
}
