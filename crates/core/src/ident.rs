//! Display formatting for log entries: sender identification and fuzzy
//! message age.

use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Ages beyond this many whole days are shown as a plain date instead of a
/// fuzzy "N days ago" string.
pub const MAX_FUZZY_AGE_DAYS: i64 = 3;

/// Date format used once a message is older than [`MAX_FUZZY_AGE_DAYS`].
pub const FALLBACK_DATE_FORMAT: &str = "%m/%d/%Y";

// ---------------------------------------------------------------------------
// Sender identification
// ---------------------------------------------------------------------------

/// Human-readable identification line for a message sender.
///
/// Without a resolved contact this is just `"backend identity"`. With a
/// contact it becomes `"backend identity (Name)"`, and with a located
/// contact `"backend identity (Name from Location)"`. A location without a
/// contact name is ignored.
pub fn ident_string(
    backend: &str,
    identity: &str,
    contact_name: Option<&str>,
    location: Option<&str>,
) -> String {
    let base = format!("{backend} {identity}");
    match contact_name {
        Some(name) => match location {
            Some(loc) => format!("{base} ({name} from {loc})"),
            None => format!("{base} ({name})"),
        },
        None => base,
    }
}

// ---------------------------------------------------------------------------
// Fuzzy age
// ---------------------------------------------------------------------------

/// Fuzzy human-readable age of a message relative to `now`.
///
/// Recent messages render as `"N seconds/minutes/hours/days ago"`; a
/// message from the previous calendar day renders as `"yesterday"` even
/// when less than 24 hours old; anything older than [`MAX_FUZZY_AGE_DAYS`]
/// falls back to the plain date.
pub fn humanize_age(date: Timestamp, now: Timestamp) -> String {
    let total_secs = now.signed_duration_since(date).num_seconds().max(0);
    let days = total_secs / 86_400;

    if days > MAX_FUZZY_AGE_DAYS {
        return date.format(FALLBACK_DATE_FORMAT).to_string();
    }

    if (now.date_naive() - date.date_naive()).num_days() == 1 {
        return "yesterday".to_string();
    }

    let rem = total_secs % 86_400;
    let units = [
        ("day", days),
        ("hour", rem / 3600),
        ("minute", rem % 3600 / 60),
        ("second", rem % 60),
    ];
    for (unit, value) in units {
        if value > 0 {
            let plural = if value == 1 { "" } else { "s" };
            return format!("{value} {unit}{plural} ago");
        }
    }

    "0 seconds ago".to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
