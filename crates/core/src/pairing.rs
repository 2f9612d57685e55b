//! Response pairing for the legacy import (LOG-21).
//!
//! The predecessor log never recorded which outbound message answered which
//! inbound one, so the import reconstructs the link heuristically: an
//! outbound message is paired with an inbound message from the same
//! identity and backend sent at most a few seconds earlier. The match must
//! be unique; when the window holds zero or several inbound candidates the
//! outbound entry is left unpaired rather than guessed.

use chrono::Duration;

use crate::types::{DbId, Timestamp};

/// Default width of the pairing window, in seconds. A window of 0 disables
/// pairing entirely.
pub const DEFAULT_PAIR_WINDOW_SECS: i64 = 5;

/// Start of the pairing window for an outbound message sent at `sent_at`.
///
/// Candidates are inbound entries with `window_start <= timestamp <=
/// sent_at` (both ends inclusive).
pub fn window_start(sent_at: Timestamp, window_secs: i64) -> Timestamp {
    sent_at - Duration::seconds(window_secs)
}

/// Decide whether a candidate set produces a pairing.
///
/// Exactly one candidate pairs; zero or several leave the outbound entry
/// unpaired.
pub fn decide_pair(candidates: &[DbId]) -> Option<DbId> {
    match candidates {
        [only] => Some(*only),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn window_start_subtracts_the_window() {
        let sent = Utc.with_ymd_and_hms(2010, 4, 12, 9, 30, 10).unwrap();
        let start = window_start(sent, DEFAULT_PAIR_WINDOW_SECS);
        assert_eq!(start, Utc.with_ymd_and_hms(2010, 4, 12, 9, 30, 5).unwrap());
    }

    #[test]
    fn zero_window_collapses_to_sent_time() {
        let sent = Utc.with_ymd_and_hms(2010, 4, 12, 9, 30, 10).unwrap();
        assert_eq!(window_start(sent, 0), sent);
    }

    #[test]
    fn single_candidate_pairs() {
        assert_eq!(decide_pair(&[17]), Some(17));
    }

    #[test]
    fn no_candidates_leaves_unpaired() {
        assert_eq!(decide_pair(&[]), None);
    }

    #[test]
    fn ambiguous_candidates_leave_unpaired() {
        assert_eq!(decide_pair(&[17, 18]), None);
        assert_eq!(decide_pair(&[17, 18, 19]), None);
    }
}
