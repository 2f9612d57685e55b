//! Page-number pagination for the web log view.
//!
//! The log view is paginated by page number rather than limit/offset, and
//! deliberately never fails on a bad `page` parameter: garbage input lands
//! on the first page and out-of-range numbers land on the nearest valid
//! page, so stale bookmarks keep working as the log grows.

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Number of top-level entries per page in the log view.
pub const MESSAGES_PER_PAGE: i64 = 30;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Total number of pages for `total` entries. Always at least 1, so an
/// empty log still renders a (blank) first page.
pub fn page_count(total: i64) -> i64 {
    if total <= 0 {
        return 1;
    }
    (total + MESSAGES_PER_PAGE - 1) / MESSAGES_PER_PAGE
}

/// Parse a raw `page` query parameter. Missing or non-numeric input
/// resolves to page 1.
pub fn parse_page(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok()).unwrap_or(1)
}

/// Clamp a parsed page number into `1..=pages`.
///
/// Any out-of-range number, including zero and negatives, resolves to the
/// last page.
pub fn clamp_page(page: i64, pages: i64) -> i64 {
    if page < 1 || page > pages {
        pages
    } else {
        page
    }
}

/// Row offset of the first entry on `page` (1-based).
pub fn page_offset(page: i64) -> i64 {
    (page - 1) * MESSAGES_PER_PAGE
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
