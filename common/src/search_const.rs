//! Constants shared by search requests, filters and history.

use chrono::Datelike;

/// Results requested per page; a full page is taken to mean more may follow.
pub const PAGE_SIZE: u32 = 20;

/// Lower bound of every year range facet.
pub const MIN_YEAR: i64 = 1900;

/// Recent-history suggestions shown for an empty input.
pub const MAX_RECENT_HINTS: usize = 10;

/// Upper bound of every year range facet: the current calendar year.
pub fn max_year() -> i64 {
    chrono::Utc::now().year() as i64
}

pub fn default_year_range() -> [i64; 2] {
    [MIN_YEAR, max_year()]
}
