//! Display helpers for listings.

use std::fmt;

use chrono::{DateTime, Utc};

/// Estimated reading time in whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReadTime {
    pub minutes: u32,
}

impl fmt::Display for ReadTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} min read", self.minutes)
    }
}

/// Words are space-separated segments, so empty content still counts as one.
pub fn reading_time(content: &str, words_per_minute: u32) -> ReadTime {
    let words = content.split(' ').count();
    let wpm = words_per_minute.max(1) as usize;
    let minutes = words.div_ceil(wpm);
    ReadTime {
        minutes: u32::try_from(minutes).unwrap_or(u32::MAX),
    }
}

/// `January 5, 2024` (UTC).
pub fn format_long_date(at: DateTime<Utc>) -> String {
    at.format("%B %-d, %Y").to_string()
}
