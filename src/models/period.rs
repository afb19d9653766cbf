//! Report period representation
//!
//! A report covers an inclusive calendar date range. The bookkeeping API
//! only accepts short ranges, so a range is fetched as a sequence of
//! bounded sub-ranges (see [`DateRange::chunks`]).

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest sub-range, in days, the upstream API is asked for
pub const MAX_CHUNK_DAYS: u32 = 7;

/// Inclusive calendar date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Create a range; `start > end` yields an empty range, not an error
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// First day of `today`'s month through `today`
    pub fn month_to_date(today: NaiveDate) -> Self {
        Self::new(first_of_month(today), today)
    }

    /// The whole calendar month, capped at `today` for the running month
    pub fn month(year: i32, month: u32, today: NaiveDate) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let end = last_of_month(start);
        Some(Self::new(start, end.min(today)))
    }

    /// Parse a "YYYY-MM" month string
    pub fn parse_month(s: &str, today: NaiveDate) -> Result<Self, PeriodParseError> {
        let s = s.trim();
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| PeriodParseError::InvalidFormat(s.to_string()))?;
        let year: i32 = year
            .parse()
            .map_err(|_| PeriodParseError::InvalidFormat(s.to_string()))?;
        let month: u32 = month
            .parse()
            .map_err(|_| PeriodParseError::InvalidFormat(s.to_string()))?;

        Self::month(year, month, today).ok_or_else(|| PeriodParseError::InvalidMonth(s.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Number of days covered, 0 for an empty range
    pub fn num_days(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            (self.end - self.start).num_days() + 1
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// "YYYY-MM" of the start date, used in output file names
    pub fn month_key(&self) -> String {
        self.start.format("%Y-%m").to_string()
    }

    /// Human label such as "March 2025"
    pub fn month_label(&self) -> String {
        self.start.format("%B %Y").to_string()
    }

    /// Split into contiguous sub-ranges of at most [`MAX_CHUNK_DAYS`] days
    pub fn chunks(&self) -> PeriodChunks {
        self.chunks_of(MAX_CHUNK_DAYS)
    }

    /// Split into contiguous sub-ranges of at most `days` days
    ///
    /// `days` is clamped to `1..=MAX_CHUNK_DAYS`. The returned iterator is
    /// lazy and can be cloned to restart from the same position.
    pub fn chunks_of(&self, days: u32) -> PeriodChunks {
        PeriodChunks {
            next_start: if self.is_empty() { None } else { Some(self.start) },
            end: self.end,
            days: days.clamp(1, MAX_CHUNK_DAYS),
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start.format("%Y-%m-%d"), self.end.format("%Y-%m-%d"))
    }
}

/// Lazy sequence of bounded sub-ranges covering a [`DateRange`]
#[derive(Debug, Clone)]
pub struct PeriodChunks {
    next_start: Option<NaiveDate>,
    end: NaiveDate,
    days: u32,
}

impl Iterator for PeriodChunks {
    type Item = DateRange;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.next_start?;
        let chunk_end = start
            .checked_add_signed(Duration::days(i64::from(self.days) - 1))
            .map_or(self.end, |d| d.min(self.end));

        self.next_start = chunk_end
            .succ_opt()
            .filter(|next| *next <= self.end);

        Some(DateRange::new(start, chunk_end))
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn last_of_month(first: NaiveDate) -> NaiveDate {
    let (year, month) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.pred_opt())
        .unwrap_or(first)
}

/// Error type for period parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodParseError {
    InvalidFormat(String),
    InvalidMonth(String),
}

impl fmt::Display for PeriodParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFormat(s) => write!(f, "Invalid month format (expected YYYY-MM): {}", s),
            Self::InvalidMonth(s) => write!(f, "Invalid month: {}", s),
        }
    }
}

impl std::error::Error for PeriodParseError {}
