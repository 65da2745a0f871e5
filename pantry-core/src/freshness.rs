//! Freshness classification.
//!
//! An item's urgency is derived from the time left until its expiration date,
//! which is taken as midnight UTC of that date. Partial days round up, so an
//! item that expires in two hours has one day left.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::GroceryItem;

/// Items with at most this many days left (and at least one) are "expiring soon".
pub const SOON_WINDOW_DAYS: i64 = 3;

/// Urgency bucket of an item relative to a reference time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FreshnessStatus {
    Expired,
    ExpiringToday,
    ExpiringSoon,
    Fresh,
}

impl FreshnessStatus {
    pub fn from_days_remaining(days: i64) -> Self {
        match days {
            d if d < 0 => FreshnessStatus::Expired,
            0 => FreshnessStatus::ExpiringToday,
            d if d <= SOON_WINDOW_DAYS => FreshnessStatus::ExpiringSoon,
            _ => FreshnessStatus::Fresh,
        }
    }
}

impl fmt::Display for FreshnessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FreshnessStatus::Expired => write!(f, "expired"),
            FreshnessStatus::ExpiringToday => write!(f, "today"),
            FreshnessStatus::ExpiringSoon => write!(f, "soon"),
            FreshnessStatus::Fresh => write!(f, "fresh"),
        }
    }
}

/// Result of classifying one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Freshness {
    pub status: FreshnessStatus,
    /// Whole days left, rounded up. Negative once expired.
    pub days_remaining: i64,
}

impl Freshness {
    /// Badge text shown next to an item.
    pub fn label(&self) -> String {
        match self.status {
            FreshnessStatus::Expired => "Expired".to_string(),
            FreshnessStatus::ExpiringToday => "Expires Today".to_string(),
            _ if self.days_remaining == 1 => "1 day left".to_string(),
            _ => format!("{} days left", self.days_remaining),
        }
    }
}

/// Midnight UTC at the start of `date`.
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// `ceil((expiration - reference) / 1 day)`.
pub fn days_remaining(expiration: NaiveDate, reference: DateTime<Utc>) -> i64 {
    let delta = start_of_day(expiration) - reference;
    // num_days truncates toward zero, which is already the ceiling when negative
    let days = delta.num_days();
    if delta > Duration::days(days) {
        days + 1
    } else {
        days
    }
}

pub fn classify(item: &GroceryItem, reference: DateTime<Utc>) -> Freshness {
    let days_remaining = days_remaining(item.expiration_date, reference);
    Freshness {
        status: FreshnessStatus::from_days_remaining(days_remaining),
        days_remaining,
    }
}

/// Classify against the start of a calendar day.
pub fn classify_on(item: &GroceryItem, date: NaiveDate) -> Freshness {
    classify(item, start_of_day(date))
}
