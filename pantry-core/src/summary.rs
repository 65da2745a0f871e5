//! Dashboard figures derived from the inventory.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::freshness::{classify, Freshness, FreshnessStatus};
use crate::inventory::{Entry, ItemHandle};
use crate::models::GroceryItem;

/// How many expiring-soon items the dashboard lists by default.
pub const TOP_EXPIRING_LIMIT: usize = 5;

/// One row of the "expiring soon" list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpiringItem {
    pub handle: ItemHandle,
    pub item: GroceryItem,
    pub freshness: Freshness,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DashboardSummary {
    pub total_count: usize,
    pub expired_count: usize,
    pub expiring_today_count: usize,
    /// 1 to 3 days left; excludes today and already expired items
    pub expiring_soon_count: usize,
    pub fresh_count: usize,
    /// First expiring-soon items in collection order (not sorted by urgency)
    pub top_expiring_soon: Vec<ExpiringItem>,
}

pub fn summarize<'a>(
    entries: impl IntoIterator<Item = &'a Entry>,
    reference: DateTime<Utc>,
) -> DashboardSummary {
    summarize_with_limit(entries, reference, TOP_EXPIRING_LIMIT)
}

pub fn summarize_with_limit<'a>(
    entries: impl IntoIterator<Item = &'a Entry>,
    reference: DateTime<Utc>,
    limit: usize,
) -> DashboardSummary {
    let mut summary = DashboardSummary::default();

    for entry in entries {
        summary.total_count += 1;
        let freshness = classify(entry.item(), reference);
        match freshness.status {
            FreshnessStatus::Expired => summary.expired_count += 1,
            FreshnessStatus::ExpiringToday => summary.expiring_today_count += 1,
            FreshnessStatus::Fresh => summary.fresh_count += 1,
            FreshnessStatus::ExpiringSoon => {
                summary.expiring_soon_count += 1;
                if summary.top_expiring_soon.len() < limit {
                    summary.top_expiring_soon.push(ExpiringItem {
                        handle: entry.handle(),
                        item: entry.item().clone(),
                        freshness,
                    });
                }
            }
        }
    }

    summary
}
