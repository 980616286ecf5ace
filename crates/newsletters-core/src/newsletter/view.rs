//! Grouping and ordering of records for display.

use std::cmp::{Ordering, Reverse};
use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

use super::classify::{Context, NYT, group_key};
use super::model::NewsletterRecord;
use super::text::first_keyword;

/// Shown when the today view has nothing to list.
pub const EMPTY_TODAY_MESSAGE: &str = "No newsletters received yet today!";

/// Group order of the today view. Unlisted groups follow alphabetically.
pub const TODAY_GROUP_ORDER: [&str; 4] = [NYT, "Morning Brew", "Sigma Xi", "HEATED"];

/// Group order of the historical view. Unlisted groups follow alphabetically.
pub const HISTORICAL_GROUP_ORDER: [&str; 9] = [
    "The New York Times: The Morning",
    "The New York Times: The Evening",
    "The New York Times: Breaking News",
    "The New York Times: Climate",
    "Morning Brew",
    "Tech Brew",
    "IT Brew",
    "Sigma Xi",
    "HEATED",
];

/// Item order inside the today New York Times group, by subject keyword.
const TODAY_NYT_ITEM_ORDER: [&str; 4] = ["The Morning", "The Evening", "Breaking News", "Climate"];

/// Item order inside the today Morning Brew group, by exact vendor name.
const TODAY_BREW_ITEM_ORDER: [&str; 3] = ["Morning Brew", "Emerging Tech Brew", "IT Brew"];

/// A named group of records, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewsletterGroup {
    /// Group key (section title).
    pub key: String,
    /// Records in display order.
    pub items: Vec<NewsletterRecord>,
}

impl NewsletterGroup {
    /// Number of unread records in the group.
    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|r| !r.is_read()).count()
    }
}

/// Grouped and ordered records for one context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupedView {
    /// Context the view was built for.
    pub context: Context,
    /// Groups in display order.
    pub groups: Vec<NewsletterGroup>,
}

impl GroupedView {
    /// Returns true if there are no groups.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of records across all groups.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.groups.iter().map(|g| g.items.len()).sum()
    }

    /// Group keys in display order.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.key.as_str()).collect()
    }

    /// Looks up a group by key.
    #[must_use]
    pub fn group(&self, key: &str) -> Option<&NewsletterGroup> {
        self.groups.iter().find(|g| g.key == key)
    }
}

/// Returns true if `date` falls on the same calendar day as `now`, in
/// `now`'s time zone.
#[must_use]
pub fn is_same_day<Tz: TimeZone>(date: &DateTime<Utc>, now: &DateTime<Tz>) -> bool {
    date.with_timezone(&now.timezone()).date_naive() == now.date_naive()
}

/// Returns true if the record belongs to the given context.
#[must_use]
pub fn in_context<Tz: TimeZone>(record: &NewsletterRecord, context: Context, now: &DateTime<Tz>) -> bool {
    let today = is_same_day(&record.newsletter_date, now);
    match context {
        Context::Today => today,
        Context::Historical => !today,
    }
}

/// Builds the grouped, ordered view of `records` for `context`.
///
/// Never fails: records with empty or odd senders fall through to their own
/// group.
#[must_use]
pub fn build_view<Tz: TimeZone>(
    records: &[NewsletterRecord],
    context: Context,
    now: &DateTime<Tz>,
) -> GroupedView {
    let mut buckets: HashMap<String, Vec<NewsletterRecord>> = HashMap::new();
    for record in records.iter().filter(|r| in_context(r, context, now)) {
        let key = group_key(record.vendor_name(), &record.subject, context);
        buckets.entry(key).or_default().push(record.clone());
    }

    let mut groups: Vec<NewsletterGroup> = buckets
        .into_iter()
        .map(|(key, mut items)| {
            sort_items(&key, &mut items, context);
            NewsletterGroup { key, items }
        })
        .collect();
    groups.sort_by(|a, b| compare_group_keys(&a.key, &b.key, context));

    GroupedView { context, groups }
}

/// Fixed group order of a context.
#[must_use]
pub const fn group_order(context: Context) -> &'static [&'static str] {
    match context {
        Context::Today => &TODAY_GROUP_ORDER,
        Context::Historical => &HISTORICAL_GROUP_ORDER,
    }
}

/// Orders group keys: listed keys by list position, then the rest
/// alphabetically.
#[must_use]
pub fn compare_group_keys(a: &str, b: &str, context: Context) -> Ordering {
    let order = group_order(context);
    let rank = |key: &str| order.iter().position(|k| *k == key).unwrap_or(usize::MAX);
    rank(a).cmp(&rank(b)).then_with(|| a.cmp(b))
}

/// Sorts the records of one group in place. Keyword and vendor orderings
/// are stable.
pub fn sort_items(key: &str, items: &mut [NewsletterRecord], context: Context) {
    match (context, key) {
        (Context::Today, NYT) => items.sort_by_key(|r| {
            first_keyword(&r.subject, &TODAY_NYT_ITEM_ORDER).unwrap_or(usize::MAX)
        }),
        (Context::Today, "Morning Brew") => items.sort_by_key(|r| {
            TODAY_BREW_ITEM_ORDER
                .iter()
                .position(|v| *v == r.vendor_name())
                .unwrap_or(usize::MAX)
        }),
        _ => items.sort_by_key(|r| Reverse(r.newsletter_date)),
    }
}
