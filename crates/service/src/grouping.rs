//! Date grouping for inbox-style listings.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

/// Items sharing one calendar day (UTC), formatted `YYYY-MM-DD`.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct DateGroup<T> {
    pub date: String,
    pub items: Vec<T>,
}

/// Group `items` by the UTC date of `ts`. Groups come back newest date
/// first, and items inside a group newest first.
pub fn group_by_date<T, F>(items: Vec<T>, ts: F) -> Vec<DateGroup<T>>
where
    F: Fn(&T) -> DateTime<FixedOffset>,
{
    let mut buckets: BTreeMap<String, Vec<T>> = BTreeMap::new();
    for item in items {
        let key = ts(&item).naive_utc().date().format("%Y-%m-%d").to_string();
        buckets.entry(key).or_default().push(item);
    }
    buckets
        .into_iter()
        .rev()
        .map(|(date, mut items)| {
            items.sort_by_key(|i| std::cmp::Reverse(ts(i)));
            DateGroup { date, items }
        })
        .collect()
}
