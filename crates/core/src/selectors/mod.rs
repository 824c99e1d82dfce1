//! Derived views over [`TrackerState`](crate::TrackerState) collections.
//!
//! Every selector is a pure, total function: it borrows its inputs, never
//! mutates them, and never panics on missing or malformed record fields.
//! Filter selectors take a [`Filter`](crate::Filter) and treat "no criteria"
//! as a no-op. Counting selectors return [`Counts`] with every known bucket
//! present. Rates are percentages in `0..=100` and are `0` when their
//! denominator is zero.
//!
//! Selectors accept any `IntoIterator` of borrowed records, so they compose:
//!
//! ```
//! use cephas_core::{Filter, Order, OrderStatus, selectors::orders};
//!
//! let all: Vec<Order> = Vec::new();
//! let pending = orders::orders_by_status(&all, &Filter::One(OrderStatus::Pending));
//! let found = orders::search_orders(pending, "TR25");
//! assert!(found.is_empty());
//! ```

pub mod buildings;
pub mod dates;
pub mod installers;
pub mod materials;
pub mod orders;
pub mod projects;
pub mod splitters;
pub mod tasks;
pub mod users;

use std::collections::BTreeMap;
use std::fmt::Display;

use serde::Serialize;

use crate::filter::Filter;
use crate::model::Entity;
use crate::types::Bucket;

/// Per-bucket counts plus the size of the counted input.
///
/// Every known value of `K` has a bucket, even when zero. `total` counts
/// every input record, including ones whose discriminant is missing or
/// unrecognized, so `bucket_sum() <= total()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Counts<K: Ord> {
    #[serde(flatten)]
    buckets: BTreeMap<K, usize>,
    total: usize,
}

impl<K: Bucket> Counts<K> {
    /// Count for one bucket.
    #[must_use]
    pub fn get(&self, key: K) -> usize {
        self.buckets.get(&key).copied().unwrap_or(0)
    }

    /// Number of records counted.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    /// Sum over the named buckets.
    #[must_use]
    pub fn bucket_sum(&self) -> usize {
        self.buckets.values().sum()
    }

    /// Buckets in key order.
    pub fn iter(&self) -> impl Iterator<Item = (K, usize)> + '_ {
        self.buckets.iter().map(|(k, v)| (*k, *v))
    }
}

/// Count records by a discriminant in a single pass.
pub fn count_by<'a, T, K, F>(items: impl IntoIterator<Item = &'a T>, key: F) -> Counts<K>
where
    T: 'a,
    K: Bucket,
    F: Fn(&T) -> Option<K>,
{
    let mut buckets: BTreeMap<K, usize> = K::all().iter().map(|k| (*k, 0)).collect();
    let mut total = 0;
    for item in items {
        total += 1;
        if let Some(count) = key(item).and_then(|k| buckets.get_mut(&k)) {
            *count += 1;
        }
    }
    Counts { buckets, total }
}

/// `numerator / denominator * 100`, or `0` for a zero denominator.
#[must_use]
#[allow(clippy::cast_precision_loss)] // Record counts never approach 2^52
pub fn percentage(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    numerator as f64 / denominator as f64 * 100.0
}

/// Find a record by ID, comparing string forms.
///
/// Accepts anything displayable, so numeric IDs find records whose ID was
/// delivered as a string and vice versa.
pub fn find_by_id<'a, T, I>(items: &'a [T], id: &I) -> Option<&'a T>
where
    T: Entity,
    I: Display + ?Sized,
{
    let wanted = id.to_string();
    items.iter().find(|item| item.entity_id() == wanted)
}

/// Keep records whose key passes the filter.
pub(crate) fn filter_by<'a, T, K, F>(
    items: impl IntoIterator<Item = &'a T>,
    filter: &Filter<K>,
    key: F,
) -> Vec<&'a T>
where
    T: 'a,
    K: PartialEq + 'a,
    F: Fn(&'a T) -> Option<&'a K>,
{
    if filter.is_noop() {
        return items.into_iter().collect();
    }
    items
        .into_iter()
        .filter(|item| filter.matches_opt(key(item)))
        .collect()
}

/// Case-insensitive substring search over a fixed set of text fields.
///
/// A blank query returns every record. Missing fields never match.
pub(crate) fn search<'a, T, const N: usize>(
    items: impl IntoIterator<Item = &'a T>,
    query: &str,
    fields: fn(&T) -> [Option<&str>; N],
) -> Vec<&'a T>
where
    T: 'a,
{
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return items.into_iter().collect();
    }
    items
        .into_iter()
        .filter(|item| {
            fields(item)
                .iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Building, BuildingId, OrderStatus};

    #[test]
    fn test_count_by_seeds_every_bucket() {
        let counts = count_by(std::iter::empty::<&Option<OrderStatus>>(), |s| *s);
        assert_eq!(counts.total(), 0);
        assert_eq!(counts.iter().count(), OrderStatus::ALL.len());
        assert_eq!(counts.bucket_sum(), 0);
    }

    #[test]
    fn test_count_by_total_includes_unknown() {
        let statuses = [
            Some(OrderStatus::Pending),
            None,
            Some(OrderStatus::Pending),
            Some(OrderStatus::Completed),
        ];
        let counts = count_by(&statuses, |s| *s);
        assert_eq!(counts.get(OrderStatus::Pending), 2);
        assert_eq!(counts.get(OrderStatus::Completed), 1);
        assert_eq!(counts.get(OrderStatus::Cancelled), 0);
        assert_eq!(counts.total(), 4);
        assert_eq!(counts.bucket_sum(), 3);
    }

    #[test]
    fn test_counts_serialize_flat() {
        let statuses = [Some(OrderStatus::Assigned)];
        let json = serde_json::to_value(count_by(&statuses, |s| *s)).unwrap_or_default();
        assert_eq!(json["assigned"], 1);
        assert_eq!(json["pending"], 0);
        assert_eq!(json["total"], 1);
    }

    #[test]
    fn test_percentage_zero_denominator() {
        assert!(percentage(0, 0).abs() < f64::EPSILON);
        assert!(percentage(5, 0).abs() < f64::EPSILON);
        assert!((percentage(1, 4) - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_find_by_id_string_coercion() {
        let buildings = vec![Building {
            id: BuildingId::new("42"),
            ..Building::default()
        }];
        assert!(find_by_id(&buildings, &42).is_some());
        assert!(find_by_id(&buildings, "42").is_some());
        assert!(find_by_id(&buildings, "43").is_none());
    }
}
