//! Consensus reduction over per-replica config snapshots
//!
//! Fields that bound client behavior safely reduce to an extremum, so the
//! merged view always obeys the most conservative replica: ceilings
//! (max level, max requests, calendar last time) take the max, floors
//! (aggregation period, calendar first time) take the min. Fields with no
//! safe combination rule (algorithm id, parent URI list) are taken verbatim
//! from the most recently updated snapshot.

use crate::common::{AggregatorConfig, ExtenderConfig};

/// Reduce an ordered set of snapshots into one consensus value.
pub trait Consolidate: Clone + PartialEq + Send + Sync + 'static {
    /// `snapshots` is ordered oldest to most recently updated.
    /// Returns `None` iff the set is empty.
    fn consolidate(snapshots: &[Self]) -> Option<Self>;
}

fn reduce<T, I>(values: I, pick: fn(T, T) -> T) -> Option<T>
where
    I: Iterator<Item = Option<T>>,
{
    values.flatten().reduce(pick)
}

impl Consolidate for AggregatorConfig {
    fn consolidate(snapshots: &[Self]) -> Option<Self> {
        let newest = snapshots.last()?;
        Some(AggregatorConfig {
            max_level: reduce(snapshots.iter().map(|c| c.max_level), std::cmp::max),
            aggregation_algorithm: newest.aggregation_algorithm,
            aggregation_period: reduce(
                snapshots.iter().map(|c| c.aggregation_period),
                std::cmp::min,
            ),
            max_requests: reduce(snapshots.iter().map(|c| c.max_requests), std::cmp::max),
            parent_uris: newest.parent_uris.clone(),
        })
    }
}

impl Consolidate for ExtenderConfig {
    fn consolidate(snapshots: &[Self]) -> Option<Self> {
        let newest = snapshots.last()?;
        Some(ExtenderConfig {
            max_requests: reduce(snapshots.iter().map(|c| c.max_requests), std::cmp::max),
            calendar_first_time: reduce(
                snapshots.iter().map(|c| c.calendar_first_time),
                std::cmp::min,
            ),
            calendar_last_time: reduce(
                snapshots.iter().map(|c| c.calendar_last_time),
                std::cmp::max,
            ),
            parent_uris: newest.parent_uris.clone(),
        })
    }
}
