use std::collections::HashMap;

use crate::errors::SampleError;
use crate::sampler::group_index;
use crate::table::Table;
use crate::types::{ColumnName, GroupKey};

/// Aggregate skew metrics for per-group row counts.
///
/// Callers inspect this before and after a sampling pass to see how
/// unbalanced the grouping is and how much a cap would even out.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupSkew {
    /// Total rows across all groups.
    pub total: usize,
    /// Number of distinct groups.
    pub groups: usize,
    /// Smallest group size.
    pub min: usize,
    /// Largest group size.
    pub max: usize,
    /// Mean group size.
    pub mean: f64,
    /// Largest group's share of all rows.
    pub max_share: f64,
    /// Smallest group's share of all rows.
    pub min_share: f64,
    /// Largest-to-smallest size ratio (infinite when a group is empty).
    pub ratio: f64,
    /// Per-group breakdown, largest first.
    pub per_group: Vec<GroupShare>,
}

/// Per-group share of the table for skew inspection.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupShare {
    /// Canonical grouping key.
    pub group: GroupKey,
    /// Rows in the group.
    pub count: usize,
    /// Fraction of all rows held by the group.
    pub share: f64,
}

/// Compute skew metrics from per-group row counts.
pub fn group_skew(counts: &HashMap<GroupKey, usize>) -> Option<GroupSkew> {
    if counts.is_empty() {
        return None;
    }
    let total: usize = counts.values().sum();
    let min = *counts.values().min().expect("counts non-empty");
    let max = *counts.values().max().expect("counts non-empty");
    let share_of = |count: usize| {
        if total == 0 {
            0.0
        } else {
            count as f64 / total as f64
        }
    };
    let mut per_group: Vec<GroupShare> = counts
        .iter()
        .map(|(group, &count)| GroupShare {
            group: group.clone(),
            count,
            share: share_of(count),
        })
        .collect();
    per_group.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.group.cmp(&b.group)));
    Some(GroupSkew {
        total,
        groups: counts.len(),
        min,
        max,
        mean: total as f64 / counts.len() as f64,
        max_share: share_of(max),
        min_share: share_of(min),
        ratio: if min == 0 {
            f64::INFINITY
        } else {
            max as f64 / min as f64
        },
        per_group,
    })
}

/// Per-group row counts for a table under the given grouping key.
pub fn group_sizes(
    table: &Table,
    group_columns: &[ColumnName],
) -> Result<HashMap<GroupKey, usize>, SampleError> {
    Ok(group_index(table, group_columns)?
        .into_iter()
        .map(|(key, rows)| (key, rows.len()))
        .collect())
}

/// Exact output size of a sampling pass with the given cap:
/// the sum of `min(size, cap)` over all groups.
pub fn estimate_retained_rows(group_sizes: &[usize], cap: usize) -> usize {
    group_sizes.iter().map(|&size| size.min(cap)).sum()
}
