use tracing::debug;

use crate::cap::percentile;
use crate::config::BinningPolicy;
use crate::constants::buckets::{
    LABEL_LONG, LABEL_MEDIUM, LABEL_SHORT, MEDIUM_EDGE_DAYS, QUANTILE_LABEL_PREFIX,
    SHORT_EDGE_DAYS,
};
use crate::errors::SampleError;
use crate::types::{BucketLabel, LeadTime};

/// Per-row bucket labels plus the distinct levels actually materialized.
///
/// `levels` can be shorter than the requested bin count when edges collapse
/// (repeated quantile values, or a fixed-mode maximum below an interior
/// edge); callers relying on an exact bin count should check it.
#[derive(Clone, Debug, PartialEq)]
pub struct BucketAssignment {
    /// One label per input value, in input order.
    pub labels: Vec<BucketLabel>,
    /// Distinct labels in ascending value order.
    pub levels: Vec<BucketLabel>,
}

/// Map lead-time values to categorical bucket labels.
///
/// Pure and order-preserving: bucket edges depend only on the values and the
/// policy, never on iteration order. The first interval is closed on both
/// ends (a minimum of exactly 0 lands in the lowest bucket); later intervals
/// are half-open `(lo, hi]`. The upper edge is the observed maximum, so a
/// value equal to it falls in the last bucket. Values outside the span
/// (fixed mode: below 0) are rejected.
pub fn bucketize(
    values: &[LeadTime],
    policy: BinningPolicy,
) -> Result<BucketAssignment, SampleError> {
    if values.is_empty() {
        return Err(SampleError::EmptyTable);
    }
    let (edges, levels) = match policy {
        BinningPolicy::Fixed => fixed_edges(values),
        BinningPolicy::Quantile { quantile_count } => quantile_edges(values, quantile_count)?,
    };
    let labels = values
        .iter()
        .enumerate()
        .map(|(row, &value)| assign(&edges, &levels, value, row))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(BucketAssignment { labels, levels })
}

/// Edges 0, 7, 30 capped by the observed maximum. Interior edges at or above
/// the maximum are dropped together with their labels, so a table whose
/// longest lead is 20 days yields Short/Medium only.
fn fixed_edges(values: &[LeadTime]) -> (Vec<f64>, Vec<BucketLabel>) {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut edges = vec![0.0];
    for interior in [SHORT_EDGE_DAYS, MEDIUM_EDGE_DAYS] {
        if interior < max {
            edges.push(interior);
        }
    }
    edges.push(max.max(0.0));
    let levels: Vec<BucketLabel> = [LABEL_SHORT, LABEL_MEDIUM, LABEL_LONG]
        .iter()
        .take(edges.len() - 1)
        .map(|label| label.to_string())
        .collect();
    if levels.len() < 3 {
        debug!(
            max_observed = max,
            effective = levels.len(),
            "fixed bucket edges collapsed"
        );
    }
    (edges, levels)
}

/// Equal-frequency edges at i/q quantiles of the empirical distribution.
/// Duplicate edges are dropped, which can reduce the label count below the
/// requested `quantile_count`.
fn quantile_edges(
    values: &[LeadTime],
    quantile_count: usize,
) -> Result<(Vec<f64>, Vec<BucketLabel>), SampleError> {
    if quantile_count == 0 {
        return Err(SampleError::Configuration(
            "quantile count must be at least 1".to_string(),
        ));
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mut edges: Vec<f64> = (0..=quantile_count)
        .map(|step| percentile(&sorted, step as f64 / quantile_count as f64 * 100.0))
        .collect();
    edges.dedup();
    if edges.len() < 2 {
        // All values identical: a single degenerate interval holds everything.
        edges = vec![edges[0], edges[0]];
    }
    let levels: Vec<BucketLabel> = (1..edges.len())
        .map(|ordinal| format!("{QUANTILE_LABEL_PREFIX}{ordinal}"))
        .collect();
    if levels.len() < quantile_count {
        debug!(
            requested = quantile_count,
            effective = levels.len(),
            "quantile bucket edges collapsed"
        );
    }
    Ok((edges, levels))
}

fn assign(
    edges: &[f64],
    levels: &[BucketLabel],
    value: LeadTime,
    row: usize,
) -> Result<BucketLabel, SampleError> {
    if value >= edges[0] && value <= edges[1] {
        return Ok(levels[0].clone());
    }
    for bin in 1..levels.len() {
        if value > edges[bin] && value <= edges[bin + 1] {
            return Ok(levels[bin].clone());
        }
    }
    // Outside the bucket span (this also catches non-finite values).
    Err(SampleError::OutOfRange { value, row })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(values: &[LeadTime]) -> BucketAssignment {
        bucketize(values, BinningPolicy::Fixed).expect("fixed binning")
    }

    fn quantile(values: &[LeadTime], quantile_count: usize) -> BucketAssignment {
        bucketize(values, BinningPolicy::Quantile { quantile_count }).expect("quantile binning")
    }

    #[test]
    fn fixed_edges_split_short_medium_long() {
        let assignment = fixed(&[0.0, 7.0, 8.0, 30.0, 31.0, 50.0]);
        assert_eq!(
            assignment.labels,
            ["Short", "Short", "Medium", "Medium", "Long", "Long"]
        );
        assert_eq!(assignment.levels, ["Short", "Medium", "Long"]);
    }

    #[test]
    fn fixed_maximum_lands_in_last_bucket() {
        let assignment = fixed(&[1.0, 10.0, 45.0]);
        assert_eq!(assignment.labels[2], "Long");
    }

    #[test]
    fn fixed_rejects_negative_lead_times() {
        let err = bucketize(&[-1.0, 5.0], BinningPolicy::Fixed).unwrap_err();
        assert!(matches!(err, SampleError::OutOfRange { value, row: 0 } if value == -1.0));
    }

    #[test]
    fn fixed_edges_collapse_when_all_leads_are_short() {
        let assignment = fixed(&[0.0, 2.0, 5.0]);
        assert_eq!(assignment.levels, ["Short"]);
        assert!(assignment.labels.iter().all(|label| label == "Short"));

        let assignment = fixed(&[3.0, 12.0, 20.0]);
        assert_eq!(assignment.levels, ["Short", "Medium"]);
        assert_eq!(assignment.labels, ["Short", "Medium", "Medium"]);
    }

    #[test]
    fn quantile_bins_are_equal_frequency() {
        let values: Vec<f64> = (1..=9).map(f64::from).collect();
        let assignment = quantile(&values, 3);
        assert_eq!(assignment.levels, ["Q1", "Q2", "Q3"]);
        assert_eq!(
            assignment.labels,
            ["Q1", "Q1", "Q1", "Q2", "Q2", "Q2", "Q3", "Q3", "Q3"]
        );
    }

    #[test]
    fn quantile_duplicate_edges_reduce_levels() {
        // Heavy repetition collapses interior quantile edges.
        let values = [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 9.0];
        let assignment = quantile(&values, 3);
        assert!(assignment.levels.len() < 3);
        assert_eq!(assignment.labels[8], *assignment.levels.last().unwrap());
    }

    #[test]
    fn quantile_identical_values_collapse_to_one_bin() {
        let assignment = quantile(&[4.0, 4.0, 4.0], 3);
        assert_eq!(assignment.levels, ["Q1"]);
        assert_eq!(assignment.labels, ["Q1", "Q1", "Q1"]);
    }

    #[test]
    fn quantile_rejects_zero_bins() {
        let err = bucketize(&[1.0, 2.0], BinningPolicy::Quantile { quantile_count: 0 }).unwrap_err();
        assert!(matches!(err, SampleError::Configuration(msg) if msg.contains("at least 1")));
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = bucketize(&[], BinningPolicy::Fixed).unwrap_err();
        assert!(matches!(err, SampleError::EmptyTable));
    }

    #[test]
    fn non_finite_values_never_classify() {
        let err = bucketize(&[1.0, f64::NAN], BinningPolicy::Fixed).unwrap_err();
        assert!(matches!(err, SampleError::OutOfRange { row: 1, .. }));
    }
}
