use serde::{Deserialize, Serialize};

use crate::constants::sampler::{DEFAULT_CAP_PERCENTILE, DEFAULT_QUANTILE_COUNT, DEFAULT_SEED};
use crate::constants::table::{
    DEFAULT_DESTINATION_COLUMN, DEFAULT_LEAD_COLUMN, DEFAULT_ORIGIN_COLUMN,
};
use crate::types::ColumnName;

/// Controls how the shared per-group row cap is derived.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum CapPolicy {
    /// Use the supplied cap unchanged. Must be at least 1.
    Explicit(usize),
    /// Derive the cap from this percentile (0-1 scale) of the observed
    /// group-size distribution, truncated and clamped to at least 1.
    Percentile(f64),
}

impl Default for CapPolicy {
    fn default() -> Self {
        Self::Percentile(DEFAULT_CAP_PERCENTILE)
    }
}

/// Controls how lead-time values are discretized into buckets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinningPolicy {
    /// Short/Medium/Long buckets with fixed edges at 7 and 30 days.
    Fixed,
    /// Equal-frequency bins labeled `Q1`..`Qk` from the empirical distribution.
    Quantile {
        /// Requested number of bins; duplicate edges may reduce the
        /// effective count below this.
        quantile_count: usize,
    },
}

impl Default for BinningPolicy {
    fn default() -> Self {
        Self::Fixed
    }
}

impl BinningPolicy {
    /// Quantile binning with the default bin count.
    pub fn quantile() -> Self {
        Self::Quantile {
            quantile_count: DEFAULT_QUANTILE_COUNT,
        }
    }
}

/// Configuration for OD-grouped undersampling.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GroupSampleConfig {
    /// Columns forming the grouping key, in key order.
    pub group_columns: Vec<ColumnName>,
    /// Cap derivation policy shared by all groups in one pass.
    pub cap: CapPolicy,
    /// RNG seed controlling the per-group draws.
    pub seed: u64,
}

impl Default for GroupSampleConfig {
    fn default() -> Self {
        Self {
            group_columns: vec![
                DEFAULT_ORIGIN_COLUMN.to_string(),
                DEFAULT_DESTINATION_COLUMN.to_string(),
            ],
            cap: CapPolicy::default(),
            seed: DEFAULT_SEED,
        }
    }
}

/// Configuration for OD + lead-bucket undersampling.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LeadBucketSampleConfig {
    /// Grouping, cap, and seed settings shared with plain OD sampling.
    pub group: GroupSampleConfig,
    /// Column holding numeric lead-time values, in days.
    pub lead_column: ColumnName,
    /// Binning policy for the derived bucket column.
    pub binning: BinningPolicy,
}

impl Default for LeadBucketSampleConfig {
    fn default() -> Self {
        Self {
            group: GroupSampleConfig::default(),
            lead_column: DEFAULT_LEAD_COLUMN.to_string(),
            binning: BinningPolicy::default(),
        }
    }
}

impl LeadBucketSampleConfig {
    /// Default configuration with an explicit binning policy.
    pub fn with_binning(binning: BinningPolicy) -> Self {
        Self {
            binning,
            ..Self::default()
        }
    }
}
