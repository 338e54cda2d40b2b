#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Lead-time bucket derivation (fixed and quantile binning).
pub mod buckets;
/// Per-group cap resolution.
pub mod cap;
/// Sampling configuration types.
pub mod config;
/// Centralized constants used across buckets, sampler, and tables.
pub mod constants;
/// Group balance diagnostics.
pub mod metrics;
/// Grouped sampling and the public undersampling operations.
pub mod sampler;
/// Tabular data model and JSON interop.
pub mod table;
/// Shared type aliases.
pub mod types;
/// Lead-time derivation helpers.
pub mod utils;

mod errors;
mod hash;

pub use buckets::{BucketAssignment, bucketize};
pub use cap::resolve_cap;
pub use config::{BinningPolicy, CapPolicy, GroupSampleConfig, LeadBucketSampleConfig};
pub use errors::SampleError;
pub use metrics::{GroupShare, GroupSkew, estimate_retained_rows, group_sizes, group_skew};
pub use sampler::{
    group_index, sample_grouped, undersample_by_group, undersample_by_group_and_lead_bucket,
};
pub use table::{FieldValue, Record, Table};
pub use types::{BucketLabel, ColumnName, GroupKey, LeadTime, RowIndex};
