/// Constants used by lead-time bucket derivation.
pub mod buckets {
    /// Upper edge (inclusive) of the Short fixed bucket, in days.
    pub const SHORT_EDGE_DAYS: f64 = 7.0;
    /// Upper edge (inclusive) of the Medium fixed bucket, in days.
    pub const MEDIUM_EDGE_DAYS: f64 = 30.0;
    /// Label for the lowest fixed bucket.
    pub const LABEL_SHORT: &str = "Short";
    /// Label for the middle fixed bucket.
    pub const LABEL_MEDIUM: &str = "Medium";
    /// Label for the highest fixed bucket.
    pub const LABEL_LONG: &str = "Long";
    /// Prefix used to build ascending quantile labels (`Q1`, `Q2`, ...).
    pub const QUANTILE_LABEL_PREFIX: &str = "Q";
}

/// Constants used by cap resolution and grouped sampling.
pub mod sampler {
    /// Default RNG seed for sampling passes.
    pub const DEFAULT_SEED: u64 = 42;
    /// Default percentile (0-1 scale) used to derive the per-group cap.
    pub const DEFAULT_CAP_PERCENTILE: f64 = 0.8;
    /// Default number of equal-frequency bins for quantile binning.
    pub const DEFAULT_QUANTILE_COUNT: usize = 3;
    /// Offset mixed into per-group RNG seed derivation for deterministic variation.
    pub const GROUP_SEED_OFFSET: u64 = 0x0D5A_B4CE;
}

/// Constants used by the tabular data model and default column naming.
pub mod table {
    /// Default origin-identifier column of the grouping key.
    pub const DEFAULT_ORIGIN_COLUMN: &str = "Origin";
    /// Default destination-identifier column of the grouping key.
    pub const DEFAULT_DESTINATION_COLUMN: &str = "Destination";
    /// Default column holding numeric lead-time values.
    pub const DEFAULT_LEAD_COLUMN: &str = "LeadDays";
    /// Column added to carry the derived lead-time bucket.
    pub const LEAD_BUCKET_COLUMN: &str = "LeadBucket";
    /// Non-printing separator between key tokens inside a grouping key.
    pub const KEY_TOKEN_SEPARATOR: char = '\u{1f}';
}
