/// Name of a table column.
/// Examples: `Origin`, `Destination`, `LeadDays`
pub type ColumnName = String;
/// Canonical grouping key built by joining a record's key-column tokens.
/// Example: `t:AMS` + separator + `t:JFK` + separator + `t:Short`
pub type GroupKey = String;
/// Categorical lead-time bucket label.
/// Examples: `Short`, `Medium`, `Long`, `Q1`
pub type BucketLabel = String;
/// Zero-based position of a record within its table.
pub type RowIndex = usize;
/// Numeric lead-time value, in days.
/// Examples: `0.0`, `14.0`, `45.5`
pub type LeadTime = f64;
