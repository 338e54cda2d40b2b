use indexmap::IndexMap;
use rand::seq::index;
use tracing::debug;

use crate::buckets::bucketize;
use crate::cap::resolve_cap;
use crate::config::{GroupSampleConfig, LeadBucketSampleConfig};
use crate::constants::sampler::GROUP_SEED_OFFSET;
use crate::constants::table::{KEY_TOKEN_SEPARATOR, LEAD_BUCKET_COLUMN};
use crate::errors::SampleError;
use crate::hash::stable_hash_str;
use crate::table::{Record, Table};
use crate::types::{ColumnName, GroupKey, LeadTime, RowIndex};

#[derive(Debug, Clone)]
/// Small deterministic RNG used for reproducible per-group draws.
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64_internal(&mut self) -> u64 {
        let mut z = self.state.wrapping_add(0x9E3779B97F4A7C15);
        self.state = z;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
        z ^ (z >> 31)
    }
}

impl rand::RngCore for DeterministicRng {
    fn next_u32(&mut self) -> u32 {
        self.next_u64_internal() as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.next_u64_internal()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let mut offset = 0;
        while offset < dest.len() {
            let value = self.next_u64_internal();
            let bytes = value.to_le_bytes();
            let remaining = dest.len() - offset;
            let copy_len = remaining.min(bytes.len());
            dest[offset..offset + copy_len].copy_from_slice(&bytes[..copy_len]);
            offset += copy_len;
        }
    }
}

/// Canonical grouping key for one record.
///
/// A `Null` key field is a legitimate token and forms its own group; a
/// record lacking a key column entirely is an error.
fn group_key(
    record: &Record,
    row: RowIndex,
    group_columns: &[ColumnName],
) -> Result<GroupKey, SampleError> {
    let mut key = String::new();
    for column in group_columns {
        let value = record
            .get(column)
            .ok_or_else(|| SampleError::MissingColumn {
                column: column.clone(),
                row,
            })?;
        if !key.is_empty() {
            key.push(KEY_TOKEN_SEPARATOR);
        }
        key.push_str(&value.key_token());
    }
    Ok(key)
}

/// Partition a table's rows by grouping key, in first-seen group order.
pub fn group_index(
    table: &Table,
    group_columns: &[ColumnName],
) -> Result<IndexMap<GroupKey, Vec<RowIndex>>, SampleError> {
    let mut groups: IndexMap<GroupKey, Vec<RowIndex>> = IndexMap::new();
    for (row, record) in table.records().iter().enumerate() {
        let key = group_key(record, row, group_columns)?;
        groups.entry(key).or_default().push(row);
    }
    Ok(groups)
}

fn group_draw_seed(seed: u64, key: &GroupKey) -> u64 {
    stable_hash_str(seed ^ GROUP_SEED_OFFSET, key)
}

/// Sample every group independently down to at most `cap` rows.
///
/// Each group draws from its own RNG seeded by the invocation seed and a
/// stable hash of the group key, over rows placed in a canonical order by
/// content fingerprint. The selection therefore depends only on the seed
/// and the group's own content; neither input row order within the group
/// nor the order groups are visited in can change it. Kept rows are
/// reassembled in original table order.
pub fn sample_grouped(
    table: &Table,
    groups: &IndexMap<GroupKey, Vec<RowIndex>>,
    cap: usize,
    seed: u64,
) -> Result<Table, SampleError> {
    if cap == 0 {
        return Err(SampleError::Configuration(
            "cap must be at least 1".to_string(),
        ));
    }
    let mut kept: Vec<RowIndex> = Vec::new();
    for (key, rows) in groups {
        if rows.len() <= cap {
            kept.extend_from_slice(rows);
            continue;
        }
        let draw_seed = group_draw_seed(seed, key);
        let mut canonical = rows.clone();
        canonical.sort_by_key(|&row| (table.records()[row].fingerprint(draw_seed), row));
        let mut rng = DeterministicRng::new(draw_seed);
        let picks = index::sample(&mut rng, canonical.len(), cap);
        kept.extend(picks.iter().map(|position| canonical[position]));
    }
    kept.sort_unstable();
    let records = kept
        .iter()
        .map(|&row| table.records()[row].clone())
        .collect();
    Ok(Table::new(records))
}

fn ensure_input(table: &Table, group_columns: &[ColumnName]) -> Result<(), SampleError> {
    if table.is_empty() {
        return Err(SampleError::EmptyTable);
    }
    if group_columns.is_empty() {
        return Err(SampleError::Configuration(
            "at least one grouping column is required".to_string(),
        ));
    }
    Ok(())
}

fn lead_values(table: &Table, lead_column: &ColumnName) -> Result<Vec<LeadTime>, SampleError> {
    let mut values = Vec::with_capacity(table.len());
    for (row, record) in table.records().iter().enumerate() {
        let field = record
            .get(lead_column)
            .ok_or_else(|| SampleError::MissingColumn {
                column: lead_column.clone(),
                row,
            })?;
        let value = field
            .as_f64()
            .filter(|value| value.is_finite())
            .ok_or_else(|| SampleError::NonNumericValue {
                column: lead_column.clone(),
                row,
            })?;
        values.push(value);
    }
    Ok(values)
}

/// Undersample a table so no OD group keeps more rows than the resolved cap.
///
/// Groups at or under the cap keep every row; larger groups are sampled
/// uniformly without replacement. Output rows keep their original order.
pub fn undersample_by_group(
    table: &Table,
    config: &GroupSampleConfig,
) -> Result<Table, SampleError> {
    ensure_input(table, &config.group_columns)?;
    let groups = group_index(table, &config.group_columns)?;
    let sizes: Vec<usize> = groups.values().map(Vec::len).collect();
    let cap = resolve_cap(&sizes, config.cap)?;
    let output = sample_grouped(table, &groups, cap, config.seed)?;
    debug!(
        groups = groups.len(),
        cap,
        kept = output.len(),
        total = table.len(),
        "undersampled by group"
    );
    Ok(output)
}

/// Attach a derived lead bucket column, then undersample per
/// (OD, bucket) group.
///
/// The bucket is computed on a working copy; the caller's table is never
/// mutated. The output carries the added `LeadBucket` column alongside the
/// untouched payload columns.
pub fn undersample_by_group_and_lead_bucket(
    table: &Table,
    config: &LeadBucketSampleConfig,
) -> Result<Table, SampleError> {
    ensure_input(table, &config.group.group_columns)?;
    let leads = lead_values(table, &config.lead_column)?;
    let assignment = bucketize(&leads, config.binning)?;

    let mut records: Vec<Record> = table.records().to_vec();
    for (record, label) in records.iter_mut().zip(&assignment.labels) {
        record.insert(LEAD_BUCKET_COLUMN, label.clone());
    }
    let working = Table::new(records);

    let mut group_columns = config.group.group_columns.clone();
    group_columns.push(LEAD_BUCKET_COLUMN.to_string());
    let groups = group_index(&working, &group_columns)?;
    let sizes: Vec<usize> = groups.values().map(Vec::len).collect();
    let cap = resolve_cap(&sizes, config.group.cap)?;
    let output = sample_grouped(&working, &groups, cap, config.group.seed)?;
    debug!(
        groups = groups.len(),
        cap,
        kept = output.len(),
        total = table.len(),
        bucket_levels = assignment.levels.len(),
        "undersampled by group and lead bucket"
    );
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::FieldValue;

    fn od_row(origin: &str, destination: &str, fare: i64) -> Record {
        Record::new()
            .with_field("Origin", origin)
            .with_field("Destination", destination)
            .with_field("Fare", fare)
    }

    #[test]
    fn group_index_preserves_first_seen_order() {
        let table: Table = [
            od_row("AMS", "JFK", 1),
            od_row("CDG", "LHR", 2),
            od_row("AMS", "JFK", 3),
        ]
        .into_iter()
        .collect();
        let columns = ["Origin".to_string(), "Destination".to_string()];
        let groups = group_index(&table, &columns).unwrap();
        assert_eq!(groups.len(), 2);
        let sizes: Vec<usize> = groups.values().map(Vec::len).collect();
        assert_eq!(sizes, [2, 1]);
    }

    #[test]
    fn missing_key_column_fails_fast() {
        let table: Table = [
            od_row("AMS", "JFK", 1),
            Record::new().with_field("Origin", "CDG"),
        ]
        .into_iter()
        .collect();
        let columns = ["Origin".to_string(), "Destination".to_string()];
        let err = group_index(&table, &columns).unwrap_err();
        assert!(matches!(
            err,
            SampleError::MissingColumn { column, row: 1 } if column == "Destination"
        ));
    }

    #[test]
    fn null_key_values_form_their_own_group() {
        let table: Table = [
            od_row("AMS", "JFK", 1),
            Record::new()
                .with_field("Origin", "AMS")
                .with_field("Destination", FieldValue::Null),
        ]
        .into_iter()
        .collect();
        let columns = ["Origin".to_string(), "Destination".to_string()];
        let groups = group_index(&table, &columns).unwrap();
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn sample_grouped_rejects_zero_cap() {
        let table: Table = [od_row("AMS", "JFK", 1)].into_iter().collect();
        let columns = ["Origin".to_string(), "Destination".to_string()];
        let groups = group_index(&table, &columns).unwrap();
        let err = sample_grouped(&table, &groups, 0, 42).unwrap_err();
        assert!(matches!(err, SampleError::Configuration(_)));
    }

    #[test]
    fn groups_at_or_under_cap_keep_all_rows() {
        let table: Table = (0..3).map(|fare| od_row("AMS", "JFK", fare)).collect();
        let columns = ["Origin".to_string(), "Destination".to_string()];
        let groups = group_index(&table, &columns).unwrap();
        let output = sample_grouped(&table, &groups, 3, 42).unwrap();
        assert_eq!(output, table);
    }

    #[test]
    fn empty_table_and_empty_key_are_rejected() {
        let err = undersample_by_group(&Table::default(), &GroupSampleConfig::default());
        assert!(matches!(err.unwrap_err(), SampleError::EmptyTable));

        let table: Table = [od_row("AMS", "JFK", 1)].into_iter().collect();
        let config = GroupSampleConfig {
            group_columns: Vec::new(),
            ..GroupSampleConfig::default()
        };
        let err = undersample_by_group(&table, &config).unwrap_err();
        assert!(matches!(err, SampleError::Configuration(_)));
    }

    #[test]
    fn lead_values_require_finite_numbers() {
        let table: Table = [
            od_row("AMS", "JFK", 1).with_field("LeadDays", 4.0),
            od_row("AMS", "JFK", 2).with_field("LeadDays", "soon"),
        ]
        .into_iter()
        .collect();
        let err = lead_values(&table, &"LeadDays".to_string()).unwrap_err();
        assert!(matches!(
            err,
            SampleError::NonNumericValue { column, row: 1 } if column == "LeadDays"
        ));
    }
}
