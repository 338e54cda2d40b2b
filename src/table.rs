use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::SampleError;
use crate::hash::stable_hash_tokens;
use crate::types::ColumnName;

/// A single scalar field value.
///
/// Grouping equality for `Float` uses the f64 bit pattern, so keys compare
/// exactly and NaN values with identical bits land in the same group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// Missing/unknown value. Forms its own group when used as a key field.
    Null,
    /// Boolean payload value.
    Bool(bool),
    /// Integer payload value.
    Int(i64),
    /// Floating-point payload value.
    Float(f64),
    /// Text payload value.
    Text(String),
}

impl FieldValue {
    /// Numeric view of the value, when it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(value) => Some(*value as f64),
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Canonical token used to build grouping keys and row fingerprints.
    /// Prefixed by kind so `Int(1)` and `Text("1")` never collide.
    pub(crate) fn key_token(&self) -> String {
        match self {
            Self::Null => "n:".to_string(),
            Self::Bool(value) => format!("b:{value}"),
            Self::Int(value) => format!("i:{value}"),
            Self::Float(value) => format!("f:{:016x}", value.to_bits()),
            Self::Text(value) => format!("t:{value}"),
        }
    }

    fn from_json(value: &Value) -> Result<Self, SampleError> {
        match value {
            Value::Null => Ok(Self::Null),
            Value::Bool(flag) => Ok(Self::Bool(*flag)),
            Value::Number(number) => number
                .as_i64()
                .map(Self::Int)
                .or_else(|| number.as_f64().map(Self::Float))
                .ok_or_else(|| {
                    SampleError::Configuration(format!("unrepresentable number: {number}"))
                }),
            Value::String(text) => Ok(Self::Text(text.clone())),
            Value::Array(_) | Value::Object(_) => Err(SampleError::Configuration(
                "only scalar field values are supported".to_string(),
            )),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// One row: named scalar fields in insertion order.
///
/// Columns beyond the ones an operation reads are opaque payload and pass
/// through unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    fields: IndexMap<ColumnName, FieldValue>,
}

impl Record {
    /// Empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, for fixtures and call sites that assemble rows inline.
    pub fn with_field(mut self, column: impl Into<ColumnName>, value: impl Into<FieldValue>) -> Self {
        self.insert(column, value);
        self
    }

    /// Insert or replace a field. Replacing keeps the column's position.
    pub fn insert(&mut self, column: impl Into<ColumnName>, value: impl Into<FieldValue>) {
        self.fields.insert(column.into(), value.into());
    }

    /// Value of `column`, if the record carries it.
    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.fields.get(column)
    }

    /// Column names in insertion order.
    pub fn columns(&self) -> impl Iterator<Item = &ColumnName> {
        self.fields.keys()
    }

    /// (column, value) pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&ColumnName, &FieldValue)> {
        self.fields.iter()
    }

    /// Number of fields in the record.
    pub fn width(&self) -> usize {
        self.fields.len()
    }

    /// Stable content fingerprint, independent of field insertion order.
    pub(crate) fn fingerprint(&self, seed: u64) -> u64 {
        let mut pairs: Vec<(&str, String)> = self
            .fields
            .iter()
            .map(|(column, value)| (column.as_str(), value.key_token()))
            .collect();
        pairs.sort();
        stable_hash_tokens(
            seed,
            pairs.iter().map(|(column, token)| (*column, token.as_str())),
        )
    }

    fn from_json(value: &Value) -> Result<Self, SampleError> {
        let object = value.as_object().ok_or_else(|| {
            SampleError::Configuration("each record must be a JSON object".to_string())
        })?;
        let mut record = Self::new();
        for (column, field) in object {
            record.insert(column.clone(), FieldValue::from_json(field)?);
        }
        Ok(record)
    }
}

/// An in-memory table of records.
///
/// The whole table (and, during an operation, a working copy) is expected to
/// fit in memory; nothing here streams or chunks.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    records: Vec<Record>,
}

impl Table {
    /// Table over the given rows.
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows in table order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Append a row.
    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Build a table from JSON objects with scalar members.
    pub fn from_json_records(values: &[Value]) -> Result<Self, SampleError> {
        let records = values
            .iter()
            .map(Record::from_json)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(records))
    }
}

impl FromIterator<Record> for Table {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
