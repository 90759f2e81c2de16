//! One-hot expansion of categorical fields.
//!
//! Expansion is schema-agnostic: every categorical field produces the
//! indicator `{field}_{value}`, numeric fields pass through under their own
//! name. Projection onto the trained layout is done by the aligner.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::error::{Result, RiskError};
use crate::record::{FieldValue, RawRecord};

/// Indicator column name for a categorical field value.
#[inline]
pub fn indicator_name(field: &str, value: &str) -> String {
    format!("{field}_{value}")
}

/// Expand a record into a column name → value map.
///
/// # Errors
///
/// Returns [`RiskError::Encoding`] for a non-finite numeric value, or when
/// a numeric field shares its name with another field's indicator.
pub fn expand(record: &RawRecord) -> Result<HashMap<String, f64>> {
    let mut columns = HashMap::with_capacity(record.len());
    for (field, value) in record.iter() {
        let (column, v) = match value {
            FieldValue::Numeric(v) => {
                if !v.is_finite() {
                    return Err(RiskError::Encoding {
                        field: field.to_owned(),
                        value: value.to_string(),
                        reason: "numeric value is not finite".into(),
                    });
                }
                (field.to_owned(), *v)
            }
            FieldValue::Categorical(level) => (indicator_name(field, level), 1.0),
        };
        if columns.contains_key(&column) {
            return Err(RiskError::Encoding {
                field: field.to_owned(),
                value: value.to_string(),
                reason: format!("column {column} is produced by more than one field"),
            });
        }
        columns.insert(column, v);
    }
    Ok(columns)
}

/// Category levels observed at training time, per categorical field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryLevels {
    levels: BTreeMap<String, BTreeSet<String>>,
}

impl CategoryLevels {
    /// Create an empty level table (no field is checked).
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the training levels of a field.
    pub fn insert<I, S>(&mut self, field: impl Into<String>, levels: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.levels
            .entry(field.into())
            .or_default()
            .extend(levels.into_iter().map(Into::into));
    }

    /// Returns true if no field has registered levels.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Whether `value` is a known level of `field`.
    ///
    /// Returns `None` when the field has no registered levels.
    pub fn is_known(&self, field: &str, value: &str) -> Option<bool> {
        self.levels.get(field).map(|levels| levels.contains(value))
    }

    /// Iterate over `(field, levels)` in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.levels.iter().map(|(k, v)| (k.as_str(), v))
    }
}
