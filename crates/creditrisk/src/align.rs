//! Feature alignment.
//!
//! Turns a [`RawRecord`] into an [`AlignedRecord`] whose columns are exactly
//! the trained [`FeatureSchema`], in order:
//!
//! 1. categorical fields expand to `{field}_{value}` indicators
//! 2. schema columns missing after expansion are zero-filled
//! 3. columns outside the schema are discarded
//! 4. scaled columns are standardized
//!
//! The reference category dropped during training has no schema column, so
//! its indicator is discarded in step 3 and the row matches the training
//! encoding without the aligner knowing which level was the baseline.

use std::sync::Arc;

use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::encode::{self, CategoryLevels};
use crate::error::{Result, RiskError};
use crate::record::{FieldValue, RawRecord};
use crate::scaler::StandardScaler;
use crate::schema::FeatureSchema;

/// What to do with a categorical value outside the known training levels.
///
/// Only applies to fields with registered [`CategoryLevels`]; for other
/// fields an unseen value always zero-fills silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownCategoryPolicy {
    /// Zero-fill silently.
    Ignore,
    /// Zero-fill and log a warning.
    #[default]
    Warn,
    /// Fail with [`RiskError::Encoding`].
    Reject,
}

/// A single row laid out in trained schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedRecord {
    schema: Arc<FeatureSchema>,
    values: Array1<f64>,
}

impl AlignedRecord {
    /// Column names, identical to the trained schema.
    pub fn columns(&self) -> &[String] {
        self.schema.names()
    }

    /// Row values in schema order.
    pub fn values(&self) -> ArrayView1<'_, f64> {
        self.values.view()
    }

    /// Value of a column by name.
    pub fn get(&self, column: &str) -> Option<f64> {
        self.schema.index_of(column).map(|i| self.values[i])
    }

    /// Iterate over `(column, value)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.schema.iter().zip(self.values.iter().copied())
    }

    /// Consume the record, returning the row.
    pub fn into_values(self) -> Array1<f64> {
        self.values
    }
}

/// Aligns raw records to a trained schema and applies the fitted scaler.
#[derive(Debug, Clone)]
pub struct FeatureAligner {
    schema: Arc<FeatureSchema>,
    scaler: StandardScaler,
    levels: CategoryLevels,
    policy: UnknownCategoryPolicy,
}

impl FeatureAligner {
    /// Create an aligner. The scaler must already be bound to `schema`.
    pub fn new(schema: Arc<FeatureSchema>, scaler: StandardScaler) -> Self {
        Self {
            schema,
            scaler,
            levels: CategoryLevels::new(),
            policy: UnknownCategoryPolicy::default(),
        }
    }

    /// Attach training category levels used to detect unseen values.
    pub fn with_levels(mut self, levels: CategoryLevels) -> Self {
        self.levels = levels;
        self
    }

    /// Set the unseen-category policy.
    pub fn with_policy(mut self, policy: UnknownCategoryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The trained schema.
    pub fn schema(&self) -> &Arc<FeatureSchema> {
        &self.schema
    }

    /// The bound scaler.
    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    /// Current unseen-category policy.
    pub fn policy(&self) -> UnknownCategoryPolicy {
        self.policy
    }

    /// Align one record.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::Encoding`] for non-finite numerics, for a text
    /// value in a numeric schema column, or for an unseen category under
    /// [`UnknownCategoryPolicy::Reject`].
    pub fn align(&self, record: &RawRecord) -> Result<AlignedRecord> {
        self.check_numeric_columns(record)?;
        self.check_categories(record)?;

        let columns = encode::expand(record)?;

        let mut values = Array1::zeros(self.schema.n_features());
        let mut matched = 0usize;
        for (idx, name) in self.schema.iter().enumerate() {
            if let Some(&v) = columns.get(name) {
                values[idx] = v;
                matched += 1;
            }
        }

        tracing::debug!(
            matched,
            zero_filled = self.schema.n_features() - matched,
            discarded = columns.len() - matched,
            "aligned record to feature schema"
        );

        self.scaler.transform_inplace(values.view_mut());

        Ok(AlignedRecord {
            schema: Arc::clone(&self.schema),
            values,
        })
    }

    /// A field that is itself a schema column must carry a number,
    /// regardless of the unseen-category policy.
    fn check_numeric_columns(&self, record: &RawRecord) -> Result<()> {
        for (field, value) in record.iter() {
            if let FieldValue::Categorical(level) = value
                && self.schema.contains(field)
            {
                return Err(RiskError::Encoding {
                    field: field.to_owned(),
                    value: level.clone(),
                    reason: "expected numeric value".into(),
                });
            }
        }
        Ok(())
    }

    fn check_categories(&self, record: &RawRecord) -> Result<()> {
        if self.levels.is_empty() || self.policy == UnknownCategoryPolicy::Ignore {
            return Ok(());
        }

        for (field, value) in record.iter() {
            let FieldValue::Categorical(level) = value else {
                continue;
            };
            if self.levels.is_known(field, level) != Some(false) {
                continue;
            }
            match self.policy {
                UnknownCategoryPolicy::Ignore => {}
                UnknownCategoryPolicy::Warn => {
                    tracing::warn!(field, level = %level, "unseen category, indicator zero-filled");
                }
                UnknownCategoryPolicy::Reject => {
                    return Err(RiskError::Encoding {
                        field: field.to_owned(),
                        value: level.clone(),
                        reason: "category was not seen during training".into(),
                    });
                }
            }
        }
        Ok(())
    }
}
