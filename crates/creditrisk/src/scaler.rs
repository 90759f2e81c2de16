//! Pre-fitted standardization over a named column subset.
//!
//! The scaler is fitted at training time and only ever applies
//! `(x - mean) / scale` at inference. Column names are resolved against the
//! [`FeatureSchema`] once, when the bundle is loaded.

use ndarray::ArrayViewMut1;

use crate::error::{Result, RiskError};
use crate::schema::FeatureSchema;

/// Per-column standardization parameters bound to schema positions.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    /// Scaled column names, in fit order.
    columns: Vec<String>,
    /// Schema index of each scaled column.
    indices: Vec<usize>,
    mean: Vec<f64>,
    /// Divisor per column. Zero-variance columns are stored as 1.0.
    scale: Vec<f64>,
}

impl StandardScaler {
    /// Bind fitted parameters to schema positions.
    ///
    /// A scale of exactly zero is replaced by 1.0, matching how a
    /// zero-variance column is left unscaled at fit time.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::SchemaMismatch`] if the parameter lengths differ,
    /// a column is missing from the schema or listed twice, or a parameter is
    /// not finite.
    pub fn new(
        schema: &FeatureSchema,
        columns: Vec<String>,
        mean: Vec<f64>,
        scale: Vec<f64>,
    ) -> Result<Self> {
        if mean.len() != columns.len() || scale.len() != columns.len() {
            return Err(RiskError::schema(format!(
                "scaler has {} columns but {} means and {} scales",
                columns.len(),
                mean.len(),
                scale.len()
            )));
        }

        let mut indices = Vec::with_capacity(columns.len());
        for column in &columns {
            let idx = schema.index_of(column).ok_or_else(|| {
                RiskError::schema(format!("scaled column {column} is not in the feature schema"))
            })?;
            if indices.contains(&idx) {
                return Err(RiskError::schema(format!(
                    "scaled column {column} is listed more than once"
                )));
            }
            indices.push(idx);
        }

        if let Some(pos) = mean.iter().chain(&scale).position(|v| !v.is_finite()) {
            let column = &columns[pos % columns.len()];
            return Err(RiskError::schema(format!(
                "scaler parameter for {column} is not finite"
            )));
        }

        let scale = scale
            .into_iter()
            .map(|s| if s == 0.0 { 1.0 } else { s })
            .collect();

        Ok(Self {
            columns,
            indices,
            mean,
            scale,
        })
    }

    /// A scaler that leaves every column untouched.
    pub fn identity() -> Self {
        Self {
            columns: Vec::new(),
            indices: Vec::new(),
            mean: Vec::new(),
            scale: Vec::new(),
        }
    }

    /// Scaled column names.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Fitted means, one per scaled column.
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    /// Fitted scales, one per scaled column.
    pub fn scale(&self) -> &[f64] {
        &self.scale
    }

    /// Returns true if no column is scaled.
    pub fn is_identity(&self) -> bool {
        self.indices.is_empty()
    }

    /// Standardize the scaled columns of a schema-ordered row in place.
    ///
    /// # Panics
    ///
    /// Panics if `row` is shorter than the schema the scaler was bound to.
    #[inline]
    pub fn transform_inplace(&self, mut row: ArrayViewMut1<'_, f64>) {
        for ((&idx, &mean), &scale) in self.indices.iter().zip(&self.mean).zip(&self.scale) {
            row[idx] = (row[idx] - mean) / scale;
        }
    }
}
