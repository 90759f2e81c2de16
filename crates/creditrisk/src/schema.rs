//! Trained feature schema.
//!
//! The schema is the ordered list of column names the classifier was trained
//! on. Every aligned record has exactly these columns, in exactly this order.

use std::collections::HashMap;

use crate::error::{Result, RiskError};

/// Ordered, duplicate-free list of trained feature names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeatureSchema {
    /// Column names in training order.
    names: Vec<String>,

    /// Column name → index mapping.
    name_index: HashMap<String, usize>,
}

impl FeatureSchema {
    /// Create a schema from column names in training order.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::SchemaMismatch`] if the list is empty or contains
    /// a duplicate name.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(RiskError::schema("feature schema has no columns"));
        }

        let mut name_index = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            if name_index.insert(name.clone(), i).is_some() {
                return Err(RiskError::schema(format!(
                    "duplicate feature name in schema: {name}"
                )));
            }
        }

        Ok(Self { names, name_index })
    }

    /// Number of columns.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.names.len()
    }

    /// Column names in training order.
    #[inline]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Column name at `index`.
    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Column index by name.
    #[inline]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.name_index.get(name).copied()
    }

    /// Returns true if the schema has a column with this name.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.name_index.contains_key(name)
    }

    /// Iterate over column names in training order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}
