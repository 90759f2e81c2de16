//! Schema types for bundle serialization.
//!
//! These types define the on-disk JSON layout and are kept separate from the
//! runtime types so the file format can evolve independently. Validation
//! happens when converting into runtime types (see `convert`).
//!
//! All maps use `BTreeMap` for deterministic JSON output.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Top-level document with a format version tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleEnvelope {
    /// Bundle format version.
    pub format_version: u32,
    /// Bundle contents.
    pub bundle: BundleSchema,
}

/// Descriptive metadata. Not used for inference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BundleMetaSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Everything needed to score a raw record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleSchema {
    #[serde(default)]
    pub meta: BundleMetaSchema,
    /// Trained feature names, in training order.
    pub features: Vec<String>,
    /// Columns standardized by the scaler, in scaler fit order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cols_to_scale: Vec<String>,
    /// Scaler parameters, one entry per column in `cols_to_scale`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaler: Option<ScalerSchema>,
    /// Training category levels per categorical field (optional).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub categories: BTreeMap<String, Vec<String>>,
    /// The classifier.
    pub model: ModelSchema,
}

/// Standard scaler parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerSchema {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// Classifier schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelSchema {
    /// Binary logistic regression.
    Logistic {
        /// One coefficient per feature, in feature order.
        coefficients: Vec<f64>,
        intercept: f64,
    },
    /// Decision tree ensemble.
    TreeEnsemble {
        aggregation: AggregationSchema,
        trees: Vec<TreeSchema>,
    },
}

impl ModelSchema {
    /// Model type string.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Logistic { .. } => "logistic",
            Self::TreeEnsemble { .. } => "tree_ensemble",
        }
    }
}

/// Leaf aggregation schema.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AggregationSchema {
    /// Sum of log-odds leaves plus base score, through a sigmoid.
    Boosted { base_score: f64 },
    /// Mean of per-tree probabilities.
    Averaged,
}

/// Tree schema (SoA layout).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeSchema {
    /// Split feature index for each node.
    pub split_indices: Vec<u32>,
    /// Split threshold for each node.
    pub thresholds: Vec<f64>,
    /// Left child index for each node (ignored for leaves).
    pub children_left: Vec<u32>,
    /// Right child index for each node (ignored for leaves).
    pub children_right: Vec<u32>,
    /// Default direction (true = left) for missing values.
    pub default_left: Vec<bool>,
    /// Leaf flag for each node.
    pub is_leaf: Vec<bool>,
    /// Leaf value for each node (ignored for internal nodes).
    pub values: Vec<f64>,
}
