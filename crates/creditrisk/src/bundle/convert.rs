//! Conversion between runtime types and schema types.
//!
//! Schema → runtime conversions validate and can fail with
//! [`RiskError::SchemaMismatch`]; runtime → schema conversions are lossless.

use std::collections::BTreeMap;
use std::sync::Arc;

use ndarray::Array1;

use super::schema::{
    AggregationSchema, BundleMetaSchema, BundleSchema, ModelSchema, ScalerSchema, TreeSchema,
};
use super::{BundleMeta, ModelBundle};
use crate::encode::CategoryLevels;
use crate::error::{Result, RiskError};
use crate::model::{Aggregation, Classifier, LogisticModel, Model, Tree, TreeEnsemble};
use crate::scaler::StandardScaler;
use crate::schema::FeatureSchema;

// =============================================================================
// Meta
// =============================================================================

impl From<BundleMetaSchema> for BundleMeta {
    fn from(meta: BundleMetaSchema) -> Self {
        Self {
            name: meta.name,
            description: meta.description,
        }
    }
}

impl From<&BundleMeta> for BundleMetaSchema {
    fn from(meta: &BundleMeta) -> Self {
        Self {
            name: meta.name.clone(),
            description: meta.description.clone(),
        }
    }
}

// =============================================================================
// Trees
// =============================================================================

impl TryFrom<TreeSchema> for Tree {
    type Error = RiskError;

    fn try_from(tree: TreeSchema) -> Result<Self> {
        Tree::new(
            tree.split_indices,
            tree.thresholds,
            tree.children_left,
            tree.children_right,
            tree.default_left,
            tree.is_leaf,
            tree.values,
        )
    }
}

impl From<&Tree> for TreeSchema {
    fn from(tree: &Tree) -> Self {
        Self {
            split_indices: tree.split_features().to_vec(),
            thresholds: tree.thresholds().to_vec(),
            children_left: tree.children_left().to_vec(),
            children_right: tree.children_right().to_vec(),
            default_left: tree.default_left().to_vec(),
            is_leaf: tree.is_leaf().to_vec(),
            values: tree.values().to_vec(),
        }
    }
}

impl From<AggregationSchema> for Aggregation {
    fn from(agg: AggregationSchema) -> Self {
        match agg {
            AggregationSchema::Boosted { base_score } => Aggregation::Boosted { base_score },
            AggregationSchema::Averaged => Aggregation::Averaged,
        }
    }
}

impl From<Aggregation> for AggregationSchema {
    fn from(agg: Aggregation) -> Self {
        match agg {
            Aggregation::Boosted { base_score } => AggregationSchema::Boosted { base_score },
            Aggregation::Averaged => AggregationSchema::Averaged,
        }
    }
}

// =============================================================================
// Models
// =============================================================================

/// Convert a model schema for rows of `n_features` columns.
fn model_from_schema(schema: ModelSchema, n_features: usize) -> Result<Model> {
    match schema {
        ModelSchema::Logistic {
            coefficients,
            intercept,
        } => {
            if coefficients.len() != n_features {
                return Err(RiskError::schema(format!(
                    "logistic model has {} coefficients, schema has {n_features} features",
                    coefficients.len()
                )));
            }
            if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
                return Err(RiskError::schema("logistic model has non-finite parameters"));
            }
            Ok(LogisticModel::new(Array1::from(coefficients), intercept).into())
        }
        ModelSchema::TreeEnsemble { aggregation, trees } => {
            let trees = trees
                .into_iter()
                .enumerate()
                .map(|(i, t)| {
                    Tree::try_from(t).map_err(|e| match e {
                        RiskError::SchemaMismatch(m) => {
                            RiskError::SchemaMismatch(format!("tree {i}: {m}"))
                        }
                        other => other,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(TreeEnsemble::new(trees, n_features, aggregation.into())?.into())
        }
    }
}

impl From<&Model> for ModelSchema {
    fn from(model: &Model) -> Self {
        match model {
            Model::Logistic(m) => ModelSchema::Logistic {
                coefficients: m.coefficients().to_vec(),
                intercept: m.intercept(),
            },
            Model::TreeEnsemble(m) => ModelSchema::TreeEnsemble {
                aggregation: m.aggregation().into(),
                trees: m.trees().iter().map(TreeSchema::from).collect(),
            },
        }
    }
}

// =============================================================================
// Bundle
// =============================================================================

impl TryFrom<BundleSchema> for ModelBundle {
    type Error = RiskError;

    fn try_from(bundle: BundleSchema) -> Result<Self> {
        let schema = Arc::new(FeatureSchema::new(bundle.features)?);

        let scaler = match (bundle.scaler, bundle.cols_to_scale.is_empty()) {
            (Some(s), false) => StandardScaler::new(&schema, bundle.cols_to_scale, s.mean, s.scale)?,
            (None, true) => StandardScaler::identity(),
            (Some(_), true) => {
                return Err(RiskError::schema("scaler present but cols_to_scale is empty"));
            }
            (None, false) => {
                return Err(RiskError::schema("cols_to_scale listed but no scaler present"));
            }
        };

        let mut levels = CategoryLevels::new();
        for (field, values) in bundle.categories {
            levels.insert(field, values);
        }

        let model = model_from_schema(bundle.model, schema.n_features())?;
        debug_assert_eq!(model.n_features(), schema.n_features());

        Ok(ModelBundle {
            meta: bundle.meta.into(),
            schema,
            scaler,
            levels,
            model,
        })
    }
}

impl From<&ModelBundle> for BundleSchema {
    fn from(bundle: &ModelBundle) -> Self {
        let scaler = &bundle.scaler;
        let scaler_schema = (!scaler.is_identity()).then(|| ScalerSchema {
            mean: scaler.mean().to_vec(),
            scale: scaler.scale().to_vec(),
        });

        let categories: BTreeMap<String, Vec<String>> = bundle
            .levels
            .iter()
            .map(|(field, levels)| (field.to_owned(), levels.iter().cloned().collect()))
            .collect();

        Self {
            meta: (&bundle.meta).into(),
            features: bundle.schema.names().to_vec(),
            cols_to_scale: scaler.columns().to_vec(),
            scaler: scaler_schema,
            categories,
            model: (&bundle.model).into(),
        }
    }
}
