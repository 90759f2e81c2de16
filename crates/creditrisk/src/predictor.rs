//! End-to-end scoring.
//!
//! [`RiskPredictor`] owns a [`FeatureAligner`], a [`Classifier`] and a
//! [`DecisionPolicy`]. It holds no mutable state, so one instance can serve
//! concurrent callers behind an `Arc`.

use std::path::Path;

use serde::Serialize;

use crate::align::{AlignedRecord, FeatureAligner};
use crate::applicant::ApplicantProfile;
use crate::bands::{self, DelinquencyBand, ScoreBand};
use crate::bundle::ModelBundle;
use crate::config::PredictorConfig;
use crate::decision::{DecisionPolicy, Prediction};
use crate::error::{Result, RiskError};
use crate::model::{Classifier, Model};
use crate::record::RawRecord;

/// Model prediction plus the display bands shown next to it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Assessment {
    #[serde(flatten)]
    pub prediction: Prediction,
    pub score_band: ScoreBand,
    pub delinquency_count: u32,
    pub delinquency_band: DelinquencyBand,
}

/// Aligns, scores and labels raw applicant records.
#[derive(Debug, Clone)]
pub struct RiskPredictor<C = Model> {
    aligner: FeatureAligner,
    classifier: C,
    policy: DecisionPolicy,
}

impl RiskPredictor<Model> {
    /// Build a predictor from a loaded bundle.
    pub fn from_bundle(bundle: ModelBundle, config: &PredictorConfig) -> Self {
        let (aligner, model) = bundle.into_parts(config.unknown_categories);
        Self {
            aligner,
            classifier: model,
            policy: config.policy(),
        }
    }

    /// Load a bundle from disk and build a predictor.
    pub fn load(path: impl AsRef<Path>, config: &PredictorConfig) -> Result<Self> {
        Ok(Self::from_bundle(ModelBundle::load(path)?, config))
    }
}

impl<C: Classifier> RiskPredictor<C> {
    /// Combine an aligner with any classifier.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::SchemaMismatch`] if the classifier width differs
    /// from the aligner's schema.
    pub fn new(aligner: FeatureAligner, classifier: C, config: &PredictorConfig) -> Result<Self> {
        let expected = aligner.schema().n_features();
        if classifier.n_features() != expected {
            return Err(RiskError::schema(format!(
                "classifier expects {} features, schema has {expected}",
                classifier.n_features()
            )));
        }
        Ok(Self {
            aligner: aligner.with_policy(config.unknown_categories),
            classifier,
            policy: config.policy(),
        })
    }

    /// The feature aligner.
    pub fn aligner(&self) -> &FeatureAligner {
        &self.aligner
    }

    /// The classifier.
    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// The decision policy.
    pub fn policy(&self) -> DecisionPolicy {
        self.policy
    }

    /// Align a record without scoring it.
    pub fn align(&self, record: &RawRecord) -> Result<AlignedRecord> {
        self.aligner.align(record)
    }

    /// Score one raw record.
    ///
    /// # Errors
    ///
    /// [`RiskError::Encoding`] from alignment, [`RiskError::Inference`] from
    /// the classifier. Nothing is retried.
    pub fn predict(&self, record: &RawRecord) -> Result<Prediction> {
        let aligned = self.aligner.align(record)?;
        let prediction = self.policy.decide(&self.classifier, &aligned)?;
        tracing::debug!(
            prob_bad = prediction.prob_bad,
            label = %prediction.label,
            threshold = prediction.threshold,
            "scored record"
        );
        Ok(prediction)
    }

    /// Score a profile and attach its display bands.
    pub fn assess(&self, profile: &ApplicantProfile) -> Result<Assessment> {
        let prediction = self.predict(&profile.to_record())?;
        let delinquency_count = profile.long_term_delinquency();
        Ok(Assessment {
            prediction,
            score_band: bands::cr22_risk_band(profile.score_cr22),
            delinquency_count,
            delinquency_band: bands::delinquency_band(delinquency_count),
        })
    }
}
