//! creditrisk: feature alignment and threshold decisions for pre-trained
//! credit risk classifiers.
//!
//! A caller collects bureau attributes into a [`RawRecord`]; the
//! [`FeatureAligner`] lays them out in the trained column order and applies
//! the fitted scaler; a [`Classifier`] estimates the probability of the "Bad"
//! class; a [`DecisionPolicy`] turns that into a label using a recall-biased
//! threshold (0.3 by default).
//!
//! # Key Types
//!
//! - [`ModelBundle`] - schema, scaler and classifier loaded from JSON
//! - [`RiskPredictor`] - end-to-end scoring
//! - [`PredictorConfig`] - threshold and unseen-category policy
//! - [`ApplicantProfile`] - typed CR22 attributes
//!
//! # Display Bands
//!
//! [`bands::cr22_risk_band`] and [`bands::long_term_delinquency_count`] are
//! lookups over raw inputs, shown alongside the prediction but independent
//! of the model.
//!
//! # Example
//!
//! ```
//! use creditrisk::{ApplicantProfile, PredictorConfig, RiskPredictor};
//! use creditrisk::testing::fixture_bundle;
//!
//! let predictor = RiskPredictor::from_bundle(fixture_bundle(), &PredictorConfig::default());
//! let assessment = predictor.assess(&ApplicantProfile::default()).unwrap();
//! assert!((0.0..=1.0).contains(&assessment.prediction.prob_bad));
//! ```

pub mod align;
pub mod applicant;
pub mod bands;
pub mod bundle;
pub mod config;
pub mod decision;
pub mod encode;
pub mod error;
pub mod model;
pub mod predictor;
pub mod record;
pub mod scaler;
pub mod schema;
pub mod testing;

// =============================================================================
// Convenience Re-exports
// =============================================================================

pub use align::{AlignedRecord, FeatureAligner, UnknownCategoryPolicy};
pub use applicant::ApplicantProfile;
pub use bands::{DelinquencyBand, ScoreBand};
pub use bundle::ModelBundle;
pub use config::{ConfigError, PredictorConfig};
pub use decision::{DEFAULT_THRESHOLD, DecisionPolicy, Prediction, RiskLabel};
pub use error::RiskError;
pub use model::{Classifier, Model};
pub use predictor::{Assessment, RiskPredictor};
pub use record::{FieldValue, RawRecord};
pub use schema::FeatureSchema;
