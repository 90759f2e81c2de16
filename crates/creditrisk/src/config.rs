//! Predictor configuration with builder pattern.
//!
//! [`PredictorConfig`] holds the policy knobs that sit on top of a loaded
//! model bundle. It uses the `bon` crate for builder generation and validates
//! at build time.
//!
//! # Example
//!
//! ```
//! use creditrisk::config::PredictorConfig;
//! use creditrisk::align::UnknownCategoryPolicy;
//!
//! // Defaults: threshold 0.3, warn on unseen categories
//! let config = PredictorConfig::builder().build().unwrap();
//! assert_eq!(config.threshold, 0.3);
//!
//! let strict = PredictorConfig::builder()
//!     .threshold(0.5)
//!     .unknown_categories(UnknownCategoryPolicy::Reject)
//!     .build()
//!     .unwrap();
//! ```

use bon::Builder;

use crate::align::UnknownCategoryPolicy;
use crate::decision::{DEFAULT_THRESHOLD, DecisionPolicy};

// =============================================================================
// ConfigError
// =============================================================================

/// Errors that can occur during configuration validation.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Threshold must lie in `[0, 1]`.
    InvalidThreshold(f64),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidThreshold(v) => {
                write!(f, "threshold must be in [0, 1], got {}", v)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// =============================================================================
// PredictorConfig
// =============================================================================

/// Policy settings applied on top of a loaded model bundle.
#[derive(Debug, Clone, Builder)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
pub struct PredictorConfig {
    /// Probability of "Bad" at or above which the label is "Bad". Default: 0.3.
    #[builder(default = DEFAULT_THRESHOLD)]
    pub threshold: f64,

    /// Handling of categorical values not seen during training.
    /// Default: `Warn`.
    #[builder(default)]
    pub unknown_categories: UnknownCategoryPolicy,
}

/// Custom finishing function that validates the config.
impl<S: predictor_config_builder::IsComplete> PredictorConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidThreshold`] if the threshold is NaN or
    /// outside `[0, 1]`.
    pub fn build(self) -> Result<PredictorConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl PredictorConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ConfigError::InvalidThreshold(self.threshold));
        }
        Ok(())
    }

    /// Decision policy for this configuration.
    pub fn policy(&self) -> DecisionPolicy {
        DecisionPolicy::new(self.threshold)
    }
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self::builder().build().expect("default config is valid")
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = PredictorConfig::default();
        assert_eq!(config.threshold, 0.3);
        assert_eq!(config.unknown_categories, UnknownCategoryPolicy::Warn);
        assert_eq!(config.policy().threshold(), 0.3);
    }

    #[test]
    fn boundary_thresholds_are_valid() {
        assert!(PredictorConfig::builder().threshold(0.0).build().is_ok());
        assert!(PredictorConfig::builder().threshold(1.0).build().is_ok());
    }

    #[test]
    fn invalid_thresholds() {
        for t in [-0.01, 1.01, f64::NAN, f64::INFINITY] {
            let result = PredictorConfig::builder().threshold(t).build();
            assert!(
                matches!(result, Err(ConfigError::InvalidThreshold(_))),
                "threshold {t} accepted"
            );
        }
    }

    #[test]
    fn error_message() {
        let err = ConfigError::InvalidThreshold(2.0);
        assert_eq!(err.to_string(), "threshold must be in [0, 1], got 2");
    }
}
