//! Display band lookups.
//!
//! These are pure table lookups over raw bureau inputs. They are shown next to
//! the model output but never feed into it.

use std::fmt;

use serde::Serialize;

/// Credit-score risk band for the CR22 bureau score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ScoreBand {
    #[serde(rename = "Very High Risk")]
    VeryHighRisk,
    #[serde(rename = "High Risk")]
    HighRisk,
    #[serde(rename = "Medium Risk")]
    MediumRisk,
    #[serde(rename = "Low Risk")]
    LowRisk,
}

impl ScoreBand {
    /// Display label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VeryHighRisk => "Very High Risk",
            Self::HighRisk => "High Risk",
            Self::MediumRisk => "Medium Risk",
            Self::LowRisk => "Low Risk",
        }
    }
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Qualitative band over the long-term delinquency count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DelinquencyBand {
    #[serde(rename = "Low Risk")]
    LowRisk,
    #[serde(rename = "Medium Risk")]
    MediumRisk,
    #[serde(rename = "High Risk")]
    HighRisk,
    Reject,
}

impl DelinquencyBand {
    /// Display label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LowRisk => "Low Risk",
            Self::MediumRisk => "Medium Risk",
            Self::HighRisk => "High Risk",
            Self::Reject => "Reject",
        }
    }
}

impl fmt::Display for DelinquencyBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a CR22 score to its risk band.
///
/// Bands are closed intervals covering every integer:
/// `..=500`, `501..=607`, `608..=715`, `716..`.
pub fn cr22_risk_band(score: i64) -> ScoreBand {
    match score {
        ..=500 => ScoreBand::VeryHighRisk,
        501..=607 => ScoreBand::HighRisk,
        608..=715 => ScoreBand::MediumRisk,
        _ => ScoreBand::LowRisk,
    }
}

/// Long-term delinquency count: `dpd_24m + max(0, dpd_12m - 1)`.
///
/// The first late payment in the last 12 months is assumed to be already
/// counted in the 24-month window.
pub fn long_term_delinquency_count(dpd_12m: u32, dpd_24m: u32) -> u32 {
    dpd_24m.saturating_add(dpd_12m.saturating_sub(1))
}

/// Map a long-term delinquency count to its display band.
pub fn delinquency_band(count: u32) -> DelinquencyBand {
    match count {
        0 => DelinquencyBand::LowRisk,
        1..=2 => DelinquencyBand::MediumRisk,
        3..=4 => DelinquencyBand::HighRisk,
        _ => DelinquencyBand::Reject,
    }
}
