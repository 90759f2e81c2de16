//! End-to-end scoring against on-disk bundles.

use std::path::PathBuf;
use std::sync::Arc;

use approx::assert_abs_diff_eq;
use creditrisk::testing::fixture_bundle;
use creditrisk::{
    ApplicantProfile, DelinquencyBand, PredictorConfig, RawRecord, RiskError, RiskLabel,
    RiskPredictor, ScoreBand, UnknownCategoryPolicy,
};
use rstest::rstest;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/test-cases/bundle")
        .join(name)
}

fn predictor(name: &str, config: &PredictorConfig) -> RiskPredictor {
    RiskPredictor::load(fixture_path(name), config).expect("load fixture bundle")
}

#[test]
fn baseline_applicant_end_to_end() {
    let profile = ApplicantProfile {
        score_cr22: 650,
        active_credit_cards: 1,
        ..Default::default()
    }
    .with_category("RESIDENTIAL", "OWNER")
    .with_category("SCORECARD", "A");

    let p = predictor("cr22_logistic.bundle.json", &PredictorConfig::default());
    let assessment = p.assess(&profile).unwrap();

    assert_eq!(assessment.score_band, ScoreBand::MediumRisk);
    assert_eq!(assessment.delinquency_count, 0);
    assert_eq!(assessment.delinquency_band, DelinquencyBand::LowRisk);
    assert!((0.0..=1.0).contains(&assessment.prediction.prob_bad));
    assert_abs_diff_eq!(assessment.prediction.prob_bad, 0.163_889_746_334_630_7, epsilon = 1e-9);
    assert_eq!(assessment.prediction.label, RiskLabel::Good);
}

#[test]
fn risky_applicant_is_bad() {
    let profile = ApplicantProfile {
        score_cr22: 520,
        derogatories: 1,
        late_payments_12m: 2,
        late_payments_24m: 3,
        active_credit_cards: 1,
        total_defaults: 1,
        ..Default::default()
    }
    .with_category("RESIDENTIAL", "RENT")
    .with_category("SCORECARD", "C");

    let p = predictor("cr22_logistic.bundle.json", &PredictorConfig::default());
    let assessment = p.assess(&profile).unwrap();

    assert_eq!(assessment.delinquency_count, 4);
    assert_eq!(assessment.delinquency_band, DelinquencyBand::HighRisk);
    assert_abs_diff_eq!(assessment.prediction.prob_bad, 0.965_684_992_850_365_7, epsilon = 1e-9);
    assert_eq!(assessment.prediction.label, RiskLabel::Bad);
}

#[test]
fn fixture_file_matches_in_memory_fixture() {
    let from_disk = predictor("cr22_logistic.bundle.json", &PredictorConfig::default());
    let in_memory = RiskPredictor::from_bundle(fixture_bundle(), &PredictorConfig::default());

    let record = ApplicantProfile::default()
        .with_category("SCORECARD", "B")
        .to_record();
    assert_eq!(
        from_disk.predict(&record).unwrap(),
        in_memory.predict(&record).unwrap()
    );
}

#[rstest]
// score > 607, no open defaults: -1.0 - 0.6 - 0.1
#[case(650, 0, 0, 0.154_465_265_083_534_7, RiskLabel::Good)]
// score <= 607, no delinquency: -1.0 + 0.4 - 0.1; under 0.5 but over the 0.3 policy cutoff
#[case(550, 0, 0, 0.331_812_227_831_833_9, RiskLabel::Bad)]
// score <= 607, delinquent, open default: -1.0 + 1.2 + 1.5
#[case(550, 2, 1, 0.845_534_734_916_465_2, RiskLabel::Bad)]
fn boosted_trees_end_to_end(
    #[case] score: i64,
    #[case] late_24m: u32,
    #[case] open_defaults: u32,
    #[case] expected_prob: f64,
    #[case] expected_label: RiskLabel,
) {
    let profile = ApplicantProfile {
        score_cr22: score,
        late_payments_24m: late_24m,
        open_defaults,
        ..Default::default()
    };

    let p = predictor("cr22_boosted.bundle.json", &PredictorConfig::default());
    let prediction = p.predict(&profile.to_record()).unwrap();

    assert_abs_diff_eq!(prediction.prob_bad, expected_prob, epsilon = 1e-9);
    assert_eq!(prediction.label, expected_label);
}

#[test]
fn threshold_override_changes_label_only() {
    let record = ApplicantProfile {
        score_cr22: 550,
        ..Default::default()
    }
    .to_record();

    let default = predictor("cr22_boosted.bundle.json", &PredictorConfig::default());
    let lenient = predictor(
        "cr22_boosted.bundle.json",
        &PredictorConfig::builder().threshold(0.5).build().unwrap(),
    );

    let a = default.predict(&record).unwrap();
    let b = lenient.predict(&record).unwrap();
    assert_eq!(a.prob_bad, b.prob_bad);
    assert_eq!(a.label, RiskLabel::Bad);
    assert_eq!(b.label, RiskLabel::Good);
    assert_eq!(b.threshold, 0.5);
}

#[test]
fn unseen_category_rejected_under_strict_policy() {
    let config = PredictorConfig::builder()
        .unknown_categories(UnknownCategoryPolicy::Reject)
        .build()
        .unwrap();
    let p = predictor("cr22_logistic.bundle.json", &config);
    let record = ApplicantProfile::default()
        .with_category("RESIDENTIAL", "BOAT")
        .to_record();

    let err = p.predict(&record).unwrap_err();
    assert!(matches!(err, RiskError::Encoding { ref field, .. } if field == "RESIDENTIAL"));

    // Same record under the default policy zero-fills like the baseline level.
    let lenient = predictor("cr22_logistic.bundle.json", &PredictorConfig::default());
    let baseline = ApplicantProfile::default()
        .with_category("RESIDENTIAL", "OWNER")
        .to_record();
    assert_eq!(
        lenient.predict(&record).unwrap().prob_bad,
        lenient.predict(&baseline).unwrap().prob_bad
    );
}

#[test]
fn raw_json_record_scores() {
    let record: RawRecord = serde_json::from_str(
        r#"{"SCORE_CR22": 700, "DEROGATORIES": 0, "CREDIT_CARD_CR22": 2,
            "RESIDENTIAL": "RENT", "UNRELATED_FIELD": 12}"#,
    )
    .unwrap();

    let p = predictor("cr22_logistic.bundle.json", &PredictorConfig::default());
    let aligned = p.align(&record).unwrap();
    assert_eq!(aligned.get("RESIDENTIAL_RENT"), Some(1.0));
    assert_eq!(aligned.get("UNRELATED_FIELD"), None);

    let prediction = p.predict(&record).unwrap();
    assert!((0.0..=1.0).contains(&prediction.prob_bad));
}

#[rstest]
#[case(UnknownCategoryPolicy::Ignore)]
#[case(UnknownCategoryPolicy::Warn)]
#[case(UnknownCategoryPolicy::Reject)]
fn quoted_score_is_encoding_error(#[case] policy: UnknownCategoryPolicy) {
    let config = PredictorConfig::builder()
        .unknown_categories(policy)
        .build()
        .unwrap();
    let p = predictor("cr22_logistic.bundle.json", &config);

    let quoted: RawRecord = serde_json::from_str(r#"{"SCORE_CR22": "650"}"#).unwrap();
    let err = p.predict(&quoted).unwrap_err();
    assert!(
        matches!(err, RiskError::Encoding { ref field, .. } if field == "SCORE_CR22"),
        "got: {err:?}"
    );

    let numeric: RawRecord = serde_json::from_str(r#"{"SCORE_CR22": 650}"#).unwrap();
    assert!(p.predict(&numeric).is_ok());
}

#[test]
fn numeric_field_shadowing_indicator_is_encoding_error() {
    let record = RawRecord::new()
        .with("RESIDENTIAL", "RENT")
        .with("RESIDENTIAL_RENT", 0);

    let p = predictor("cr22_logistic.bundle.json", &PredictorConfig::default());
    let err = p.predict(&record).unwrap_err();
    assert!(matches!(err, RiskError::Encoding { .. }), "got: {err:?}");
}

#[test]
fn shared_predictor_across_threads() {
    let p = Arc::new(RiskPredictor::from_bundle(
        fixture_bundle(),
        &PredictorConfig::default(),
    ));
    let expected = p.predict(&ApplicantProfile::default().to_record()).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let p = Arc::clone(&p);
            std::thread::spawn(move || p.predict(&ApplicantProfile::default().to_record()))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap().unwrap(), expected);
    }
}
