//! Property-based tests for alignment and decisions.
//!
//! Records are generated over the fixture bundle's fields with arbitrary
//! categorical choices, including levels never seen during training.

use proptest::prelude::*;

use creditrisk::testing::{FIXTURE_FEATURES, FixedProbability, fixture_bundle};
use creditrisk::{
    ApplicantProfile, PredictorConfig, RawRecord, RiskLabel, RiskPredictor, UnknownCategoryPolicy,
};

// =============================================================================
// Generators
// =============================================================================

fn arb_level() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop_oneof![
        Just("OWNER".to_string()),
        Just("RENT".to_string()),
        Just("OTHER".to_string()),
        Just("A".to_string()),
        Just("B".to_string()),
        Just("C".to_string()),
        "[A-Z]{1,6}",
    ])
}

prop_compose! {
    fn arb_profile()(
        score_cr22 in -300i64..1200,
        counts in prop::array::uniform8(0u32..30),
        residential in arb_level(),
        scorecard in arb_level(),
    ) -> ApplicantProfile {
        let mut profile = ApplicantProfile {
            score_cr22,
            derogatories: counts[0],
            late_payments_12m: counts[1],
            late_payments_24m: counts[2],
            credit_card_payment_failures: counts[3],
            recent_payment_irregularity: counts[4] % 26,
            active_credit_cards: counts[5],
            total_defaults: counts[6],
            open_defaults: counts[7],
            ..Default::default()
        };
        if let Some(level) = residential {
            profile = profile.with_category("RESIDENTIAL", level);
        }
        if let Some(level) = scorecard {
            profile = profile.with_category("SCORECARD", level);
        }
        profile
    }
}

fn arb_record() -> impl Strategy<Value = RawRecord> {
    (arb_profile(), prop::collection::vec(("[a-z]{1,8}", -1e6f64..1e6), 0..4)).prop_map(
        |(profile, extras)| {
            let mut record = profile.to_record();
            for (name, value) in extras {
                record.insert(name, value);
            }
            record
        },
    )
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn aligned_columns_always_match_schema(record in arb_record()) {
        let aligner = fixture_bundle().aligner(UnknownCategoryPolicy::Ignore);
        let aligned = aligner.align(&record).unwrap();

        prop_assert_eq!(aligned.columns(), &FIXTURE_FEATURES[..]);
        prop_assert_eq!(aligned.values().len(), FIXTURE_FEATURES.len());
        prop_assert!(aligned.values().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn alignment_is_bit_identical_across_calls(record in arb_record()) {
        let aligner = fixture_bundle().aligner(UnknownCategoryPolicy::Ignore);
        let a = aligner.align(&record).unwrap().into_values();
        let b = aligner.align(&record).unwrap().into_values();

        let bits = |v: &ndarray::Array1<f64>| v.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
        prop_assert_eq!(bits(&a), bits(&b));
    }

    #[test]
    fn at_most_one_indicator_per_field(profile in arb_profile()) {
        let aligner = fixture_bundle().aligner(UnknownCategoryPolicy::Ignore);
        let aligned = aligner.align(&profile.to_record()).unwrap();

        for prefix in ["RESIDENTIAL_", "SCORECARD_"] {
            let set: f64 = aligned
                .iter()
                .filter(|(name, _)| name.starts_with(prefix))
                .map(|(_, v)| v)
                .sum();
            prop_assert!(set == 0.0 || set == 1.0, "{prefix} indicators sum to {set}");
        }
    }

    #[test]
    fn probability_is_in_unit_interval(profile in arb_profile()) {
        let config = PredictorConfig::builder()
            .unknown_categories(UnknownCategoryPolicy::Ignore)
            .build()
            .unwrap();
        let predictor = RiskPredictor::from_bundle(fixture_bundle(), &config);
        let prediction = predictor.predict(&profile.to_record()).unwrap();

        prop_assert!((0.0..=1.0).contains(&prediction.prob_bad));
        prop_assert_eq!(
            prediction.label == RiskLabel::Bad,
            prediction.prob_bad >= prediction.threshold
        );
    }

    #[test]
    fn decision_is_monotone_in_probability(
        threshold in 0.0f64..=1.0,
        p1 in 0.0f64..=1.0,
        p2 in 0.0f64..=1.0,
    ) {
        let (lo, hi) = if p1 <= p2 { (p1, p2) } else { (p2, p1) };
        let config = PredictorConfig::builder().threshold(threshold).build().unwrap();
        let record = ApplicantProfile::default().to_record();

        let label_for = |p: f64| {
            let aligner = fixture_bundle().aligner(UnknownCategoryPolicy::Ignore);
            let n = aligner.schema().n_features();
            RiskPredictor::new(aligner, FixedProbability::new(p, n), &config)
                .unwrap()
                .predict(&record)
                .unwrap()
                .label
        };

        if label_for(lo) == RiskLabel::Bad {
            prop_assert_eq!(label_for(hi), RiskLabel::Bad);
        }
        prop_assert_eq!(label_for(hi) == RiskLabel::Bad, hi >= threshold);
    }
}
