use phasecast_core::{
    BaselineSeed, Category, DayBucket, EffectEvent, EffectProfile, EventKind, TimeOfDayBias,
    mine_durations, predict_phase, resolve_baseline, update_from_events,
};
use proptest::prelude::*;

fn any_kind() -> impl Strategy<Value = EventKind> {
    prop_oneof![
        Just(EventKind::KickingIn),
        Just(EventKind::Peaking),
        Just(EventKind::WearingOff),
        Just(EventKind::WornOff),
    ]
}

fn any_bucket() -> impl Strategy<Value = DayBucket> {
    prop_oneof![
        Just(DayBucket::Morning),
        Just(DayBucket::Afternoon),
        Just(DayBucket::Evening),
        Just(DayBucket::Night),
    ]
}

fn any_events() -> impl Strategy<Value = Vec<EffectEvent>> {
    prop::collection::vec(
        (any_kind(), -100.0f64..3_000.0).prop_map(|(kind, offset_min)| EffectEvent {
            kind,
            offset_min,
        }),
        0..25,
    )
}

fn base_profile() -> EffectProfile {
    resolve_baseline(
        &BaselineSeed {
            name: "prop".to_string(),
            category: Some(Category::Stimulant),
            risk_category: None,
        },
        &[],
        None,
        0,
    )
}

fn assert_invariants(p: &EffectProfile) {
    assert!(p.onset_min >= 1.0 && p.onset_min <= 1440.0, "onset {}", p.onset_min);
    assert!(p.peak_min >= p.onset_min + 5.0);
    assert!(p.wear_off_start_min >= p.peak_min + 5.0);
    assert!(p.duration_min >= p.wear_off_start_min + 5.0);
    assert!((0.0..=1.0).contains(&p.confidence), "confidence {}", p.confidence);
    assert!(p.sigma_onset >= 0.0);
    assert!(p.sigma_peak >= 0.0);
    assert!(p.sigma_wear >= 0.0);
    assert!(p.sigma_duration >= 0.0);
}

proptest! {
    #[test]
    fn folded_profiles_always_satisfy_invariants(
        events in any_events(),
        bucket in any_bucket(),
    ) {
        let base = base_profile();
        let p = update_from_events(&base, &events, bucket, 1);
        assert_invariants(&p);
        prop_assert_eq!(p.samples as usize, events.len());
        // boundaries stay whole minutes
        prop_assert_eq!(p.onset_min, p.onset_min.round());
        prop_assert_eq!(p.duration_min, p.duration_min.round());
    }

    #[test]
    fn progress_stays_in_unit_interval(
        elapsed in -1_000.0f64..1_000_000.0,
        bias in -2_000.0f64..2_000.0,
        bucket in any_bucket(),
    ) {
        let mut p = base_profile();
        p.tod_bias_min = TimeOfDayBias {
            morning_min: bias,
            afternoon_min: bias,
            evening_min: bias,
            night_min: bias,
        };
        let e = predict_phase(&p, elapsed, bucket);
        prop_assert!((0.0..=1.0).contains(&e.progress));
    }

    #[test]
    fn miner_is_total_over_arbitrary_text(text in ".{0,120}") {
        // best-effort heuristics must never panic, whatever the text
        let _ = mine_durations(&text);
    }

    #[test]
    fn mined_values_are_finite_and_non_negative(
        lo in 0u32..500,
        hi in 0u32..500,
    ) {
        let text = format!("Duration: {lo}-{hi} minutes onset, 2-4 hours total");
        if let Some(m) = mine_durations(&text) {
            prop_assert!(m.onset_min.is_finite() && m.onset_min >= 0.0);
            prop_assert!(m.total_min.is_finite() && m.total_min >= 0.0);
        }
    }
}
