use phasecast_core::{
    BaselineSeed, Category, EffectProfile, SubstanceRecord, resolve_baseline,
};

fn record(name: &str, description: &str) -> SubstanceRecord {
    SubstanceRecord {
        name: name.to_string(),
        generic_name: None,
        aliases: Vec::new(),
        description: description.to_string(),
    }
}

fn seed(name: &str) -> BaselineSeed {
    BaselineSeed {
        name: name.to_string(),
        category: None,
        risk_category: None,
    }
}

#[test]
fn mined_reference_text_yields_baseline() {
    let db = vec![record(
        "Caffeine",
        "Duration: 20-40 minutes onset, 3-6 hours total",
    )];
    let p = resolve_baseline(&seed("caffeine"), &db, None, 1_000);

    assert_eq!(p.substance, "caffeine");
    assert_eq!(p.onset_min, 30.0);
    assert_eq!(p.duration_min, 270.0);
    // interior boundaries at the fixed phase positions
    assert_eq!(p.peak_min, 110.0);
    assert_eq!(p.wear_off_start_min, 210.0);
    assert_eq!(p.confidence, 0.4);
    assert_eq!(p.samples, 0);
    assert_eq!(
        (p.sigma_onset, p.sigma_peak, p.sigma_wear, p.sigma_duration),
        (10.0, 15.0, 20.0, 25.0)
    );
    assert_eq!(p.last_updated_unix_s, 1_000);
    assert!(!p.auto_stop_on_wear_off);
}

#[test]
fn implausible_mined_durations_fall_back_to_category() {
    // Mines onset 0, total 3 -> rejected (total < 30).
    let db = vec![record("Nitro", "Duration: Immediate onset, 1-5 minutes total")];
    let mut s = seed("nitro");
    s.category = Some(Category::Supplement);
    let p = resolve_baseline(&s, &db, None, 0);

    assert_eq!(p.onset_min, 45.0);
    assert_eq!(p.duration_min, 240.0);
    assert_eq!(p.confidence, 0.25);
}

#[test]
fn opioid_fallback_uses_category_table() {
    let s = BaselineSeed {
        name: "oxy-something".to_string(),
        category: None,
        risk_category: Some(Category::Opioid),
    };
    let p = resolve_baseline(&s, &[], None, 0);

    assert_eq!(p.onset_min, 20.0);
    assert_eq!(p.duration_min, 300.0);
    assert_eq!(p.peak_min, 113.0);
    assert_eq!(p.wear_off_start_min, 230.0);
    assert_eq!(p.confidence, 0.25);
    assert_eq!(p.samples, 0);
}

#[test]
fn risk_category_takes_precedence_over_general() {
    let s = BaselineSeed {
        name: "x".to_string(),
        category: Some(Category::Supplement),
        risk_category: Some(Category::Opioid),
    };
    let p = resolve_baseline(&s, &[], None, 0);
    assert_eq!(p.onset_min, 20.0);
    assert_eq!(p.duration_min, 300.0);
}

#[test]
fn unknown_substance_without_categories_gets_low_risk() {
    let p = resolve_baseline(&seed("mystery"), &[], None, 0);
    assert_eq!(p.onset_min, 30.0);
    assert_eq!(p.duration_min, 240.0);
}

#[test]
fn matching_tries_exact_then_substring_then_alias() {
    let db = vec![
        record("Ibuprofen 400mg", "Duration: 25-35 minutes onset, 4 hours total"),
        SubstanceRecord {
            name: "Tylenol".to_string(),
            generic_name: Some("paracetamol".to_string()),
            aliases: vec!["acetaminophen".to_string()],
            description: "Duration: 30 minutes onset, 4-6 hours total".to_string(),
        },
    ];

    // substring: request name is contained in the record name
    let p = resolve_baseline(&seed("ibuprofen"), &db, None, 0);
    assert_eq!(p.onset_min, 30.0);
    assert_eq!(p.duration_min, 240.0);
    assert_eq!(p.confidence, 0.4);

    // alias containment
    let p = resolve_baseline(&seed("acetaminophen"), &db, None, 0);
    assert_eq!(p.onset_min, 30.0);
    assert_eq!(p.duration_min, 300.0);

    // generic-name containment
    let p = resolve_baseline(&seed("paracetamol 500"), &db, None, 0);
    assert_eq!(p.duration_min, 300.0);
}

#[test]
fn learned_category_profile_is_adopted_and_retagged() {
    let learned: EffectProfile = resolve_baseline(
        &BaselineSeed {
            name: "category:stimulant".to_string(),
            category: Some(Category::Stimulant),
            risk_category: None,
        },
        &[],
        None,
        0,
    );
    let p = resolve_baseline(&seed("modafinil"), &[], Some(&learned), 7);

    assert_eq!(p.substance, "modafinil");
    assert_eq!(p.onset_min, learned.onset_min);
    assert_eq!(p.duration_min, learned.duration_min);
    assert_eq!(p.confidence, learned.confidence);
    assert_eq!(p.samples, learned.samples);
    assert_eq!(p.last_updated_unix_s, 7);
}

#[test]
fn resolving_twice_is_deterministic() {
    let db = vec![record(
        "Caffeine",
        "Duration: 20-40 minutes onset, 3-6 hours total",
    )];
    let a = resolve_baseline(&seed("caffeine"), &db, None, 42);
    let b = resolve_baseline(&seed("caffeine"), &db, None, 42);
    assert_eq!(a, b);
}

#[test]
fn baselines_always_respect_boundary_margins() {
    // Mined total barely above the plausibility floor forces the margin
    // repair on the tail boundaries.
    let db = vec![record("Edge", "Duration: 20 minutes onset, 36 minutes total")];
    let p = resolve_baseline(&seed("edge"), &db, None, 0);

    assert!(p.onset_min >= 1.0);
    assert!(p.peak_min >= p.onset_min + 5.0);
    assert!(p.wear_off_start_min >= p.peak_min + 5.0);
    assert!(p.duration_min >= p.wear_off_start_min + 5.0);
}
