//! Baseline resolution: produce a complete, invariant-respecting starting
//! profile for a substance that has no learned data yet.
//!
//! Priority chain: mined reference-text durations, then a learned
//! category-level profile supplied by the caller, then the static category
//! fallback table.

use crate::category::Category;
use crate::miner::{MinedDurations, mine_durations};
use crate::profile::{EffectProfile, PEAK_POSITION, TimeOfDayBias, WEAR_POSITION};
use crate::util::finite_or_zero;
use phasecast_config::SubstanceRecord;
use serde::{Deserialize, Serialize};

/// Confidence assigned to a baseline mined from reference text.
const MINED_CONFIDENCE: f64 = 0.4;
/// Confidence assigned to a category-table fallback baseline.
const FALLBACK_CONFIDENCE: f64 = 0.25;

/// Starting sigma per boundary, in minutes: later boundaries are less
/// certain than earlier ones.
const INITIAL_SIGMA: (f64, f64, f64, f64) = (10.0, 15.0, 20.0, 25.0);

/// Caller-side description of the medication being tracked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineSeed {
    pub name: String,
    /// General category, if the caller knows one.
    #[serde(default)]
    pub category: Option<Category>,
    /// Dependency-risk category; takes precedence over `category` when
    /// selecting fallback timings.
    #[serde(default)]
    pub risk_category: Option<Category>,
}

/// Resolve a starting profile for `seed`.
///
/// Pure function of its inputs: resolving the same seed against the same
/// reference data yields an identical profile.
pub fn resolve_baseline(
    seed: &BaselineSeed,
    reference: &[SubstanceRecord],
    learned: Option<&EffectProfile>,
    now_unix_s: u64,
) -> EffectProfile {
    if let Some(record) = find_record(&seed.name, reference)
        && let Some(mined) = mine_durations(&record.description)
    {
        if mined_is_plausible(&mined) {
            tracing::debug!(
                substance = %seed.name,
                record = %record.name,
                onset_min = mined.onset_min,
                total_min = mined.total_min,
                "baseline from mined reference text"
            );
            return profile_from_bounds(
                &seed.name,
                mined.onset_min,
                mined.total_min,
                MINED_CONFIDENCE,
                0,
                now_unix_s,
            );
        }
        // Implausible mined data drops straight to the category table.
        tracing::warn!(
            substance = %seed.name,
            onset_min = mined.onset_min,
            total_min = mined.total_min,
            "mined durations failed sanity bounds; using category fallback"
        );
        return category_fallback(seed, now_unix_s);
    }

    if let Some(prior) = learned {
        tracing::debug!(substance = %seed.name, "baseline adopted from learned category profile");
        return profile_from_bounds(
            &seed.name,
            prior.onset_min,
            prior.duration_min,
            prior.confidence,
            prior.samples,
            now_unix_s,
        );
    }

    category_fallback(seed, now_unix_s)
}

/// Fallback profile from the static category table: dependency-risk
/// category first, then the general category, then low-risk.
fn category_fallback(seed: &BaselineSeed, now_unix_s: u64) -> EffectProfile {
    let category = seed
        .risk_category
        .or(seed.category)
        .unwrap_or(Category::LowRisk);
    let defaults = category.defaults();
    tracing::debug!(substance = %seed.name, %category, "baseline from category defaults");
    profile_from_bounds(
        &seed.name,
        defaults.onset_min,
        defaults.duration_min,
        FALLBACK_CONFIDENCE,
        0,
        now_unix_s,
    )
}

/// Locate the reference record for a substance name: exact match first,
/// then substring containment either direction, then alias/generic-name
/// containment. All comparisons are case-insensitive.
fn find_record<'a>(name: &str, reference: &'a [SubstanceRecord]) -> Option<&'a SubstanceRecord> {
    let needle = name.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    if let Some(r) = reference
        .iter()
        .find(|r| r.name.trim().to_lowercase() == needle)
    {
        return Some(r);
    }

    if let Some(r) = reference.iter().find(|r| {
        let candidate = r.name.trim().to_lowercase();
        !candidate.is_empty() && (candidate.contains(&needle) || needle.contains(&candidate))
    }) {
        return Some(r);
    }

    reference.iter().find(|r| {
        let generic_hit = r.generic_name.as_deref().is_some_and(|g| {
            let g = g.trim().to_lowercase();
            !g.is_empty() && (g.contains(&needle) || needle.contains(&g))
        });
        generic_hit
            || r.aliases.iter().any(|a| {
                let a = a.trim().to_lowercase();
                !a.is_empty() && (a.contains(&needle) || needle.contains(&a))
            })
    })
}

/// Sanity bounds for mined durations. Values outside these are silently
/// replaced by category fallback (policy, not an error).
fn mined_is_plausible(mined: &MinedDurations) -> bool {
    let onset = finite_or_zero(mined.onset_min);
    let total = finite_or_zero(mined.total_min);
    if total < 30.0 {
        return false;
    }
    if total <= onset + 15.0 {
        return false;
    }
    if onset > 120.0_f64.max(total * 0.8) {
        return false;
    }
    true
}

/// Build a complete profile from an onset/duration pair: interior
/// boundaries at the fixed phase positions, fresh sigmas, zeroed bias.
fn profile_from_bounds(
    substance: &str,
    onset_min: f64,
    duration_min: f64,
    confidence: f64,
    samples: u32,
    now_unix_s: u64,
) -> EffectProfile {
    let onset = finite_or_zero(onset_min);
    let duration = finite_or_zero(duration_min);
    let span = duration - onset;
    let (sigma_onset, sigma_peak, sigma_wear, sigma_duration) = INITIAL_SIGMA;
    let mut profile = EffectProfile {
        substance: substance.to_string(),
        onset_min: onset,
        peak_min: onset + span * PEAK_POSITION,
        wear_off_start_min: onset + span * WEAR_POSITION,
        duration_min: duration,
        confidence: finite_or_zero(confidence).clamp(0.0, 1.0),
        samples,
        sigma_onset,
        sigma_peak,
        sigma_wear,
        sigma_duration,
        tod_bias_min: TimeOfDayBias::default(),
        auto_stop_on_wear_off: false,
        last_updated_unix_s: now_unix_s,
    };
    profile.enforce_ordering();
    profile.round_boundaries();
    profile
}
