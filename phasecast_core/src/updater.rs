//! Online profile refinement from user feedback.
//!
//! Each feedback event nudges the directly reported boundary toward the
//! observation, lets that observation inform the overall duration through
//! the fixed phase positions, then gently re-harmonizes the remaining
//! boundaries so no single one drifts inconsistently with the others.
//! All updates are bounded: learning rates decay with accumulated samples
//! but never reach zero, so late feedback still moves the model.

use crate::profile::{
    EffectEvent, EffectProfile, EventKind, DayBucket, ONSET_SHARE_OF_TOTAL, PEAK_POSITION,
    WEAR_POSITION,
};
use crate::util::{blend, finite_or_zero};

/// Base learning-rate schedule: `0.6 / (samples + 1)`, floored.
const ALPHA_NUMERATOR: f64 = 0.6;
const ALPHA_FLOOR: f64 = 0.08;
/// Harmonization pull schedule: `0.45 / (samples + 1)`, floored.
const PULL_NUMERATOR: f64 = 0.45;
const PULL_FLOOR: f64 = 0.06;
/// Sigma EWMA weight schedule: `0.4 / (samples + 1)`, floored.
const BETA_NUMERATOR: f64 = 0.4;
const BETA_FLOOR: f64 = 0.05;
/// Minimum tail kept between wear-off start and the duration anchor.
const MIN_TAIL_MIN: f64 = 10.0;
/// Confidence model: `min(1, (0.2 + samples/10) * (1 - 0.5 * var_penalty))`
/// where `var_penalty = min(1, sigma_sum / 400)`.
const CONFIDENCE_BASE: f64 = 0.2;
const CONFIDENCE_PER_SAMPLE: f64 = 0.1;
const VAR_PENALTY_SCALE_MIN: f64 = 400.0;
const VAR_PENALTY_WEIGHT: f64 = 0.5;

impl EventKind {
    /// Per-event learning-rate gain: onset and worn-off reports carry the
    /// most signal; mid-effect reports are noisier.
    fn alpha_gain(self) -> f64 {
        match self {
            EventKind::KickingIn => 1.1,
            EventKind::Peaking => 0.9,
            EventKind::WearingOff => 0.9,
            EventKind::WornOff => 1.2,
        }
    }
}

/// Fold one feedback event into `profile`, returning the revised profile.
///
/// Pure: the input profile is untouched. `bucket` is the hour bucket the
/// dose was taken in; `now_unix_s` stamps the result.
pub fn update_from_event(
    profile: &EffectProfile,
    event: &EffectEvent,
    bucket: DayBucket,
    now_unix_s: u64,
) -> EffectProfile {
    let mut p = profile.clone();
    p.sanitize();

    let samples = f64::from(p.samples);
    let alpha_base = (ALPHA_NUMERATOR / (samples + 1.0)).max(ALPHA_FLOOR);

    // Remove the stored bias so the observation is comparable to the
    // unbiased boundaries.
    let bias = p.tod_bias_min.for_bucket(bucket);
    let observed = (finite_or_zero(event.offset_min) - bias).max(0.0);

    // Blend the directly reported boundary toward the observation.
    let evt_alpha = alpha_base * event.kind.alpha_gain();
    match event.kind {
        EventKind::KickingIn => p.onset_min = blend(p.onset_min, observed, evt_alpha),
        EventKind::Peaking => p.peak_min = blend(p.peak_min, observed, evt_alpha),
        EventKind::WearingOff => {
            p.wear_off_start_min = blend(p.wear_off_start_min, observed, evt_alpha);
        }
        EventKind::WornOff => p.duration_min = blend(p.duration_min, observed, evt_alpha),
    }

    // A single observation at any phase also informs the total duration
    // through the fixed phase positions, at half the base rate.
    let implied_total = match event.kind {
        EventKind::KickingIn => observed / ONSET_SHARE_OF_TOTAL,
        EventKind::Peaking => p.onset_min + (observed - p.onset_min) / PEAK_POSITION,
        EventKind::WearingOff => p.onset_min + (observed - p.onset_min) / WEAR_POSITION,
        EventKind::WornOff => observed,
    };
    if implied_total.is_finite() && implied_total > 0.0 {
        p.duration_min = blend(p.duration_min, implied_total, alpha_base * 0.5);
    }

    // Harmonize the boundaries that were not observed this round toward
    // positions anchored by the fresh duration estimate.
    let pull = (PULL_NUMERATOR / (samples + 1.0)).max(PULL_FLOOR);
    let onset0 = p.onset_min;
    let total0 = p.duration_min;
    if event.kind != EventKind::KickingIn {
        p.onset_min = blend(p.onset_min, total0 * ONSET_SHARE_OF_TOTAL, pull);
    }
    if event.kind != EventKind::Peaking {
        let anchor = onset0 + (total0 - onset0) * PEAK_POSITION;
        p.peak_min = blend(p.peak_min, anchor, pull);
    }
    if event.kind != EventKind::WearingOff {
        let anchor = onset0 + (total0 - onset0) * WEAR_POSITION;
        p.wear_off_start_min = blend(p.wear_off_start_min, anchor, pull);
    }
    if event.kind != EventKind::WornOff {
        // Duration anchor implied by where wear-off starts, keeping at
        // least the minimum tail after it.
        let anchor = (onset0 + (p.wear_off_start_min - onset0) / WEAR_POSITION)
            .max(p.wear_off_start_min + MIN_TAIL_MIN);
        p.duration_min = blend(p.duration_min, anchor, pull);
    }

    p.enforce_ordering();

    // Exponentially-weighted variance update for the observed boundary.
    let beta = (BETA_NUMERATOR / (samples + 1.0)).max(BETA_FLOOR);
    let revised = match event.kind {
        EventKind::KickingIn => p.onset_min,
        EventKind::Peaking => p.peak_min,
        EventKind::WearingOff => p.wear_off_start_min,
        EventKind::WornOff => p.duration_min,
    };
    let error = observed - revised;
    let ewma_sigma = |sigma: f64| ((1.0 - beta) * sigma * sigma + beta * error * error).sqrt();
    match event.kind {
        EventKind::KickingIn => p.sigma_onset = ewma_sigma(p.sigma_onset),
        EventKind::Peaking => p.sigma_peak = ewma_sigma(p.sigma_peak),
        EventKind::WearingOff => p.sigma_wear = ewma_sigma(p.sigma_wear),
        EventKind::WornOff => p.sigma_duration = ewma_sigma(p.sigma_duration),
    }

    p.samples = p.samples.saturating_add(1);
    let var_penalty = (p.sigma_sum() / VAR_PENALTY_SCALE_MIN).min(1.0);
    p.confidence = ((CONFIDENCE_BASE + f64::from(p.samples) * CONFIDENCE_PER_SAMPLE)
        * (1.0 - VAR_PENALTY_WEIGHT * var_penalty))
        .min(1.0);

    p.round_boundaries();
    p.last_updated_unix_s = now_unix_s;

    tracing::trace!(
        substance = %p.substance,
        kind = ?event.kind,
        observed,
        onset_min = p.onset_min,
        peak_min = p.peak_min,
        wear_off_start_min = p.wear_off_start_min,
        duration_min = p.duration_min,
        confidence = p.confidence,
        samples = p.samples,
        "folded feedback event"
    );
    p
}

/// Fold a batch of events, ascending by report offset.
///
/// Each fold's harmonization depends on the profile state the previous
/// fold left behind; sorting by offset minimizes oscillation from
/// out-of-order reports and makes batch results deterministic.
pub fn update_from_events(
    profile: &EffectProfile,
    events: &[EffectEvent],
    bucket: DayBucket,
    now_unix_s: u64,
) -> EffectProfile {
    let mut ordered: Vec<&EffectEvent> = events.iter().collect();
    ordered.sort_by(|a, b| {
        finite_or_zero(a.offset_min).total_cmp(&finite_or_zero(b.offset_min))
    });
    ordered.into_iter().fold(profile.clone(), |acc, event| {
        update_from_event(&acc, event, bucket, now_unix_s)
    })
}
