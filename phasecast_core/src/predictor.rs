//! Map elapsed time since dose to a discrete phase and a global progress
//! fraction.
//!
//! The hour bucket is an explicit parameter so the predictor stays a pure
//! function; callers derive it from whatever clock they trust.

use crate::profile::{DayBucket, EffectProfile, Phase};
use crate::util::finite_or_zero;
use serde::{Deserialize, Serialize};

/// Predictor output: phase label plus overall progress in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseEstimate {
    pub phase: Phase,
    /// `elapsed / duration`, clamped to [0, 1]. Global progress through
    /// the whole dose, not progress within the current phase.
    pub progress: f64,
}

/// Predict the phase a dose is in after `elapsed_min` minutes.
///
/// The profile's time-of-day bias for `bucket` shifts all four boundaries
/// uniformly; shifted boundaries are re-clamped so each stays at least one
/// minute past the previous (onset floored at 1).
pub fn predict_phase(profile: &EffectProfile, elapsed_min: f64, bucket: DayBucket) -> PhaseEstimate {
    let elapsed = finite_or_zero(elapsed_min).max(0.0);
    let bias = profile.tod_bias_min.for_bucket(bucket);

    let onset = (finite_or_zero(profile.onset_min) + bias).max(1.0);
    let peak = (finite_or_zero(profile.peak_min) + bias).max(onset + 1.0);
    let wear = (finite_or_zero(profile.wear_off_start_min) + bias).max(peak + 1.0);
    let duration = (finite_or_zero(profile.duration_min) + bias).max(wear + 1.0);

    let phase = if elapsed < onset {
        Phase::PreOnset
    } else if elapsed < peak {
        Phase::KickingIn
    } else if elapsed < wear {
        Phase::Peaking
    } else if elapsed < duration {
        Phase::WearingOff
    } else {
        Phase::WornOff
    };

    PhaseEstimate {
        phase,
        progress: (elapsed / duration).clamp(0.0, 1.0),
    }
}
