//! Data model for the effect-phase estimator.
//!
//! An [`EffectProfile`] holds the learned timing boundaries for one
//! substance in minutes since dose, with an uncertainty (RMS) estimate per
//! boundary. Profiles are values: the resolver creates them, the updater
//! returns revised copies, and the caller owns retention.

use crate::error::ParseError;
use crate::util::finite_or_zero;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Minimum spacing between consecutive boundaries, in minutes.
pub const MIN_BOUNDARY_GAP_MIN: f64 = 5.0;
/// Onset is clamped into this range (minutes since dose).
pub const ONSET_RANGE_MIN: (f64, f64) = (1.0, 1440.0);
/// Share of the total duration the onset typically occupies.
pub const ONSET_SHARE_OF_TOTAL: f64 = 0.15;
/// Position of the peak within the post-onset span.
pub const PEAK_POSITION: f64 = 1.0 / 3.0;
/// Position of the wear-off start within the post-onset span.
pub const WEAR_POSITION: f64 = 0.75;

/// Discrete stage of a dose's effect over time. Ordered; terminal at
/// `WornOff`. Under normal time flow a dose only moves forward through
/// these stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    PreOnset,
    KickingIn,
    Peaking,
    WearingOff,
    WornOff,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::PreOnset => "pre_onset",
            Phase::KickingIn => "kicking_in",
            Phase::Peaking => "peaking",
            Phase::WearingOff => "wearing_off",
            Phase::WornOff => "worn_off",
        };
        f.write_str(s)
    }
}

/// Which phase a feedback event reports the user currently perceives.
///
/// Events never drive phase transitions; they retrain the boundaries the
/// predictor reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    KickingIn,
    Peaking,
    WearingOff,
    WornOff,
}

impl FromStr for EventKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "kicking_in" => Ok(EventKind::KickingIn),
            "peaking" => Ok(EventKind::Peaking),
            "wearing_off" => Ok(EventKind::WearingOff),
            "worn_off" => Ok(EventKind::WornOff),
            other => Err(ParseError::EventKind(other.to_string())),
        }
    }
}

/// One user-reported feedback observation, produced externally.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectEvent {
    /// Reported phase. Accepts the wire name `status`.
    #[serde(alias = "status")]
    pub kind: EventKind,
    /// Elapsed minutes since dose when the phase was reported.
    #[serde(alias = "offset_minutes")]
    pub offset_min: f64,
}

/// Hour-of-day bucket a dose falls into. Constructed from an explicit
/// local hour so phase prediction stays a pure function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayBucket {
    /// 06:00-12:00
    Morning,
    /// 12:00-18:00
    Afternoon,
    /// 18:00-24:00
    Evening,
    /// 00:00-06:00
    Night,
}

impl DayBucket {
    /// Bucket for a local hour; hours are taken modulo 24.
    pub fn from_hour(hour: u8) -> Self {
        match hour % 24 {
            6..=11 => DayBucket::Morning,
            12..=17 => DayBucket::Afternoon,
            18..=23 => DayBucket::Evening,
            _ => DayBucket::Night,
        }
    }
}

/// Signed minute offset applied uniformly to all boundaries, keyed by the
/// hour bucket the dose was taken in.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeOfDayBias {
    pub morning_min: f64,
    pub afternoon_min: f64,
    pub evening_min: f64,
    pub night_min: f64,
}

impl TimeOfDayBias {
    /// Bias for one bucket, scrubbed of non-finite values.
    pub fn for_bucket(&self, bucket: DayBucket) -> f64 {
        let raw = match bucket {
            DayBucket::Morning => self.morning_min,
            DayBucket::Afternoon => self.afternoon_min,
            DayBucket::Evening => self.evening_min,
            DayBucket::Night => self.night_min,
        };
        finite_or_zero(raw)
    }
}

/// Learned timing model for one substance.
///
/// Boundary fields are minutes since dose, stored rounded to whole minutes,
/// and always satisfy `1 <= onset`, `onset + 5 <= peak`,
/// `peak + 5 <= wear_off_start`, `wear_off_start + 5 <= duration`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectProfile {
    /// Substance this profile is tagged to.
    pub substance: String,
    pub onset_min: f64,
    pub peak_min: f64,
    pub wear_off_start_min: f64,
    pub duration_min: f64,
    /// Overall trust in the boundaries, in [0, 1]. Rises with `samples`,
    /// tempered by accumulated sigma.
    pub confidence: f64,
    /// Feedback events folded into this profile so far.
    pub samples: u32,
    pub sigma_onset: f64,
    pub sigma_peak: f64,
    pub sigma_wear: f64,
    pub sigma_duration: f64,
    pub tod_bias_min: TimeOfDayBias,
    /// Consumed by the calling application; never mutated here.
    pub auto_stop_on_wear_off: bool,
    /// Wall-clock stamp of the last mutation, supplied by the caller.
    pub last_updated_unix_s: u64,
}

impl EffectProfile {
    /// Scrub every numeric field so downstream smoothing math never sees
    /// NaN or infinities, and clamp fields with a defined range.
    pub(crate) fn sanitize(&mut self) {
        self.onset_min = finite_or_zero(self.onset_min);
        self.peak_min = finite_or_zero(self.peak_min);
        self.wear_off_start_min = finite_or_zero(self.wear_off_start_min);
        self.duration_min = finite_or_zero(self.duration_min);
        self.confidence = finite_or_zero(self.confidence).clamp(0.0, 1.0);
        self.sigma_onset = finite_or_zero(self.sigma_onset).max(0.0);
        self.sigma_peak = finite_or_zero(self.sigma_peak).max(0.0);
        self.sigma_wear = finite_or_zero(self.sigma_wear).max(0.0);
        self.sigma_duration = finite_or_zero(self.sigma_duration).max(0.0);
        self.tod_bias_min = TimeOfDayBias {
            morning_min: finite_or_zero(self.tod_bias_min.morning_min),
            afternoon_min: finite_or_zero(self.tod_bias_min.afternoon_min),
            evening_min: finite_or_zero(self.tod_bias_min.evening_min),
            night_min: finite_or_zero(self.tod_bias_min.night_min),
        };
    }

    /// Restore the hard ordering invariant: onset clamped to its range,
    /// then each later boundary at least `MIN_BOUNDARY_GAP_MIN` past the
    /// previous one.
    pub(crate) fn enforce_ordering(&mut self) {
        let (onset_floor, onset_ceil) = ONSET_RANGE_MIN;
        self.onset_min = finite_or_zero(self.onset_min).clamp(onset_floor, onset_ceil);
        self.peak_min = finite_or_zero(self.peak_min).max(self.onset_min + MIN_BOUNDARY_GAP_MIN);
        self.wear_off_start_min =
            finite_or_zero(self.wear_off_start_min).max(self.peak_min + MIN_BOUNDARY_GAP_MIN);
        self.duration_min =
            finite_or_zero(self.duration_min).max(self.wear_off_start_min + MIN_BOUNDARY_GAP_MIN);
    }

    /// Round boundaries to whole minutes. Rounding after
    /// `enforce_ordering` cannot shrink any gap below the minimum: round
    /// is monotone and `round(x + 5) == round(x) + 5`.
    pub(crate) fn round_boundaries(&mut self) {
        self.onset_min = self.onset_min.round();
        self.peak_min = self.peak_min.round();
        self.wear_off_start_min = self.wear_off_start_min.round();
        self.duration_min = self.duration_min.round();
    }

    /// Sum of the four boundary sigmas, used for the confidence penalty.
    pub(crate) fn sigma_sum(&self) -> f64 {
        self.sigma_onset + self.sigma_peak + self.sigma_wear + self.sigma_duration
    }
}
