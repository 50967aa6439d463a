//! Best-effort extraction of onset/total-duration minutes from free-text
//! substance descriptions.
//!
//! The heuristics target the clause formats seen in the reference data,
//! e.g. `"Duration: 20-40 minutes onset, 3-6 hours total"`. They are
//! deliberately approximate: the first clause of each kind wins, so a
//! multi-route description may yield the first route's numbers.

use crate::util::{MINUTES_PER_HOUR, finite_or_zero};
use regex::Regex;
use std::sync::LazyLock;

/// Compile a pattern that is fixed at build time.
#[allow(clippy::expect_used)]
fn compiled(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static pattern")
}

/// `<number>[-<number>] <unit> [qualifier]`, e.g. "3-6 hours total".
static RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    compiled(
        r"(?i)\b(\d+(?:\.\d+)?)(?:\s*(?:-|–|to)\s*(\d+(?:\.\d+)?))?\s*(minutes?|mins?|hours?|hrs?)\b(?:\s+(onset|total|oral|insufflated|vaporized))?",
    )
});

/// "Immediate onset" / "instant onset" style phrases.
static IMMEDIATE_ONSET_RE: LazyLock<Regex> =
    LazyLock::new(|| compiled(r"(?i)\b(?:immediate|instant(?:aneous)?)\s+onset\b"));

/// Approximate onset and total duration mined from a description.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinedDurations {
    pub onset_min: f64,
    pub total_min: f64,
}

/// Minutes for one matched range: average of the bounds when two are
/// given, hours converted to minutes.
fn range_minutes(lo: f64, hi: Option<f64>, unit: &str) -> f64 {
    let value = match hi {
        Some(hi) => (lo + hi) / 2.0,
        None => lo,
    };
    let value = finite_or_zero(value);
    if unit.to_lowercase().starts_with('h') {
        value * MINUTES_PER_HOUR
    } else {
        value
    }
}

/// Mine approximate onset/total-duration minutes from a description.
///
/// Returns `None` when the text lacks the word "duration" or no numeric
/// clause can be derived. `None` is a legitimate negative result (use
/// fallback), not an error.
pub fn mine_durations(description: &str) -> Option<MinedDurations> {
    if !description.to_lowercase().contains("duration") {
        return None;
    }

    let mut onset: Option<f64> = None;
    let mut total: Option<f64> = None;

    if IMMEDIATE_ONSET_RE.is_match(description) {
        onset = Some(0.0);
    }

    for caps in RANGE_RE.captures_iter(description) {
        let Ok(lo) = caps[1].parse::<f64>() else {
            continue;
        };
        let hi = caps.get(2).and_then(|m| m.as_str().parse::<f64>().ok());
        let minutes = range_minutes(lo, hi, &caps[3]);
        let qualifier = caps
            .get(4)
            .map(|m| m.as_str().to_lowercase())
            .unwrap_or_default();
        if qualifier == "onset" {
            // First onset clause wins.
            if onset.is_none() {
                onset = Some(minutes);
            }
        } else if total.is_none() {
            // Any other range is treated as a total-duration clause.
            total = Some(minutes);
        }
    }

    let mined = match (onset, total) {
        (Some(onset_min), Some(total_min)) => MinedDurations {
            onset_min,
            total_min,
        },
        // Only a total: assume onset takes the usual early share.
        (None, Some(total_min)) => MinedDurations {
            onset_min: total_min * crate::profile::ONSET_SHARE_OF_TOTAL,
            total_min,
        },
        // Only an onset: assume the effect outlasts it several times over.
        (Some(onset_min), None) => MinedDurations {
            onset_min,
            total_min: (onset_min * 4.0).max(onset_min + 60.0),
        },
        (None, None) => return None,
    };
    tracing::trace!(
        onset_min = mined.onset_min,
        total_min = mined.total_min,
        "mined duration clause"
    );
    Some(mined)
}
