#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Adaptive effect-phase estimation (pure, no I/O).
//!
//! Given a dose of a substance, this crate predicts which pharmacological
//! phase the dose is in (pre-onset, kicking in, peaking, wearing off, worn
//! off) and refines its per-substance timing model from user feedback.
//!
//! ## Architecture
//!
//! - **Mining**: onset/total minutes from free-text descriptions (`miner`)
//! - **Baselines**: starting profile from mined text, a learned category
//!   profile, or the static category table (`baseline`)
//! - **Prediction**: elapsed minutes to phase + progress (`predictor`)
//! - **Learning**: bounded adaptive smoothing over feedback events with
//!   ordering invariants and uncertainty tracking (`updater`)
//!
//! ## Purity
//!
//! Every operation is a synchronous transformation over in-memory values:
//! profiles come in, revised profiles come out. Wall-clock time and the
//! hour-of-day bucket are explicit parameters, never ambient reads.
//! Callers serialize concurrent updates to the same profile; distinct
//! profiles are safe to update from any number of threads.

pub mod baseline;
pub mod category;
pub mod error;
pub mod miner;
pub mod predictor;
pub mod profile;
pub mod updater;
pub mod util;

pub use baseline::{BaselineSeed, resolve_baseline};
pub use category::{Category, CategoryDefaults};
pub use error::ParseError;
pub use miner::{MinedDurations, mine_durations};
pub use predictor::{PhaseEstimate, predict_phase};
pub use profile::{DayBucket, EffectEvent, EffectProfile, EventKind, Phase, TimeOfDayBias};
pub use updater::{update_from_event, update_from_events};

// The reference-record schema lives with the other collaborator schemas.
pub use phasecast_config::SubstanceRecord;
