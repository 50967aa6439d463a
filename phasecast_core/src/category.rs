//! Closed category set and the static fallback timing table.
//!
//! Lookup is a match over an enum rather than string keys so every category
//! is covered at compile time.

use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Substance category, used only to pick conservative fallback timings
/// when no richer data exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Opioid,
    Stimulant,
    Benzodiazepine,
    SleepAid,
    Painkiller,
    Supplement,
    LowRisk,
}

/// Conservative starting timings for a category, in minutes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryDefaults {
    pub onset_min: f64,
    pub duration_min: f64,
}

impl Category {
    /// Static fallback table. Values are deliberately conservative; they
    /// are only a starting point before any feedback arrives.
    pub fn defaults(self) -> CategoryDefaults {
        let (onset_min, duration_min) = match self {
            Category::Opioid => (20.0, 300.0),
            Category::Stimulant => (30.0, 360.0),
            Category::Benzodiazepine => (25.0, 360.0),
            Category::SleepAid => (30.0, 420.0),
            Category::Painkiller => (30.0, 300.0),
            Category::Supplement => (45.0, 240.0),
            Category::LowRisk => (30.0, 240.0),
        };
        CategoryDefaults {
            onset_min,
            duration_min,
        }
    }

    fn key(self) -> &'static str {
        match self {
            Category::Opioid => "opioid",
            Category::Stimulant => "stimulant",
            Category::Benzodiazepine => "benzodiazepine",
            Category::SleepAid => "sleep-aid",
            Category::Painkiller => "painkiller",
            Category::Supplement => "supplement",
            Category::LowRisk => "low-risk",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Category {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "opioid" => Ok(Category::Opioid),
            "stimulant" => Ok(Category::Stimulant),
            "benzodiazepine" => Ok(Category::Benzodiazepine),
            "sleep-aid" | "sleep_aid" => Ok(Category::SleepAid),
            "painkiller" => Ok(Category::Painkiller),
            "supplement" => Ok(Category::Supplement),
            "low-risk" | "low_risk" => Ok(Category::LowRisk),
            other => Err(ParseError::Category(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip() {
        for cat in [
            Category::Opioid,
            Category::Stimulant,
            Category::Benzodiazepine,
            Category::SleepAid,
            Category::Painkiller,
            Category::Supplement,
            Category::LowRisk,
        ] {
            assert_eq!(cat.to_string().parse::<Category>().unwrap(), cat);
        }
        assert!("laser".parse::<Category>().is_err());
    }

    #[test]
    fn defaults_are_orderable_timings() {
        for cat in [
            Category::Opioid,
            Category::Stimulant,
            Category::Benzodiazepine,
            Category::SleepAid,
            Category::Painkiller,
            Category::Supplement,
            Category::LowRisk,
        ] {
            let d = cat.defaults();
            assert!(d.onset_min > 0.0);
            assert!(d.duration_min > d.onset_min + 15.0);
        }
    }
}
