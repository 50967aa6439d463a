#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Schemas for the estimator's external collaborators.
//!
//! - `ReferenceDb` is the read-only substance reference database (names,
//!   aliases, free-text descriptions), deserialized from TOML and validated.
//! - `Config`/`Logging` carry CLI-side options; the estimator core never
//!   reads them.
use serde::Deserialize;
use std::collections::HashSet;

/// One read-only reference entry for a substance.
///
/// The `description` may contain a free-text duration clause, e.g.
/// `"Duration: 20-40 minutes onset, 3-6 hours total"`; the estimator mines
/// it on a best-effort basis.
#[derive(Debug, Deserialize, Clone)]
pub struct SubstanceRecord {
    pub name: String,
    /// Generic (non-brand) name, when the record is for a brand name.
    #[serde(default)]
    pub generic_name: Option<String>,
    /// Alternate names the substance is tracked under.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Free-text description; may contain a duration clause.
    #[serde(default)]
    pub description: String,
}

/// Reference database TOML schema.
///
/// Expected shape:
/// ```toml
/// [[substance]]
/// name = "Caffeine"
/// aliases = ["coffee"]
/// description = "Duration: 10-30 minutes onset, 4-6 hours total"
/// ```
#[derive(Debug, Deserialize, Default)]
pub struct ReferenceDb {
    #[serde(default, rename = "substance")]
    pub substances: Vec<SubstanceRecord>,
}

impl ReferenceDb {
    /// Sanity-check the loaded records: names must be non-empty and unique
    /// (case-insensitive). Aliases are free-form and not cross-checked.
    pub fn validate(&self) -> eyre::Result<()> {
        let mut seen: HashSet<String> = HashSet::with_capacity(self.substances.len());
        for (idx, record) in self.substances.iter().enumerate() {
            let key = record.name.trim().to_lowercase();
            if key.is_empty() {
                eyre::bail!("substance record at index {idx} has an empty name");
            }
            if !seen.insert(key) {
                eyre::bail!("duplicate substance name: {}", record.name);
            }
        }
        Ok(())
    }
}

/// Parse a reference database from TOML text.
pub fn load_reference_toml(s: &str) -> Result<ReferenceDb, toml::de::Error> {
    toml::from_str::<ReferenceDb>(s)
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

/// CLI configuration TOML schema.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub logging: Logging,
    /// Default reference database path, overridable on the command line.
    pub reference_db: Option<String>,
}

/// Parse a CLI configuration from TOML text.
pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}
