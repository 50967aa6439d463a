//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use phasecast_core::Category;
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "phasecast", version, about = "Effect-phase estimator CLI")]
pub struct Cli {
    /// Path to config TOML (logging options, default reference DB)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log as JSON lines instead of pretty
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve a starting profile for a substance
    Baseline {
        /// Substance name to resolve
        #[arg(long)]
        substance: String,
        /// General category key (opioid|stimulant|benzodiazepine|sleep-aid|painkiller|supplement|low-risk)
        #[arg(long)]
        category: Option<Category>,
        /// Dependency-risk category key; takes precedence over --category
        #[arg(long)]
        risk_category: Option<Category>,
        /// Reference database TOML (overrides the config default)
        #[arg(long, value_name = "FILE")]
        db: Option<PathBuf>,
        /// Previously learned category-level profile (JSON)
        #[arg(long, value_name = "FILE")]
        learned: Option<PathBuf>,
    },
    /// Predict the current phase for an elapsed time since dose
    Predict {
        /// Profile JSON produced by `baseline` or `update`
        #[arg(long, value_name = "FILE")]
        profile: PathBuf,
        /// Minutes since the dose was taken
        #[arg(long)]
        elapsed: f64,
        /// Local hour the dose was taken (0-23)
        #[arg(long, default_value_t = 12)]
        hour: u8,
    },
    /// Fold user feedback events into a profile
    Update {
        /// Profile JSON produced by `baseline` or `update`
        #[arg(long, value_name = "FILE")]
        profile: PathBuf,
        /// Feedback events TOML ([[event]] entries with status/offset_min)
        #[arg(long, value_name = "FILE")]
        events: PathBuf,
        /// Local hour the dose was taken (0-23)
        #[arg(long, default_value_t = 12)]
        hour: u8,
    },
}
