//! Thin driver around the estimator: resolve baselines, fold feedback,
//! print predictions. All results go to stdout as JSON; logs go to stderr
//! or the configured log file.

mod cli;

use clap::Parser;
use cli::{Cli, Commands, FILE_GUARD};
use eyre::{Result, WrapErr};
use phasecast_config::{Config, Logging, SubstanceRecord};
use phasecast_core::{
    BaselineSeed, DayBucket, EffectEvent, EffectProfile, predict_phase, resolve_baseline,
    update_from_events,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing_subscriber::EnvFilter;

/// Feedback events file schema: repeated `[[event]]` tables.
#[derive(Debug, Default, serde::Deserialize)]
struct EventBatch {
    #[serde(default, rename = "event")]
    events: Vec<EffectEvent>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let cfg = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .wrap_err_with(|| format!("reading config {}", path.display()))?;
            phasecast_config::load_toml(&text).wrap_err("parsing config TOML")?
        }
        None => Config::default(),
    };
    init_logging(&cli.log_level, cli.json, &cfg.logging);

    let now_unix_s = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    match cli.cmd {
        Commands::Baseline {
            substance,
            category,
            risk_category,
            db,
            learned,
        } => {
            let reference = load_reference(db.as_deref(), cfg.reference_db.as_deref())?;
            let learned = learned.as_deref().map(read_profile).transpose()?;
            let seed = BaselineSeed {
                name: substance,
                category,
                risk_category,
            };
            let profile = resolve_baseline(&seed, &reference, learned.as_ref(), now_unix_s);
            print_json(&profile)
        }
        Commands::Predict {
            profile,
            elapsed,
            hour,
        } => {
            let profile = read_profile(&profile)?;
            let estimate = predict_phase(&profile, elapsed, DayBucket::from_hour(hour));
            tracing::debug!(
                substance = %profile.substance,
                phase = %estimate.phase,
                progress = estimate.progress,
                "phase predicted"
            );
            print_json(&estimate)
        }
        Commands::Update {
            profile,
            events,
            hour,
        } => {
            let profile = read_profile(&profile)?;
            let text = fs::read_to_string(&events)
                .wrap_err_with(|| format!("reading events {}", events.display()))?;
            let batch: EventBatch = toml::from_str(&text).wrap_err("parsing events TOML")?;
            let updated = update_from_events(
                &profile,
                &batch.events,
                DayBucket::from_hour(hour),
                now_unix_s,
            );
            tracing::debug!(
                substance = %updated.substance,
                folded = batch.events.len(),
                samples = updated.samples,
                "profile updated"
            );
            print_json(&updated)
        }
    }
}

/// Load and validate the reference database: the explicit flag wins over
/// the config default; neither means an empty corpus.
fn load_reference(
    flag: Option<&Path>,
    cfg_default: Option<&str>,
) -> Result<Vec<SubstanceRecord>> {
    let path: Option<PathBuf> = flag
        .map(Path::to_path_buf)
        .or_else(|| cfg_default.map(PathBuf::from));
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let text = fs::read_to_string(&path)
        .wrap_err_with(|| format!("reading reference db {}", path.display()))?;
    let db = phasecast_config::load_reference_toml(&text).wrap_err("parsing reference db TOML")?;
    db.validate()?;
    Ok(db.substances)
}

fn read_profile(path: &Path) -> Result<EffectProfile> {
    let text =
        fs::read_to_string(path).wrap_err_with(|| format!("reading profile {}", path.display()))?;
    serde_json::from_str(&text).wrap_err("parsing profile JSON")
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Console logging to stderr, or to the configured file (with optional
/// rotation) when one is set. The appender guard lives for the whole
/// process via `FILE_GUARD`.
fn init_logging(level: &str, json: bool, logging: &Logging) {
    let make_filter = || {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let file_writer = logging.file.as_deref().map(|file| {
        let path = Path::new(file);
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let name = path
            .file_name()
            .map_or_else(|| std::ffi::OsString::from("phasecast.log"), |n| n.to_os_string());
        let appender = match logging.rotation.as_deref() {
            Some("daily") => tracing_appender::rolling::daily(dir, name),
            Some("hourly") => tracing_appender::rolling::hourly(dir, name),
            _ => tracing_appender::rolling::never(dir, name),
        };
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = FILE_GUARD.set(guard);
        writer
    });

    match (json, file_writer) {
        (true, Some(writer)) => tracing_subscriber::fmt()
            .with_env_filter(make_filter())
            .json()
            .with_writer(writer)
            .init(),
        (true, None) => tracing_subscriber::fmt()
            .with_env_filter(make_filter())
            .json()
            .with_writer(std::io::stderr)
            .init(),
        (false, Some(writer)) => tracing_subscriber::fmt()
            .with_env_filter(make_filter())
            .with_ansi(false)
            .with_writer(writer)
            .init(),
        (false, None) => tracing_subscriber::fmt()
            .with_env_filter(make_filter())
            .with_writer(std::io::stderr)
            .init(),
    }
}
