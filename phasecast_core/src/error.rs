use thiserror::Error;

/// Failures converting caller-supplied strings into estimator enums.
///
/// The estimator itself is total: every estimation operation produces a
/// usable value. Parsing is the only fallible surface and it only appears
/// at the boundary (CLI arguments, event files).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown event kind: {0}")]
    EventKind(String),
    #[error("unknown category: {0}")]
    Category(String),
}
