use thiserror::Error;

/// Errors from parsing user-facing names (CLI flags, input files).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown display mode `{0}` (expected absolute, stacked, or percentage)")]
    UnknownDisplayMode(String),
    #[error("unknown series kind `{0}` (expected line, area, or bar)")]
    UnknownSeriesKind(String),
    #[error("invalid color `{0}` (expected #RRGGBB)")]
    InvalidColor(String),
}
