use thiserror::Error;

/// Error type that captures common ledger failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("invalid amount `{0}`: expected a number")]
    Parse(String),
    #[error("unknown transaction type `{0}` (use income or expense)")]
    InvalidKind(String),
    #[error("unknown period `{0}` (use daily, weekly, isoweekly, monthly, yearly or decade)")]
    InvalidPeriod(String),
    #[error("unknown sort option `{0}` (keys: date, amount, category, type, description; order: asc, desc)")]
    InvalidSortKey(String),
    #[error("invalid date `{0}` (use YYYY-MM-DD)")]
    InvalidDate(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
