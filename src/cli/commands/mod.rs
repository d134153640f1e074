mod config;
mod report;
mod system;
mod transaction;

use chrono::NaiveDate;

use crate::cli::core::CommandError;
use crate::cli::registry::CommandRegistry;

/// Builds the registry of every shell command in display order.
pub(crate) fn registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    for entry in transaction::definitions()
        .into_iter()
        .chain(report::definitions())
        .chain(config::definitions())
        .chain(system::definitions())
    {
        registry.register(entry);
    }
    registry
}

pub(crate) fn parse_index(input: &str) -> Result<usize, CommandError> {
    input.parse::<usize>().map_err(|_| {
        CommandError::InvalidArguments(format!("invalid index `{}` (use a row number)", input))
    })
}

pub(crate) fn parse_date(input: &str) -> Result<String, CommandError> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map(|date| date.format("%Y-%m-%d").to_string())
        .map_err(|_| {
            CommandError::InvalidArguments(format!("invalid date `{}` (use YYYY-MM-DD)", input))
        })
}

/// `all`, `-` and `*` mean "no filter".
pub(crate) fn optional_arg<'a>(value: Option<&&'a str>) -> Option<&'a str> {
    match value.copied() {
        None => None,
        Some(raw) if matches!(raw.to_ascii_lowercase().as_str(), "all" | "-" | "*") => None,
        Some(raw) => Some(raw),
    }
}

pub(crate) fn format_amount(value: f64) -> String {
    format!("{:.2}", value)
}
