//! Period and category aggregation over transaction records.

use std::{collections::BTreeMap, fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::transaction::{Transaction, TransactionKind};
use crate::errors::{LedgerError, Result};

/// Income and expense sums accumulated for one bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub income: f64,
    pub expense: f64,
}

impl Totals {
    pub fn record(&mut self, txn: &Transaction) {
        match txn.kind {
            TransactionKind::Income => self.income += txn.amount,
            TransactionKind::Expense => self.expense += txn.amount,
        }
    }

    pub fn net(&self) -> f64 {
        self.income - self.expense
    }
}

/// Granularity used to derive bucket keys from ISO date strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Daily,
    /// Reuses the month digits as the week number (`2024-03-10` -> `2024-W03`).
    Weekly,
    IsoWeekly,
    #[default]
    Monthly,
    Yearly,
    Decade,
}

impl Period {
    pub const ALL: [Period; 6] = [
        Period::Daily,
        Period::Weekly,
        Period::IsoWeekly,
        Period::Monthly,
        Period::Yearly,
        Period::Decade,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::IsoWeekly => "isoweekly",
            Period::Monthly => "monthly",
            Period::Yearly => "yearly",
            Period::Decade => "decade",
        }
    }

    /// Derives the bucket key for `date`. Slicing is forgiving on short input.
    pub fn bucket_key(&self, date: &str) -> Result<String> {
        let key = match self {
            Period::Daily => slice(date, 0, 10).to_string(),
            Period::Monthly => slice(date, 0, 7).to_string(),
            Period::Yearly => slice(date, 0, 4).to_string(),
            Period::Weekly => format!("{}-W{}", slice(date, 0, 4), slice(date, 5, 7)),
            Period::Decade => format!("{}0s", slice(date, 0, 3)),
            Period::IsoWeekly => {
                let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
                    .map_err(|_| LedgerError::InvalidDate(date.to_string()))?;
                let week = parsed.iso_week();
                format!("{}-W{:02}", week.year(), week.week())
            }
        };
        Ok(key)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self> {
        let needle = value.trim().to_ascii_lowercase();
        Period::ALL
            .into_iter()
            .find(|period| period.as_str() == needle)
            .ok_or_else(|| LedgerError::InvalidPeriod(value.to_string()))
    }
}

/// Buckets records whose date falls in `[start, end]` (string comparison, inclusive).
pub fn summarize<'a, I>(
    transactions: I,
    period: Period,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<BTreeMap<String, Totals>>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut in_range: Vec<&Transaction> = transactions
        .into_iter()
        .filter(|txn| within(&txn.date, start, end))
        .collect();
    in_range.sort_by(|a, b| a.date.cmp(&b.date));

    let mut buckets: BTreeMap<String, Totals> = BTreeMap::new();
    for txn in in_range {
        let key = period.bucket_key(&txn.date)?;
        buckets.entry(key).or_default().record(txn);
    }
    Ok(buckets)
}

/// Inclusive string comparison against optional `[start, end]` bounds.
pub fn within(date: &str, start: Option<&str>, end: Option<&str>) -> bool {
    start.map_or(true, |start| date >= start) && end.map_or(true, |end| date <= end)
}

/// Accumulates income/expense per category, keyed alphabetically.
pub fn group_by_category<'a, I>(transactions: I) -> BTreeMap<String, Totals>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut groups: BTreeMap<String, Totals> = BTreeMap::new();
    for txn in transactions {
        groups.entry(txn.category.clone()).or_default().record(txn);
    }
    groups
}

// Char-based substring with both bounds clamped to the input length.
fn slice(value: &str, start: usize, end: usize) -> &str {
    let byte_at = |chars: usize| {
        value
            .char_indices()
            .nth(chars)
            .map(|(idx, _)| idx)
            .unwrap_or(value.len())
    };
    let from = byte_at(start);
    let to = byte_at(end).max(from);
    &value[from..to]
}
