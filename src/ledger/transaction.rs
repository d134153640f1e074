use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, Result};

/// A single income or expense record as stored in the transactions file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: f64,
    pub category: String,
    pub date: String,
    #[serde(default)]
    pub description: String,
}

impl Transaction {
    pub fn new(
        kind: TransactionKind,
        amount: f64,
        category: impl Into<String>,
        date: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            amount,
            category: category.into(),
            date: date.into(),
            description: description.into(),
        }
    }

    /// Builds a record from raw form input, coercing the amount text to a float.
    pub fn parse(
        kind: TransactionKind,
        amount: &str,
        category: impl Into<String>,
        date: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self::new(
            kind,
            parse_amount(amount)?,
            category,
            date,
            description,
        ))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            _ => Err(LedgerError::InvalidKind(value.to_string())),
        }
    }
}

/// Coerces user-entered amount text into a finite float.
pub fn parse_amount(raw: &str) -> Result<f64> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| LedgerError::Parse(raw.to_string()))?;
    if !value.is_finite() {
        return Err(LedgerError::Parse(raw.to_string()));
    }
    Ok(value)
}
