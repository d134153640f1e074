use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{errors::Result, ledger::Transaction};

use super::StorageBackend;

const TMP_SUFFIX: &str = "tmp";

/// Keeps the transaction list in a single JSON array file.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StorageBackend for JsonStorage {
    fn load(&self) -> Result<Vec<Transaction>> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no transactions file yet");
            return Ok(Vec::new());
        }
        load_transactions_from_path(&self.path)
    }

    fn save(&self, transactions: &[Transaction]) -> Result<()> {
        save_transactions_to_path(transactions, &self.path)?;
        tracing::debug!(
            path = %self.path.display(),
            count = transactions.len(),
            "persisted transactions"
        );
        Ok(())
    }

    fn location(&self) -> &Path {
        &self.path
    }
}

/// Writes the records to `path`, staging through a temporary sibling file.
pub fn save_transactions_to_path(transactions: &[Transaction], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let json = serde_json::to_string_pretty(transactions)?;
    let tmp = tmp_path(path);
    write_atomic(&tmp, &json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

pub fn load_transactions_from_path(path: &Path) -> Result<Vec<Transaction>> {
    let data = fs::read_to_string(path)?;
    let transactions: Vec<Transaction> = serde_json::from_str(&data)?;
    Ok(transactions)
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.as_os_str().is_empty() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
