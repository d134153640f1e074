pub mod json_backend;

use std::path::Path;

use crate::{errors::Result, ledger::Transaction};

/// Abstraction over persistence backends that hold the full transaction sequence.
pub trait StorageBackend: Send + Sync {
    /// Returns the stored records, or an empty list when nothing has been saved yet.
    fn load(&self) -> Result<Vec<Transaction>>;
    fn save(&self, transactions: &[Transaction]) -> Result<()>;
    fn location(&self) -> &Path;

    /// Optional helpers for ad-hoc file operations. Default implementations write
    /// the same JSON schema used by managed storage.
    fn save_to_path(&self, transactions: &[Transaction], path: &Path) -> Result<()> {
        json_backend::save_transactions_to_path(transactions, path)
    }

    fn load_from_path(&self, path: &Path) -> Result<Vec<Transaction>> {
        json_backend::load_transactions_from_path(path)
    }
}

pub use json_backend::{load_transactions_from_path, save_transactions_to_path, JsonStorage};
