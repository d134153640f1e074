use std::{path::PathBuf, sync::Mutex};

use cashbook::{storage::JsonStorage, Ledger, TransactionKind};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a fresh directory that outlives the calling test.
pub fn temp_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Opens a ledger backed by `transactions.json` in a unique directory.
pub fn setup_ledger() -> (Ledger, PathBuf) {
    let path = temp_dir().join("transactions.json");
    let ledger = Ledger::open(Box::new(JsonStorage::new(path.clone()))).expect("open ledger");
    (ledger, path)
}

#[allow(dead_code)]
pub fn reopen(path: &PathBuf) -> Ledger {
    Ledger::open(Box::new(JsonStorage::new(path.clone()))).expect("reopen ledger")
}

/// Seeds the three-record reference ledger (balance 50).
#[allow(dead_code)]
pub fn seed_reference(ledger: &mut Ledger) {
    ledger
        .add(TransactionKind::Income, "100", "Salary", "2024-01-05", "")
        .expect("add salary");
    ledger
        .add(TransactionKind::Expense, "40", "Food", "2024-01-20", "")
        .expect("add food");
    ledger
        .add(TransactionKind::Expense, "10", "Food", "2024-02-01", "")
        .expect("add snack");
}
