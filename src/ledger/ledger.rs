use std::{cmp::Ordering, collections::BTreeMap, fmt, path::Path, str::FromStr};

use super::{
    summary::{self, Period, Totals},
    transaction::{Transaction, TransactionKind},
};
use crate::{
    errors::{LedgerError, Result},
    storage::StorageBackend,
};

/// Ordered transaction records mirrored to a storage backend after every mutation.
pub struct Ledger {
    transactions: Vec<Transaction>,
    storage: Box<dyn StorageBackend>,
}

/// Column a ledger can be re-ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Date,
    Amount,
    Category,
    Kind,
    Description,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl Ledger {
    /// Loads the stored records; an absent file yields an empty ledger.
    pub fn open(storage: Box<dyn StorageBackend>) -> Result<Self> {
        let transactions = storage.load()?;
        tracing::info!(
            path = %storage.location().display(),
            count = transactions.len(),
            "ledger opened"
        );
        Ok(Self {
            transactions,
            storage,
        })
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn get(&self, index: usize) -> Option<&Transaction> {
        self.transactions.get(index)
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn location(&self) -> &Path {
        self.storage.location()
    }

    pub fn add(
        &mut self,
        kind: TransactionKind,
        amount: &str,
        category: &str,
        date: &str,
        description: &str,
    ) -> Result<()> {
        let txn = Transaction::parse(kind, amount, category, date, description)?;
        self.push(txn)
    }

    /// Appends an already-typed record.
    pub fn push(&mut self, txn: Transaction) -> Result<()> {
        tracing::debug!(kind = %txn.kind, amount = txn.amount, date = %txn.date, "add");
        self.transactions.push(txn);
        self.persist()
    }

    /// Replaces the record at `index`. Returns `false` without touching the
    /// ledger when the index is out of range.
    pub fn update(
        &mut self,
        index: usize,
        kind: TransactionKind,
        amount: &str,
        category: &str,
        date: &str,
        description: &str,
    ) -> Result<bool> {
        if index >= self.transactions.len() {
            tracing::debug!(index, len = self.transactions.len(), "update ignored");
            return Ok(false);
        }
        let txn = Transaction::parse(kind, amount, category, date, description)?;
        self.transactions[index] = txn;
        tracing::debug!(index, "update");
        self.persist()?;
        Ok(true)
    }

    pub fn delete(&mut self, index: usize) -> Result<bool> {
        if index >= self.transactions.len() {
            tracing::debug!(index, len = self.transactions.len(), "delete ignored");
            return Ok(false);
        }
        self.transactions.remove(index);
        tracing::debug!(index, "delete");
        self.persist()?;
        Ok(true)
    }

    /// Removes every in-range index, highest first so the remaining positions
    /// stay valid. Returns how many records went; nothing is written when none did.
    pub fn delete_many(&mut self, indices: &[usize]) -> Result<usize> {
        let len = self.transactions.len();
        let mut targets: Vec<usize> = indices.iter().copied().filter(|index| *index < len).collect();
        targets.sort_unstable_by(|a, b| b.cmp(a));
        targets.dedup();
        if targets.is_empty() {
            tracing::debug!(?indices, len, "delete ignored");
            return Ok(0);
        }
        for index in &targets {
            self.transactions.remove(*index);
        }
        tracing::debug!(?targets, "delete");
        self.persist()?;
        Ok(targets.len())
    }

    /// Drops every record and writes the empty ledger.
    pub fn clear(&mut self) -> Result<()> {
        let removed = self.transactions.len();
        self.transactions.clear();
        tracing::debug!(removed, "clear");
        self.persist()
    }

    /// Stable in-place sort; the new order is persisted.
    pub fn sort(&mut self, key: SortKey, order: SortOrder) -> Result<()> {
        self.transactions.sort_by(|a, b| {
            let ordering = key.compare(a, b);
            match order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            }
        });
        tracing::debug!(?key, ?order, "sort");
        self.persist()
    }

    /// Records matching both optional filters, in ledger order.
    pub fn filter(
        &self,
        kind: Option<TransactionKind>,
        category: Option<&str>,
    ) -> Vec<&Transaction> {
        self.filter_indexed(kind, category)
            .into_iter()
            .map(|(_, txn)| txn)
            .collect()
    }

    /// Same as [`Ledger::filter`] but keeps each record's position in the ledger.
    pub fn filter_indexed(
        &self,
        kind: Option<TransactionKind>,
        category: Option<&str>,
    ) -> Vec<(usize, &Transaction)> {
        self.transactions
            .iter()
            .enumerate()
            .filter(|(_, txn)| kind.map_or(true, |kind| txn.kind == kind))
            .filter(|(_, txn)| category.map_or(true, |category| txn.category == category))
            .collect()
    }

    pub fn totals(&self) -> Totals {
        let mut totals = Totals::default();
        for txn in &self.transactions {
            totals.record(txn);
        }
        totals
    }

    pub fn balance(&self) -> f64 {
        self.totals().net()
    }

    pub fn summarize(
        &self,
        period: Period,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<BTreeMap<String, Totals>> {
        summary::summarize(&self.transactions, period, start, end)
    }

    pub fn group_by_category(&self) -> BTreeMap<String, Totals> {
        summary::group_by_category(&self.transactions)
    }

    /// Per-category totals over records of `kind` dated within `[start, end]`.
    pub fn category_totals(
        &self,
        kind: Option<TransactionKind>,
        start: Option<&str>,
        end: Option<&str>,
    ) -> BTreeMap<String, Totals> {
        summary::group_by_category(
            self.transactions
                .iter()
                .filter(|txn| kind.map_or(true, |kind| txn.kind == kind))
                .filter(|txn| summary::within(&txn.date, start, end)),
        )
    }

    /// Distinct categories in alphabetical order.
    pub fn categories(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .transactions
            .iter()
            .map(|txn| txn.category.clone())
            .collect();
        names.sort();
        names.dedup();
        names
    }

    pub fn export(&self, path: &Path) -> Result<()> {
        self.storage.save_to_path(&self.transactions, path)?;
        tracing::info!(path = %path.display(), count = self.transactions.len(), "exported");
        Ok(())
    }

    /// Replaces every record with the contents of `path`. A missing file is a
    /// silent no-op reported as `false`.
    pub fn import(&mut self, path: &Path) -> Result<bool> {
        if !path.exists() {
            tracing::warn!(path = %path.display(), "import skipped, file not found");
            return Ok(false);
        }
        self.transactions = self.storage.load_from_path(path)?;
        tracing::info!(path = %path.display(), count = self.transactions.len(), "imported");
        self.persist()?;
        Ok(true)
    }

    fn persist(&self) -> Result<()> {
        self.storage.save(&self.transactions)
    }
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::Date,
        SortKey::Amount,
        SortKey::Category,
        SortKey::Kind,
        SortKey::Description,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Date => "date",
            SortKey::Amount => "amount",
            SortKey::Category => "category",
            SortKey::Kind => "type",
            SortKey::Description => "description",
        }
    }

    fn compare(&self, a: &Transaction, b: &Transaction) -> Ordering {
        match self {
            SortKey::Date => a.date.cmp(&b.date),
            SortKey::Amount => a.amount.total_cmp(&b.amount),
            SortKey::Category => a.category.cmp(&b.category),
            SortKey::Kind => a.kind.cmp(&b.kind),
            SortKey::Description => a.description.cmp(&b.description),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self> {
        let needle = value.trim().to_ascii_lowercase();
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == needle)
            .ok_or_else(|| LedgerError::InvalidSortKey(value.to_string()))
    }
}

impl FromStr for SortOrder {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "descending" => Ok(SortOrder::Descending),
            _ => Err(LedgerError::InvalidSortKey(value.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::JsonStorage;
    use tempfile::TempDir;

    fn open_temp() -> (Ledger, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let storage = JsonStorage::new(temp.path().join("transactions.json"));
        let ledger = Ledger::open(Box::new(storage)).expect("open ledger");
        (ledger, temp)
    }

    fn seed(ledger: &mut Ledger) {
        ledger
            .add(TransactionKind::Income, "100", "Salary", "2024-01-05", "")
            .unwrap();
        ledger
            .add(TransactionKind::Expense, "40", "Food", "2024-01-20", "")
            .unwrap();
        ledger
            .add(TransactionKind::Expense, "10", "Food", "2024-02-01", "")
            .unwrap();
    }

    #[test]
    fn balance_matches_reference_example() {
        let (mut ledger, _guard) = open_temp();
        seed(&mut ledger);
        assert_eq!(ledger.balance(), 50.0);
        let totals = ledger.totals();
        assert_eq!(totals.income, 100.0);
        assert_eq!(totals.expense, 50.0);
    }

    #[test]
    fn add_rejects_non_numeric_amount_without_mutating() {
        let (mut ledger, _guard) = open_temp();
        let err = ledger
            .add(TransactionKind::Expense, "ten", "Food", "2024-01-01", "")
            .expect_err("parse error");
        assert!(matches!(err, LedgerError::Parse(raw) if raw == "ten"));
        assert!(ledger.is_empty());
    }

    #[test]
    fn out_of_range_update_and_delete_are_noops() {
        let (mut ledger, _guard) = open_temp();
        seed(&mut ledger);
        let before = ledger.transactions().to_vec();
        assert!(!ledger.delete(3).unwrap());
        assert!(!ledger
            .update(7, TransactionKind::Income, "not-a-number", "X", "2024-01-01", "")
            .unwrap());
        assert_eq!(ledger.transactions(), before.as_slice());
    }

    #[test]
    fn update_replaces_record_in_place() {
        let (mut ledger, _guard) = open_temp();
        seed(&mut ledger);
        assert!(ledger
            .update(1, TransactionKind::Expense, "45.5", "Dining", "2024-01-21", "dinner")
            .unwrap());
        let txn = ledger.get(1).unwrap();
        assert_eq!(txn.amount, 45.5);
        assert_eq!(txn.category, "Dining");
        assert_eq!(txn.description, "dinner");
        assert_eq!(ledger.len(), 3);
    }

    #[test]
    fn delete_removes_and_persists() {
        let (mut ledger, guard) = open_temp();
        seed(&mut ledger);
        assert!(ledger.delete(0).unwrap());
        assert_eq!(ledger.balance(), -50.0);

        let reopened =
            Ledger::open(Box::new(JsonStorage::new(guard.path().join("transactions.json"))))
                .unwrap();
        assert_eq!(reopened.transactions(), ledger.transactions());
    }

    #[test]
    fn filter_combines_kind_and_category() {
        let (mut ledger, _guard) = open_temp();
        seed(&mut ledger);
        assert_eq!(ledger.filter(Some(TransactionKind::Expense), None).len(), 2);
        assert_eq!(ledger.filter(None, Some("Salary")).len(), 1);
        assert!(ledger
            .filter(Some(TransactionKind::Income), Some("Food"))
            .is_empty());
        assert_eq!(ledger.filter(None, None).len(), 3);
    }

    #[test]
    fn sort_takes_explicit_direction() {
        let (mut ledger, _guard) = open_temp();
        seed(&mut ledger);
        ledger.sort(SortKey::Amount, SortOrder::Ascending).unwrap();
        let amounts: Vec<f64> = ledger.transactions().iter().map(|t| t.amount).collect();
        assert_eq!(amounts, vec![10.0, 40.0, 100.0]);

        ledger.sort(SortKey::Amount, SortOrder::Ascending).unwrap();
        let again: Vec<f64> = ledger.transactions().iter().map(|t| t.amount).collect();
        assert_eq!(again, amounts);

        ledger.sort(SortKey::Date, SortOrder::Descending).unwrap();
        assert_eq!(ledger.get(0).unwrap().date, "2024-02-01");
    }

    #[test]
    fn delete_many_removes_highest_index_first() {
        let (mut ledger, guard) = open_temp();
        seed(&mut ledger);
        ledger
            .add(TransactionKind::Income, "5", "Gift", "2024-03-01", "")
            .unwrap();

        assert_eq!(ledger.delete_many(&[2, 0, 2, 9]).unwrap(), 2);
        let categories: Vec<&str> = ledger
            .transactions()
            .iter()
            .map(|txn| txn.category.as_str())
            .collect();
        assert_eq!(categories, vec!["Food", "Gift"]);
        assert_eq!(ledger.get(0).unwrap().date, "2024-01-20");

        let reopened =
            Ledger::open(Box::new(JsonStorage::new(guard.path().join("transactions.json"))))
                .unwrap();
        assert_eq!(reopened.transactions(), ledger.transactions());
    }

    #[test]
    fn delete_many_out_of_range_writes_nothing() {
        let (mut ledger, guard) = open_temp();
        assert_eq!(ledger.delete_many(&[0, 3]).unwrap(), 0);
        assert!(!guard.path().join("transactions.json").exists());
    }

    #[test]
    fn clear_empties_ledger_and_file() {
        let (mut ledger, guard) = open_temp();
        seed(&mut ledger);
        ledger.clear().unwrap();
        assert!(ledger.is_empty());
        assert_eq!(ledger.balance(), 0.0);

        let json = std::fs::read_to_string(guard.path().join("transactions.json")).unwrap();
        assert_eq!(json.trim(), "[]");
    }

    #[test]
    fn category_totals_respect_kind_and_date_range() {
        let (mut ledger, _guard) = open_temp();
        seed(&mut ledger);

        let january = ledger.category_totals(None, Some("2024-01-01"), Some("2024-01-31"));
        let keys: Vec<&str> = january.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Food", "Salary"]);
        assert_eq!(january["Food"].expense, 40.0);

        let february = ledger.category_totals(Some(TransactionKind::Expense), Some("2024-02-01"), None);
        assert_eq!(february.len(), 1);
        assert_eq!(february["Food"].expense, 10.0);

        assert_eq!(ledger.category_totals(None, None, None), ledger.group_by_category());
    }

    #[test]
    fn categories_are_distinct_and_sorted() {
        let (mut ledger, _guard) = open_temp();
        seed(&mut ledger);
        assert_eq!(ledger.categories(), vec!["Food", "Salary"]);
    }

    #[test]
    fn import_of_missing_file_is_silent_noop() {
        let (mut ledger, guard) = open_temp();
        seed(&mut ledger);
        let imported = ledger.import(&guard.path().join("absent.json")).unwrap();
        assert!(!imported);
        assert_eq!(ledger.len(), 3);
    }

    #[test]
    fn sort_keys_and_orders_parse() {
        assert_eq!("type".parse::<SortKey>().unwrap(), SortKey::Kind);
        assert_eq!("Desc".parse::<SortOrder>().unwrap(), SortOrder::Descending);
        assert!("colour".parse::<SortKey>().is_err());
    }
}
