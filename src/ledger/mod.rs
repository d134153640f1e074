//! Transaction records, the ledger that owns them, and summary helpers.

#[allow(clippy::module_inception)]
pub mod ledger;
pub mod summary;
pub mod transaction;

pub use ledger::{Ledger, SortKey, SortOrder};
pub use summary::{group_by_category, summarize, Period, Totals};
pub use transaction::{parse_amount, Transaction, TransactionKind};
