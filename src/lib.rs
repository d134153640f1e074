#![doc(test(attr(deny(warnings))))]

//! Cashbook keeps a personal income/expense ledger in a flat JSON file and
//! answers balance, filter, and period or category summary queries over it.

pub mod cli;
pub mod config;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

pub use errors::{LedgerError, Result};
pub use ledger::{Ledger, Period, SortKey, SortOrder, Totals, Transaction, TransactionKind};

/// Initializes global tracing. Safe to call more than once.
pub fn init() {
    utils::init_tracing();
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
