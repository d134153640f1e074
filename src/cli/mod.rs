//! Interactive shell over the ledger. Set `CASHBOOK_CLI_SCRIPT` to read
//! commands from stdin without prompts.

mod commands;
pub mod core;
mod help;
mod io;
pub mod output;
pub mod registry;
mod shell;
pub mod shell_context;
pub mod ui;

pub use shell::run_cli;
