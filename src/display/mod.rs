//! Display formatting for terminal output
//!
//! Provides utilities for formatting the ledger as terminal tables.

pub mod ledger;

pub use ledger::{format_expense_list, format_meta, format_summary};
