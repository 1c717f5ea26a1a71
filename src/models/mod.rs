//! Core data models for rendicion
//!
//! This module contains the data structures of the petty-cash domain:
//! money amounts, expense records and the ledger that owns them.

pub mod expense;
pub mod ledger;
pub mod money;

pub use expense::{Attachment, DocumentMeta, ExpenseRecord, ValidationError};
pub use ledger::{Ledger, ReportMeta, SummaryInputs, Totals};
pub use money::{Money, MoneyParseError};
