//! Service layer for rendicion
//!
//! The service layer provides business logic on top of the storage layer:
//! validation, persistence, audit logging and report exports.

pub mod export;
pub mod ledger;

pub use export::{ExportRequest, ExportService, ExportSummary};
pub use ledger::LedgerService;
