//! Audit logging for rendicion
//!
//! Every mutation of the ledger (fund changes, expenses added or removed,
//! header fields, imports) is appended to `audit.log` as one JSON line with
//! before/after values.
//!
//! - `AuditEntry`: a single entry with timestamp, operation, the affected
//!   part of the ledger and optional before/after values.
//! - `AuditLogger`: appends entries to the log file (JSONL) and reads them
//!   back.

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
