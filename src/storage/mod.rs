//! Storage layer for rendicion
//!
//! Provides JSON file storage with atomic writes and automatic directory
//! creation. The ledger lives in a single `gastos.json` file.

pub mod file_io;
pub mod format;
pub mod ledger;

pub use file_io::{read_json, read_text, write_bytes_atomic, write_json_atomic};
pub use format::{parse_ledger, serialize_ledger};
pub use ledger::LedgerRepository;

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::RendicionPaths;
use crate::error::RendicionError;

/// Main storage coordinator
pub struct Storage {
    paths: RendicionPaths,
    pub ledger: LedgerRepository,
    audit: AuditLogger,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: RendicionPaths) -> Result<Self, RendicionError> {
        paths.ensure_directories()?;

        Ok(Self {
            ledger: LedgerRepository::new(paths.ledger_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &RendicionPaths {
        &self.paths
    }

    /// Get the audit logger
    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Record a create in the audit log
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), RendicionError> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    /// Record an update in the audit log
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> Result<(), RendicionError> {
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
        ))
    }

    /// Record a delete in the audit log
    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), RendicionError> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }

    /// Check if a ledger has been saved yet
    pub fn is_initialized(&self) -> bool {
        self.paths.ledger_file().exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = RendicionPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(!storage.is_initialized());
        assert!(storage.ledger.load().unwrap().is_empty());
    }
}
