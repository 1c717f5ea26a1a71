//! Append-only JSONL audit log

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{RendicionError, RendicionResult};

use super::entry::AuditEntry;

/// Writes audit entries to the audit log, one JSON object per line
pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }

    /// Append one entry and flush
    pub fn log(&self, entry: &AuditEntry) -> RendicionResult<()> {
        self.log_batch(std::slice::from_ref(entry))
    }

    /// Append several entries with a single flush
    pub fn log_batch(&self, entries: &[AuditEntry]) -> RendicionResult<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| RendicionError::Io(format!("Failed to open audit log: {}", e)))?;
        let mut writer = BufWriter::new(file);

        for entry in entries {
            let line = serde_json::to_string(entry).map_err(|e| {
                RendicionError::Json(format!("Failed to serialize audit entry: {}", e))
            })?;
            writeln!(writer, "{}", line)
                .map_err(|e| RendicionError::Io(format!("Failed to write audit entry: {}", e)))?;
        }

        writer
            .flush()
            .map_err(|e| RendicionError::Io(format!("Failed to flush audit log: {}", e)))
    }

    /// Read all entries, oldest first
    pub fn read_all(&self) -> RendicionResult<Vec<AuditEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| RendicionError::Io(format!("Failed to open audit log: {}", e)))?;

        let mut entries = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| {
                RendicionError::Io(format!("Failed to read audit log line {}: {}", index + 1, e))
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let entry = serde_json::from_str(&line).map_err(|e| {
                RendicionError::Json(format!("Bad audit entry at line {}: {}", index + 1, e))
            })?;
            entries.push(entry);
        }

        Ok(entries)
    }

    /// The most recent `count` entries, oldest first
    pub fn read_recent(&self, count: usize) -> RendicionResult<Vec<AuditEntry>> {
        let mut entries = self.read_all()?;
        let start = entries.len().saturating_sub(count);
        Ok(entries.split_off(start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::entry::{EntityType, Operation};
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_logger() -> (AuditLogger, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let logger = AuditLogger::new(temp_dir.path().join("audit.log"));
        (logger, temp_dir)
    }

    fn expense_entry(n: usize) -> AuditEntry {
        AuditEntry::create(
            EntityType::Expense,
            n.to_string(),
            Some(format!("gasto {}", n)),
            &json!({"detalle": format!("gasto {}", n)}),
        )
    }

    #[test]
    fn test_log_and_read() {
        let (logger, _temp) = create_test_logger();
        logger.log(&expense_entry(1)).unwrap();

        let entries = logger.read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Operation::Create);
        assert_eq!(entries[0].entity_type, EntityType::Expense);
    }

    #[test]
    fn test_batch_appends_in_order() {
        let (logger, _temp) = create_test_logger();
        logger.log(&expense_entry(1)).unwrap();
        logger
            .log_batch(&[expense_entry(2), expense_entry(3)])
            .unwrap();

        let ids: Vec<_> = logger
            .read_all()
            .unwrap()
            .into_iter()
            .map(|e| e.entity_id)
            .collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_read_recent() {
        let (logger, _temp) = create_test_logger();
        for i in 1..=5 {
            logger.log(&expense_entry(i)).unwrap();
        }

        let recent = logger.read_recent(2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].entity_id, "4");
        assert_eq!(recent[1].entity_id, "5");
        assert_eq!(logger.read_recent(10).unwrap().len(), 5);
    }

    #[test]
    fn test_missing_log_reads_empty() {
        let (logger, _temp) = create_test_logger();
        assert!(logger.read_all().unwrap().is_empty());
        logger.log_batch(&[]).unwrap();
        assert!(!logger.path().exists());
    }
}
