//! Ledger service
//!
//! Business logic on top of the ledger model: every mutation is validated,
//! persisted to `gastos.json` and recorded in the audit log. The caller owns
//! the [`Ledger`] and passes it in; a mutation only reaches it after the save
//! succeeded, so a failed operation leaves it exactly as it was.

use std::collections::BTreeSet;
use std::path::Path;

use serde_json::{json, Value};

use crate::audit::{AuditEntry, EntityType};
use crate::error::{RendicionError, RendicionResult};
use crate::models::{ExpenseRecord, Ledger, Money, SummaryInputs, Totals};
use crate::storage::format::{
    parse_ledger, serialize_ledger, KEY_PREVIOUS_BALANCE, KEY_PREVIOUS_RECEIVED,
    KEY_TRANSPORT_EXPENSE,
};
use crate::storage::{read_text, write_bytes_atomic, Storage};

/// Service for ledger management
pub struct LedgerService<'a> {
    storage: &'a Storage,
}

impl<'a> LedgerService<'a> {
    /// Create a new ledger service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Load the persisted ledger (empty if none was saved yet)
    pub fn load(&self) -> RendicionResult<Ledger> {
        self.storage.ledger.load()
    }

    /// Replace the initial fund
    pub fn set_initial_fund(&self, ledger: &mut Ledger, amount: Money) -> RendicionResult<()> {
        let before = ledger.initial_fund();
        self.commit(ledger, |next| {
            next.set_initial_fund(amount)
                .map_err(|e| RendicionError::Validation(e.to_string()))
        })?;

        self.storage.log_update(
            EntityType::Fund,
            "fondo_inicial",
            None,
            &before.units(),
            &amount.units(),
        )?;
        tracing::info!(fund = %amount, "Initial fund set");
        Ok(())
    }

    /// Append an expense, returning its 0-based index
    pub fn add_expense(&self, ledger: &mut Ledger, record: ExpenseRecord) -> RendicionResult<usize> {
        let audit_value = expense_json(&record);
        let description = record.description.clone();
        let index = self.commit(ledger, |next| {
            next.add_expense(record)
                .map_err(|e| RendicionError::Validation(e.to_string()))
        })?;

        self.storage.log_create(
            EntityType::Expense,
            (index + 1).to_string(),
            Some(description),
            &audit_value,
        )?;
        tracing::info!(number = index + 1, "Expense added");
        Ok(index)
    }

    /// Remove expenses by 0-based index
    ///
    /// Out-of-range indices are ignored. Returns the removed records in their
    /// original order.
    pub fn remove_expenses(
        &self,
        ledger: &mut Ledger,
        indices: &BTreeSet<usize>,
    ) -> RendicionResult<Vec<ExpenseRecord>> {
        let numbered: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&i| i < ledger.len())
            .collect();
        let removed = self.commit(ledger, |next| Ok(next.remove_expenses(indices)))?;

        let entries: Vec<AuditEntry> = numbered
            .iter()
            .zip(&removed)
            .map(|(index, record)| {
                AuditEntry::delete(
                    EntityType::Expense,
                    (index + 1).to_string(),
                    Some(record.description.clone()),
                    &expense_json(record),
                )
            })
            .collect();
        self.storage.audit().log_batch(&entries)?;

        if removed.len() < indices.len() {
            tracing::debug!(
                requested = indices.len(),
                removed = removed.len(),
                "Ignored out-of-range expense indices"
            );
        }
        Ok(removed)
    }

    /// Set a report header field, returning its previous value
    pub fn set_meta(
        &self,
        ledger: &mut Ledger,
        key: &str,
        value: &str,
    ) -> RendicionResult<Option<String>> {
        let key = key.trim();
        if key.is_empty() {
            return Err(RendicionError::Validation("Field name cannot be empty".into()));
        }

        let previous = self.commit(ledger, |next| Ok(next.set_meta(key, value)))?;

        match &previous {
            Some(old) => {
                self.storage
                    .log_update(EntityType::Meta, key, None, &old.as_str(), &value)?
            }
            None => self.storage.log_create(EntityType::Meta, key, None, &value)?,
        }
        Ok(previous)
    }

    /// Remove a report header field
    pub fn remove_meta(&self, ledger: &mut Ledger, key: &str) -> RendicionResult<String> {
        if !ledger.meta().contains_key(key) {
            return Err(RendicionError::NotFound {
                entity_type: "Meta field",
                identifier: key.to_string(),
            });
        }

        let removed = self
            .commit(ledger, |next| Ok(next.remove_meta(key)))?
            .unwrap_or_default();
        self.storage
            .log_delete(EntityType::Meta, key, None, &removed)?;
        Ok(removed)
    }

    /// Replace the carry-over values of the previous period
    pub fn set_summary_inputs(
        &self,
        ledger: &mut Ledger,
        inputs: SummaryInputs,
    ) -> RendicionResult<()> {
        let before = summary_json(ledger.summary_inputs());
        self.commit(ledger, |next| {
            next.set_summary_inputs(inputs);
            Ok(())
        })?;

        self.storage.log_update(
            EntityType::Resumen,
            "resumen",
            None,
            &before,
            &summary_json(inputs),
        )
    }

    /// Derived totals of the ledger
    pub fn totals(&self, ledger: &Ledger) -> Totals {
        ledger.compute_totals()
    }

    /// Replace the ledger with the contents of an external file
    ///
    /// All or nothing: when the file cannot be read or parsed, neither the
    /// in-memory ledger nor the stored one changes.
    pub fn import(&self, ledger: &mut Ledger, path: &Path) -> RendicionResult<()> {
        let contents = read_text(path)?;
        let imported = parse_ledger(&contents)?;

        self.storage.ledger.save(&imported)?;
        *ledger = imported;

        self.storage
            .audit()
            .log(&AuditEntry::import(path.display().to_string(), ledger.len()))?;
        tracing::info!(path = %path.display(), records = ledger.len(), "Ledger imported");
        Ok(())
    }

    /// Write the ledger in its persisted format to an arbitrary path
    pub fn export_data(&self, ledger: &Ledger, path: &Path) -> RendicionResult<()> {
        let bytes = serialize_ledger(ledger)?;
        write_bytes_atomic(path, &bytes)?;
        tracing::info!(path = %path.display(), "Ledger data exported");
        Ok(())
    }

    /// Apply `change` to a copy of the ledger, persist it, then commit
    fn commit<T>(
        &self,
        ledger: &mut Ledger,
        change: impl FnOnce(&mut Ledger) -> RendicionResult<T>,
    ) -> RendicionResult<T> {
        let mut next = ledger.clone();
        let result = change(&mut next)?;
        self.storage.ledger.save(&next)?;
        *ledger = next;
        Ok(result)
    }
}

fn expense_json(record: &ExpenseRecord) -> Value {
    json!({
        "fecha": record.date.format("%Y-%m-%d").to_string(),
        "monto": record.amount.units(),
        "detalle": record.description,
        "tipo_doc": record.document.document_type,
        "nro_doc": record.document.document_number,
        "proveedor": record.document.supplier,
        "nombre_doc": record.attachment_name,
    })
}

fn summary_json(inputs: SummaryInputs) -> Value {
    json!({
        KEY_PREVIOUS_BALANCE: inputs.previous_balance.units(),
        KEY_PREVIOUS_RECEIVED: inputs.previous_received.units(),
        KEY_TRANSPORT_EXPENSE: inputs.transport_expense.units(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::config::paths::RendicionPaths;
    use crate::models::Attachment;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = RendicionPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    fn record(day: u32, amount: i64, description: &str) -> ExpenseRecord {
        ExpenseRecord::new(
            NaiveDate::from_ymd_opt(2025, 5, day).unwrap(),
            Money::from_units(amount),
            description,
        )
    }

    #[test]
    fn test_add_expense_persists_and_audits() {
        let (_temp, storage) = create_test_storage();
        let service = LedgerService::new(&storage);
        let mut ledger = service.load().unwrap();

        service
            .set_initial_fund(&mut ledger, Money::from_units(100000))
            .unwrap();
        let index = service
            .add_expense(&mut ledger, record(3, 20000, "Resmas"))
            .unwrap();
        assert_eq!(index, 0);

        let reloaded = service.load().unwrap();
        assert_eq!(reloaded, ledger);
        assert_eq!(service.totals(&reloaded).balance.units(), 80000);

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].entity_type, EntityType::Fund);
        assert_eq!(entries[1].operation, Operation::Create);
        assert_eq!(entries[1].entity_id, "1");
    }

    #[test]
    fn test_invalid_expense_changes_nothing() {
        let (_temp, storage) = create_test_storage();
        let service = LedgerService::new(&storage);
        let mut ledger = Ledger::new();

        let err = service
            .add_expense(&mut ledger, record(3, 100, "  "))
            .unwrap_err();
        assert!(err.is_validation());
        assert!(ledger.is_empty());
        assert!(!storage.is_initialized());
        assert!(storage.audit().read_all().unwrap().is_empty());
    }

    #[test]
    fn test_negative_fund_rejected() {
        let (_temp, storage) = create_test_storage();
        let service = LedgerService::new(&storage);
        let mut ledger = Ledger::new();

        let err = service
            .set_initial_fund(&mut ledger, Money::from_units(-1))
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_remove_expenses_audits_original_numbers() {
        let (_temp, storage) = create_test_storage();
        let service = LedgerService::new(&storage);
        let mut ledger = Ledger::new();
        for i in 0..5 {
            service
                .add_expense(&mut ledger, record(i + 1, 1000, &format!("gasto {}", i)))
                .unwrap();
        }

        let removed = service
            .remove_expenses(&mut ledger, &BTreeSet::from([1, 3, 17]))
            .unwrap();
        assert_eq!(removed.len(), 2);
        assert_eq!(service.load().unwrap().len(), 3);

        let deletes: Vec<_> = storage
            .audit()
            .read_all()
            .unwrap()
            .into_iter()
            .filter(|e| e.operation == Operation::Delete)
            .map(|e| (e.entity_id, e.entity_name))
            .collect();
        assert_eq!(
            deletes,
            vec![
                ("2".to_string(), Some("gasto 1".to_string())),
                ("4".to_string(), Some("gasto 3".to_string())),
            ]
        );
    }

    #[test]
    fn test_attachment_bytes_are_session_only() {
        let (_temp, storage) = create_test_storage();
        let service = LedgerService::new(&storage);
        let mut ledger = Ledger::new();

        let with_receipt = record(2, 4500, "Taxi")
            .with_attachment(Attachment::new("boleta.jpg", vec![0xFF, 0xD8]));
        service.add_expense(&mut ledger, with_receipt).unwrap();
        assert!(ledger.records()[0].has_embedded_attachment());

        let reloaded = service.load().unwrap();
        assert!(!reloaded.records()[0].has_embedded_attachment());
        assert_eq!(
            reloaded.records()[0].attachment_name.as_deref(),
            Some("boleta.jpg")
        );
    }

    #[test]
    fn test_meta_and_summary_inputs() {
        let (_temp, storage) = create_test_storage();
        let service = LedgerService::new(&storage);
        let mut ledger = Ledger::new();

        assert_eq!(
            service.set_meta(&mut ledger, "institucion", "SLEP").unwrap(),
            None
        );
        assert_eq!(
            service
                .set_meta(&mut ledger, "institucion", "SLEP Petorca")
                .unwrap()
                .as_deref(),
            Some("SLEP")
        );
        assert!(service.set_meta(&mut ledger, " ", "x").unwrap_err().is_validation());

        let inputs = SummaryInputs {
            previous_balance: Money::from_units(10000),
            previous_received: Money::from_units(90000),
            transport_expense: Money::from_units(5000),
        };
        service.set_summary_inputs(&mut ledger, inputs).unwrap();

        let reloaded = service.load().unwrap();
        assert_eq!(reloaded.summary_inputs(), inputs);
        assert_eq!(
            reloaded.meta().get("institucion").map(String::as_str),
            Some("SLEP Petorca")
        );

        assert_eq!(
            service.remove_meta(&mut ledger, "institucion").unwrap(),
            "SLEP Petorca"
        );
        assert!(service
            .remove_meta(&mut ledger, "institucion")
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_import_malformed_leaves_state_untouched() {
        let (temp, storage) = create_test_storage();
        let service = LedgerService::new(&storage);
        let mut ledger = Ledger::new();
        service
            .add_expense(&mut ledger, record(1, 3000, "Café"))
            .unwrap();
        let before = ledger.clone();

        let bad = temp.path().join("truncado.json");
        std::fs::write(&bad, r#"{"fondo_inicial": 1000, "gastos": [{"fecha": "#).unwrap();

        let err = service.import(&mut ledger, &bad).unwrap_err();
        assert!(err.is_format());
        assert_eq!(ledger, before);
        assert_eq!(service.load().unwrap(), before);
    }

    #[test]
    fn test_import_non_utf8_is_format_error() {
        let (temp, storage) = create_test_storage();
        let service = LedgerService::new(&storage);
        let mut ledger = Ledger::new();
        service
            .add_expense(&mut ledger, record(2, 800, "Pan"))
            .unwrap();
        let before = ledger.clone();

        let latin1 = temp.path().join("latin1.json");
        std::fs::write(&latin1, b"{\"meta\": {\"comuna\": \"Pe\xf1aflor\"}}").unwrap();

        let err = service.import(&mut ledger, &latin1).unwrap_err();
        assert!(err.is_format());
        assert_eq!(ledger, before);
        assert_eq!(service.load().unwrap(), before);
    }

    #[test]
    fn test_export_then_import() {
        let (temp, storage) = create_test_storage();
        let service = LedgerService::new(&storage);
        let mut ledger = Ledger::new();
        service
            .set_initial_fund(&mut ledger, Money::from_units(50000))
            .unwrap();
        service
            .add_expense(&mut ledger, record(4, 1200, "Pan"))
            .unwrap();

        let file = temp.path().join("respaldo.json");
        service.export_data(&ledger, &file).unwrap();

        let mut other = Ledger::new();
        service.import(&mut other, &file).unwrap();
        assert_eq!(other, ledger);

        let last = storage.audit().read_recent(1).unwrap();
        assert_eq!(last[0].operation, Operation::Import);
    }
}
