//! Ledger model
//!
//! The ledger owns every expense of one reporting period together with the
//! initial fund, the report header fields and the carry-over values of the
//! previous period. All operations here are in-memory; persistence and
//! auditing happen in the service layer.

use std::collections::{BTreeMap, BTreeSet};

use super::expense::{ExpenseRecord, ValidationError};
use super::money::Money;

/// Free-form report header fields (institution, responsible person, ...)
pub type ReportMeta = BTreeMap<String, String>;

/// Values carried over from the previous period
///
/// Only used by the extended summary block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SummaryInputs {
    /// Balance left at the end of the previous rendition
    pub previous_balance: Money,
    /// Amount received with the previous rendition
    pub previous_received: Money,
    /// Transport expense deducted from the fund
    pub transport_expense: Money,
}

/// Derived totals of a ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub count: usize,
    pub total_amount: Money,
    pub balance: Money,
}

/// The expense ledger for one reporting period
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    initial_fund: Money,
    records: Vec<ExpenseRecord>,
    meta: ReportMeta,
    summary_inputs: SummaryInputs,
}

impl Ledger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble a ledger from already-validated parts
    pub(crate) fn from_parts(
        initial_fund: Money,
        records: Vec<ExpenseRecord>,
        meta: ReportMeta,
        summary_inputs: SummaryInputs,
    ) -> Self {
        Self {
            initial_fund,
            records,
            meta,
            summary_inputs,
        }
    }

    pub fn initial_fund(&self) -> Money {
        self.initial_fund
    }

    /// Records in entry order
    pub fn records(&self) -> &[ExpenseRecord] {
        &self.records
    }

    pub fn meta(&self) -> &ReportMeta {
        &self.meta
    }

    pub fn summary_inputs(&self) -> SummaryInputs {
        self.summary_inputs
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Replace the initial fund
    pub fn set_initial_fund(&mut self, amount: Money) -> Result<(), ValidationError> {
        if amount.is_negative() {
            return Err(ValidationError::NegativeFund(amount));
        }
        self.initial_fund = amount;
        Ok(())
    }

    /// Append an expense, returning its index
    ///
    /// The record is validated first; on failure the ledger is unchanged.
    /// The total of all amounts must stay representable.
    pub fn add_expense(&mut self, record: ExpenseRecord) -> Result<usize, ValidationError> {
        record.validate()?;
        self.compute_totals()
            .total_amount
            .checked_add(record.amount)
            .ok_or(ValidationError::TotalOverflow(record.amount))?;
        self.records.push(record);
        Ok(self.records.len() - 1)
    }

    /// Remove expenses by index, returning the removed records
    ///
    /// Indices are applied highest first so earlier removals never shift
    /// later ones. Out-of-range indices are ignored. The returned records are
    /// in their original relative order.
    pub fn remove_expenses(&mut self, indices: &BTreeSet<usize>) -> Vec<ExpenseRecord> {
        let mut removed = Vec::new();
        for &index in indices.iter().rev() {
            if index < self.records.len() {
                removed.push(self.records.remove(index));
            }
        }
        removed.reverse();
        removed
    }

    /// Count, total amount and balance (initial fund minus total)
    ///
    /// `add_expense` and the loader reject records whose total would not fit,
    /// so the saturating sum below is exact for every reachable ledger.
    pub fn compute_totals(&self) -> Totals {
        let total_amount = self
            .records
            .iter()
            .fold(Money::zero(), |acc, r| acc.saturating_add(r.amount));
        Totals {
            count: self.records.len(),
            total_amount,
            balance: self.initial_fund.saturating_sub(total_amount),
        }
    }

    /// Previous balance + previous received - current total - transport
    ///
    /// Carry-over values are free-form, so the result saturates at the
    /// bounds of `Money` instead of wrapping.
    pub fn final_balance(&self) -> Money {
        let inputs = self.summary_inputs;
        inputs
            .previous_balance
            .saturating_add(inputs.previous_received)
            .saturating_sub(self.compute_totals().total_amount)
            .saturating_sub(inputs.transport_expense)
    }

    /// Records sorted by date, ties kept in entry order
    pub fn sorted_by_date(&self) -> Vec<&ExpenseRecord> {
        let mut sorted: Vec<&ExpenseRecord> = self.records.iter().collect();
        sorted.sort_by_key(|r| r.date);
        sorted
    }

    /// Set a report header field, returning the previous value
    pub fn set_meta(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.meta.insert(key.into(), value.into())
    }

    /// Remove a report header field, returning its value
    pub fn remove_meta(&mut self, key: &str) -> Option<String> {
        self.meta.remove(key)
    }

    pub fn set_summary_inputs(&mut self, inputs: SummaryInputs) {
        self.summary_inputs = inputs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(day: u32, amount: i64, description: &str) -> ExpenseRecord {
        ExpenseRecord::new(
            NaiveDate::from_ymd_opt(2025, 4, day).unwrap(),
            Money::from_units(amount),
            description,
        )
    }

    fn five_record_ledger() -> Ledger {
        let mut ledger = Ledger::new();
        for i in 0..5 {
            ledger
                .add_expense(record(i + 1, 1000, &format!("gasto {}", i)))
                .unwrap();
        }
        ledger
    }

    #[test]
    fn test_compute_totals() {
        let mut ledger = Ledger::new();
        ledger.set_initial_fund(Money::from_units(100000)).unwrap();
        ledger.add_expense(record(1, 20000, "Resmas")).unwrap();
        ledger.add_expense(record(2, 5000, "Taxi")).unwrap();

        let totals = ledger.compute_totals();
        assert_eq!(
            totals,
            Totals {
                count: 2,
                total_amount: Money::from_units(25000),
                balance: Money::from_units(75000),
            }
        );
    }

    #[test]
    fn test_empty_ledger_totals() {
        let ledger = Ledger::new();
        let totals = ledger.compute_totals();
        assert_eq!(totals.count, 0);
        assert!(totals.total_amount.is_zero());
        assert!(totals.balance.is_zero());
    }

    #[test]
    fn test_remove_expenses_uses_original_indices() {
        let mut ledger = five_record_ledger();
        let removed = ledger.remove_expenses(&BTreeSet::from([1, 3]));

        let left: Vec<_> = ledger.records().iter().map(|r| r.description.as_str()).collect();
        assert_eq!(left, vec!["gasto 0", "gasto 2", "gasto 4"]);
        let gone: Vec<_> = removed.iter().map(|r| r.description.as_str()).collect();
        assert_eq!(gone, vec!["gasto 1", "gasto 3"]);
    }

    #[test]
    fn test_remove_expenses_ignores_out_of_range() {
        let mut ledger = five_record_ledger();
        let removed = ledger.remove_expenses(&BTreeSet::from([4, 9, 42]));
        assert_eq!(removed.len(), 1);
        assert_eq!(ledger.len(), 4);
    }

    #[test]
    fn test_add_expense_rejects_invalid_without_mutation() {
        let mut ledger = five_record_ledger();
        let before = ledger.clone();

        assert_eq!(
            ledger.add_expense(record(1, 10, "")),
            Err(ValidationError::EmptyDescription)
        );
        assert!(ledger.add_expense(record(1, -10, "Taxi")).is_err());
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_add_expense_rejects_total_overflow() {
        let mut ledger = Ledger::new();
        ledger
            .add_expense(record(1, 5_000_000_000_000_000_000, "Grande"))
            .unwrap();
        let before = ledger.clone();

        assert_eq!(
            ledger.add_expense(record(2, 5_000_000_000_000_000_000, "Otro")),
            Err(ValidationError::TotalOverflow(Money::from_units(
                5_000_000_000_000_000_000
            )))
        );
        assert_eq!(ledger, before);
        assert_eq!(ledger.compute_totals().total_amount.units(), 5_000_000_000_000_000_000);
    }

    #[test]
    fn test_final_balance_saturates() {
        let mut ledger = Ledger::new();
        ledger.set_summary_inputs(SummaryInputs {
            previous_balance: Money::from_units(i64::MAX),
            previous_received: Money::from_units(i64::MAX),
            transport_expense: Money::zero(),
        });
        assert_eq!(ledger.final_balance().units(), i64::MAX);
    }

    #[test]
    fn test_set_initial_fund_rejects_negative() {
        let mut ledger = Ledger::new();
        ledger.set_initial_fund(Money::from_units(500)).unwrap();
        assert!(ledger.set_initial_fund(Money::from_units(-1)).is_err());
        assert_eq!(ledger.initial_fund().units(), 500);
    }

    #[test]
    fn test_sorted_by_date_is_stable() {
        let mut ledger = Ledger::new();
        ledger.add_expense(record(9, 1, "late")).unwrap();
        ledger.add_expense(record(2, 1, "first same day")).unwrap();
        ledger.add_expense(record(2, 1, "second same day")).unwrap();
        ledger.add_expense(record(1, 1, "earliest")).unwrap();

        let order: Vec<_> = ledger
            .sorted_by_date()
            .iter()
            .map(|r| r.description.as_str())
            .collect();
        assert_eq!(
            order,
            vec!["earliest", "first same day", "second same day", "late"]
        );
        // Storage order untouched
        assert_eq!(ledger.records()[0].description, "late");
    }

    #[test]
    fn test_final_balance() {
        let mut ledger = Ledger::new();
        ledger.add_expense(record(1, 30000, "Insumos")).unwrap();
        ledger.set_summary_inputs(SummaryInputs {
            previous_balance: Money::from_units(10000),
            previous_received: Money::from_units(90000),
            transport_expense: Money::from_units(5000),
        });
        assert_eq!(ledger.final_balance().units(), 65000);
    }

    #[test]
    fn test_meta_set_and_remove() {
        let mut ledger = Ledger::new();
        assert_eq!(ledger.set_meta("institucion", "SLEP Petorca"), None);
        assert_eq!(
            ledger.set_meta("institucion", "SLEP"),
            Some("SLEP Petorca".to_string())
        );
        assert_eq!(ledger.remove_meta("institucion"), Some("SLEP".to_string()));
        assert!(ledger.meta().is_empty());
    }
}
