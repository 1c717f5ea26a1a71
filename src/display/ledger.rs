//! Ledger display formatting
//!
//! Terminal tables for the expense list, the totals and the report header
//! fields.

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};
use tabled::{Table, Tabled};

use crate::models::{Ledger, Money};

#[derive(Tabled)]
struct ExpenseRow {
    #[tabled(rename = "N°")]
    number: usize,
    #[tabled(rename = "Fecha")]
    date: String,
    #[tabled(rename = "Detalle")]
    description: String,
    #[tabled(rename = "Tipo doc.")]
    document_type: String,
    #[tabled(rename = "N° doc.")]
    document_number: String,
    #[tabled(rename = "Proveedor")]
    supplier: String,
    #[tabled(rename = "Respaldo")]
    attachment: String,
    #[tabled(rename = "Monto")]
    amount: String,
}

#[derive(Tabled)]
struct KeyValueRow {
    #[tabled(rename = "Campo")]
    key: String,
    #[tabled(rename = "Valor")]
    value: String,
}

/// Expense table in insertion order, numbered from 1
///
/// These are the numbers `expense remove` takes.
pub fn format_expense_list(ledger: &Ledger, currency_symbol: &str) -> String {
    if ledger.is_empty() {
        return "No expenses recorded.".to_string();
    }

    let rows = ledger.records().iter().enumerate().map(|(i, record)| ExpenseRow {
        number: i + 1,
        date: record.date.format("%Y-%m-%d").to_string(),
        description: truncate(&record.description, 40),
        document_type: record.document.document_type.clone(),
        document_number: record.document.document_number.clone(),
        supplier: truncate(&record.document.supplier, 24),
        attachment: record.attachment_name.clone().unwrap_or_default(),
        amount: record.amount.format_with_symbol(currency_symbol),
    });

    let mut table = Table::new(rows);
    table
        .with(Style::sharp())
        .modify(Columns::single(0), Alignment::right())
        .modify(Columns::single(7), Alignment::right());
    table.to_string()
}

/// Fund, totals and (when set) the carry-over values
pub fn format_summary(ledger: &Ledger, currency_symbol: &str) -> String {
    let totals = ledger.compute_totals();
    let money = |amount: Money| amount.format_with_symbol(currency_symbol);

    let mut rows = vec![
        KeyValueRow::new("Fondo inicial", money(ledger.initial_fund())),
        KeyValueRow::new("Total gastos", money(totals.total_amount)),
        KeyValueRow::new("Saldo", money(totals.balance)),
        KeyValueRow::new("Cantidad de gastos", totals.count.to_string()),
    ];

    let inputs = ledger.summary_inputs();
    if inputs != Default::default() {
        rows.extend([
            KeyValueRow::new("Saldo anterior", money(inputs.previous_balance)),
            KeyValueRow::new("Monto recibido anterior", money(inputs.previous_received)),
            KeyValueRow::new("Gasto de traslado", money(inputs.transport_expense)),
            KeyValueRow::new("Saldo final", money(ledger.final_balance())),
        ]);
    }

    let mut table = Table::new(rows);
    table
        .with(Style::sharp())
        .modify(Columns::single(1), Alignment::right());
    table.to_string()
}

/// Report header fields
pub fn format_meta(ledger: &Ledger) -> String {
    if ledger.meta().is_empty() {
        return "No report fields set.".to_string();
    }
    let rows = ledger
        .meta()
        .iter()
        .map(|(key, value)| KeyValueRow::new(key, value.clone()));
    Table::new(rows).with(Style::sharp()).to_string()
}

impl KeyValueRow {
    fn new(key: &str, value: String) -> Self {
        Self {
            key: key.to_string(),
            value,
        }
    }
}

/// Truncate a string to max length with ellipsis
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
