//! Logical content of a rendition report
//!
//! A [`RenditionReport`] is built fresh from the ledger for every export and
//! holds already-formatted strings, so the PDF layout engine and the
//! spreadsheet emitter present exactly the same figures.

use std::fmt::Write as _;

use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDate, NaiveDateTime};

use crate::models::{ExpenseRecord, Ledger, Money, Totals};

use super::profile::{ColumnKind, SummaryVariant};

const ISO_DATE: &str = "%Y-%m-%d";

/// Format `date` with a strftime pattern
///
/// Returns `None` when the pattern is malformed or asks for fields a date
/// does not have (hours, time zones).
pub fn format_date(date: NaiveDate, pattern: &str) -> Option<String> {
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return None;
    }
    let mut out = String::new();
    write!(out, "{}", date.format(pattern)).ok()?;
    Some(out)
}

/// Formatting options shared by every emitter
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub title: String,
    pub currency_symbol: String,
    pub date_format: String,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            title: "Rendición de Gastos menores Fondo Fijo".to_string(),
            currency_symbol: "$".to_string(),
            date_format: ISO_DATE.to_string(),
        }
    }
}

/// One expense as printed in the detail table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRow {
    /// Position in date order, starting at 1
    pub number: usize,
    pub date: String,
    pub document_type: String,
    pub document_number: String,
    pub description: String,
    pub supplier: String,
    pub attachment: String,
    pub amount: Money,
    pub amount_text: String,
}

impl DetailRow {
    fn new(number: usize, record: &ExpenseRecord, options: &ReportOptions) -> Self {
        Self {
            number,
            date: format_date(record.date, &options.date_format)
                .unwrap_or_else(|| record.date.format(ISO_DATE).to_string()),
            document_type: record.document.document_type.clone(),
            document_number: record.document.document_number.clone(),
            description: record.description.clone(),
            supplier: record.document.supplier.clone(),
            attachment: record.attachment_name.clone().unwrap_or_default(),
            amount: record.amount,
            amount_text: record.amount.format_with_symbol(&options.currency_symbol),
        }
    }

    /// Cell text for a column
    pub fn cell(&self, kind: ColumnKind) -> String {
        match kind {
            ColumnKind::Number => self.number.to_string(),
            ColumnKind::Date => self.date.clone(),
            ColumnKind::DocumentType => self.document_type.clone(),
            ColumnKind::DocumentNumber => self.document_number.clone(),
            ColumnKind::Description => self.description.clone(),
            ColumnKind::Supplier => self.supplier.clone(),
            ColumnKind::Attachment => self.attachment.clone(),
            ColumnKind::Amount => self.amount_text.clone(),
        }
    }
}

/// A label/value row of the summary block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryLine {
    pub label: String,
    pub value: String,
    /// Numeric value for spreadsheet cells; `None` for counts
    pub amount: Option<Money>,
}

impl SummaryLine {
    fn money(label: &str, amount: Money, symbol: &str) -> Self {
        Self {
            label: label.to_string(),
            value: amount.format_with_symbol(symbol),
            amount: Some(amount),
        }
    }

    fn count(label: &str, count: usize) -> Self {
        Self {
            label: label.to_string(),
            value: count.to_string(),
            amount: None,
        }
    }
}

/// Everything a rendition report shows, ready to lay out
#[derive(Debug, Clone)]
pub struct RenditionReport {
    pub title: String,
    pub issued_at: NaiveDateTime,
    /// Header fields in ledger order, labels already humanized
    pub meta: Vec<(String, String)>,
    /// Expenses sorted by date
    pub rows: Vec<DetailRow>,
    pub totals: Totals,
    pub total_text: String,
    pub summary: Vec<SummaryLine>,
    /// Symbol the amounts above were formatted with
    pub currency_symbol: String,
}

impl RenditionReport {
    pub fn build(
        ledger: &Ledger,
        variant: SummaryVariant,
        options: &ReportOptions,
        issued_at: NaiveDateTime,
    ) -> Self {
        let symbol = options.currency_symbol.as_str();
        let totals = ledger.compute_totals();

        let rows = ledger
            .sorted_by_date()
            .into_iter()
            .enumerate()
            .map(|(i, record)| DetailRow::new(i + 1, record, options))
            .collect();

        let summary = match variant {
            SummaryVariant::Simple => vec![
                SummaryLine::money("Fondo inicial", ledger.initial_fund(), symbol),
                SummaryLine::money("Total gastos", totals.total_amount, symbol),
                SummaryLine::money("Saldo", totals.balance, symbol),
                SummaryLine::count("Cantidad de gastos", totals.count),
            ],
            SummaryVariant::Extended => {
                let inputs = ledger.summary_inputs();
                vec![
                    SummaryLine::money("Saldo anterior", inputs.previous_balance, symbol),
                    SummaryLine::money(
                        "Monto recibido anterior",
                        inputs.previous_received,
                        symbol,
                    ),
                    SummaryLine::money("Total gastos del período", totals.total_amount, symbol),
                    SummaryLine::money("Gasto de traslado", inputs.transport_expense, symbol),
                    SummaryLine::money("Saldo final", ledger.final_balance(), symbol),
                ]
            }
        };

        Self {
            currency_symbol: options.currency_symbol.clone(),
            title: options.title.clone(),
            issued_at,
            meta: ledger
                .meta()
                .iter()
                .map(|(key, value)| (meta_label(key), value.clone()))
                .collect(),
            rows,
            totals,
            total_text: totals.total_amount.format_with_symbol(symbol),
            summary,
        }
    }

    /// "Fecha de emisión: YYYY-MM-DD HH:MM"
    pub fn issued_line(&self) -> String {
        format!("Fecha de emisión: {}", self.issued_at.format("%Y-%m-%d %H:%M"))
    }
}

/// `fondo_tipo` -> `Fondo tipo`
fn meta_label(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
