//! CSV export of the detail table
//!
//! One row per expense in date order, followed by a total row.

use std::io::Write;

use crate::error::{RendicionError, RendicionResult};
use crate::reports::RenditionReport;

const HEADER: [&str; 7] = [
    "N",
    "Fecha",
    "Tipo doc",
    "Nro doc",
    "Detalle",
    "Proveedor",
    "Monto",
];

/// Write the detail table of `report` as CSV
pub fn write_detail_csv<W: Write>(report: &RenditionReport, writer: W) -> RendicionResult<()> {
    let mut csv = csv::Writer::from_writer(writer);

    csv.write_record(HEADER).map_err(csv_error)?;
    for row in &report.rows {
        csv.write_record([
            row.number.to_string(),
            row.date.clone(),
            row.document_type.clone(),
            row.document_number.clone(),
            row.description.clone(),
            row.supplier.clone(),
            row.amount.units().to_string(),
        ])
        .map_err(csv_error)?;
    }
    let total = report.totals.total_amount.units().to_string();
    csv.write_record(["", "", "", "", "", "Total", total.as_str()])
        .map_err(csv_error)?;

    csv.flush()
        .map_err(|e| RendicionError::Export(format!("Failed to write CSV: {}", e)))
}

/// The CSV export as bytes
pub fn render_csv(report: &RenditionReport) -> RendicionResult<Vec<u8>> {
    let mut buffer = Vec::new();
    write_detail_csv(report, &mut buffer)?;
    Ok(buffer)
}

fn csv_error(e: csv::Error) -> RendicionError {
    RendicionError::Export(format!("Failed to write CSV: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DocumentMeta, ExpenseRecord, Ledger, Money};
    use crate::reports::{ReportOptions, SummaryVariant};
    use chrono::NaiveDate;

    #[test]
    fn test_detail_csv() {
        let mut ledger = Ledger::new();
        ledger
            .add_expense(
                ExpenseRecord::new(
                    NaiveDate::from_ymd_opt(2025, 3, 9).unwrap(),
                    Money::from_units(12990),
                    "Tóner, impresora",
                )
                .with_document(DocumentMeta::new("Factura", "1550", "Compu S.A.")),
            )
            .unwrap();
        ledger
            .add_expense(ExpenseRecord::new(
                NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
                Money::from_units(3000),
                "Pasaje",
            ))
            .unwrap();
        let issued = NaiveDate::from_ymd_opt(2025, 3, 31)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let report =
            RenditionReport::build(&ledger, SummaryVariant::Simple, &ReportOptions::default(), issued);

        let text = String::from_utf8(render_csv(&report).unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "N,Fecha,Tipo doc,Nro doc,Detalle,Proveedor,Monto");
        assert_eq!(lines[1], "1,2025-03-01,,,Pasaje,,3000");
        assert_eq!(
            lines[2],
            "2,2025-03-09,Factura,1550,\"Tóner, impresora\",Compu S.A.,12990"
        );
        assert_eq!(lines[3], ",,,,,Total,15990");
    }
}
