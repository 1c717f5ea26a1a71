//! Spreadsheet emitter
//!
//! Writes the report as a workbook with two sheets: "Detalle" (header block,
//! bordered detail table and total row) and "Resumen" (header block, summary
//! rows and the signature captions). Column widths are fixed per column kind
//! instead of derived from the page geometry.

use crate::error::RendicionResult;
use crate::reports::{RenditionReport, ReportProfile};

pub const DETAIL_SHEET: &str = "Detalle";
pub const SUMMARY_SHEET: &str = "Resumen";

/// Build the workbook for `report` and return its bytes
#[cfg(feature = "xlsx")]
pub fn render_xlsx(report: &RenditionReport, profile: &ReportProfile) -> RendicionResult<Vec<u8>> {
    backend::render(report, profile)
}

#[cfg(not(feature = "xlsx"))]
pub fn render_xlsx(_report: &RenditionReport, _profile: &ReportProfile) -> RendicionResult<Vec<u8>> {
    Err(crate::error::RendicionError::DependencyUnavailable(
        "spreadsheet export requires the 'xlsx' feature".to_string(),
    ))
}

#[cfg(feature = "xlsx")]
mod backend {
    use rust_xlsxwriter::{
        ColNum, Format, FormatAlign, FormatBorder, RowNum, Workbook, Worksheet, XlsxError,
    };

    use super::*;
    use crate::error::RendicionError;
    use crate::reports::{ColumnKind, SignatureSpec};

    /// Whole-unit amount format prefixed with `symbol`
    pub(super) fn currency_format(symbol: &str) -> String {
        format!("\"{}\"#,##0", symbol.replace('"', ""))
    }

    /// Columns of the Resumen sheet: two signature boxes of two columns each
    const SUMMARY_COLUMN_WIDTHS: [f64; 5] = [30.0, 18.0, 4.0, 30.0, 18.0];

    struct Formats {
        title: Format,
        label: Format,
        text: Format,
        header: Format,
        cell: Format,
        number: Format,
        money: Format,
        total_label: Format,
        total_money: Format,
        rule: Format,
        caption: Format,
    }

    impl Formats {
        fn new(currency_symbol: &str) -> Self {
            let currency = currency_format(currency_symbol);
            let bordered = Format::new().set_border(FormatBorder::Thin);
            Self {
                title: Format::new()
                    .set_bold()
                    .set_font_size(12)
                    .set_align(FormatAlign::Center),
                label: Format::new().set_bold().set_border(FormatBorder::Thin),
                text: Format::new().set_border(FormatBorder::Thin).set_text_wrap(),
                header: Format::new()
                    .set_bold()
                    .set_border(FormatBorder::Thin)
                    .set_align(FormatAlign::Center)
                    .set_text_wrap(),
                cell: bordered.clone().set_text_wrap(),
                number: bordered.clone().set_align(FormatAlign::Right),
                money: bordered.set_num_format(&currency),
                total_label: Format::new()
                    .set_bold()
                    .set_border(FormatBorder::Thin)
                    .set_align(FormatAlign::Right),
                total_money: Format::new()
                    .set_bold()
                    .set_border(FormatBorder::Thin)
                    .set_num_format(&currency),
                rule: Format::new().set_border_bottom(FormatBorder::Thin),
                caption: Format::new().set_bold().set_align(FormatAlign::Center),
            }
        }
    }

    pub(super) fn render(report: &RenditionReport, profile: &ReportProfile) -> RendicionResult<Vec<u8>> {
        let formats = Formats::new(&report.currency_symbol);
        let mut workbook = Workbook::new();

        workbook.push_worksheet(detail_sheet(report, profile, &formats).map_err(xlsx_error)?);
        workbook.push_worksheet(summary_sheet(report, profile, &formats).map_err(xlsx_error)?);

        let bytes = workbook.save_to_buffer().map_err(xlsx_error)?;
        tracing::debug!(bytes = bytes.len(), "Workbook written");
        Ok(bytes)
    }

    fn xlsx_error(e: XlsxError) -> RendicionError {
        RendicionError::Export(format!("Spreadsheet generation failed: {}", e))
    }

    fn column_width(kind: ColumnKind) -> f64 {
        match kind {
            ColumnKind::Number => 5.0,
            ColumnKind::Date => 12.0,
            ColumnKind::DocumentType => 14.0,
            ColumnKind::DocumentNumber => 12.0,
            ColumnKind::Description => 45.0,
            ColumnKind::Supplier => 28.0,
            ColumnKind::Attachment => 22.0,
            ColumnKind::Amount => 14.0,
        }
    }

    /// Text across `first..=last` columns of `row`
    fn write_span(
        sheet: &mut Worksheet,
        row: RowNum,
        first: ColNum,
        last: ColNum,
        text: &str,
        format: &Format,
    ) -> Result<(), XlsxError> {
        if last > first {
            sheet.merge_range(row, first, row, last, text, format)?;
        } else {
            sheet.write_string_with_format(row, first, text, format)?;
        }
        Ok(())
    }

    /// Title, emission line and metadata rows; returns the next free row
    fn header_block(
        sheet: &mut Worksheet,
        report: &RenditionReport,
        last_col: ColNum,
        formats: &Formats,
    ) -> Result<RowNum, XlsxError> {
        write_span(sheet, 0, 0, last_col, &report.title, &formats.title)?;
        write_span(sheet, 1, 0, last_col, &report.issued_line(), &Format::new())?;

        let mut row: RowNum = 3;
        let value_start: ColNum = if last_col >= 2 { 2 } else { last_col };
        for (label, value) in &report.meta {
            write_span(sheet, row, 0, value_start.saturating_sub(1), label, &formats.label)?;
            write_span(sheet, row, value_start, last_col, value, &formats.text)?;
            row += 1;
        }
        Ok(row + 1)
    }

    fn detail_sheet(
        report: &RenditionReport,
        profile: &ReportProfile,
        formats: &Formats,
    ) -> Result<Worksheet, XlsxError> {
        let mut sheet = Worksheet::new();
        sheet.set_name(DETAIL_SHEET)?;

        let columns = &profile.columns;
        let last_col = columns.len().saturating_sub(1) as ColNum;
        for (col, column) in columns.iter().enumerate() {
            sheet.set_column_width(col as ColNum, column_width(column.kind))?;
        }

        let mut row = header_block(&mut sheet, report, last_col, formats)?;

        for (col, column) in columns.iter().enumerate() {
            sheet.write_string_with_format(row, col as ColNum, &column.label, &formats.header)?;
        }
        row += 1;

        if report.rows.is_empty() && profile.pad_rows.unwrap_or(0) == 0 {
            write_span(&mut sheet, row, 0, last_col, "Sin registros", &formats.cell)?;
            row += 1;
        }

        for detail in &report.rows {
            for (col, column) in columns.iter().enumerate() {
                let col = col as ColNum;
                match column.kind {
                    ColumnKind::Number => {
                        sheet.write_number_with_format(row, col, detail.number as f64, &formats.number)?;
                    }
                    ColumnKind::Amount => {
                        sheet.write_number_with_format(
                            row,
                            col,
                            detail.amount.units() as f64,
                            &formats.money,
                        )?;
                    }
                    kind => {
                        sheet.write_string_with_format(row, col, detail.cell(kind), &formats.cell)?;
                    }
                }
            }
            row += 1;
        }

        for _ in report.rows.len()..profile.pad_rows.unwrap_or(0) {
            for col in 0..columns.len() {
                sheet.write_blank(row, col as ColNum, &formats.cell)?;
            }
            row += 1;
        }

        let total = report.totals.total_amount.units() as f64;
        if last_col > 0 {
            write_span(&mut sheet, row, 0, last_col - 1, "Total", &formats.total_label)?;
        }
        sheet.write_number_with_format(row, last_col, total, &formats.total_money)?;

        Ok(sheet)
    }

    fn summary_sheet(
        report: &RenditionReport,
        profile: &ReportProfile,
        formats: &Formats,
    ) -> Result<Worksheet, XlsxError> {
        let mut sheet = Worksheet::new();
        sheet.set_name(SUMMARY_SHEET)?;
        for (col, width) in SUMMARY_COLUMN_WIDTHS.iter().enumerate() {
            sheet.set_column_width(col as ColNum, *width)?;
        }
        let last_col = (SUMMARY_COLUMN_WIDTHS.len() - 1) as ColNum;

        let mut row = header_block(&mut sheet, report, last_col, formats)?;

        if profile.include_summary {
            write_span(&mut sheet, row, 0, last_col, "Resumen", &formats.caption)?;
            row += 1;
            for line in &report.summary {
                write_span(&mut sheet, row, 0, 2, &line.label, &formats.label)?;
                match line.amount {
                    Some(amount) => {
                        sheet.merge_range(row, 3, row, last_col, "", &formats.money)?;
                        sheet.write_number_with_format(row, 3, amount.units() as f64, &formats.money)?;
                    }
                    None => write_span(&mut sheet, row, 3, last_col, &line.value, &formats.number)?,
                }
                row += 1;
            }
            row += 1;
        }

        if profile.include_signatures {
            for pair in profile.signatures.chunks(2) {
                row = signature_row(&mut sheet, row, pair, formats)?;
            }
        }

        Ok(sheet)
    }

    /// Blank signing space, rule, caption and detail lines for up to two boxes
    fn signature_row(
        sheet: &mut Worksheet,
        row: RowNum,
        pair: &[SignatureSpec],
        formats: &Formats,
    ) -> Result<RowNum, XlsxError> {
        let rule_row = row + 2;
        let mut next = rule_row + 1;
        for (i, spec) in pair.iter().enumerate() {
            let first: ColNum = if pair.len() == 1 { 1 } else { (i * 3) as ColNum };
            let last = first + 1;

            write_span(sheet, rule_row, first, last, "", &formats.rule)?;
            write_span(sheet, rule_row + 1, first, last, &spec.caption, &formats.caption)?;
            for (n, detail) in spec.detail_lines.iter().enumerate() {
                let detail_row = rule_row + 2 + n as RowNum;
                write_span(sheet, detail_row, first, last, detail, &Format::new())?;
            }
            next = next.max(rule_row + 2 + spec.detail_lines.len() as RowNum);
        }
        Ok(next + 1)
    }
}
