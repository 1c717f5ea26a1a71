//! Report export for rendicion
//!
//! Every output is built fully in memory:
//! - PDF: paginated report drawn by the layout engine
//! - XLSX: two-sheet workbook (detail and summary)
//! - CSV: the detail table only

pub mod csv;
pub mod pdf;
pub mod xlsx;

use std::fmt;
use std::str::FromStr;

use crate::error::RendicionResult;
use crate::reports::{FontCapability, RenderSkip, RenditionReport, ReportProfile};

pub use self::csv::{render_csv, write_detail_csv};
pub use pdf::render_pdf;
pub use xlsx::{render_xlsx, DETAIL_SHEET, SUMMARY_SHEET};

/// Output format of a report export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pdf => "PDF",
            Self::Xlsx => "XLSX",
            Self::Csv => "CSV",
        })
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "xlsx" | "excel" => Ok(Self::Xlsx),
            "csv" => Ok(Self::Csv),
            other => Err(format!("unknown export format '{}'", other)),
        }
    }
}

/// A finished export, not yet written anywhere
#[derive(Debug, Clone)]
pub struct RenderedExport {
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
    /// Page count, for paginated formats
    pub pages: Option<usize>,
    pub skipped: Vec<RenderSkip>,
}

/// Render `report` in `format`
pub fn render(
    format: ExportFormat,
    report: &RenditionReport,
    profile: &ReportProfile,
    fonts: &FontCapability,
    logo: Option<&[u8]>,
) -> RendicionResult<RenderedExport> {
    let (bytes, pages, skipped) = match format {
        ExportFormat::Pdf => {
            let (bytes, outcome) = render_pdf(report, profile, fonts, logo)?;
            (bytes, Some(outcome.pages), outcome.skipped)
        }
        ExportFormat::Xlsx => (render_xlsx(report, profile)?, None, Vec::new()),
        ExportFormat::Csv => (render_csv(report)?, None, Vec::new()),
    };

    Ok(RenderedExport {
        format,
        bytes,
        pages,
        skipped,
    })
}
