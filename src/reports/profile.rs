//! Report profiles
//!
//! A profile says which blocks a rendition report contains and how the
//! detail table looks. The two presets cover the simple fund summary and the
//! extended one that carries over the previous period.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Page orientation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Which summary block the report ends with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryVariant {
    /// Initial fund, total spent, balance and expense count
    #[default]
    Simple,
    /// Previous balance and amount received, transport expense, final balance
    Extended,
}

impl fmt::Display for SummaryVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple => write!(f, "simple"),
            Self::Extended => write!(f, "extended"),
        }
    }
}

impl FromStr for SummaryVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simple" => Ok(Self::Simple),
            "extended" | "extendido" => Ok(Self::Extended),
            other => Err(format!(
                "unknown profile '{}' (expected simple or extended)",
                other
            )),
        }
    }
}

/// Content of a detail-table column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Number,
    Date,
    DocumentType,
    DocumentNumber,
    Description,
    Supplier,
    Attachment,
    Amount,
}

impl ColumnKind {
    /// Default header label
    pub fn label(self) -> &'static str {
        match self {
            Self::Number => "N°",
            Self::Date => "Fecha",
            Self::DocumentType => "Tipo doc.",
            Self::DocumentNumber => "N° doc.",
            Self::Description => "Detalle",
            Self::Supplier => "Proveedor",
            Self::Attachment => "Respaldo",
            Self::Amount => "Monto",
        }
    }

    /// Whether values are right-aligned
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Number | Self::Amount)
    }
}

/// A detail-table column with its nominal width in millimetres
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    pub kind: ColumnKind,
    pub label: String,
    pub nominal_width: f64,
}

impl ColumnSpec {
    pub fn new(kind: ColumnKind, nominal_width: f64) -> Self {
        Self {
            kind,
            label: kind.label().to_string(),
            nominal_width,
        }
    }
}

/// Page-break handling for detail rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RowBreakPolicy {
    /// Rows are drawn one after another without checking the page bottom
    Unchecked,
    /// A row that does not fit on the current page starts a new one
    #[default]
    BeforeRow,
}

/// A signature box
#[derive(Clone, PartialEq, Eq)]
pub struct SignatureSpec {
    /// Caption below the signature rule
    pub caption: String,
    /// Lines under the caption ("Nombre:", "RUT:", ...)
    pub detail_lines: Vec<String>,
    /// Scanned signature placed above the rule
    pub image: Option<Vec<u8>>,
}

impl SignatureSpec {
    pub fn new(caption: impl Into<String>) -> Self {
        Self {
            caption: caption.into(),
            detail_lines: Vec::new(),
            image: None,
        }
    }

    pub fn with_detail_lines<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.detail_lines = lines.into_iter().map(Into::into).collect();
        self
    }
}

impl fmt::Debug for SignatureSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureSpec")
            .field("caption", &self.caption)
            .field("detail_lines", &self.detail_lines)
            .field("image", &self.image.as_ref().map(Vec::len))
            .finish()
    }
}

/// Everything that varies between rendition report layouts
#[derive(Debug, Clone, PartialEq)]
pub struct ReportProfile {
    pub summary: SummaryVariant,
    pub columns: Vec<ColumnSpec>,
    pub orientation: Orientation,
    /// Pad the detail table with empty rows up to this many rows
    pub pad_rows: Option<usize>,
    pub include_header: bool,
    pub include_summary: bool,
    pub include_signatures: bool,
    /// Draw the column header again at the top of each continuation page
    pub repeat_table_header: bool,
    pub row_breaks: RowBreakPolicy,
    pub signatures: Vec<SignatureSpec>,
}

impl ReportProfile {
    /// Fund summary with the standard detail columns
    pub fn simple() -> Self {
        Self {
            summary: SummaryVariant::Simple,
            columns: vec![
                ColumnSpec::new(ColumnKind::Number, 8.0),
                ColumnSpec::new(ColumnKind::Date, 20.0),
                ColumnSpec::new(ColumnKind::DocumentType, 20.0),
                ColumnSpec::new(ColumnKind::DocumentNumber, 18.0),
                ColumnSpec::new(ColumnKind::Description, 62.0),
                ColumnSpec::new(ColumnKind::Supplier, 36.0),
                ColumnSpec::new(ColumnKind::Amount, 26.0),
            ],
            orientation: Orientation::Portrait,
            pad_rows: None,
            include_header: true,
            include_summary: true,
            include_signatures: true,
            repeat_table_header: true,
            row_breaks: RowBreakPolicy::BeforeRow,
            signatures: vec![
                SignatureSpec::new("Responsable del fondo").with_detail_lines(["Nombre:", "RUT:"]),
                SignatureSpec::new("V°B° Jefatura").with_detail_lines(["Nombre:", "RUT:"]),
            ],
        }
    }

    /// Carry-over summary, attachment column and a table padded to 20 rows
    pub fn extended() -> Self {
        Self {
            summary: SummaryVariant::Extended,
            columns: vec![
                ColumnSpec::new(ColumnKind::Number, 8.0),
                ColumnSpec::new(ColumnKind::Date, 18.0),
                ColumnSpec::new(ColumnKind::DocumentType, 18.0),
                ColumnSpec::new(ColumnKind::DocumentNumber, 16.0),
                ColumnSpec::new(ColumnKind::Description, 52.0),
                ColumnSpec::new(ColumnKind::Supplier, 30.0),
                ColumnSpec::new(ColumnKind::Attachment, 24.0),
                ColumnSpec::new(ColumnKind::Amount, 24.0),
            ],
            pad_rows: Some(20),
            ..Self::simple()
        }
    }

    pub fn for_variant(variant: SummaryVariant) -> Self {
        match variant {
            SummaryVariant::Simple => Self::simple(),
            SummaryVariant::Extended => Self::extended(),
        }
    }
}

impl Default for ReportProfile {
    fn default() -> Self {
        Self::simple()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let simple = ReportProfile::simple();
        assert_eq!(simple.summary, SummaryVariant::Simple);
        assert_eq!(simple.columns.last().unwrap().kind, ColumnKind::Amount);
        assert_eq!(simple.row_breaks, RowBreakPolicy::BeforeRow);

        let extended = ReportProfile::extended();
        assert_eq!(extended.summary, SummaryVariant::Extended);
        assert_eq!(extended.pad_rows, Some(20));
        assert!(extended
            .columns
            .iter()
            .any(|c| c.kind == ColumnKind::Attachment));
    }

    #[test]
    fn test_nominal_widths_fill_a4_portrait() {
        for profile in [ReportProfile::simple(), ReportProfile::extended()] {
            let sum: f64 = profile.columns.iter().map(|c| c.nominal_width).sum();
            assert_eq!(sum, 190.0);
        }
    }

    #[test]
    fn test_summary_variant_parse() {
        assert_eq!("Extended".parse::<SummaryVariant>(), Ok(SummaryVariant::Extended));
        assert_eq!("simple".parse::<SummaryVariant>(), Ok(SummaryVariant::Simple));
        assert!("otro".parse::<SummaryVariant>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&Orientation::Landscape).unwrap(),
            "\"landscape\""
        );
        let variant: SummaryVariant = serde_json::from_str("\"extended\"").unwrap();
        assert_eq!(variant, SummaryVariant::Extended);
    }
}
