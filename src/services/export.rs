//! Export service
//!
//! Builds a rendition report from the ledger and the user settings, renders
//! it in the requested format and writes the result in one atomic write.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};

use crate::config::settings::Settings;
use crate::error::RendicionResult;
use crate::export::{self, ExportFormat};
use crate::models::Ledger;
use crate::reports::{
    FontCapability, Orientation, RenderSkip, RenditionReport, ReportOptions, ReportProfile,
    SummaryVariant,
};
use crate::storage::write_bytes_atomic;

/// What to export and where
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub format: ExportFormat,
    pub output: PathBuf,
    /// Summary variant; the configured default when `None`
    pub profile: Option<SummaryVariant>,
    pub landscape: bool,
    /// Logo overriding the configured one
    pub logo: Option<PathBuf>,
    pub pad_rows: Option<usize>,
}

impl ExportRequest {
    pub fn new(format: ExportFormat, output: impl Into<PathBuf>) -> Self {
        Self {
            format,
            output: output.into(),
            profile: None,
            landscape: false,
            logo: None,
            pad_rows: None,
        }
    }
}

/// Result of a completed export
#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub format: ExportFormat,
    pub path: PathBuf,
    pub bytes: usize,
    pub pages: Option<usize>,
    pub skipped: Vec<RenderSkip>,
}

/// Service for report exports
pub struct ExportService<'a> {
    settings: &'a Settings,
}

impl<'a> ExportService<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    fn options(&self) -> ReportOptions {
        ReportOptions {
            title: self.settings.report_title.clone(),
            currency_symbol: self.settings.currency_symbol.clone(),
            date_format: self.settings.date_format.clone(),
        }
    }

    /// Profile for a request: settings first, then command-line overrides
    pub fn profile_for(&self, request: &ExportRequest) -> ReportProfile {
        let variant = request.profile.unwrap_or(self.settings.default_profile);
        let mut profile = self.settings.report_profile(variant);
        if request.landscape {
            profile.orientation = Orientation::Landscape;
        }
        if request.pad_rows.is_some() {
            profile.pad_rows = request.pad_rows;
        }
        profile
    }

    /// Report content for `ledger` as of `issued_at`
    pub fn build_report(
        &self,
        ledger: &Ledger,
        variant: SummaryVariant,
        issued_at: NaiveDateTime,
    ) -> RenditionReport {
        RenditionReport::build(ledger, variant, &self.options(), issued_at)
    }

    /// Render and write one export
    ///
    /// Nothing is written unless rendering succeeded.
    pub fn export(&self, ledger: &Ledger, request: &ExportRequest) -> RendicionResult<ExportSummary> {
        let profile = self.profile_for(request);
        let report = self.build_report(ledger, profile.summary, Local::now().naive_local());

        let fonts = match request.format {
            ExportFormat::Pdf => FontCapability::resolve(&self.settings.unicode_font_candidates),
            ExportFormat::Xlsx | ExportFormat::Csv => FontCapability::Builtin,
        };

        let mut skipped = Vec::new();
        let logo = match request.format {
            ExportFormat::Pdf => self.read_logo(request, &mut skipped),
            ExportFormat::Xlsx | ExportFormat::Csv => None,
        };

        let rendered = export::render(request.format, &report, &profile, &fonts, logo.as_deref())?;
        write_bytes_atomic(&request.output, &rendered.bytes)?;

        skipped.extend(rendered.skipped);
        tracing::info!(
            format = %request.format,
            path = %request.output.display(),
            bytes = rendered.bytes.len(),
            skipped = skipped.len(),
            "Report exported"
        );

        Ok(ExportSummary {
            format: request.format,
            path: request.output.clone(),
            bytes: rendered.bytes.len(),
            pages: rendered.pages,
            skipped,
        })
    }

    fn read_logo(&self, request: &ExportRequest, skipped: &mut Vec<RenderSkip>) -> Option<Vec<u8>> {
        let path: &Path = request
            .logo
            .as_deref()
            .or(self.settings.logo_path.as_deref())?;

        match std::fs::read(path) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                let skip = RenderSkip::new("logo", format!("cannot read {}: {}", path.display(), e));
                tracing::warn!(element = %skip.element, reason = %skip.reason, "Skipping report element");
                skipped.push(skip);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpenseRecord, Money};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn ledger() -> Ledger {
        let mut ledger = Ledger::new();
        ledger.set_initial_fund(Money::from_units(50000)).unwrap();
        ledger
            .add_expense(ExpenseRecord::new(
                NaiveDate::from_ymd_opt(2025, 4, 10).unwrap(),
                Money::from_units(7500),
                "Colación reunión",
            ))
            .unwrap();
        ledger
    }

    #[test]
    fn test_profile_overrides() {
        let mut settings = Settings::default();
        settings.pad_rows = Some(12);
        let service = ExportService::new(&settings);

        let mut request = ExportRequest::new(ExportFormat::Pdf, "out.pdf");
        let profile = service.profile_for(&request);
        assert_eq!(profile.summary, SummaryVariant::Simple);
        assert_eq!(profile.pad_rows, Some(12));
        assert_eq!(profile.signatures.len(), settings.signatures.len());

        request.profile = Some(SummaryVariant::Extended);
        request.landscape = true;
        request.pad_rows = Some(25);
        let profile = service.profile_for(&request);
        assert_eq!(profile.summary, SummaryVariant::Extended);
        assert_eq!(profile.orientation, Orientation::Landscape);
        assert_eq!(profile.pad_rows, Some(25));
    }

    #[test]
    fn test_csv_export_writes_file() {
        let temp_dir = TempDir::new().unwrap();
        let settings = Settings::default();
        let service = ExportService::new(&settings);
        let output = temp_dir.path().join("reportes").join("gastos.csv");

        let summary = service
            .export(&ledger(), &ExportRequest::new(ExportFormat::Csv, &output))
            .unwrap();

        assert_eq!(summary.pages, None);
        let text = std::fs::read_to_string(&output).unwrap();
        assert!(text.contains("Colación reunión"));
        assert_eq!(summary.bytes, text.len());
    }

    #[cfg(feature = "pdf")]
    #[test]
    fn test_pdf_export_with_missing_logo() {
        let temp_dir = TempDir::new().unwrap();
        let mut settings = Settings::default();
        settings.unicode_font_candidates.clear();
        settings.logo_path = Some(temp_dir.path().join("missing.png"));
        let service = ExportService::new(&settings);
        let output = temp_dir.path().join("rendicion.pdf");

        let summary = service
            .export(&ledger(), &ExportRequest::new(ExportFormat::Pdf, &output))
            .unwrap();

        assert_eq!(summary.pages, Some(1));
        assert_eq!(summary.skipped.len(), 1);
        assert_eq!(summary.skipped[0].element, "logo");
        assert!(std::fs::read(&output).unwrap().starts_with(b"%PDF"));
    }

    #[cfg(not(feature = "xlsx"))]
    #[test]
    fn test_disabled_emitter_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let settings = Settings::default();
        let output = temp_dir.path().join("gastos.xlsx");

        let err = ExportService::new(&settings)
            .export(&ledger(), &ExportRequest::new(ExportFormat::Xlsx, &output))
            .unwrap_err();
        assert!(matches!(err, crate::error::RendicionError::DependencyUnavailable(_)));
        assert!(!output.exists());
    }
}
