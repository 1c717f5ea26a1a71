//! User settings for rendicion
//!
//! Manages report preferences: title, currency symbol, logo, fonts,
//! page orientation and the signature boxes printed at the end of a report.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::paths::RendicionPaths;
use crate::error::RendicionError;
use crate::storage::file_io::{read_json, write_json_atomic};
use crate::reports::model::format_date;
use crate::reports::profile::{Orientation, ReportProfile, SignatureSpec, SummaryVariant};

/// One configured signature box
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureSetting {
    /// Caption printed right below the signature rule
    pub caption: String,

    /// Extra lines printed under the caption ("Nombre:", "RUT:", ...)
    #[serde(default)]
    pub detail_lines: Vec<String>,

    /// Optional scanned signature image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<PathBuf>,
}

impl SignatureSetting {
    fn new(caption: &str) -> Self {
        Self {
            caption: caption.to_string(),
            detail_lines: vec!["Nombre:".to_string(), "RUT:".to_string()],
            image_path: None,
        }
    }
}

/// User settings for rendicion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Title printed at the top of every report
    #[serde(default = "default_report_title")]
    pub report_title: String,

    /// Currency symbol used in reports
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format for report cells (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// TrueType fonts tried in order for full Unicode output
    #[serde(default = "default_font_candidates")]
    pub unicode_font_candidates: Vec<PathBuf>,

    /// Institutional logo placed on the first page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_path: Option<PathBuf>,

    /// Summary block used when no profile is given on the command line
    #[serde(default)]
    pub default_profile: SummaryVariant,

    /// Page orientation of the PDF report
    #[serde(default)]
    pub orientation: Orientation,

    /// Pad the detail table with empty rows up to this count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pad_rows: Option<usize>,

    /// Signature boxes, laid out two per row
    #[serde(default = "default_signatures")]
    pub signatures: Vec<SignatureSetting>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_report_title() -> String {
    "Rendición de Gastos menores Fondo Fijo".to_string()
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_font_candidates() -> Vec<PathBuf> {
    vec![
        PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"),
        PathBuf::from("/usr/local/share/fonts/DejaVuSans.ttf"),
        PathBuf::from("fonts/DejaVuSans.ttf"),
    ]
}

fn default_signatures() -> Vec<SignatureSetting> {
    vec![
        SignatureSetting::new("Responsable del fondo"),
        SignatureSetting::new("Revisado por"),
        SignatureSetting::new("V°B° Jefatura"),
        SignatureSetting::new("Aprobado por"),
    ]
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            report_title: default_report_title(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            unicode_font_candidates: default_font_candidates(),
            logo_path: None,
            default_profile: SummaryVariant::default(),
            orientation: Orientation::default(),
            pad_rows: None,
            signatures: default_signatures(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    ///
    /// Defaults are not written back; the caller decides when to persist.
    pub fn load_or_create(paths: &RendicionPaths) -> Result<Self, RendicionError> {
        let settings: Self = read_json(paths.settings_file())?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<(), RendicionError> {
        let sample = NaiveDate::from_ymd_opt(2025, 1, 31);
        if sample.and_then(|d| format_date(d, &self.date_format)).is_none() {
            return Err(RendicionError::Config(format!(
                "Invalid date_format '{}'",
                self.date_format
            )));
        }
        Ok(())
    }

    /// Save settings to disk
    pub fn save(&self, paths: &RendicionPaths) -> Result<(), RendicionError> {
        paths.ensure_directories()?;

        write_json_atomic(paths.settings_file(), self)
    }

    /// Build the report profile these settings describe
    ///
    /// Signature images are read here; an unreadable image only drops the
    /// picture, the box itself is still printed.
    pub fn report_profile(&self, variant: SummaryVariant) -> ReportProfile {
        let mut profile = ReportProfile::for_variant(variant);
        profile.orientation = self.orientation;
        if self.pad_rows.is_some() {
            profile.pad_rows = self.pad_rows;
        }
        profile.signatures = self
            .signatures
            .iter()
            .map(|s| SignatureSpec {
                caption: s.caption.clone(),
                detail_lines: s.detail_lines.clone(),
                image: s.image_path.as_ref().and_then(|path| match std::fs::read(path) {
                    Ok(bytes) => Some(bytes),
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Signature image not readable");
                        None
                    }
                }),
            })
            .collect();
        profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.currency_symbol, "$");
        assert_eq!(settings.default_profile, SummaryVariant::Simple);
        assert_eq!(settings.orientation, Orientation::Portrait);
        assert_eq!(settings.signatures.len(), 4);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = RendicionPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.report_title = "Rendición SLEP Petorca".into();
        settings.orientation = Orientation::Landscape;
        settings.pad_rows = Some(20);

        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.report_title, "Rendición SLEP Petorca");
        assert_eq!(loaded.orientation, Orientation::Landscape);
        assert_eq!(loaded.pad_rows, Some(20));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = RendicionPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"report_title": "Caja chica", "extra": 1}"#)
            .unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.report_title, "Caja chica");
        assert_eq!(loaded.date_format, "%Y-%m-%d");
        assert_eq!(loaded.signatures.len(), 4);
    }

    #[test]
    fn test_invalid_date_format_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = RendicionPaths::with_base_dir(temp_dir.path().to_path_buf());

        for pattern in ["%Q", "%d/%m/%Y %H:%M"] {
            std::fs::write(
                paths.settings_file(),
                format!(r#"{{"date_format": "{}"}}"#, pattern),
            )
            .unwrap();
            let err = Settings::load_or_create(&paths).unwrap_err();
            assert!(matches!(err, RendicionError::Config(_)), "{}", pattern);
        }

        std::fs::write(paths.settings_file(), r#"{"date_format": "%d/%m/%Y"}"#).unwrap();
        assert_eq!(Settings::load_or_create(&paths).unwrap().date_format, "%d/%m/%Y");
    }

    #[test]
    fn test_report_profile_skips_missing_signature_image() {
        let mut settings = Settings::default();
        settings.signatures[0].image_path = Some(PathBuf::from("/nonexistent/firma.png"));
        settings.pad_rows = Some(12);

        let profile = settings.report_profile(SummaryVariant::Extended);
        assert_eq!(profile.summary, SummaryVariant::Extended);
        assert_eq!(profile.pad_rows, Some(12));
        assert_eq!(profile.signatures.len(), 4);
        assert!(profile.signatures[0].image.is_none());
    }
}
