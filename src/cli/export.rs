//! CLI commands for report and data export
//!
//! `export` renders the rendition report; `data` moves the ledger itself in
//! and out of its persisted JSON format.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::config::settings::Settings;
use crate::error::RendicionResult;
use crate::export::ExportFormat;
use crate::reports::SummaryVariant;
use crate::services::{ExportRequest, ExportService, LedgerService};
use crate::storage::Storage;

/// Report profile options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ProfileArg {
    /// Fund, total spent, balance and count
    Simple,
    /// Previous-period carry-over and final balance
    Extended,
}

impl From<ProfileArg> for SummaryVariant {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Simple => SummaryVariant::Simple,
            ProfileArg::Extended => SummaryVariant::Extended,
        }
    }
}

/// Options shared by every export format
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output file path
    pub output: PathBuf,

    /// Summary block to print (defaults to the configured profile)
    #[arg(short, long, value_enum)]
    pub profile: Option<ProfileArg>,

    /// Landscape pages (PDF only)
    #[arg(long)]
    pub landscape: bool,

    /// Logo image for the first page (PDF only)
    #[arg(long)]
    pub logo: Option<PathBuf>,

    /// Pad the detail table with empty rows up to this count
    #[arg(long)]
    pub pad_rows: Option<usize>,
}

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Paginated PDF report
    Pdf(ExportArgs),
    /// Spreadsheet with detail and summary sheets
    Xlsx(ExportArgs),
    /// Detail table as CSV
    Csv(ExportArgs),
}

/// Data subcommands
#[derive(Subcommand, Debug)]
pub enum DataCommands {
    /// Replace the ledger with a saved JSON file
    Import {
        /// File to import
        file: PathBuf,
    },
    /// Write the ledger as JSON
    Export {
        /// Output file path
        file: PathBuf,
    },
}

/// Handle export commands
pub fn handle_export_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExportCommands,
) -> RendicionResult<()> {
    let (format, args) = match cmd {
        ExportCommands::Pdf(args) => (ExportFormat::Pdf, args),
        ExportCommands::Xlsx(args) => (ExportFormat::Xlsx, args),
        ExportCommands::Csv(args) => (ExportFormat::Csv, args),
    };

    let request = ExportRequest {
        format,
        output: args.output,
        profile: args.profile.map(SummaryVariant::from),
        landscape: args.landscape,
        logo: args.logo,
        pad_rows: args.pad_rows,
    };

    let ledger = LedgerService::new(storage).load()?;
    let summary = ExportService::new(settings).export(&ledger, &request)?;

    for skip in &summary.skipped {
        eprintln!("Warning: {}", skip);
    }
    match summary.pages {
        Some(pages) => println!(
            "{} report exported to: {} ({} page{})",
            summary.format,
            summary.path.display(),
            pages,
            if pages == 1 { "" } else { "s" }
        ),
        None => println!(
            "{} report exported to: {}",
            summary.format,
            summary.path.display()
        ),
    }

    Ok(())
}

/// Handle data commands
pub fn handle_data_command(storage: &Storage, cmd: DataCommands) -> RendicionResult<()> {
    let service = LedgerService::new(storage);
    let mut ledger = service.load()?;

    match cmd {
        DataCommands::Import { file } => {
            service.import(&mut ledger, &file)?;
            println!(
                "Imported {} expense(s) from: {}",
                ledger.len(),
                file.display()
            );
        }
        DataCommands::Export { file } => {
            service.export_data(&ledger, &file)?;
            println!("Ledger exported to: {}", file.display());
        }
    }

    Ok(())
}
