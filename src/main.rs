use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rendicion::cli::{
    handle_data_command, handle_expense_command, handle_export_command, handle_fund_command,
    handle_meta_command, handle_resumen_command, handle_summary_command,
};
use rendicion::config::{paths::RendicionPaths, settings::Settings};
use rendicion::storage::Storage;

/// Environment variable holding the log filter
const LOG_ENV: &str = "RENDICION_LOG";

#[derive(Parser)]
#[command(
    name = "rendicion",
    author = "Kaylee Beyene",
    version,
    about = "Petty-cash expense ledger with PDF and spreadsheet rendition reports",
    long_about = "rendicion keeps the expenses paid from a fixed petty-cash fund \
                  and produces the rendición de gastos report: a PDF with the \
                  detail table, summary and signature boxes, or a spreadsheet."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initial fund commands
    #[command(subcommand)]
    Fund(rendicion::cli::FundCommands),

    /// Expense management commands
    #[command(subcommand, alias = "gasto")]
    Expense(rendicion::cli::ExpenseCommands),

    /// Report header fields
    #[command(subcommand)]
    Meta(rendicion::cli::MetaCommands),

    /// Previous-period values for the extended summary
    #[command(subcommand)]
    Resumen(rendicion::cli::ResumenCommands),

    /// Show fund, totals and balance
    Summary,

    /// Export the rendition report
    #[command(subcommand)]
    Export(rendicion::cli::ExportCommands),

    /// Import or export the ledger data file
    #[command(subcommand)]
    Data(rendicion::cli::DataCommands),

    /// Show current configuration and paths
    Config,
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = RendicionPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let storage = Storage::new(paths.clone())?;

    match cli.command {
        Some(Commands::Fund(cmd)) => handle_fund_command(&storage, &settings, cmd)?,
        Some(Commands::Expense(cmd)) => handle_expense_command(&storage, &settings, cmd)?,
        Some(Commands::Meta(cmd)) => handle_meta_command(&storage, cmd)?,
        Some(Commands::Resumen(cmd)) => handle_resumen_command(&storage, &settings, cmd)?,
        Some(Commands::Summary) => handle_summary_command(&storage, &settings)?,
        Some(Commands::Export(cmd)) => handle_export_command(&storage, &settings, cmd)?,
        Some(Commands::Data(cmd)) => handle_data_command(&storage, cmd)?,
        Some(Commands::Config) => {
            if !paths.settings_file().exists() {
                settings.save(&paths)?;
            }
            println!("rendicion configuration");
            println!("=======================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Settings file:  {}", paths.settings_file().display());
            println!("Ledger file:    {}", paths.ledger_file().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Report title:    {}", settings.report_title);
            println!("  Default profile: {}", settings.default_profile);
            println!("  Orientation:     {:?}", settings.orientation);
            println!(
                "  Logo:            {}",
                settings
                    .logo_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(none)".to_string())
            );
            println!("  Signatures:      {}", settings.signatures.len());
        }
        None => {
            println!("rendicion - petty-cash expense rendition");
            println!();
            println!("Run 'rendicion --help' for usage information.");
        }
    }

    Ok(())
}
