//! Report field and carry-over CLI commands
//!
//! `meta` edits the free-form header fields printed on reports; `resumen`
//! edits the previous-period values used by the extended summary.

use clap::{Args, Subcommand};

use crate::config::settings::Settings;
use crate::display::format_meta;
use crate::error::RendicionResult;
use crate::services::LedgerService;
use crate::storage::Storage;

use super::parse_amount;

/// Report field subcommands
#[derive(Subcommand)]
pub enum MetaCommands {
    /// Set a report field (e.g. `meta set responsable "M. Soto"`)
    Set {
        /// Field name
        key: String,
        /// Field value
        value: String,
    },
    /// Remove a report field
    Unset {
        /// Field name
        key: String,
    },
    /// Show all report fields
    Show,
}

/// Resumen subcommands
#[derive(Subcommand)]
pub enum ResumenCommands {
    /// Set carry-over values; omitted values keep their current amount
    Set(ResumenArgs),
}

#[derive(Args)]
pub struct ResumenArgs {
    /// Balance left at the end of the previous period
    #[arg(long)]
    pub saldo_anterior: Option<String>,
    /// Amount received with the previous rendition
    #[arg(long)]
    pub recibido_anterior: Option<String>,
    /// Transport expense
    #[arg(long)]
    pub traslado: Option<String>,
}

/// Handle a meta command
pub fn handle_meta_command(storage: &Storage, cmd: MetaCommands) -> RendicionResult<()> {
    let service = LedgerService::new(storage);
    let mut ledger = service.load()?;

    match cmd {
        MetaCommands::Set { key, value } => {
            match service.set_meta(&mut ledger, &key, &value)? {
                Some(old) => println!("Updated '{}': '{}' -> '{}'", key, old, value),
                None => println!("Set '{}' to '{}'", key, value),
            }
        }
        MetaCommands::Unset { key } => {
            service.remove_meta(&mut ledger, &key)?;
            println!("Removed '{}'", key);
        }
        MetaCommands::Show => {
            println!("{}", format_meta(&ledger));
        }
    }

    Ok(())
}

/// Handle a resumen command
pub fn handle_resumen_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ResumenCommands,
) -> RendicionResult<()> {
    let service = LedgerService::new(storage);
    let mut ledger = service.load()?;

    match cmd {
        ResumenCommands::Set(args) => {
            let mut inputs = ledger.summary_inputs();
            if let Some(amount) = args.saldo_anterior {
                inputs.previous_balance = parse_amount(&amount)?;
            }
            if let Some(amount) = args.recibido_anterior {
                inputs.previous_received = parse_amount(&amount)?;
            }
            if let Some(amount) = args.traslado {
                inputs.transport_expense = parse_amount(&amount)?;
            }

            service.set_summary_inputs(&mut ledger, inputs)?;
            println!(
                "Saldo final: {}",
                ledger
                    .final_balance()
                    .format_with_symbol(&settings.currency_symbol)
            );
        }
    }

    Ok(())
}
