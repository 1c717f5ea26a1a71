//! Fund CLI commands
//!
//! Initial fund and totals.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::format_summary;
use crate::error::RendicionResult;
use crate::models::Money;
use crate::services::LedgerService;
use crate::storage::Storage;

use super::parse_amount;

/// Fund subcommands
#[derive(Subcommand)]
pub enum FundCommands {
    /// Set the initial fund of the period
    Set {
        /// Amount (e.g. "150000" or "$150.000")
        amount: String,
    },
    /// Show the initial fund
    Show,
}

/// Handle a fund command
pub fn handle_fund_command(
    storage: &Storage,
    settings: &Settings,
    cmd: FundCommands,
) -> RendicionResult<()> {
    let service = LedgerService::new(storage);
    let mut ledger = service.load()?;

    match cmd {
        FundCommands::Set { amount } => {
            let amount = parse_amount(&amount)?;
            service.set_initial_fund(&mut ledger, amount)?;
            println!(
                "Initial fund set to {}",
                amount.format_with_symbol(&settings.currency_symbol)
            );
        }
        FundCommands::Show => {
            println!(
                "Initial fund: {}",
                ledger.initial_fund().format_with_symbol(&settings.currency_symbol)
            );
        }
    }

    Ok(())
}

/// Print fund, totals and carry-over values
pub fn handle_summary_command(storage: &Storage, settings: &Settings) -> RendicionResult<()> {
    let ledger = LedgerService::new(storage).load()?;
    println!("{}", format_summary(&ledger, &settings.currency_symbol));

    let balance = ledger.compute_totals().balance;
    if balance < Money::zero() {
        println!();
        println!(
            "Warning: expenses exceed the initial fund by {}",
            (-balance).format_with_symbol(&settings.currency_symbol)
        );
    }
    Ok(())
}
