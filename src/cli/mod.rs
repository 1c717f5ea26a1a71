//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod expense;
pub mod export;
pub mod fund;
pub mod meta;

pub use expense::{handle_expense_command, ExpenseCommands};
pub use export::{handle_data_command, handle_export_command, DataCommands, ExportCommands};
pub use fund::{handle_fund_command, handle_summary_command, FundCommands};
pub use meta::{handle_meta_command, handle_resumen_command, MetaCommands, ResumenCommands};

use crate::error::{RendicionError, RendicionResult};
use crate::models::Money;

/// Parse a user-entered amount; negative amounts are rejected
pub(crate) fn parse_amount(input: &str) -> RendicionResult<Money> {
    let amount = Money::parse(input).map_err(|e| RendicionError::Validation(e.to_string()))?;
    if amount.is_negative() {
        return Err(RendicionError::Validation(format!(
            "Amount cannot be negative: {}",
            input.trim()
        )));
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("$12.500").unwrap(), Money::from_units(12500));
        assert_eq!(parse_amount(" 990 ").unwrap(), Money::from_units(990));
        assert!(parse_amount("-5").unwrap_err().is_validation());
        assert!(parse_amount("doce").unwrap_err().is_validation());
    }
}
