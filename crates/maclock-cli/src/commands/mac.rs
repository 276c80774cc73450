//! MAC address helper commands.

use clap::{Args, Subcommand};
use serde::Serialize;

use crate::output::{self, OutputFormat};
use maclock_core::error::AppError;
use plugin_mac_lock::mac_not_in_db;

/// Arguments for mac commands
#[derive(Debug, Args)]
pub struct MacArgs {
    /// Mac subcommand
    #[command(subcommand)]
    pub command: MacCommand,
}

/// Mac subcommands
#[derive(Debug, Subcommand)]
pub enum MacCommand {
    /// Evaluate `mac_not_in_db` for two addresses
    Compare {
        /// First address
        address_a: String,
        /// Second address
        address_b: String,
    },
}

/// Result of a `mac compare` run
#[derive(Debug, Serialize)]
struct CompareReport {
    address_a: String,
    address_b: String,
    mac_not_in_db: bool,
}

/// Execute mac commands
pub fn execute(args: &MacArgs, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        MacCommand::Compare {
            address_a,
            address_b,
        } => {
            let report = CompareReport {
                address_a: address_a.clone(),
                address_b: address_b.clone(),
                mac_not_in_db: mac_not_in_db(address_a, address_b),
            };
            output::print_item(&report, format);
        }
    }

    Ok(())
}
