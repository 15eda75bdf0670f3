use crate::core::LedgerConfig;
use crate::types::AccountNumber;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Open and operate bank accounts
#[derive(Parser, Debug)]
#[command(name = "bank-ledger")]
#[command(about = "Open and operate bank accounts from the command line", long_about = None)]
pub struct CliArgs {
    /// CSV file holding the accounts
    #[arg(
        long = "store",
        value_name = "PATH",
        env = "BANK_LEDGER_STORE",
        default_value = "accounts.csv",
        help = "Path to the account store CSV file"
    )]
    pub store: PathBuf,

    /// Log filter used when RUST_LOG is not set
    #[arg(
        long = "log-level",
        value_name = "LEVEL",
        default_value = "warn",
        help = "Log level or filter directive (overridden by RUST_LOG)"
    )]
    pub log_level: String,

    #[arg(
        long = "overdraft-grant",
        value_name = "AMOUNT",
        help = "Overdraft limit granted by apply-overdraft (default: 1000.00)"
    )]
    pub overdraft_grant: Option<Decimal>,

    #[arg(
        long = "number-base",
        value_name = "NUMBER",
        help = "Account numbers are issued above this base (default: 100000)"
    )]
    pub number_base: Option<AccountNumber>,

    #[command(subcommand)]
    pub command: Command,
}

/// Account operations exposed on the command line
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Open a new account; quote names containing spaces
    Create {
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Show balance, overdraft limit and total balance
    Balance {
        #[arg(value_name = "NUMBER")]
        number: AccountNumber,
    },
    /// Deposit funds into an account
    Deposit {
        #[arg(value_name = "NUMBER")]
        number: AccountNumber,
        #[arg(value_name = "AMOUNT", allow_negative_numbers = true)]
        amount: Decimal,
    },
    /// Apply the overdraft limit to an account with a balance
    ApplyOverdraft {
        #[arg(value_name = "NUMBER")]
        number: AccountNumber,
    },
    /// Withdraw funds, using the overdraft when the balance runs out
    Withdraw {
        #[arg(value_name = "NUMBER")]
        number: AccountNumber,
        #[arg(value_name = "AMOUNT", allow_negative_numbers = true)]
        amount: Decimal,
    },
    /// Close an account for good
    Close {
        #[arg(value_name = "NUMBER")]
        number: AccountNumber,
    },
}

impl CliArgs {
    /// Create a LedgerConfig from CLI arguments
    ///
    /// Values not given on the command line fall back to the defaults.
    ///
    /// # Returns
    ///
    /// A LedgerConfig with:
    /// - overdraft_grant from --overdraft-grant, or 1000.00
    /// - number_base from --number-base, or 100000
    pub fn to_ledger_config(&self) -> LedgerConfig {
        if self.overdraft_grant.is_some() || self.number_base.is_some() {
            let default = LedgerConfig::default();
            LedgerConfig::new(
                self.overdraft_grant.unwrap_or(default.overdraft_grant),
                self.number_base.unwrap_or(default.number_base),
            )
        } else {
            LedgerConfig::default()
        }
    }
}
