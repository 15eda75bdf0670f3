//! Command dispatch and console output
//!
//! Maps each [`Command`] to ledger calls and renders the results as
//! human-readable text. Every command except `create` first resolves the
//! account and refuses to work on a closed one.

use crate::cli::args::{CliArgs, Command};
use crate::core::{AccountStore, Ledger};
use crate::store::CsvFileStore;
use crate::types::{Account, AccountNumber, BalanceSummary, LedgerError, StoreError};
use std::io::{self, Write};
use thiserror::Error;

/// Failure of a command, carrying the message shown to the user
#[derive(Debug, Error)]
pub enum CommandError {
    /// The ledger refused the operation
    #[error("{message}")]
    Rejected {
        message: String,
        #[source]
        source: LedgerError,
    },

    /// The account store could not be opened
    #[error("Can't open account store: {0}")]
    Store(#[from] StoreError),

    /// Writing to the output failed
    #[error("Can't write output: {0}")]
    Output(#[from] io::Error),
}

impl CommandError {
    fn rejected(message: impl Into<String>, source: LedgerError) -> Self {
        CommandError::Rejected {
            message: message.into(),
            source,
        }
    }

    /// The underlying ledger error, if the ledger refused the operation
    pub fn ledger_error(&self) -> Option<&LedgerError> {
        match self {
            CommandError::Rejected { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Open the store named in `args` and run its command
pub fn run(args: &CliArgs, output: &mut dyn Write) -> Result<(), CommandError> {
    let store = CsvFileStore::open(&args.store)?;
    let ledger = Ledger::with_config(store, args.to_ledger_config());
    run_command(&ledger, &args.command, output)
}

/// Run one command against a ledger, writing messages to `output`
pub fn run_command<S: AccountStore>(
    ledger: &Ledger<S>,
    command: &Command,
    output: &mut dyn Write,
) -> Result<(), CommandError> {
    match command {
        Command::Create { name } => create(ledger, name, output),
        Command::Balance { number } => {
            let account = current_account(ledger, *number)?;
            write_balance(&account.summary(), output)
        }
        Command::Deposit { number, amount } => {
            current_account(ledger, *number)?;
            let account = ledger
                .deposit(*number, *amount)
                .map_err(|e| CommandError::rejected("Error! Can't deposit fund.", e))?;
            write_balance(&account.summary(), output)?;
            writeln!(
                output,
                "Your fund {} added to your balance successfully...",
                amount
            )?;
            Ok(())
        }
        Command::ApplyOverdraft { number } => apply_overdraft(ledger, *number, output),
        Command::Withdraw { number, amount } => {
            current_account(ledger, *number)?;
            let account = ledger.withdraw(*number, *amount).map_err(|e| {
                CommandError::rejected(
                    "Can't withdraw money!\nPlease check your account balance and overdraft limit.",
                    e,
                )
            })?;
            writeln!(output, "You withdrawn {}", amount)?;
            write_balance(&account.summary(), output)
        }
        Command::Close { number } => {
            current_account(ledger, *number)?;
            let account = ledger
                .close(*number)
                .map_err(|e| CommandError::rejected("Error! Could not close the account", e))?;
            writeln!(output, "{}, Your account has been closed.", account.user_name)?;
            Ok(())
        }
    }
}

fn create<S: AccountStore>(
    ledger: &Ledger<S>,
    name: &str,
    output: &mut dyn Write,
) -> Result<(), CommandError> {
    let account = ledger.create(name).map_err(|e| {
        let message = format!("Error! User account for {} not created! ({})", name, e);
        CommandError::rejected(message, e)
    })?;

    writeln!(output, "User account for {} created successfully...", name)?;
    writeln!(output, "Your account number is : {}", account.number)?;
    writeln!(
        output,
        "Please save it somewhere, so you can use it to access other services."
    )?;
    Ok(())
}

/// Already applied and no-balance are informational outcomes, not errors
fn apply_overdraft<S: AccountStore>(
    ledger: &Ledger<S>,
    number: AccountNumber,
    output: &mut dyn Write,
) -> Result<(), CommandError> {
    let account = current_account(ledger, number)?;

    if !account.overdraft.is_zero() {
        writeln!(output, "Your overdraft is already applied.")?;
    } else {
        match ledger.apply_overdraft(number) {
            Ok(_) => writeln!(output, "Your overdraft applied successfully...")?,
            Err(LedgerError::OverdraftNotEligible { .. }) => {
                writeln!(
                    output,
                    "You do not have enough balance to apply overdraft.\nPlease deposit first."
                )?;
            }
            Err(e) => {
                return Err(CommandError::rejected(
                    "Error! Can't apply overdraft.",
                    e,
                ))
            }
        }
    }

    let summary = ledger
        .balance(number)
        .map_err(|e| CommandError::rejected("Error! Can't find this account!", e))?;
    write_balance(&summary, output)
}

/// Resolve an account and make sure it is still open
fn current_account<S: AccountStore>(
    ledger: &Ledger<S>,
    number: AccountNumber,
) -> Result<Account, CommandError> {
    let account = ledger
        .find(number)
        .map_err(|e| CommandError::rejected("Error! Can't find this account!", e))?;

    if !account.is_active() {
        return Err(CommandError::rejected(
            "This account is closed! Not active anymore.",
            LedgerError::inactive_account(number),
        ));
    }

    Ok(account)
}

fn write_balance(summary: &BalanceSummary, output: &mut dyn Write) -> Result<(), CommandError> {
    writeln!(output, "{} has", summary.user_name)?;
    writeln!(output, "  Balance : {:.2}", summary.balance)?;
    writeln!(output, "  Overdraft limit : {:.2}", summary.overdraft)?;
    writeln!(output, "  Total Balance : {:.2}", summary.total_balance)?;
    Ok(())
}
