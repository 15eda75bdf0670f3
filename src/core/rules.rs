//! Account state-transition rules
//!
//! Pure functions that apply one operation to an in-memory [`Account`]. They
//! check every precondition and compute the new field values before writing
//! any of them, so a rejected operation leaves the account untouched.
//!
//! Persistence and locking live in [`Ledger`](crate::core::Ledger); these
//! rules know nothing about the store.

use crate::core::validation::validate_amount;
use crate::types::{Account, AccountStatus, LedgerError};
use rust_decimal::Decimal;

fn ensure_active(account: &Account) -> Result<(), LedgerError> {
    if account.is_active() {
        Ok(())
    } else {
        Err(LedgerError::inactive_account(account.number))
    }
}

/// Credit `amount` to the account balance
///
/// A zero amount is accepted and changes nothing.
///
/// # Errors
///
/// - `InactiveAccount` if the account is closed
/// - `Validation` if `amount` is negative
/// - `ArithmeticOverflow` if the balance would overflow
pub fn deposit(account: &mut Account, amount: Decimal) -> Result<(), LedgerError> {
    ensure_active(account)?;
    validate_amount(amount)?;

    let new_balance = account
        .balance
        .checked_add(amount)
        .ok_or_else(|| LedgerError::arithmetic_overflow("deposit", account.number))?;

    account.balance = new_balance;
    Ok(())
}

/// Grant the overdraft limit
///
/// Succeeds without change when an overdraft is already in place. Otherwise
/// the account must currently hold a nonzero balance.
///
/// # Errors
///
/// - `InactiveAccount` if the account is closed
/// - `OverdraftNotEligible` if balance and overdraft are both zero
pub fn apply_overdraft(account: &mut Account, grant: Decimal) -> Result<(), LedgerError> {
    ensure_active(account)?;

    if !account.overdraft.is_zero() {
        return Ok(());
    }

    if account.balance.is_zero() {
        return Err(LedgerError::overdraft_not_eligible(account.number));
    }

    account.overdraft = grant;
    Ok(())
}

/// Debit `amount`, drawing on the balance first and the overdraft second
///
/// The balance and the overdraft together must cover the whole amount;
/// there are no partial withdrawals.
///
/// # Errors
///
/// - `InactiveAccount` if the account is closed
/// - `Validation` if `amount` is negative
/// - `InsufficientFunds` if balance and overdraft are both zero, or if the
///   amount exceeds their sum
pub fn withdraw(account: &mut Account, amount: Decimal) -> Result<(), LedgerError> {
    ensure_active(account)?;
    validate_amount(amount)?;

    let available = account
        .balance
        .checked_add(account.overdraft)
        .ok_or_else(|| LedgerError::arithmetic_overflow("withdrawal", account.number))?;

    if available.is_zero() || amount > available {
        return Err(LedgerError::insufficient_funds(
            account.number,
            available,
            amount,
        ));
    }

    let (new_balance, new_overdraft) = if amount <= account.balance {
        (account.balance - amount, account.overdraft)
    } else {
        let shortfall = amount - account.balance;
        (Decimal::ZERO, account.overdraft - shortfall)
    };

    account.balance = new_balance;
    account.overdraft = new_overdraft;
    Ok(())
}

/// Close the account; terminal
///
/// # Errors
///
/// `InactiveAccount` if the account is already closed.
pub fn close(account: &mut Account) -> Result<(), LedgerError> {
    ensure_active(account)?;
    account.status = AccountStatus::Closed;
    Ok(())
}
