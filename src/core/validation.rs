//! Field validation
//!
//! Pure checks on user input and account fields. The ledger runs these before
//! touching the store, and the store runs [`validate_record`] again before
//! accepting a save, so neither side depends on the other for correctness.

use crate::types::account::MAX_USER_NAME_LEN;
use crate::types::{Account, LedgerError};
use rust_decimal::Decimal;

/// Check a user name: required (not blank) and at most 300 characters
pub fn validate_user_name(user_name: &str) -> Result<(), LedgerError> {
    if user_name.trim().is_empty() {
        return Err(LedgerError::validation("user_name", "must not be empty"));
    }

    let len = user_name.chars().count();
    if len > MAX_USER_NAME_LEN {
        return Err(LedgerError::validation(
            "user_name",
            format!(
                "must be at most {} characters, got {}",
                MAX_USER_NAME_LEN, len
            ),
        ));
    }

    Ok(())
}

/// Check a deposit or withdrawal amount
pub fn validate_amount(amount: Decimal) -> Result<(), LedgerError> {
    if amount < Decimal::ZERO {
        return Err(LedgerError::validation(
            "amount",
            format!("must not be negative, got {}", amount),
        ));
    }
    Ok(())
}

/// Check every field rule a stored record must satisfy
pub fn validate_record(account: &Account) -> Result<(), LedgerError> {
    if account.number == 0 {
        return Err(LedgerError::validation("number", "must be positive"));
    }
    validate_user_name(&account.user_name)?;
    if account.balance < Decimal::ZERO {
        return Err(LedgerError::validation("balance", "must not be negative"));
    }
    if account.overdraft < Decimal::ZERO {
        return Err(LedgerError::validation("overdraft", "must not be negative"));
    }
    Ok(())
}
