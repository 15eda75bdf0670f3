//! Error types for the bank ledger
//!
//! This module defines the errors returned by ledger operations and by the
//! account store behind it. Every failure is returned as a value; the command
//! layer decides how to present it and which exit code to use.
//!
//! # Error Categories
//!
//! - **Validation Errors**: bad input shape (negative amount, empty or over-long name)
//! - **Lookup Errors**: unknown account number
//! - **State Errors**: closed account, insufficient funds, overdraft not eligible
//! - **Persistence Errors**: store validation, conflicts, file I/O

use crate::types::AccountNumber;
use rust_decimal::Decimal;
use thiserror::Error;

/// Error returned by the account store
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// Record failed the store's field rules
    #[error("Invalid record: {message}")]
    Validation { message: String },

    /// Record clashes with what is already stored
    ///
    /// Raised for duplicate numbers on insert and for stale or unknown
    /// records on update. Safe to retry after reloading.
    #[error("Conflict on account {number}: {reason}")]
    Conflict {
        number: AccountNumber,
        reason: String,
    },

    /// I/O error while reading or writing the backing file
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Backing file content could not be parsed
    #[error("Store format error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    Format { line: Option<u64>, message: String },
}

impl From<std::io::Error> for StoreError {
    fn from(error: std::io::Error) -> Self {
        StoreError::Io {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for StoreError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        StoreError::Format {
            line,
            message: error.to_string(),
        }
    }
}

impl StoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        StoreError::Validation {
            message: message.into(),
        }
    }

    pub fn conflict(number: AccountNumber, reason: impl Into<String>) -> Self {
        StoreError::Conflict {
            number,
            reason: reason.into(),
        }
    }
}

/// Main error type for ledger operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// Input failed validation (negative amount, bad user name)
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// No account with this number exists
    #[error("Account {number} not found")]
    NotFound { number: AccountNumber },

    /// Operation attempted on a closed account
    #[error("Account {number} is closed")]
    InactiveAccount { number: AccountNumber },

    /// Withdrawal exceeds balance plus overdraft
    #[error(
        "Insufficient funds on account {number}: available {available}, requested {requested}"
    )]
    InsufficientFunds {
        number: AccountNumber,
        available: Decimal,
        requested: Decimal,
    },

    /// Overdraft requested on an account without balance
    #[error("Account {number} has no balance to apply an overdraft")]
    OverdraftNotEligible { number: AccountNumber },

    /// Arithmetic overflow would occur
    #[error("Arithmetic overflow in {operation} on account {number}")]
    ArithmeticOverflow {
        operation: String,
        number: AccountNumber,
    },

    /// Store rejected the load or save
    #[error("Persistence failure: {0}")]
    Persistence(#[from] StoreError),
}

impl LedgerError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        LedgerError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn not_found(number: AccountNumber) -> Self {
        LedgerError::NotFound { number }
    }

    pub fn inactive_account(number: AccountNumber) -> Self {
        LedgerError::InactiveAccount { number }
    }

    pub fn insufficient_funds(
        number: AccountNumber,
        available: Decimal,
        requested: Decimal,
    ) -> Self {
        LedgerError::InsufficientFunds {
            number,
            available,
            requested,
        }
    }

    pub fn overdraft_not_eligible(number: AccountNumber) -> Self {
        LedgerError::OverdraftNotEligible { number }
    }

    pub fn arithmetic_overflow(operation: &str, number: AccountNumber) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
            number,
        }
    }
}
