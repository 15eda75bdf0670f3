//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Account record, status and balance summary
//! - `error`: Error types for the ledger and its store

pub mod account;
pub mod error;

pub use account::{
    Account, AccountId, AccountNumber, AccountState, AccountStatus, BalanceSummary,
};
pub use error::{LedgerError, StoreError};
