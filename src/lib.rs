//! Bank Ledger Library
//! # Overview
//!
//! This library models a single bank account's ledger: creation, balance
//! inquiry, deposit, withdrawal, overdraft activation and closure.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Account, BalanceSummary, errors)
//! - [`core`] - Business logic components:
//!   - [`core::rules`] - Pure account state-transition rules
//!   - [`core::ledger`] - Load–mutate–save orchestration with per-account locking
//!   - [`core::traits`] - The `AccountStore` persistence abstraction
//! - [`store`] - In-memory and CSV file stores
//! - [`cli`] - CLI arguments parsing and command output
//!
//! # Operations
//!
//! - **Create**: Open an account with the next free number and a zero balance
//! - **Balance**: Report balance, overdraft limit and total balance
//! - **Deposit**: Credit funds to an open account
//! - **Apply overdraft**: Grant the fixed overdraft limit to an account with a balance
//! - **Withdraw**: Debit funds from the balance first, then from the overdraft
//! - **Close**: Close an account; closed accounts accept no further changes
//!
//! # Account States
//!
//! Each account is in one of three states:
//! - `OpenNoOverdraft`: active, no overdraft limit left
//! - `OpenWithOverdraft`: active, with a nonzero overdraft limit
//! - `Closed`: terminal, read-only

// Module declarations
pub mod cli;
pub mod core;
pub mod store;
pub mod types;

pub use core::{AccountStore, Ledger, LedgerConfig};
pub use store::{CsvFileStore, InMemoryStore};
pub use types::{
    Account, AccountNumber, AccountState, AccountStatus, BalanceSummary, LedgerError, StoreError,
};
