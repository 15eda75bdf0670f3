//! Core business logic module
//!
//! This module contains the account ledger components:
//! - `rules` - Pure state-transition rules applied to one account
//! - `validation` - Field validation shared by the ledger and the stores
//! - `numbering` - Next account number policy
//! - `traits` - The `AccountStore` persistence abstraction
//! - `ledger` - Load–mutate–save orchestration with per-account locking
//! - `config` - Ledger configuration (overdraft grant, number base)

pub mod config;
pub mod ledger;
pub mod numbering;
pub mod rules;
pub mod traits;
pub mod validation;

pub use config::LedgerConfig;
pub use ledger::Ledger;
pub use traits::AccountStore;
