//! Core traits for account persistence
//!
//! The ledger talks to storage only through [`AccountStore`], which lets the
//! state-transition logic run against the in-memory store in tests and the
//! CSV file store from the command line.

use crate::types::{Account, AccountNumber, StoreError};

/// Trait for loading and saving account records
///
/// Implementations must be safe to share across threads. The store is
/// authoritative for uniqueness: `save` must reject a new record whose number
/// is already taken and an update whose `version` no longer matches the
/// stored one.
pub trait AccountStore: Send + Sync {
    /// Load an account by its number
    fn find_by_number(&self, number: AccountNumber) -> Result<Option<Account>, StoreError>;

    /// Highest account number stored so far, `None` if the store is empty
    fn find_max_number(&self) -> Result<Option<AccountNumber>, StoreError>;

    /// Insert (`id == None`) or update an account
    ///
    /// Returns the record as stored, with identity, timestamps and version
    /// filled in by the store.
    ///
    /// # Errors
    ///
    /// - `Validation` if the record breaks a field rule
    /// - `Conflict` on a duplicate number, a stale version or an unknown record
    /// - `Io` / `Format` if a file-backed store cannot be written
    fn save(&self, account: &Account) -> Result<Account, StoreError>;
}
