//! Account ledger
//!
//! This module provides the `Ledger`, which orchestrates every account
//! operation by coordinating the pure rules in [`rules`](crate::core::rules)
//! with an [`AccountStore`].
//!
//! # Operation cycle
//!
//! Each mutating operation is a load–mutate–save cycle on one account:
//! 1. Take the account's lock
//! 2. Load the record from the store
//! 3. Apply the rule to a local copy
//! 4. Save the copy; the store checks the version it was loaded at
//!
//! A rule or save failure discards the copy, so no partial change is ever
//! visible.
//!
//! # Thread Safety
//!
//! Cycles on the same account number are serialized through a per-account
//! mutex kept in a `DashMap`; different accounts proceed in parallel.
//! Account creation is serialized by a separate lock so two creators never
//! compute the same next number. The store's own uniqueness and version
//! checks catch writers that bypass this ledger instance.

use crate::core::config::LedgerConfig;
use crate::core::numbering::next_account_number;
use crate::core::rules;
use crate::core::traits::AccountStore;
use crate::core::validation::validate_user_name;
use crate::types::{Account, AccountNumber, BalanceSummary, LedgerError};
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{info, warn};

/// Ledger enforcing the account state-transition rules over a store
pub struct Ledger<S: AccountStore> {
    store: S,
    config: LedgerConfig,
    /// One mutex per account number that has been touched
    account_locks: DashMap<AccountNumber, Arc<Mutex<()>>>,
    numbering_lock: Mutex<()>,
}

impl<S: AccountStore> Ledger<S> {
    /// Create a ledger over `store` with the default configuration
    pub fn new(store: S) -> Self {
        Self::with_config(store, LedgerConfig::default())
    }

    /// Create a ledger with a custom configuration
    ///
    /// # Arguments
    ///
    /// * `store` - Account store the ledger loads from and saves to
    /// * `config` - Overdraft grant and account number base
    ///
    /// # Returns
    ///
    /// A ledger with an empty lock table; locks are created on first use.
    pub fn with_config(store: S, config: LedgerConfig) -> Self {
        Ledger {
            store,
            config,
            account_locks: DashMap::new(),
            numbering_lock: Mutex::new(()),
        }
    }

    /// The underlying account store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The configuration this ledger was built with
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Open a new account for `user_name`
    ///
    /// The account gets the next free number, a zero balance, no overdraft
    /// and active status.
    ///
    /// # Errors
    ///
    /// - `Validation` if the name is blank or longer than 300 characters
    /// - `Persistence` if the store rejects the new record
    pub fn create(&self, user_name: &str) -> Result<Account, LedgerError> {
        if let Err(e) = validate_user_name(user_name) {
            warn!(error = %e, "account creation rejected");
            return Err(e);
        }

        let _guard = self
            .numbering_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let current_max = self.store.find_max_number()?;
        let number = next_account_number(current_max, self.config.number_base)
            .ok_or_else(|| LedgerError::validation("number", "account number space exhausted"))?;

        let stored = self
            .store
            .save(&Account::new(number, user_name))
            .map_err(|e| {
                warn!(number, error = %e, "account creation failed");
                LedgerError::from(e)
            })?;

        info!(number, "account created");
        Ok(stored)
    }

    /// Load an account by number
    ///
    /// # Errors
    ///
    /// `NotFound` if no account has this number.
    pub fn find(&self, number: AccountNumber) -> Result<Account, LedgerError> {
        self.store
            .find_by_number(number)?
            .ok_or_else(|| LedgerError::not_found(number))
    }

    /// Report balance, overdraft and total balance
    ///
    /// Read-only; works on closed accounts too.
    pub fn balance(&self, number: AccountNumber) -> Result<BalanceSummary, LedgerError> {
        self.find(number).map(|account| account.summary())
    }

    /// Deposit `amount` (zero allowed) into an open account
    pub fn deposit(&self, number: AccountNumber, amount: Decimal) -> Result<Account, LedgerError> {
        self.update(number, "deposit", |account, _| rules::deposit(account, amount))
    }

    /// Grant the overdraft limit; succeeds unchanged if already granted
    pub fn apply_overdraft(&self, number: AccountNumber) -> Result<Account, LedgerError> {
        self.update(number, "apply_overdraft", |account, config| {
            rules::apply_overdraft(account, config.overdraft_grant)
        })
    }

    /// Withdraw `amount`, balance first and overdraft second
    pub fn withdraw(&self, number: AccountNumber, amount: Decimal) -> Result<Account, LedgerError> {
        self.update(number, "withdraw", |account, _| {
            rules::withdraw(account, amount)
        })
    }

    /// Close an open account
    pub fn close(&self, number: AccountNumber) -> Result<Account, LedgerError> {
        self.update(number, "close", |account, _| rules::close(account))
    }

    fn account_lock(&self, number: AccountNumber) -> Arc<Mutex<()>> {
        self.account_locks
            .entry(number)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone()
    }

    /// Run one load–mutate–save cycle under the account's lock
    fn update<F>(
        &self,
        number: AccountNumber,
        operation: &str,
        f: F,
    ) -> Result<Account, LedgerError>
    where
        F: FnOnce(&mut Account, &LedgerConfig) -> Result<(), LedgerError>,
    {
        let lock = self.account_lock(number);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut account = self.find(number)?;

        if let Err(e) = f(&mut account, &self.config) {
            warn!(number, operation, error = %e, "operation rejected");
            return Err(e);
        }

        let stored = self.store.save(&account).map_err(|e| {
            warn!(number, operation, error = %e, "save failed");
            LedgerError::from(e)
        })?;

        info!(
            number,
            operation,
            balance = %stored.balance,
            overdraft = %stored.overdraft,
            "account updated"
        );
        Ok(stored)
    }
}
