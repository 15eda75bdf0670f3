//! Thread-safe in-memory account store
//!
//! `InMemoryStore` keeps account records in a `DashMap` keyed by account
//! number. The shard lock taken by `entry` / `get_mut` makes each
//! check-and-write in `save` atomic, which is what the uniqueness and
//! optimistic-version checks rely on.

use crate::core::traits::AccountStore;
use crate::core::validation::validate_record;
use crate::types::{Account, AccountId, AccountNumber, StoreError};
use chrono::Utc;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Account store held entirely in memory
#[derive(Debug)]
pub struct InMemoryStore {
    accounts: DashMap<AccountNumber, Account>,
    next_id: AtomicU64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Build a store from records that were already saved elsewhere
    ///
    /// The next identity continues after the highest one seen.
    ///
    /// # Arguments
    ///
    /// * `accounts` - Saved records; each must carry a unique number
    ///
    /// # Errors
    ///
    /// Returns `Format` if two records share an account number, or if the
    /// highest identity leaves no room for another one.
    pub fn from_accounts(
        accounts: impl IntoIterator<Item = Account>,
    ) -> Result<Self, StoreError> {
        let store = Self::new();
        let mut max_id: AccountId = 0;
        for account in accounts {
            max_id = max_id.max(account.id.unwrap_or(0));
            let number = account.number;
            if store.accounts.insert(number, account).is_some() {
                return Err(StoreError::Format {
                    line: None,
                    message: format!("duplicate account number {}", number),
                });
            }
        }

        let next_id = max_id.checked_add(1).ok_or_else(|| StoreError::Format {
            line: None,
            message: format!("account id {} leaves no room for new accounts", max_id),
        })?;
        store.next_id.store(next_id, Ordering::SeqCst);
        Ok(store)
    }

    /// All stored accounts sorted by account number
    pub fn all_accounts(&self) -> Vec<Account> {
        let mut accounts: Vec<Account> = self
            .accounts
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        accounts.sort_by_key(|account| account.number);
        accounts
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Put back the record that was stored before a save
    ///
    /// Used by file-backed stores to undo an in-memory save when writing the
    /// file fails.
    pub(crate) fn restore(&self, number: AccountNumber, previous: Option<Account>) {
        match previous {
            Some(account) => {
                self.accounts.insert(number, account);
            }
            None => {
                self.accounts.remove(&number);
            }
        }
    }

    fn allocate_id(&self, number: AccountNumber) -> Result<AccountId, StoreError> {
        self.next_id
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |id| id.checked_add(1))
            .map_err(|_| StoreError::conflict(number, "account id sequence exhausted"))
    }

    fn insert_new(&self, account: &Account) -> Result<Account, StoreError> {
        // an id taken by a losing insert is simply skipped
        let id = self.allocate_id(account.number)?;
        let mut inserted = None;

        // vacancy check and insert happen under one entry lock
        let _entry = self.accounts.entry(account.number).or_insert_with(|| {
            let now = Utc::now();
            let mut stored = account.clone();
            stored.id = Some(id);
            stored.created = Some(now);
            stored.updated = Some(now);
            stored.version = 1;
            inserted = Some(stored.clone());
            stored
        });

        match inserted {
            Some(stored) => {
                debug!(number = stored.number, id = ?stored.id, "inserted account");
                Ok(stored)
            }
            None => Err(StoreError::conflict(
                account.number,
                "account number already exists",
            )),
        }
    }

    fn update_existing(&self, id: AccountId, account: &Account) -> Result<Account, StoreError> {
        let mut entry = self
            .accounts
            .get_mut(&account.number)
            .ok_or_else(|| StoreError::conflict(account.number, "no stored record to update"))?;

        if entry.id != Some(id) {
            return Err(StoreError::conflict(
                account.number,
                "record identity does not match the stored account",
            ));
        }

        if entry.version != account.version {
            return Err(StoreError::conflict(
                account.number,
                format!(
                    "stale version {} (stored version is {})",
                    account.version, entry.version
                ),
            ));
        }

        let mut stored = account.clone();
        stored.created = entry.created;
        stored.updated = Some(Utc::now());
        stored.version = entry.version + 1;
        *entry = stored.clone();
        debug!(number = stored.number, version = stored.version, "updated account");
        Ok(stored)
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountStore for InMemoryStore {
    fn find_by_number(&self, number: AccountNumber) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.get(&number).map(|entry| entry.value().clone()))
    }

    fn find_max_number(&self) -> Result<Option<AccountNumber>, StoreError> {
        Ok(self.accounts.iter().map(|entry| *entry.key()).max())
    }

    fn save(&self, account: &Account) -> Result<Account, StoreError> {
        validate_record(account).map_err(|e| StoreError::validation(e.to_string()))?;

        match account.id {
            None => self.insert_new(account),
            Some(id) => self.update_existing(id, account),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_store_is_empty() {
        let store = InMemoryStore::new();
        assert!(store.is_empty());
        assert_eq!(store.find_max_number().unwrap(), None);
        assert_eq!(store.find_by_number(100_001).unwrap(), None);
    }

    #[test]
    fn test_insert_assigns_identity_and_version() {
        let store = InMemoryStore::new();

        let stored = store.save(&Account::new(100_001, "Alice")).unwrap();

        assert_eq!(stored.id, Some(1));
        assert_eq!(stored.version, 1);
        assert!(stored.created.is_some());
        assert_eq!(stored.created, stored.updated);
        assert_eq!(store.find_by_number(100_001).unwrap(), Some(stored));
    }

    #[test]
    fn test_insert_duplicate_number_conflicts() {
        let store = InMemoryStore::new();
        store.save(&Account::new(100_001, "Alice")).unwrap();

        let result = store.save(&Account::new(100_001, "Bob"));

        assert!(matches!(result, Err(StoreError::Conflict { number: 100_001, .. })));
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.find_by_number(100_001).unwrap().unwrap().user_name,
            "Alice"
        );
    }

    #[test]
    fn test_insert_invalid_record_rejected() {
        let store = InMemoryStore::new();

        let result = store.save(&Account::new(100_001, ""));

        assert!(matches!(result, Err(StoreError::Validation { .. })));
        assert!(store.is_empty());
    }

    #[test]
    fn test_update_bumps_version_and_keeps_created() {
        let store = InMemoryStore::new();
        let mut account = store.save(&Account::new(100_001, "Alice")).unwrap();
        account.balance = dec!(250);

        let updated = store.save(&account).unwrap();

        assert_eq!(updated.version, 2);
        assert_eq!(updated.created, account.created);
        assert_eq!(updated.balance, dec!(250));
    }

    #[test]
    fn test_stale_update_conflicts() {
        let store = InMemoryStore::new();
        let original = store.save(&Account::new(100_001, "Alice")).unwrap();

        let mut first = original.clone();
        first.balance = dec!(100);
        store.save(&first).unwrap();

        let mut second = original;
        second.balance = dec!(999);
        let result = store.save(&second);

        assert!(matches!(result, Err(StoreError::Conflict { .. })));
        assert_eq!(
            store.find_by_number(100_001).unwrap().unwrap().balance,
            dec!(100)
        );
    }

    #[test]
    fn test_update_unknown_record_conflicts() {
        let store = InMemoryStore::new();
        let mut account = Account::new(100_001, "Alice");
        account.id = Some(7);

        assert!(matches!(
            store.save(&account),
            Err(StoreError::Conflict { .. })
        ));
    }

    #[test]
    fn test_find_max_number() {
        let store = InMemoryStore::new();
        for number in [100_003, 100_001, 100_002] {
            store.save(&Account::new(number, "x")).unwrap();
        }
        assert_eq!(store.find_max_number().unwrap(), Some(100_003));
    }

    #[test]
    fn test_from_accounts_continues_identity_sequence() {
        let mut existing = Account::new(100_001, "Alice");
        existing.id = Some(41);
        existing.version = 3;
        let store = InMemoryStore::from_accounts(vec![existing]).unwrap();

        let stored = store.save(&Account::new(100_002, "Bob")).unwrap();

        assert_eq!(stored.id, Some(42));
        assert_eq!(store.all_accounts().len(), 2);
    }

    #[test]
    fn test_from_accounts_rejects_duplicate_numbers() {
        let mut alice = Account::new(100_001, "Alice");
        alice.id = Some(1);
        let mut bob = Account::new(100_001, "Bob");
        bob.id = Some(2);

        let result = InMemoryStore::from_accounts(vec![alice, bob]);

        assert!(matches!(result, Err(StoreError::Format { line: None, .. })));
    }

    #[test]
    fn test_from_accounts_rejects_exhausted_identity_sequence() {
        let mut existing = Account::new(100_001, "Alice");
        existing.id = Some(AccountId::MAX);

        let result = InMemoryStore::from_accounts(vec![existing]);

        assert!(matches!(result, Err(StoreError::Format { .. })));
    }

    #[test]
    fn test_insert_fails_when_identity_sequence_is_exhausted() {
        let store = InMemoryStore::new();
        store.next_id.store(AccountId::MAX, Ordering::SeqCst);

        let result = store.save(&Account::new(100_001, "Alice"));

        assert!(matches!(result, Err(StoreError::Conflict { number: 100_001, .. })));
        assert!(store.is_empty());
    }

    #[test]
    fn test_restore_undoes_save() {
        let store = InMemoryStore::new();
        let original = store.save(&Account::new(100_001, "Alice")).unwrap();
        let mut changed = original.clone();
        changed.balance = dec!(10);
        store.save(&changed).unwrap();

        store.restore(100_001, Some(original.clone()));
        assert_eq!(store.find_by_number(100_001).unwrap(), Some(original));

        store.restore(100_001, None);
        assert!(store.is_empty());
    }
}
