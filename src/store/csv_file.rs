//! CSV file account store
//!
//! Persists accounts to a single CSV file so state survives between command
//! invocations. The whole file is loaded on open and rewritten after every
//! successful save: rows go to a sibling temporary file which is then renamed
//! over the original, so a crash never leaves a half-written store behind.
//!
//! Amounts are kept as strings in the row and parsed with
//! `Decimal::from_str`, which preserves their exact scale.
//!
//! The file is not locked against other processes; one process at a time is
//! expected to own it.

use crate::core::traits::AccountStore;
use crate::core::validation::validate_record;
use crate::store::memory::InMemoryStore;
use crate::types::{Account, AccountId, AccountNumber, AccountStatus, StoreError};
use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, WriterBuilder};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info};

/// One account as stored in the CSV file
///
/// Columns: id, number, user_name, balance, overdraft, active, created,
/// updated, version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRow {
    pub id: AccountId,
    pub number: AccountNumber,
    pub user_name: String,
    pub balance: String,
    pub overdraft: String,
    pub active: bool,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
    pub version: u64,
}

impl AccountRow {
    /// Convert a stored account into its CSV row
    ///
    /// Only saved accounts (with an id) are ever written.
    pub fn from_account(account: &Account) -> Self {
        AccountRow {
            id: account.id.unwrap_or_default(),
            number: account.number,
            user_name: account.user_name.clone(),
            balance: account.balance.to_string(),
            overdraft: account.overdraft.to_string(),
            active: account.is_active(),
            created: account.created,
            updated: account.updated,
            version: account.version,
        }
    }

    /// Convert a CSV row back into an account
    ///
    /// `line` is used for error messages only.
    pub fn into_account(self, line: Option<u64>) -> Result<Account, StoreError> {
        let balance = parse_amount(&self.balance, "balance", line)?;
        let overdraft = parse_amount(&self.overdraft, "overdraft", line)?;

        Ok(Account {
            id: Some(self.id),
            number: self.number,
            user_name: self.user_name,
            balance,
            overdraft,
            status: if self.active {
                AccountStatus::Active
            } else {
                AccountStatus::Closed
            },
            created: self.created,
            updated: self.updated,
            version: self.version,
        })
    }
}

fn parse_amount(value: &str, field: &str, line: Option<u64>) -> Result<Decimal, StoreError> {
    Decimal::from_str(value.trim()).map_err(|_| StoreError::Format {
        line,
        message: format!("invalid {} '{}'", field, value),
    })
}

/// Account store backed by a CSV file
#[derive(Debug)]
pub struct CsvFileStore {
    path: PathBuf,
    accounts: InMemoryStore,
    /// Serializes save + file rewrite so the file always matches memory
    write_lock: Mutex<()>,
}

impl CsvFileStore {
    /// Open the store at `path`
    ///
    /// A missing file is treated as an empty store; it is created on the
    /// first save.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file exists but cannot be read, and `Format` if a
    /// row cannot be parsed, breaks an account invariant, or repeats the
    /// number or id of an earlier row.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let accounts = if path.exists() {
            let loaded = read_accounts(&path)?;
            info!(path = %path.display(), accounts = loaded.len(), "loaded account store");
            InMemoryStore::from_accounts(loaded)?
        } else {
            debug!(path = %path.display(), "store file not found, starting empty");
            InMemoryStore::new()
        };

        Ok(Self {
            path,
            accounts,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All stored accounts sorted by account number
    pub fn all_accounts(&self) -> Vec<Account> {
        self.accounts.all_accounts()
    }

    fn write_file(&self) -> Result<(), StoreError> {
        let tmp_path = self.path.with_extension("csv.tmp");

        {
            let file = File::create(&tmp_path)?;
            let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);
            for account in self.accounts.all_accounts() {
                writer.serialize(AccountRow::from_account(&account))?;
            }
            writer.flush()?;
        }

        fs::rename(&tmp_path, &self.path)?;
        debug!(path = %self.path.display(), "wrote account store");
        Ok(())
    }
}

fn format_error(line: Option<u64>, message: String) -> StoreError {
    StoreError::Format { line, message }
}

/// Read and check every row of the store file
///
/// Line numbers come from the CSV reader, so they stay right when a quoted
/// user name spans several lines.
fn read_accounts(path: &Path) -> Result<Vec<Account>, StoreError> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let headers = reader.headers()?.clone();

    let mut accounts = Vec::new();
    let mut numbers = HashSet::new();
    let mut ids = HashSet::new();

    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|pos| pos.line());
        let row: AccountRow = record.deserialize(Some(&headers))?;
        let account = row.into_account(line)?;

        validate_record(&account).map_err(|e| format_error(line, e.to_string()))?;

        if !numbers.insert(account.number) {
            return Err(format_error(
                line,
                format!("duplicate account number {}", account.number),
            ));
        }

        let id = account.id.unwrap_or_default();
        if !ids.insert(id) {
            return Err(format_error(line, format!("duplicate account id {}", id)));
        }
        if id == AccountId::MAX {
            return Err(format_error(
                line,
                format!("account id {} leaves no room for new accounts", id),
            ));
        }

        accounts.push(account);
    }
    Ok(accounts)
}

impl AccountStore for CsvFileStore {
    fn find_by_number(&self, number: AccountNumber) -> Result<Option<Account>, StoreError> {
        self.accounts.find_by_number(number)
    }

    fn find_max_number(&self) -> Result<Option<AccountNumber>, StoreError> {
        self.accounts.find_max_number()
    }

    fn save(&self, account: &Account) -> Result<Account, StoreError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let previous = self.accounts.find_by_number(account.number)?;
        let stored = self.accounts.save(account)?;

        if let Err(e) = self.write_file() {
            self.accounts.restore(account.number, previous);
            return Err(e);
        }

        Ok(stored)
    }
}
