//! Account-related types for the bank ledger
//!
//! This module defines the Account record, its lifecycle status and the
//! read-only balance summary handed to the command layer.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Externally visible account number
///
/// Assigned once at creation and never changed.
pub type AccountNumber = u64;

/// Opaque persistent identity assigned by the store
pub type AccountId = u64;

/// Account numbers are issued above this base; the first account gets base + 1
pub const ACCOUNT_NUMBER_BASE: AccountNumber = 100_000;

/// Fixed overdraft limit granted by `apply_overdraft`
pub const OVERDRAFT_GRANT: Decimal = dec!(1000.00);

/// Maximum user name length, counted in characters
pub const MAX_USER_NAME_LEN: usize = 300;

/// Lifecycle status of an account
///
/// `Closed` is terminal: no transition leads out of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountStatus {
    Active,
    Closed,
}

/// State category of an account as seen by the ledger's state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountState {
    /// Active, no overdraft limit remaining
    OpenNoOverdraft,
    /// Active, with a nonzero overdraft limit
    OpenWithOverdraft,
    /// Closed, read-only from now on
    Closed,
}

/// A single bank account record
///
/// `id`, `created`, `updated` and `version` belong to the store: the ledger
/// never reads them except to hand the record back for saving.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// Store identity, `None` until the record has been saved once
    pub id: Option<AccountId>,

    /// Unique account number
    pub number: AccountNumber,

    /// Name of the account holder
    pub user_name: String,

    /// Funds owned by the account holder, never negative
    pub balance: Decimal,

    /// Remaining overdraft limit
    ///
    /// Zero means no overdraft is granted. Applying an overdraft sets it to
    /// the grant amount and withdrawals past the balance consume it.
    pub overdraft: Decimal,

    /// Whether the account is still open
    pub status: AccountStatus,

    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,

    /// Optimistic concurrency token, bumped by the store on every save
    pub version: u64,
}

impl Account {
    /// Create a new, unsaved account
    ///
    /// # Arguments
    ///
    /// * `number` - The account number assigned by the ledger
    /// * `user_name` - Name of the account holder
    ///
    /// # Returns
    ///
    /// An Account with:
    /// - balance = 0
    /// - overdraft = 0
    /// - status = Active
    /// - no id, timestamps or version until the store saves it
    pub fn new(number: AccountNumber, user_name: impl Into<String>) -> Self {
        Account {
            id: None,
            number,
            user_name: user_name.into(),
            balance: Decimal::ZERO,
            overdraft: Decimal::ZERO,
            status: AccountStatus::Active,
            created: None,
            updated: None,
            version: 0,
        }
    }

    /// Check if the account is still open
    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }

    /// Maximum amount that can be withdrawn right now (balance + overdraft)
    pub fn total_balance(&self) -> Decimal {
        self.balance.saturating_add(self.overdraft)
    }

    /// Derive the state-machine category from status and overdraft
    pub fn state(&self) -> AccountState {
        match self.status {
            AccountStatus::Closed => AccountState::Closed,
            AccountStatus::Active if self.overdraft.is_zero() => AccountState::OpenNoOverdraft,
            AccountStatus::Active => AccountState::OpenWithOverdraft,
        }
    }

    /// Snapshot of the account's funds for display
    pub fn summary(&self) -> BalanceSummary {
        BalanceSummary {
            number: self.number,
            user_name: self.user_name.clone(),
            balance: self.balance,
            overdraft: self.overdraft,
            total_balance: self.total_balance(),
            state: self.state(),
        }
    }
}

/// Point-in-time view of an account's funds
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceSummary {
    pub number: AccountNumber,
    pub user_name: String,
    pub balance: Decimal,
    pub overdraft: Decimal,
    pub total_balance: Decimal,
    pub state: AccountState,
}
