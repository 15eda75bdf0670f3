//! Account number issuance
//!
//! Numbers grow by one from the highest number issued so far. The ledger calls
//! this while holding its creation lock, and the store rejects duplicates, so
//! two creators can never both keep the same number.

use crate::types::AccountNumber;

/// Compute the number for the next account
///
/// Returns `None` when the number space is exhausted.
pub fn next_account_number(
    current_max: Option<AccountNumber>,
    base: AccountNumber,
) -> Option<AccountNumber> {
    current_max.unwrap_or(base).checked_add(1)
}
