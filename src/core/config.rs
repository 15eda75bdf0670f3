//! Ledger configuration
//!
//! Carries the two domain constants the ledger works with: the overdraft
//! grant amount and the base account numbers are issued above.

use crate::types::account::{AccountNumber, ACCOUNT_NUMBER_BASE, OVERDRAFT_GRANT};
use rust_decimal::Decimal;
use tracing::warn;

/// Configuration for a [`Ledger`](crate::core::Ledger)
#[derive(Clone, Debug, PartialEq)]
pub struct LedgerConfig {
    /// Overdraft limit set by `apply_overdraft`
    pub overdraft_grant: Decimal,
    /// First account gets `number_base + 1` when the store is empty
    pub number_base: AccountNumber,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            overdraft_grant: OVERDRAFT_GRANT,
            number_base: ACCOUNT_NUMBER_BASE,
        }
    }
}

impl LedgerConfig {
    /// Create a new LedgerConfig with custom values
    ///
    /// A non-positive overdraft grant falls back to the default, since a zero
    /// grant would be indistinguishable from "not granted".
    ///
    /// # Arguments
    ///
    /// * `overdraft_grant` - Limit set by `apply_overdraft`; must be positive
    /// * `number_base` - Account numbers are issued above this value
    pub fn new(overdraft_grant: Decimal, number_base: AccountNumber) -> Self {
        let default = Self::default();

        let overdraft_grant = if overdraft_grant <= Decimal::ZERO {
            warn!(
                %overdraft_grant,
                default = %default.overdraft_grant,
                "invalid overdraft grant, using default"
            );
            default.overdraft_grant
        } else {
            overdraft_grant
        };

        Self {
            overdraft_grant,
            number_base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_uses_domain_constants() {
        let config = LedgerConfig::default();
        assert_eq!(config.overdraft_grant, dec!(1000.00));
        assert_eq!(config.number_base, 100_000);
    }

    #[rstest]
    #[case::custom(dec!(500), 200_000, dec!(500), 200_000)]
    #[case::zero_grant_falls_back(dec!(0), 1, dec!(1000.00), 1)]
    #[case::negative_grant_falls_back(dec!(-10), 0, dec!(1000.00), 0)]
    fn test_new_validates_grant(
        #[case] grant: Decimal,
        #[case] base: AccountNumber,
        #[case] expected_grant: Decimal,
        #[case] expected_base: AccountNumber,
    ) {
        let config = LedgerConfig::new(grant, base);
        assert_eq!(config.overdraft_grant, expected_grant);
        assert_eq!(config.number_base, expected_base);
    }
}
