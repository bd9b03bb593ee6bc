use alloy::primitives::Address;

use crate::{OracleConfig, error::OracleError};

/// The provisioned oracle identities plus the special test airline.
///
/// Selected once at startup from the node's account list: accounts
/// `[pool_start_offset, pool_start_offset + pool_size)` become oracles, and
/// the account at `special_test_offset` is the airline whose flights always
/// resolve [`crate::types::FlightStatus::LateAirline`].
#[derive(Clone, Debug)]
pub struct OraclePool {
    oracles: Vec<Address>,
    special_airline: Address,
}

impl OraclePool {
    /// Carves the oracle pool out of `accounts`.
    ///
    /// Fails with [`OracleError::InsufficientIdentities`] when `accounts`
    /// cannot cover the full pool or the special test offset; the
    /// coordinator must not run with a partial pool.
    pub fn select(accounts: &[Address], config: &OracleConfig) -> Result<Self, OracleError> {
        // Saturate so absurd offsets fail as insufficient instead of
        // wrapping around.
        let required = config
            .pool_start_offset
            .saturating_add(config.pool_size)
            .max(config.special_test_offset.saturating_add(1));
        if accounts.len() < required {
            return Err(OracleError::InsufficientIdentities {
                required,
                available: accounts.len(),
            });
        }
        Ok(Self {
            oracles: accounts
                [config.pool_start_offset..config.pool_start_offset + config.pool_size]
                .to_vec(),
            special_airline: accounts[config.special_test_offset],
        })
    }

    pub fn oracles(&self) -> &[Address] { &self.oracles }

    pub fn special_airline(&self) -> Address { self.special_airline }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accounts(n: usize) -> Vec<Address> {
        (0..n).map(|i| Address::with_last_byte(i as u8)).collect()
    }

    #[test]
    fn test_selects_contiguous_range() {
        let accounts = accounts(55);
        let config = OracleConfig::default();

        let pool = OraclePool::select(&accounts, &config).unwrap();

        assert_eq!(pool.oracles().len(), 30);
        assert_eq!(pool.oracles()[0], accounts[20]);
        assert_eq!(pool.oracles()[29], accounts[49]);
        assert_eq!(pool.special_airline(), accounts[1]);
    }

    #[test]
    fn test_insufficient_accounts_is_fatal() {
        let accounts = accounts(49);

        let err = OraclePool::select(&accounts, &OracleConfig::default()).unwrap_err();

        assert!(matches!(
            err,
            OracleError::InsufficientIdentities { required: 50, available: 49 }
        ));
    }

    #[test]
    fn test_overflowing_offsets_are_insufficient() {
        let accounts = accounts(10);
        let config = OracleConfig {
            pool_size: 2,
            pool_start_offset: usize::MAX,
            ..OracleConfig::default()
        };

        assert!(matches!(
            OraclePool::select(&accounts, &config),
            Err(OracleError::InsufficientIdentities { required: usize::MAX, available: 10 })
        ));
    }

    #[test]
    fn test_special_offset_must_be_covered() {
        let accounts = accounts(3);
        let config = OracleConfig {
            pool_size: 2,
            pool_start_offset: 0,
            special_test_offset: 5,
            ..OracleConfig::default()
        };

        assert!(matches!(
            OraclePool::select(&accounts, &config),
            Err(OracleError::InsufficientIdentities { required: 6, available: 3 })
        ));
    }
}
