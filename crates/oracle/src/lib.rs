//! FlightSurety oracle coordination library.
//!
//! # Overview
//!
//! Stands up a pool of oracle identities against the FlightSuretyApp
//! smart contract and answers its flight-status requests.
//!
//! Use [`pool::OraclePool::select`] to carve the oracle accounts out of the
//! node's account list, [`registration::RegistrationManager`] to drive every
//! oracle to registered state (populating an [`registry::IndexRegistry`]),
//! then [`stream::requests`] to consume `OracleRequest` events and
//! [`coordinator::ResponseCoordinator`] to answer them.
//!
//! Registration is a barrier: no event is dispatched before every pool
//! identity is registered with its three assigned indices. After the
//! barrier the registry is read-only.
//!
//! See `./tests` for end-to-end scenarios against the mock chain.
//!
//! # Features
//!
//! | Feature | Default | Description |
//! | --- | --- | --- |
//! | `testing` | yes | Enables [`testing`] module. |

pub mod abi;
pub mod client;
pub mod coordinator;
pub mod error;
pub mod pool;
pub mod registration;
pub mod registry;
pub mod stream;
#[cfg(feature = "testing")]
pub mod testing;
pub mod types;

use std::time::Duration;

use alloy::primitives::{Address, U256};

/// Chain the FlightSuretyApp contract is deployed on.
#[derive(Clone, Debug)]
pub struct Chain {
    app: Address,
    deployed_at_block: u64,
}

impl Chain {
    pub fn new(app: Address, deployed_at_block: u64) -> Self {
        Self { app, deployed_at_block }
    }

    pub fn app(&self) -> Address { self.app }

    /// Block the request-event stream replays from. 0 replays from genesis,
    /// which is what a restarted coordinator wants: earlier still-open
    /// requests are re-delivered and the open-check filters the rest.
    pub fn deployed_at_block(&self) -> u64 { self.deployed_at_block }
}

/// Coordinator provisioning and registration parameters.
#[derive(Clone, Debug)]
pub struct OracleConfig {
    /// Number of oracle identities to provision.
    pub pool_size: usize,
    /// Offset into the node account list where the pool begins.
    pub pool_start_offset: usize,
    /// Offset of the identity whose flights always resolve `LateAirline`.
    pub special_test_offset: usize,
    /// Fee attached to each registration transaction, in wei.
    pub registration_fee: U256,
    /// Base unit multiplied by the attempt number for the retry delay.
    pub backoff_unit: Duration,
    /// Bound on registration attempts before fatal failure.
    pub max_registration_attempts: u32,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            pool_size: 30,
            pool_start_offset: 20,
            special_test_offset: 1,
            // 1 ether
            registration_fee: U256::from(1_000_000_000_000_000_000u128),
            backoff_unit: Duration::from_millis(2000),
            max_registration_attempts: 10,
        }
    }
}
