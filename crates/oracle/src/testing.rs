//! In-memory [`FlightChain`] for exercising registration and dispatch
//! without a node.

use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
    time::Duration,
};

use alloy::primitives::Address;

use crate::{
    client::FlightChain,
    error::OracleError,
    types::{FlightStatus, RequestEvent},
};

/// A recorded response submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submission {
    pub oracle: Address,
    pub event: RequestEvent,
    pub status: FlightStatus,
}

#[derive(Default)]
struct MockState {
    registered: HashSet<Address>,
    indices: HashMap<Address, [u8; 3]>,
    // Remaining failures to serve before a registration succeeds.
    registration_failures: HashMap<Address, u32>,
    closed: HashSet<(Address, String, u64, u8)>,
    rejected_oracles: HashSet<Address>,
    submissions: Vec<Submission>,
    register_calls: HashMap<Address, u32>,
    index_queries: HashMap<Address, u32>,
}

/// Scriptable mock chain.
///
/// Oracles without preset indices get a deterministic assignment derived
/// from the address, so bulk registration tests need no per-oracle setup.
/// Requests are open until [`MockChain::close_request`] is called.
#[derive(Default)]
pub struct MockChain {
    state: Mutex<MockState>,
}

fn request_key(event: &RequestEvent) -> (Address, String, u64, u8) {
    (event.airline, event.flight.clone(), event.timestamp, event.index)
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Presets the indices handed out for `oracle`.
    pub fn set_indices(&self, oracle: Address, indices: [u8; 3]) {
        self.state.lock().unwrap().indices.insert(oracle, indices);
    }

    /// Marks `oracle` as registered by a previous run.
    pub fn preregister(&self, oracle: Address) {
        self.state.lock().unwrap().registered.insert(oracle);
    }

    /// Makes the next `failures` registration transactions for `oracle`
    /// fail before one succeeds.
    pub fn fail_registration(&self, oracle: Address, failures: u32) {
        self.state.lock().unwrap().registration_failures.insert(oracle, failures);
    }

    /// Closes the request behind `event`; subsequent open-checks report
    /// closed and submissions for it are rejected.
    pub fn close_request(&self, event: &RequestEvent) {
        self.state.lock().unwrap().closed.insert(request_key(event));
    }

    /// Makes every submission from `oracle` fail.
    pub fn reject_submissions_from(&self, oracle: Address) {
        self.state.lock().unwrap().rejected_oracles.insert(oracle);
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.state.lock().unwrap().submissions.clone()
    }

    /// Number of registration transactions attempted for `oracle`.
    pub fn register_calls(&self, oracle: Address) -> u32 {
        self.state.lock().unwrap().register_calls.get(&oracle).copied().unwrap_or(0)
    }

    /// Number of index queries served for `oracle`.
    pub fn index_queries(&self, oracle: Address) -> u32 {
        self.state.lock().unwrap().index_queries.get(&oracle).copied().unwrap_or(0)
    }
}

impl FlightChain for MockChain {
    async fn register_oracle(&self, oracle: Address) -> Result<(), OracleError> {
        let mut state = self.state.lock().unwrap();
        *state.register_calls.entry(oracle).or_default() += 1;
        if let Some(remaining) = state.registration_failures.get_mut(&oracle)
            && *remaining > 0
        {
            *remaining -= 1;
            return Err(OracleError::InvalidRequest("registration transaction reverted".into()));
        }
        state.registered.insert(oracle);
        Ok(())
    }

    async fn is_already_registered(&self, oracle: Address) -> Result<bool, OracleError> {
        Ok(self.state.lock().unwrap().registered.contains(&oracle))
    }

    async fn assigned_indices(&self, oracle: Address) -> Result<[u8; 3], OracleError> {
        let mut state = self.state.lock().unwrap();
        *state.index_queries.entry(oracle).or_default() += 1;
        Ok(*state.indices.entry(oracle).or_insert_with(|| {
            let b = oracle.0[19];
            [b % 10, (b.wrapping_add(1)) % 10, (b.wrapping_add(2)) % 10]
        }))
    }

    async fn is_request_open(&self, event: &RequestEvent) -> Result<bool, OracleError> {
        Ok(!self.state.lock().unwrap().closed.contains(&request_key(event)))
    }

    async fn submit_response(
        &self,
        oracle: Address,
        event: &RequestEvent,
        status: FlightStatus,
    ) -> Result<(), OracleError> {
        let mut state = self.state.lock().unwrap();
        if state.rejected_oracles.contains(&oracle) {
            return Err(OracleError::InvalidRequest(format!(
                "submission from {oracle} rejected"
            )));
        }
        if state.closed.contains(&request_key(event)) {
            return Err(OracleError::InvalidRequest("request closed".into()));
        }
        state.submissions.push(Submission { oracle, event: event.clone(), status });
        Ok(())
    }
}

/// Records the delays a registration run would have slept, without
/// sleeping. Borrow it into a closure to use as the injected `sleep`:
///
/// ```ignore
/// let sleeps = SleepLog::default();
/// let sleep = |d| {
///     sleeps.record(d);
///     std::future::ready(())
/// };
/// manager.register_all(&pool, sleep).await?;
/// assert_eq!(sleeps.recorded(), vec![]);
/// ```
#[derive(Default)]
pub struct SleepLog {
    delays: Mutex<Vec<Duration>>,
}

impl SleepLog {
    pub fn record(&self, delay: Duration) {
        self.delays.lock().unwrap().push(delay);
    }

    pub fn recorded(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}
