use std::time::Duration;

use alloy::primitives::Address;

use crate::{
    OracleConfig, client::FlightChain, error::OracleError, pool::OraclePool,
    registry::IndexRegistry,
};

/// Delay before retrying after failed attempt number `attempt` (1-based).
pub fn backoff_delay(attempt: u32, unit: Duration) -> Duration {
    unit * attempt
}

/// Registration progress of a single oracle identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegistrationState {
    Unregistered,
    Registering { attempt: u32 },
    Registered,
    Failed,
}

impl RegistrationState {
    /// Starts the first registration attempt.
    pub fn begin(self) -> Self {
        match self {
            Self::Unregistered => Self::Registering { attempt: 1 },
            other => other,
        }
    }

    /// Advances past a failed attempt, giving up once `max_attempts` have
    /// been spent.
    pub fn retry(self, max_attempts: u32) -> Self {
        match self {
            Self::Registering { attempt } if attempt >= max_attempts => Self::Failed,
            Self::Registering { attempt } => Self::Registering { attempt: attempt + 1 },
            other => other,
        }
    }

    /// Marks the in-flight attempt successful.
    pub fn complete(self) -> Self {
        match self {
            Self::Registering { .. } => Self::Registered,
            other => other,
        }
    }
}

/// Drives every pool identity to registered state against the chain.
///
/// Registration is idempotent across restarts: an identity the chain
/// already knows skips the fee payment and goes straight to index
/// retrieval. The `sleep` function is injected so tests can observe
/// backoff delays without waiting them out.
pub struct RegistrationManager<'c, C> {
    chain: &'c C,
    config: OracleConfig,
}

impl<'c, C: FlightChain> RegistrationManager<'c, C> {
    pub fn new(chain: &'c C, config: &OracleConfig) -> Self {
        Self { chain, config: config.clone() }
    }

    /// Registers the whole pool, returning the populated registry.
    ///
    /// This is the setup barrier: it returns `Ok` only once every identity
    /// is registered with its indices recorded, and any exhausted identity
    /// aborts the whole coordinator with
    /// [`OracleError::RegistrationExhausted`].
    pub async fn register_all<S, SFut>(
        &self,
        pool: &OraclePool,
        sleep: S,
    ) -> Result<IndexRegistry, OracleError>
    where
        S: Fn(Duration) -> SFut,
        SFut: Future<Output = ()>,
    {
        let mut registry = IndexRegistry::default();
        for (n, &oracle) in pool.oracles().iter().enumerate() {
            let indices = self.register_one(oracle, &sleep).await?;
            tracing::info!(
                %oracle,
                ?indices,
                "oracle {} of {} registered",
                n + 1,
                pool.oracles().len(),
            );
            registry.assign(oracle, indices);
        }
        tracing::info!("registration of oracles completed successfully");
        Ok(registry)
    }

    async fn register_one<S, SFut>(
        &self,
        oracle: Address,
        sleep: &S,
    ) -> Result<[u8; 3], OracleError>
    where
        S: Fn(Duration) -> SFut,
        SFut: Future<Output = ()>,
    {
        if !self.chain.is_already_registered(oracle).await? {
            let mut state = RegistrationState::Unregistered.begin();
            while let RegistrationState::Registering { attempt } = state {
                match self.chain.register_oracle(oracle).await {
                    Ok(()) => state = state.complete(),
                    Err(err) => {
                        tracing::warn!(%oracle, attempt, %err, "oracle registration attempt failed");
                        state = state.retry(self.config.max_registration_attempts);
                        if state != RegistrationState::Failed {
                            sleep(backoff_delay(attempt, self.config.backoff_unit)).await;
                        }
                    },
                }
            }
            if state == RegistrationState::Failed {
                return Err(OracleError::RegistrationExhausted {
                    oracle,
                    attempts: self.config.max_registration_attempts,
                });
            }
        }
        self.chain.assigned_indices(oracle).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_is_attempt_times_unit() {
        let unit = Duration::from_millis(2000);

        assert_eq!(backoff_delay(1, unit), Duration::from_millis(2000));
        assert_eq!(backoff_delay(2, unit), Duration::from_millis(4000));
        assert_eq!(backoff_delay(10, unit), Duration::from_millis(20000));
    }

    #[test]
    fn test_backoff_is_non_decreasing() {
        let unit = Duration::from_millis(2000);
        for attempt in 1..10 {
            assert!(backoff_delay(attempt, unit) <= backoff_delay(attempt + 1, unit));
        }
    }

    #[test]
    fn test_state_machine_happy_path() {
        let state = RegistrationState::Unregistered.begin();
        assert_eq!(state, RegistrationState::Registering { attempt: 1 });
        assert_eq!(state.complete(), RegistrationState::Registered);
    }

    #[test]
    fn test_state_machine_exhaustion() {
        let mut state = RegistrationState::Unregistered.begin();
        for attempt in 1..10u32 {
            assert_eq!(state, RegistrationState::Registering { attempt });
            state = state.retry(10);
        }
        assert_eq!(state, RegistrationState::Registering { attempt: 10 });
        assert_eq!(state.retry(10), RegistrationState::Failed);
    }

    #[test]
    fn test_terminal_states_are_stable() {
        assert_eq!(RegistrationState::Registered.retry(10), RegistrationState::Registered);
        assert_eq!(RegistrationState::Failed.complete(), RegistrationState::Failed);
        assert_eq!(RegistrationState::Failed.begin(), RegistrationState::Failed);
    }
}
