use alloy::{
    primitives::{Address, U256},
    providers::Provider,
};

use crate::{
    Chain,
    abi::FlightSuretyApp::{self, FlightSuretyAppInstance},
    error::OracleError,
    types::{FlightStatus, RequestEvent},
};

/// Gas cap applied to oracle transactions; registration and response
/// submission both exceed the node's default estimate on some setups.
const TX_GAS_LIMIT: u64 = 900_000;

/// Operations the coordinator needs against the FlightSuretyApp contract.
///
/// The production implementation is [`AppClient`];
/// `crate::testing::MockChain` provides a scriptable in-memory one.
#[allow(async_fn_in_trait)]
pub trait FlightChain {
    /// Registers `oracle`, attaching the registration fee.
    async fn register_oracle(&self, oracle: Address) -> Result<(), OracleError>;

    /// Whether `oracle` is already registered, e.g. by a previous run of
    /// this process.
    async fn is_already_registered(&self, oracle: Address) -> Result<bool, OracleError>;

    /// The three indices the contract assigned to `oracle`.
    async fn assigned_indices(&self, oracle: Address) -> Result<[u8; 3], OracleError>;

    /// Whether the request behind `event` is still accepting responses.
    async fn is_request_open(&self, event: &RequestEvent) -> Result<bool, OracleError>;

    /// Submits `status` for `event` on behalf of `oracle`.
    async fn submit_response(
        &self,
        oracle: Address,
        event: &RequestEvent,
        status: FlightStatus,
    ) -> Result<(), OracleError>;
}

impl<C: FlightChain> FlightChain for &C {
    async fn register_oracle(&self, oracle: Address) -> Result<(), OracleError> {
        (**self).register_oracle(oracle).await
    }

    async fn is_already_registered(&self, oracle: Address) -> Result<bool, OracleError> {
        (**self).is_already_registered(oracle).await
    }

    async fn assigned_indices(&self, oracle: Address) -> Result<[u8; 3], OracleError> {
        (**self).assigned_indices(oracle).await
    }

    async fn is_request_open(&self, event: &RequestEvent) -> Result<bool, OracleError> {
        (**self).is_request_open(event).await
    }

    async fn submit_response(
        &self,
        oracle: Address,
        event: &RequestEvent,
        status: FlightStatus,
    ) -> Result<(), OracleError> {
        (**self).submit_response(oracle, event, status).await
    }
}

/// [`FlightChain`] over the deployed FlightSuretyApp contract.
///
/// Transactions are sent `from` the acting oracle account, which must be
/// unlocked on the node (the coordinator drives node-managed dev accounts).
#[derive(Clone, Debug)]
pub struct AppClient<P: Provider> {
    app: FlightSuretyAppInstance<P>,
    registration_fee: U256,
}

impl<P: Provider> AppClient<P> {
    pub fn new(chain: &Chain, provider: P, registration_fee: U256) -> Self {
        Self { app: FlightSuretyApp::new(chain.app(), provider), registration_fee }
    }
}

impl<P: Provider> FlightChain for AppClient<P> {
    async fn register_oracle(&self, oracle: Address) -> Result<(), OracleError> {
        self.app
            .registerOracle()
            .from(oracle)
            .value(self.registration_fee)
            .gas(TX_GAS_LIMIT)
            .send()
            .await?
            .watch()
            .await?;
        Ok(())
    }

    async fn is_already_registered(&self, oracle: Address) -> Result<bool, OracleError> {
        Ok(self.app.isOracleAlreadyRegistered().from(oracle).call().await?)
    }

    async fn assigned_indices(&self, oracle: Address) -> Result<[u8; 3], OracleError> {
        Ok(self.app.getMyIndexes().from(oracle).call().await?)
    }

    async fn is_request_open(&self, event: &RequestEvent) -> Result<bool, OracleError> {
        Ok(self
            .app
            .isOracleRequestOpenForIndex(
                event.airline,
                event.flight.clone(),
                U256::from(event.timestamp),
                event.index,
            )
            .call()
            .await?)
    }

    async fn submit_response(
        &self,
        oracle: Address,
        event: &RequestEvent,
        status: FlightStatus,
    ) -> Result<(), OracleError> {
        self.app
            .submitOracleResponse(
                event.index,
                event.airline,
                event.flight.clone(),
                U256::from(event.timestamp),
                status.code(),
            )
            .from(oracle)
            .gas(TX_GAS_LIMIT)
            .send()
            .await?
            .watch()
            .await?;
        Ok(())
    }
}
