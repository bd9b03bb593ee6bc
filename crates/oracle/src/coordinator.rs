use alloy::primitives::Address;
use futures::future;

use crate::{
    client::FlightChain,
    registry::IndexRegistry,
    types::{FlightStatus, RequestEvent},
};

/// Answers request events on behalf of the registered oracle pool.
///
/// Owns the (read-only by now) [`IndexRegistry`]. Every delivered event is
/// first checked against the chain's open-state, which is what makes
/// redelivery after a restart harmless; submissions are fire-and-forget and
/// never retried, since the contract enforces validity itself.
pub struct ResponseCoordinator<C> {
    chain: C,
    registry: IndexRegistry,
    special_airline: Address,
}

impl<C: FlightChain> ResponseCoordinator<C> {
    pub fn new(chain: C, registry: IndexRegistry, special_airline: Address) -> Self {
        Self { chain, registry, special_airline }
    }

    pub fn registry(&self) -> &IndexRegistry { &self.registry }

    /// Processes one delivered event: open-check, index matching, one
    /// independent submission per matching oracle.
    ///
    /// Never fails: steady-state errors are logged and swallowed so the
    /// dispatch loop survives them indefinitely.
    pub async fn handle_event(&self, event: &RequestEvent) {
        match self.chain.is_request_open(event).await {
            Ok(true) => (),
            Ok(false) => {
                tracing::info!(%event, "request no longer accepting responses, skipping");
                return;
            },
            Err(err) => {
                tracing::warn!(%event, %err, "open-state query failed, skipping event");
                return;
            },
        }

        let responders = self.registry.matching_identities(event.index);
        tracing::info!(%event, "{} oracle(s) hold index {}", responders.len(), event.index);

        // The open-check is not reapplied per oracle; a request closing
        // mid-dispatch surfaces as a logged submission rejection.
        let submissions = responders
            .into_iter()
            .map(|oracle| self.submit(oracle, event, self.response_for(event.airline)));
        future::join_all(submissions).await;
    }

    /// Response value for a flight of `airline`: deterministic for the
    /// special test airline, uniform random otherwise.
    fn response_for(&self, airline: Address) -> FlightStatus {
        if airline == self.special_airline {
            FlightStatus::LateAirline
        } else {
            FlightStatus::random(&mut rand::thread_rng())
        }
    }

    async fn submit(&self, oracle: Address, event: &RequestEvent, status: FlightStatus) {
        match self.chain.submit_response(oracle, event, status).await {
            Ok(()) => tracing::info!(%oracle, %event, %status, "response submitted"),
            Err(err) => {
                tracing::error!(%oracle, %event, %status, %err, "response submission failed");
            },
        }
    }
}
