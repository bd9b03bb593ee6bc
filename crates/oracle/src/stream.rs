use std::{collections::VecDeque, time::Duration};

use alloy::{providers::Provider, rpc::types::Filter, sol_types::SolEvent};
use futures::{Stream, stream};

use crate::{Chain, abi::FlightSuretyApp::OracleRequest, error::OracleError, types::RequestEvent};

/// Upper bound on the block span of a single log query, so that genesis
/// replay does not ask the node for its whole history at once.
const MAX_BLOCK_SPAN: u64 = 2_000;

/// Returns the infinite stream of `OracleRequest` events emitted by the
/// FlightSuretyApp contract, in chain order, starting from `from_block`.
///
/// Polls logs via the given [`Provider`] with the [`Provider`]-configured
/// interval. RPC failures are surfaced as `Err` items after a poll-interval
/// pause and never terminate the stream, so the consumer can log and keep
/// going. No deduplication happens here; the coordinator's open-check is
/// the sole defense against reprocessing.
///
/// It is recommended to setup provider with
/// [`alloy::transports::layers::RetryBackoffLayer`].
pub fn requests<P, S, SFut>(
    chain: &Chain,
    provider: P,
    from_block: u64,
    sleep: S,
) -> impl Stream<Item = Result<RequestEvent, OracleError>>
where
    P: Provider,
    S: Fn(Duration) -> SFut + Copy,
    SFut: Future<Output = ()>,
{
    let app = chain.app();
    stream::unfold(
        (provider, from_block, VecDeque::new()),
        move |(provider, mut next_block, mut buffer)| async move {
            loop {
                if let Some(event) = buffer.pop_front() {
                    return Some((Ok(event), (provider, next_block, buffer)));
                }

                let head = match provider.get_block_number().await {
                    Ok(head) => head,
                    Err(err) => {
                        sleep(provider.client().poll_interval()).await;
                        return Some((Err(err.into()), (provider, next_block, buffer)));
                    },
                };
                if next_block > head {
                    sleep(provider.client().poll_interval()).await;
                    continue;
                }

                let to_block = head.min(next_block + MAX_BLOCK_SPAN - 1);
                let filter = Filter::new()
                    .address(app)
                    .event_signature(OracleRequest::SIGNATURE_HASH)
                    .from_block(next_block)
                    .to_block(to_block);
                match provider.get_logs(&filter).await {
                    Ok(logs) => {
                        let mut decode_err: Option<OracleError> = None;
                        for log in &logs {
                            match OracleRequest::decode_log(&log.inner) {
                                Ok(decoded) => {
                                    let request = decoded.data;
                                    // The timestamp is caller-supplied on
                                    // chain; a value past u64 is garbage,
                                    // not a reason to die.
                                    match u64::try_from(request.timestamp) {
                                        Ok(timestamp) => buffer.push_back(RequestEvent {
                                            index: request.index,
                                            airline: request.airline,
                                            flight: request.flight,
                                            timestamp,
                                        }),
                                        Err(_) => {
                                            decode_err = Some(OracleError::InvalidRequest(format!(
                                                "request timestamp {} overflows u64",
                                                request.timestamp,
                                            )));
                                        },
                                    }
                                },
                                Err(err) => decode_err = Some(err.into()),
                            }
                        }
                        // Advance even past an undecodable log so the
                        // stream cannot wedge on it.
                        next_block = to_block + 1;
                        if let Some(err) = decode_err {
                            return Some((Err(err), (provider, next_block, buffer)));
                        }
                    },
                    Err(err) => {
                        sleep(provider.client().poll_interval()).await;
                        return Some((Err(err.into()), (provider, next_block, buffer)));
                    },
                }
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use alloy::{
        primitives::{Address, LogData, U256},
        providers::ProviderBuilder,
        rpc::types::Log,
        transports::mock::Asserter,
    };
    use futures::StreamExt;

    use super::*;
    use crate::Chain;

    fn no_sleep(_: Duration) -> std::future::Ready<()> {
        std::future::ready(())
    }

    fn app() -> Address {
        Address::with_last_byte(0xaa)
    }

    fn request_log(flight: &str, timestamp: U256) -> Log {
        let request = OracleRequest {
            index: 7,
            airline: Address::with_last_byte(9),
            flight: flight.into(),
            timestamp,
        };
        Log {
            inner: alloy::primitives::Log {
                address: app(),
                data: LogData::new_unchecked(
                    vec![OracleRequest::SIGNATURE_HASH],
                    request.encode_data().into(),
                ),
            },
            ..Default::default()
        }
    }

    /// A failing `eth_getLogs` surfaces as an `Err` item; the stream then
    /// recovers and delivers events in chain order, draining the decode
    /// buffer without further RPC round-trips.
    #[tokio::test]
    async fn test_rpc_failure_yields_err_and_stream_recovers() {
        let asserter = Asserter::new();
        let provider = ProviderBuilder::new().connect_mocked_client(asserter.clone());

        asserter.push_success(&1u64);
        asserter.push_failure_msg("eth_getLogs unavailable");
        asserter.push_success(&1u64);
        asserter.push_success(&vec![
            request_log("100", U256::from(1_700_000_000u64)),
            request_log("200", U256::from(1_700_000_600u64)),
        ]);

        let chain = Chain::new(app(), 0);
        let items = requests(&chain, provider, 0, no_sleep)
            .take(3)
            .collect::<Vec<_>>()
            .await;

        assert!(items[0].is_err());
        let first = items[1].as_ref().unwrap();
        assert_eq!(first.flight, "100");
        assert_eq!(first.index, 7);
        assert_eq!(first.timestamp, 1_700_000_000);
        // No responses are left in the asserter, so an RPC round-trip here
        // would surface as Err instead of the buffered second event.
        let second = items[2].as_ref().unwrap();
        assert_eq!(second.flight, "200");
    }

    /// A caller-supplied timestamp past u64 yields an `Err` item and is
    /// skipped; later events still come through.
    #[tokio::test]
    async fn test_overflowing_timestamp_is_skipped_not_fatal() {
        let asserter = Asserter::new();
        let provider = ProviderBuilder::new().connect_mocked_client(asserter.clone());

        asserter.push_success(&0u64);
        asserter.push_success(&vec![request_log("900", U256::MAX)]);
        asserter.push_success(&1u64);
        asserter.push_success(&vec![request_log("100", U256::from(1_700_000_000u64))]);

        let chain = Chain::new(app(), 0);
        let items = requests(&chain, provider, 0, no_sleep)
            .take(2)
            .collect::<Vec<_>>()
            .await;

        assert!(matches!(items[0], Err(OracleError::InvalidRequest(_))));
        let event = items[1].as_ref().unwrap();
        assert_eq!(event.flight, "100");
        assert_eq!(event.timestamp, 1_700_000_000);
    }
}
