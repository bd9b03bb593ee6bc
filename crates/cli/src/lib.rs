pub mod args;

use std::{pin::pin, time::Duration};

use alloy::{
    primitives::utils::parse_ether,
    providers::{Provider, ProviderBuilder},
    rpc::client::RpcClient,
    transports::layers::{RetryBackoffLayer, ThrottleLayer},
};
use anyhow::Context;
use args::Cli;
use futures::StreamExt;
use surety_oracle::{
    Chain, OracleConfig, client::AppClient, coordinator::ResponseCoordinator, pool::OraclePool,
    registration::RegistrationManager, stream,
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let client = if let Some(throttle) = cli.rpc_throttle {
        RpcClient::builder()
            .layer(ThrottleLayer::new(throttle))
            .layer(RetryBackoffLayer::new(10, 100, 200))
            .connect(&cli.rpc)
            .await
            .context("connecting to RPC")?
    } else {
        RpcClient::builder()
            .layer(RetryBackoffLayer::new(10, 100, 200))
            .connect(&cli.rpc)
            .await
            .context("connecting to RPC")?
    };
    client.set_poll_interval(Duration::from_millis(cli.poll_interval_ms));
    let provider = ProviderBuilder::new().connect_client(client);

    let config = OracleConfig {
        pool_size: cli.pool_size,
        pool_start_offset: cli.pool_start_offset,
        special_test_offset: cli.special_test_offset,
        registration_fee: parse_ether(&cli.registration_fee)
            .context("parsing registration fee")?,
        backoff_unit: Duration::from_millis(cli.backoff_unit_ms),
        max_registration_attempts: cli.max_registration_attempts,
    };

    let accounts = provider.get_accounts().await.context("listing node accounts")?;
    let pool = OraclePool::select(&accounts, &config)?;
    tracing::info!(
        special_airline = %pool.special_airline(),
        "provisioned {} oracle accounts",
        pool.oracles().len(),
    );

    let chain = Chain::new(cli.app, cli.from_block);
    let app_client = AppClient::new(&chain, provider.clone(), config.registration_fee);

    // Setup barrier: nothing is dispatched until the whole pool is
    // registered, or the process aborts.
    let registry = RegistrationManager::new(&app_client, &config)
        .register_all(&pool, tokio::time::sleep)
        .await?;

    let coordinator = ResponseCoordinator::new(app_client, registry, pool.special_airline());

    let cancellation_signal = CancellationToken::new();
    let cancellation_token = cancellation_signal.child_token();
    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C signal handler");
        cancellation_signal.cancel();
    });

    tracing::info!("listening for oracle request events");
    let mut requests = pin!(stream::requests(
        &chain,
        provider,
        chain.deployed_at_block(),
        tokio::time::sleep,
    ));
    loop {
        let next = tokio::select! {
            _ = cancellation_token.cancelled() => break,
            next = requests.next() => next,
        };
        match next {
            Some(Ok(event)) => {
                tracing::info!(%event, "processing oracle request");
                coordinator.handle_event(&event).await;
            },
            Some(Err(err)) => tracing::warn!(%err, "request subscription error"),
            None => break,
        }
    }

    Ok(())
}
