mod app;
mod cli;
mod error;
mod grpc;
mod handlers;
mod model;
mod state;
mod telemetry;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use jiff::Timestamp;
use tinylink_generator::{Alphabet, CodeGenerator};
use tinylink_middleware::{Logged, RateLimited};
use tinylink_proto::v1::link_service_server::LinkServiceServer;
use tinylink_redirector::RedirectorService;
use tinylink_shortener::ShortenerService;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::app::App;
use crate::cli::CLI;
use crate::grpc::LinkGrpcServer;
use crate::state::AppState;
use crate::telemetry::TelemetryConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();

    let telemetry = telemetry::init(&TelemetryConfig {
        log_level: config.log_level.clone(),
        json: config.log_json,
        otlp_endpoint: config.otlp_endpoint.clone(),
    })?;

    let result = run(config).await;
    if let Err(err) = &result {
        error!(error = %format!("{err:#}"), "tinylink exited with an error");
    }

    telemetry.shutdown();
    result
}

async fn run(config: CLI) -> anyhow::Result<()> {
    let backend = config.storage_backend();
    info!(
        http_addr = %config.http_addr,
        grpc_addr = %config.grpc_addr,
        storage_backend = %backend,
        short_uri = %config.short_uri,
        "starting tinylink"
    );

    let repository = backend
        .connect()
        .await
        .with_context(|| format!("failed to connect to {backend} storage"))?;

    let alphabet = Alphabet::from_config(&config.alphabet).context("invalid alphabet")?;
    let generator = CodeGenerator::from_config(
        config.generator.into(),
        alphabet,
        config.max_length(),
        clock_seed(),
    )
    .context("invalid generator configuration")?;

    let settings = config.service_settings();
    let rate_limit = config.rate_limit();
    let storage_timeout = settings.storage_timeout;

    let shortener = ShortenerService::new(Arc::clone(&repository), generator, settings);
    let redirector = RedirectorService::new(repository, storage_timeout);

    let state = AppState::new(
        Arc::new(Logged::new(RateLimited::new(shortener, rate_limit))),
        Arc::new(Logged::new(RateLimited::new(redirector, rate_limit))),
    );

    serve(config.http_addr, config.grpc_addr, state).await
}

/// Starting point for the sequence generator.
///
/// Milliseconds since the epoch keep a restarted process from replaying the
/// codes handed out by its predecessor.
fn clock_seed() -> u64 {
    u64::try_from(Timestamp::now().as_millisecond()).unwrap_or_default()
}

async fn serve(http_addr: SocketAddr, grpc_addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = stop_tx.send(true);
    });

    let listener = TcpListener::bind(http_addr)
        .await
        .with_context(|| format!("failed to bind HTTP listener on {http_addr}"))?;
    info!(listen_addr = %listener.local_addr()?, "serving HTTP");
    let http = axum::serve(listener, App::router(state.clone()))
        .with_graceful_shutdown(stopped(stop_rx.clone()));

    let (health_reporter, health_service) = tonic_health::server::health_reporter();
    health_reporter
        .set_serving::<LinkServiceServer<LinkGrpcServer>>()
        .await;
    info!(listen_addr = %grpc_addr, "serving gRPC");
    let grpc = tonic::transport::Server::builder()
        .add_service(health_service)
        .add_service(LinkServiceServer::new(LinkGrpcServer::new(state)))
        .serve_with_shutdown(grpc_addr, stopped(stop_rx));

    tokio::try_join!(
        async { http.await.context("HTTP server failed") },
        async { grpc.await.context("gRPC server failed") },
    )?;

    info!("tinylink stopped");
    Ok(())
}

async fn stopped(mut stop: watch::Receiver<bool>) {
    let _ = stop.wait_for(|stopped| *stopped).await;
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received, draining connections");
}
