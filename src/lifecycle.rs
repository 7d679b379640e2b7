//! The lifecycle controllers of the two benchmark programs.
//!
//! Both start their endpoint, wait for it to be ready, and run the load driver
//! against it. The HTTP controller then waits for a termination signal and
//! drains the endpoint within the configured deadline. The gRPC controller
//! returns right away, leaving the endpoint to be torn down with the process.

use crate::{
    app,
    bench::{grpc_target::GrpcGreetTarget, http_target::HttpGreetTarget, BenchmarkResult, Driver},
    endpoint,
    infra::{config::Config, error::BenchError},
};
use reqwest::Method;
use std::{fmt, future::Future, time::Duration};

/// Where a controller is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Binding the listener.
    Starting,
    /// The endpoint is serving, the driver has not started yet.
    WarmingUp,
    /// The driver is issuing calls.
    Loading,
    /// The driver is done, waiting for a termination signal.
    Idle,
    /// Waiting for in-flight requests before stopping.
    Draining,
    /// The endpoint has stopped.
    Stopped,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Starting => "starting",
            Phase::WarmingUp => "warming-up",
            Phase::Loading => "loading",
            Phase::Idle => "idle",
            Phase::Draining => "draining",
            Phase::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

fn enter(phase: Phase) {
    tracing::debug!(%phase, "Entering phase");
}

async fn warm_up(delay: Duration) {
    enter(Phase::WarmingUp);
    if !delay.is_zero() {
        tracing::debug!("Warming up for {:?}", delay);
        tokio::time::sleep(delay).await;
    }
}

/// Runs the gRPC benchmark: one batch of unary `Greet` calls.
#[tracing::instrument(skip_all)]
pub async fn run_grpc(config: &Config) -> Result<BenchmarkResult, BenchError> {
    enter(Phase::Starting);
    let endpoint = endpoint::start_grpc(config.grpc.address).await?;
    tracing::info!("Server is running on {}", endpoint.local_addr());
    warm_up(config.bench.warmup).await;

    enter(Phase::Loading);
    let mut target = GrpcGreetTarget::connect(endpoint.local_addr(), &config.bench.name).await?;
    let result = Driver::new("GRPC unary", config.bench.requests, config.bench.on_failure)
        .run(&mut target)
        .await?;
    result.log();

    enter(Phase::Stopped);
    Ok(result)
}

/// Runs the HTTP benchmark: one batch of `GET /` followed by one batch of `POST /`.
///
/// After both batches the endpoint keeps serving until `signal` completes, then
/// drains within `http.shutdown_timeout`.
#[tracing::instrument(skip_all)]
pub async fn run_http(
    config: &Config,
    signal: impl Future<Output = ()>,
) -> Result<Vec<BenchmarkResult>, BenchError> {
    enter(Phase::Starting);
    let endpoint = endpoint::start_http(config.http.address, app::app()).await?;
    warm_up(config.bench.warmup).await;

    enter(Phase::Loading);
    let client = reqwest::Client::builder()
        .build()
        .map_err(BenchError::Client)?;
    let url = format!("http://{}/", endpoint.local_addr());
    let mut results = Vec::with_capacity(2);
    for method in [Method::GET, Method::POST] {
        let label = format!("Http {method}");
        let mut target =
            HttpGreetTarget::new(client.clone(), method, url.clone(), &config.bench.message);
        let result = Driver::new(label, config.bench.requests, config.bench.on_failure)
            .run(&mut target)
            .await?;
        result.log();
        results.push(result);
    }
    drop(client);

    enter(Phase::Idle);
    tracing::info!("Benchmark finished, waiting for a termination signal");
    signal.await;

    enter(Phase::Draining);
    endpoint.shutdown(config.http.shutdown_timeout).await?;
    tracing::info!("Server shutdown gracefully");

    enter(Phase::Stopped);
    Ok(results)
}
