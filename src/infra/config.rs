//! For reading application configuration.
//!
//! Values are layered: built-in defaults, then an optional `config` file in the
//! working directory, then `APP__`-prefixed environment variables, for example
//! `APP__BENCH__REQUESTS=500` or `APP__HTTP__SHUTDOWN_TIMEOUT=10s`.

use crate::bench::FailurePolicy;
use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use serde::Deserialize;
use std::{net::SocketAddr, time::Duration};

/// Application configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    /// gRPC endpoint configuration.
    pub grpc: GrpcConfig,
    /// HTTP endpoint configuration.
    pub http: HttpConfig,
    /// Load driver configuration.
    pub bench: BenchConfig,
}

/// gRPC endpoint configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct GrpcConfig {
    /// Address the gRPC server listens on.
    pub address: SocketAddr,
}

/// HTTP endpoint configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct HttpConfig {
    /// Address the HTTP server listens on.
    pub address: SocketAddr,
    /// How long draining may take before the server is forced down.
    #[serde(with = "humantime_serde")]
    pub shutdown_timeout: Duration,
}

/// Load driver configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct BenchConfig {
    /// Number of sequential calls per batch.
    pub requests: usize,
    /// Name sent in every gRPC greet request.
    pub name: String,
    /// Message sent in every HTTP greet request.
    pub message: String,
    /// Extra delay between the endpoint becoming ready and the first call.
    #[serde(with = "humantime_serde")]
    pub warmup: Duration,
    /// What to do when a call fails.
    pub on_failure: FailurePolicy,
}

/// The built-in defaults, before any file or environment overrides.
pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    config::Config::builder()
        .set_default("grpc.address", "127.0.0.1:50052")?
        .set_default("http.address", "127.0.0.1:8081")?
        .set_default("http.shutdown_timeout", "5s")?
        .set_default("bench.requests", 10_000)?
        .set_default("bench.name", "World")?
        .set_default("bench.message", "Hello world")?
        .set_default("bench.warmup", "0s")?
        .set_default("bench.on_failure", "skip")
}

/// Retrieve [`Config`] from the defaults, the configuration file and the environment.
#[tracing::instrument]
pub fn load_config() -> Result<Config, ConfigError> {
    let config = defaults()?
        .add_source(config::File::with_name("config").required(false))
        .add_source(config::Environment::with_prefix("app").separator("__"))
        .build()?
        .try_deserialize()?;
    tracing::debug!(?config, "Loaded configuration");
    Ok(config)
}
