//! Times sequential unary gRPC greet calls against an in-process tonic server.

use greet_bench::{
    infra::{config, logging},
    lifecycle,
};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let _guard = logging::init_logging();
    let config = config::load_config()?;

    let result = lifecycle::run_grpc(&config).await?;
    println!("{result}");

    Ok(())
}
