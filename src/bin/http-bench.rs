//! Times sequential HTTP greet requests against an in-process axum server.
//!
//! Once both batches are done the server keeps running until the process
//! receives SIGINT or SIGTERM.

use greet_bench::{
    infra::{config, logging, shutdown::shutdown_signal},
    lifecycle,
};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let _guard = logging::init_logging();
    let config = config::load_config()?;

    for result in lifecycle::run_http(&config, shutdown_signal()).await? {
        println!("{result}");
    }

    Ok(())
}
