//! gRPC API implementation with tonic.

use self::{greet::greeter_server::GreeterServer, greeter::GreeterService};
use std::future::Future;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;

pub mod greet;
pub mod greeter;

/// Serves the greeter on an already bound listener until `shutdown` completes.
pub async fn tonic_server(
    listener: TcpListener,
    shutdown: impl Future<Output = ()> + Send,
) -> Result<(), tonic::transport::Error> {
    tonic::transport::Server::builder()
        .trace_fn(|req| tracing::debug_span!("grpc", path = %req.uri().path()))
        .add_service(GreeterServer::new(GreeterService::default()))
        .serve_with_incoming_shutdown(TcpListenerStream::new(listener), shutdown)
        .await
}
