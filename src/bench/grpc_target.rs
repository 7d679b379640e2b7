//! Drives the gRPC greeter.

use super::Target;
use crate::{
    api::grpc::greet::{greeter_client::GreeterClient, GreetRequest},
    infra::error::{BenchError, CallError},
};
use async_trait::async_trait;
use std::net::SocketAddr;
use tonic::transport::Channel;

/// Calls `Greet` over a single persistent channel.
#[derive(Clone, Debug)]
pub struct GrpcGreetTarget {
    client: GreeterClient<Channel>,
    name: String,
}

impl GrpcGreetTarget {
    /// Connects to the greeter listening on `addr`.
    pub async fn connect(addr: SocketAddr, name: impl Into<String>) -> Result<Self, BenchError> {
        let uri = format!("http://{addr}");
        tracing::debug!("Connecting to {}", uri);
        let client = GreeterClient::connect(uri.clone())
            .await
            .map_err(|source| BenchError::Dial { addr: uri, source })?;
        Ok(Self {
            client,
            name: name.into(),
        })
    }
}

#[async_trait]
impl Target for GrpcGreetTarget {
    async fn call(&mut self) -> Result<(), CallError> {
        let request = GreetRequest {
            name: self.name.clone(),
        };
        self.client.greet(request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn dial_failure_is_reported() {
        // Grab a free port and release it so nothing is listening there.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = GrpcGreetTarget::connect(addr, "World").await.unwrap_err();
        assert!(matches!(err, BenchError::Dial { .. }));
    }
}
