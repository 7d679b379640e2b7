//! Running the service endpoints in the background.
//!
//! Starting an endpoint binds its listener, spawns the server task and waits
//! for the task to report that it is running. The listener is bound before the
//! task is spawned, so connections made as soon as `start_*` returns queue in
//! the accept backlog until the server polls it.

use crate::{api::grpc::tonic_server, infra::error::BenchError};
use axum::Router;
use std::{future::Future, net::SocketAddr, time::Duration};
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};

/// A running endpoint.
///
/// Dropping the handle aborts the server task.
#[derive(Debug)]
pub struct Endpoint {
    name: &'static str,
    local_addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<Result<(), BenchError>>,
}

impl Endpoint {
    /// The address the listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stops accepting connections and waits for in-flight requests to finish.
    ///
    /// If that takes longer than `deadline` the server task is aborted and
    /// [`BenchError::ShutdownTimeout`] is returned.
    pub async fn shutdown(mut self, deadline: Duration) -> Result<(), BenchError> {
        tracing::info!("Shutting down {} server", self.name);
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        match tokio::time::timeout(deadline, &mut self.task).await {
            Ok(result) => result?,
            Err(_) => {
                self.task.abort();
                tracing::error!("{} server did not drain within {:?}", self.name, deadline);
                Err(BenchError::ShutdownTimeout(deadline))
            }
        }
    }
}

impl Drop for Endpoint {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn bind(addr: SocketAddr) -> Result<TcpListener, BenchError> {
    TcpListener::bind(addr).await.map_err(|source| BenchError::Bind {
        addr: addr.to_string(),
        source,
    })
}

/// Spawns `serve` and waits until the task it runs on has started.
async fn spawn<F, Fut>(
    name: &'static str,
    listener: TcpListener,
    serve: F,
) -> Result<Endpoint, BenchError>
where
    F: FnOnce(TcpListener, oneshot::Receiver<()>) -> Fut,
    Fut: Future<Output = Result<(), BenchError>> + Send + 'static,
{
    let local_addr = listener.local_addr().map_err(|source| BenchError::Bind {
        addr: name.to_string(),
        source,
    })?;
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let (ready_tx, ready_rx) = oneshot::channel();
    let server = serve(listener, shutdown_rx);
    let task = tokio::spawn(async move {
        tracing::info!("Starting {} on {}", name, local_addr);
        let _ = ready_tx.send(());
        server.await
    });
    let mut endpoint = Endpoint {
        name,
        local_addr,
        shutdown: Some(shutdown_tx),
        task,
    };
    if ready_rx.await.is_err() {
        // The task ended before signalling, surface whatever it returned.
        (&mut endpoint.task).await??;
        return Err(BenchError::Serve {
            name,
            message: "exited before it was ready".to_string(),
        });
    }
    Ok(endpoint)
}

/// Binds `addr` and serves the axum `app` on it.
pub async fn start_http(addr: SocketAddr, app: Router) -> Result<Endpoint, BenchError> {
    let listener = bind(addr).await?;
    spawn("axum", listener, |listener, shutdown| async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.await;
            })
            .await
            .map_err(|e| BenchError::Serve {
                name: "axum",
                message: e.to_string(),
            })
    })
    .await
}

/// Binds `addr` and serves the gRPC greeter on it.
pub async fn start_grpc(addr: SocketAddr) -> Result<Endpoint, BenchError> {
    let listener = bind(addr).await?;
    spawn("tonic", listener, |listener, shutdown| async move {
        tonic_server(listener, async move {
            let _ = shutdown.await;
        })
        .await
        .map_err(|e| BenchError::Serve {
            name: "tonic",
            message: e.to_string(),
        })
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::{
            grpc::greet::{greeter_client::GreeterClient, GreetRequest},
            rest::greeting_api::GreetMessage,
        },
        app::app,
    };
    use axum::routing::get;
    use std::sync::Arc;
    use tokio::{sync::Notify, time::Instant};

    fn any_port() -> SocketAddr {
        "127.0.0.1:0".parse().unwrap()
    }

    /// The greet app plus a `/slow` route that sleeps for `delay`.
    fn slow_app(delay: Duration, started: Arc<Notify>) -> Router {
        app().route(
            "/slow",
            get(move || {
                let started = started.clone();
                async move {
                    started.notify_one();
                    tokio::time::sleep(delay).await;
                    "done"
                }
            }),
        )
    }

    #[tokio::test]
    async fn binding_a_used_port_fails() {
        let first = start_http(any_port(), app()).await.unwrap();
        let err = start_http(first.local_addr(), app()).await.unwrap_err();
        assert!(matches!(err, BenchError::Bind { .. }));
    }

    #[tokio::test]
    async fn http_serves_after_start() {
        let endpoint = start_http(any_port(), app()).await.unwrap();
        let reply: GreetMessage = reqwest::Client::new()
            .get(format!("http://{}/", endpoint.local_addr()))
            .json(&GreetMessage::new("World"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!("Hello World", reply.message());
    }

    #[tokio::test]
    async fn idle_shutdown_completes_before_deadline() {
        let endpoint = start_http(any_port(), app()).await.unwrap();
        let addr = endpoint.local_addr();
        let started = Instant::now();
        endpoint.shutdown(Duration::from_secs(5)).await.unwrap();
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(reqwest::get(format!("http://{addr}/")).await.is_err());
    }

    #[tokio::test]
    async fn shutdown_waits_for_in_flight_request() {
        let started = Arc::new(Notify::new());
        let endpoint = start_http(
            any_port(),
            slow_app(Duration::from_millis(300), started.clone()),
        )
        .await
        .unwrap();
        let url = format!("http://{}/slow", endpoint.local_addr());
        let request = tokio::spawn(async move {
            let response = reqwest::get(url).await.unwrap();
            response.text().await.unwrap()
        });

        started.notified().await;
        endpoint.shutdown(Duration::from_secs(5)).await.unwrap();

        assert_eq!("done", request.await.unwrap());
    }

    #[tokio::test]
    async fn shutdown_is_forced_at_deadline() {
        let started = Arc::new(Notify::new());
        let endpoint = start_http(
            any_port(),
            slow_app(Duration::from_secs(30), started.clone()),
        )
        .await
        .unwrap();
        let url = format!("http://{}/slow", endpoint.local_addr());
        let _request = tokio::spawn(reqwest::get(url));

        started.notified().await;
        let deadline = Duration::from_millis(200);
        let begin = Instant::now();
        let err = endpoint.shutdown(deadline).await.unwrap_err();

        assert!(matches!(err, BenchError::ShutdownTimeout(d) if d == deadline));
        assert!(begin.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn grpc_greets_on_ephemeral_port() {
        let endpoint = start_grpc(any_port()).await.unwrap();
        let mut client = GreeterClient::connect(format!("http://{}", endpoint.local_addr()))
            .await
            .unwrap();

        let started = Instant::now();
        for _ in 0..100 {
            let reply = client
                .greet(GreetRequest {
                    name: "World".to_string(),
                })
                .await
                .unwrap();
            assert_eq!("Hello World", reply.into_inner().message);
        }
        assert!(started.elapsed() < Duration::from_secs(30));

        drop(client);
        endpoint.shutdown(Duration::from_secs(5)).await.unwrap();
    }
}
