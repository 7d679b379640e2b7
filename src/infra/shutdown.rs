//! Waiting for the process to be asked to stop.

use tokio::signal;

/// Completes when SIGINT (ctrl-c) or, on unix, SIGTERM is received.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to fetch ctrl_c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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
    tracing::info!("Termination signal received");
}

#[cfg(all(test, unix))]
pub(crate) mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::signal::unix::SignalKind;

    /// Sends SIGTERM to this process.
    pub(crate) fn send_sigterm() {
        let status = std::process::Command::new("kill")
            .args(["-TERM", &std::process::id().to_string()])
            .status()
            .unwrap();
        assert!(status.success());
    }

    #[tokio::test]
    async fn completes_on_sigterm() {
        // Keeps tokio's handler installed so a SIGTERM never hits the default action.
        let _sigterm = signal::unix::signal(SignalKind::terminate()).unwrap();

        let waiting = tokio::spawn(shutdown_signal());
        tokio::time::sleep(Duration::from_millis(100)).await;
        send_sigterm();

        tokio::time::timeout(Duration::from_secs(5), waiting)
            .await
            .expect("signal future did not complete")
            .unwrap();
    }
}
