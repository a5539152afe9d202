use tokio::{signal, sync::watch};
use tracing::info;

/// Resolves on Ctrl-C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to listen for Ctrl-C");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Fan-out of a single shutdown event to every running server.
#[derive(Debug, Clone)]
pub struct Shutdown {
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    /// Broadcasts the shutdown once `trigger` resolves.
    pub fn on<F>(trigger: F) -> Self
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let (tx, rx) = watch::channel(false);
        tokio::spawn(async move {
            trigger.await;
            info!("Shutdown signal received, stopping servers");
            let _ = tx.send(true);
        });
        Self { rx }
    }

    pub async fn wait(mut self) {
        // A dropped sender also means nothing is left to wait for
        let _ = self.rx.wait_for(|stopped| *stopped).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn test_trigger_reaches_every_clone() {
        let (tx, rx) = oneshot::channel::<()>();
        let shutdown = Shutdown::on(async move {
            let _ = rx.await;
        });

        let first = tokio::spawn(shutdown.clone().wait());
        let second = tokio::spawn(shutdown.wait());

        tx.send(()).unwrap();

        tokio::time::timeout(Duration::from_secs(5), async {
            first.await.unwrap();
            second.await.unwrap();
        })
        .await
        .unwrap();
    }
}
