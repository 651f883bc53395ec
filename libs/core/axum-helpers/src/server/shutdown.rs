use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info};

/// Shutdown coordinator that manages graceful application shutdown.
///
/// Receives SIGTERM/SIGINT once and broadcasts the shutdown to every
/// subscriber (the HTTP server and the cleanup task).
#[derive(Clone)]
pub struct ShutdownCoordinator {
    tx: broadcast::Sender<()>,
    shutdown_initiated: Arc<AtomicBool>,
}

impl ShutdownCoordinator {
    /// Create a new shutdown coordinator.
    ///
    /// Returns the coordinator and a receiver for shutdown signals.
    pub fn new() -> (Self, broadcast::Receiver<()>) {
        let (tx, rx) = broadcast::channel(1);
        let coordinator = Self {
            tx,
            shutdown_initiated: Arc::new(AtomicBool::new(false)),
        };
        (coordinator, rx)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutdown_initiated.load(Ordering::Relaxed)
    }

    /// Initiate shutdown and notify all subscribers. Only the first call broadcasts.
    pub fn shutdown(&self) {
        if self
            .shutdown_initiated
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            info!("Initiating graceful shutdown");
            let _ = self.tx.send(());
        }
    }

    /// Wait for SIGTERM or SIGINT, then initiate shutdown.
    pub async fn wait_for_signal(&self) {
        shutdown_signal().await;
        self.shutdown();
    }

    /// Resolves once shutdown has been initiated by any clone.
    pub async fn wait_for_shutdown(&self) {
        let mut rx = self.subscribe();
        if self.is_shutting_down() {
            return;
        }
        let _ = rx.recv().await;
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new().0
    }
}

/// Resolves on Ctrl+C or SIGTERM.
///
/// Can be passed to `axum::serve().with_graceful_shutdown()`. A handler that
/// cannot be installed is logged and never fires.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
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
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully");
        },
        _ = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully");
        },
    }
}
