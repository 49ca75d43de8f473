//! Shutdown coordination.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Coordinator for graceful shutdown.
///
/// Clones share one signal. The HTTP server and any background task
/// subscribe; the signal handler (or a test) triggers.
#[derive(Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
    triggered: Arc<AtomicBool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self {
            tx,
            triggered: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal. Later calls are no-ops.
    pub fn trigger(&self) {
        if !self.triggered.swap(true, Ordering::SeqCst) {
            tracing::info!(subscribers = self.tx.receiver_count(), "Shutdown triggered");
            let _ = self.tx.send(());
        }
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }

    /// Resolve once shutdown is triggered, including before this call.
    pub fn wait(&self) -> impl std::future::Future<Output = ()> + Send + 'static {
        let mut rx = self.subscribe();
        let triggered = self.triggered.clone();
        async move {
            if triggered.load(Ordering::SeqCst) {
                return;
            }
            let _ = rx.recv().await;
        }
    }

    /// Number of active subscribers (tasks still running).
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
