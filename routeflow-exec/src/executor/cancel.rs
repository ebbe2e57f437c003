use std::sync::Arc;

use tokio::sync::watch;

/// Cooperative cancellation flag shared by one run.
///
/// Cancellation is best-effort: the run loop and the poller check the token
/// at iteration and wait boundaries; in-flight network calls are not
/// force-aborted.
#[derive(Debug, Clone)]
pub struct CancelToken {
    tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            tx: Arc::new(tx),
            rx,
        }
    }

    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once the token is cancelled.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        if *rx.borrow() {
            return;
        }
        while rx.changed().await.is_ok() {
            if *rx.borrow() {
                return;
            }
        }
        // Sender kept alive by this token; reaching here means every clone
        // was dropped, so nothing can cancel any more.
        std::future::pending::<()>().await;
    }
}
