//! Cancellation signalling for in-flight generations.
//!
//! The transport layer holds the [`CancelHandle`] for a client connection;
//! when the connection drops it cancels, and the generation task observes
//! the [`CancelSignal`] between chunks.

use once_cell::sync::Lazy;
use tokio::sync::watch;

/// Shared channel backing [`CancelSignal::never`]; the sender is kept alive
/// for the process lifetime so the signal can never fire or close.
static NEVER: Lazy<(watch::Sender<bool>, watch::Receiver<bool>)> =
    Lazy::new(|| watch::channel(false));

/// Sender side: cancels the associated generation.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Requests cancellation. Idempotent.
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

/// Receiver side: observed by the generation task.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    rx: watch::Receiver<bool>,
}

impl CancelSignal {
    /// A signal that never fires, for callers with no client to lose.
    pub fn never() -> Self {
        Self {
            rx: NEVER.1.clone(),
        }
    }

    /// True once cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves when cancellation is requested. If the handle is dropped
    /// without cancelling, pends forever.
    pub async fn cancelled(&mut self) {
        loop {
            if *self.rx.borrow() {
                return;
            }
            if self.rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Creates a linked cancel handle and signal.
pub fn cancellation() -> (CancelHandle, CancelSignal) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelSignal { rx })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn signal_observes_cancel() {
        let (handle, mut signal) = cancellation();
        assert!(!signal.is_cancelled());

        handle.cancel();
        signal.cancelled().await;
        assert!(signal.is_cancelled());
    }

    #[tokio::test]
    async fn cancel_is_idempotent() {
        let (handle, signal) = cancellation();
        handle.cancel();
        handle.cancel();
        assert!(signal.is_cancelled());
    }

    #[tokio::test]
    async fn dropped_handle_without_cancel_never_fires() {
        let (handle, mut signal) = cancellation();
        drop(handle);

        let waited =
            tokio::time::timeout(Duration::from_millis(20), signal.cancelled()).await;
        assert!(waited.is_err());
        assert!(!signal.is_cancelled());
    }

    #[tokio::test]
    async fn never_signal_stays_quiet() {
        let mut signal = CancelSignal::never();
        let waited =
            tokio::time::timeout(Duration::from_millis(20), signal.cancelled()).await;
        assert!(waited.is_err());
    }
}
