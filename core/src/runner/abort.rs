use std::sync::Arc;

use tokio::sync::watch;

/// Requests cancellation of everything holding a matching [`AbortSignal`].
#[derive(Debug, Clone)]
pub struct AbortHandle {
    tx: Arc<watch::Sender<Option<String>>>,
}

/// Observes an [`AbortHandle`]. Cheap to clone, one per in-flight task.
#[derive(Debug, Clone)]
pub struct AbortSignal {
    rx: watch::Receiver<Option<String>>,
}

impl Default for AbortHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl AbortHandle {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    pub fn signal(&self) -> AbortSignal {
        AbortSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// The first reason wins; later calls are ignored.
    pub fn abort(&self, reason: impl Into<String>) {
        let reason = reason.into();
        self.tx.send_if_modified(|cur| {
            if cur.is_some() {
                return false;
            }
            *cur = Some(reason);
            true
        });
    }

    pub fn is_aborted(&self) -> bool {
        self.tx.borrow().is_some()
    }
}

impl AbortSignal {
    /// A signal that never fires.
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(None);
        Self { rx }
    }

    pub fn is_aborted(&self) -> bool {
        self.rx.borrow().is_some()
    }

    pub fn reason(&self) -> Option<String> {
        self.rx.borrow().clone()
    }

    /// Resolves with the abort reason once the handle fires.
    pub async fn aborted(&self) -> String {
        let mut rx = self.rx.clone();
        loop {
            if let Some(reason) = rx.borrow_and_update().clone() {
                return reason;
            }
            if rx.changed().await.is_err() {
                // Handle dropped without aborting.
                std::future::pending::<()>().await;
            }
        }
    }
}
