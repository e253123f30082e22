//! Session-change notifications pushed by a backend.

use tp_core::Identity;

use log::{debug, warn};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

const EVENT_CAPACITY: usize = 16;

/// Publishing side, owned by a backend adapter
#[derive(Debug, Clone)]
pub struct SessionEvents {
    tx: broadcast::Sender<Option<Identity>>,
}

impl SessionEvents {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self { tx }
    }

    /// Send to every live subscriber. Nobody listening is not an error.
    pub fn publish(&self, identity: Option<Identity>) {
        let receivers = self.tx.send(identity).unwrap_or(0);
        debug!("Published session change to {receivers} subscriber(s)");
    }

    pub fn subscribe(&self) -> SessionSubscription {
        SessionSubscription {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving side. Dropping it unsubscribes.
#[derive(Debug)]
pub struct SessionSubscription {
    rx: broadcast::Receiver<Option<Identity>>,
}

impl SessionSubscription {
    /// Next session change, or `None` once the backend is gone.
    ///
    /// A reader that fell behind skips ahead to the oldest retained event.
    pub async fn next(&mut self) -> Option<Option<Identity>> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Session listener lagged, skipped {skipped} event(s)");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}
