//! Receiving end of a live category query

use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use super::ChangeBatch;

/// Stream of change batches for one live query
///
/// Batches are queued synchronously while the store commits a mutation and
/// are drained by the owner with [`Subscription::try_next`]. Dropping the
/// subscription (or calling [`Subscription::close`]) ends it; the store
/// forgets closed subscriptions on its next publish.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    receiver: UnboundedReceiver<ChangeBatch>,
}

impl Subscription {
    pub(crate) fn channel(id: u64) -> (UnboundedSender<ChangeBatch>, Self) {
        let (sender, receiver) = tokio::sync::mpsc::unbounded_channel();
        (sender, Self { id, receiver })
    }

    /// Store-assigned identifier, stable for the subscription's lifetime
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Next queued batch, if any
    ///
    /// Returns `None` when nothing is pending or the store has gone away.
    pub fn try_next(&mut self) -> Option<ChangeBatch> {
        match self.receiver.try_recv() {
            Ok(batch) => Some(batch),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                tracing::debug!(subscription = self.id, "Live query source disconnected");
                None
            }
        }
    }

    /// Drain every queued batch in delivery order
    pub fn drain(&mut self) -> Vec<ChangeBatch> {
        std::iter::from_fn(|| self.try_next()).collect()
    }

    /// Stop receiving batches
    pub fn close(&mut self) {
        self.receiver.close();
    }
}
