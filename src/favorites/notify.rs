//! Favorites change notification
//!
//! A broadcast "something changed" signal. Views subscribe explicitly and
//! reload their own copy of the collection when it fires.

use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::trace;

use super::FavoritesStore;
use crate::models::Article;

/// Pending signals a slow subscriber may fall behind by before lagging
const CHANNEL_CAPACITY: usize = 16;

/// Argument-less signal sent after every add, remove and clear
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FavoritesChanged;

/// Sending half of the change channel
#[derive(Debug, Clone)]
pub struct ChangeNotifier {
    sender: broadcast::Sender<FavoritesChanged>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Broadcast a change. No-op when nobody is listening.
    pub fn notify(&self) {
        let receivers = self.sender.send(FavoritesChanged).unwrap_or(0);
        trace!(receivers, "Favorites change broadcast");
    }

    /// Raw receiver, for callers that await changes asynchronously.
    pub fn subscribe(&self) -> broadcast::Receiver<FavoritesChanged> {
        self.sender.subscribe()
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

/// A subscriber's own copy of the favorites collection
///
/// Holds the snapshot taken at the last refresh; call
/// [`refresh_if_changed`](Self::refresh_if_changed) to catch up.
pub struct FavoritesView {
    receiver: broadcast::Receiver<FavoritesChanged>,
    snapshot: Vec<Article>,
}

impl FavoritesView {
    pub(super) fn new(
        receiver: broadcast::Receiver<FavoritesChanged>,
        snapshot: Vec<Article>,
    ) -> Self {
        Self { receiver, snapshot }
    }

    /// Drain pending signals and reload from `store` if any arrived.
    ///
    /// Returns whether the snapshot was reloaded.
    pub fn refresh_if_changed(&mut self, store: &FavoritesStore) -> bool {
        let mut changed = false;
        loop {
            match self.receiver.try_recv() {
                Ok(FavoritesChanged) => changed = true,
                Err(TryRecvError::Lagged(_)) => changed = true,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        if changed {
            self.snapshot = store.load_favorites();
        }
        changed
    }

    /// Articles as of the last refresh
    pub fn favorites(&self) -> &[Article] {
        &self.snapshot
    }

    /// Badge count as of the last refresh
    pub fn count(&self) -> usize {
        self.snapshot.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notify_without_subscribers_is_noop() {
        let notifier = ChangeNotifier::new();
        assert_eq!(notifier.subscriber_count(), 0);
        notifier.notify();
    }

    #[test]
    fn test_each_subscriber_gets_signal() {
        let notifier = ChangeNotifier::new();
        let mut a = notifier.subscribe();
        let mut b = notifier.subscribe();

        notifier.notify();

        assert_eq!(a.try_recv().unwrap(), FavoritesChanged);
        assert_eq!(b.try_recv().unwrap(), FavoritesChanged);
        assert!(a.try_recv().is_err());
    }
}
