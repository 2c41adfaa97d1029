// ── Reactive state cell ──
//
// Watch-channel storage for one store's state. Reads are snapshots,
// mutations broadcast to every subscriber, and nothing here knows what
// the state actually is.

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// Observer-pattern state container: snapshot reads plus push-based
/// change notification.
///
/// `send_modify` broadcasts unconditionally, even with zero receivers,
/// so a store works identically whether or not a UI is watching it.
pub(crate) struct StoreCell<S> {
    tx: watch::Sender<S>,
}

impl<S: Clone + Send + Sync + 'static> StoreCell<S> {
    pub(crate) fn new(initial: S) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    /// Current state, cloned.
    pub(crate) fn snapshot(&self) -> S {
        self.tx.borrow().clone()
    }

    /// Subscribe to state changes.
    pub(crate) fn subscribe(&self) -> watch::Receiver<S> {
        self.tx.subscribe()
    }

    /// Subscribe as a `Stream` of snapshots for combinator-style consumers.
    pub(crate) fn stream(&self) -> WatchStream<S> {
        WatchStream::new(self.tx.subscribe())
    }

    /// Mutate the state in place and notify subscribers.
    pub(crate) fn update(&self, f: impl FnOnce(&mut S)) {
        self.tx.send_modify(f);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_updates() {
        let cell = StoreCell::new(0u32);
        assert_eq!(cell.snapshot(), 0);

        cell.update(|v| *v += 1);
        assert_eq!(cell.snapshot(), 1);
    }

    #[tokio::test]
    async fn subscribers_observe_changes() {
        let cell = StoreCell::new(0u32);
        let mut rx = cell.subscribe();

        cell.update(|v| *v = 7);

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 7);
    }

    #[test]
    fn updates_without_subscribers_do_not_panic() {
        let cell = StoreCell::new(String::new());
        cell.update(|s| s.push('x'));
        assert_eq!(cell.snapshot(), "x");
    }
}
