//! Sync iterator for consuming player events
//!
//! Provides a blocking iterator interface for processing events
//! without registering a callback.

use std::sync::{mpsc, Arc};
use std::time::Duration;

use parking_lot::Mutex;

use crate::error::{EventManagerError, Result};
use crate::event::PlayerEvent;

/// Blocking iterator over player events
///
/// This iterator blocks on `next()` until an event is available or the
/// registry stops delivering (unregistered or dropped). Use `try_recv()` for
/// non-blocking access. Clones share one stream.
pub struct EventIterator {
    rx: Arc<Mutex<mpsc::Receiver<PlayerEvent>>>,
}

impl EventIterator {
    pub(crate) fn new(rx: mpsc::Receiver<PlayerEvent>) -> Self {
        Self {
            rx: Arc::new(Mutex::new(rx)),
        }
    }

    /// Block until an event is available
    ///
    /// Returns `None` once the registry stopped delivering.
    pub fn recv(&self) -> Option<PlayerEvent> {
        self.rx.lock().recv().ok()
    }

    /// Block until an event is available, reporting a closed stream as an error
    pub fn next_event(&self) -> Result<PlayerEvent> {
        self.recv().ok_or(EventManagerError::ChannelClosed)
    }

    /// Try to receive an event without blocking
    pub fn try_recv(&self) -> Option<PlayerEvent> {
        self.rx.lock().try_recv().ok()
    }

    /// Block until an event is available or timeout expires
    pub fn recv_timeout(&self, timeout: Duration) -> Option<PlayerEvent> {
        self.rx.lock().recv_timeout(timeout).ok()
    }

    /// Non-blocking iterator over currently available events
    pub fn try_iter(&self) -> TryIterator<'_> {
        TryIterator { inner: self }
    }

    /// Blocking iterator that waits up to `timeout` for each event
    pub fn timeout_iter(&self, timeout: Duration) -> TimeoutIterator<'_> {
        TimeoutIterator {
            inner: self,
            timeout,
        }
    }
}

impl Iterator for EventIterator {
    type Item = PlayerEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.recv()
    }
}

impl Clone for EventIterator {
    fn clone(&self) -> Self {
        Self {
            rx: Arc::clone(&self.rx),
        }
    }
}

/// Non-blocking iterator over currently available events
pub struct TryIterator<'a> {
    inner: &'a EventIterator,
}

impl<'a> Iterator for TryIterator<'a> {
    type Item = PlayerEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.try_recv()
    }
}

/// Blocking iterator with timeout
pub struct TimeoutIterator<'a> {
    inner: &'a EventIterator,
    timeout: Duration,
}

impl<'a> Iterator for TimeoutIterator<'a> {
    type Item = PlayerEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.recv_timeout(self.timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_recv_empty() {
        let (tx, rx) = mpsc::channel();
        let iter = EventIterator::new(rx);

        assert!(iter.try_recv().is_none());

        drop(tx);
    }

    #[test]
    fn test_recv_timeout_empty() {
        let (tx, rx) = mpsc::channel::<PlayerEvent>();
        let iter = EventIterator::new(rx);

        let start = std::time::Instant::now();
        let result = iter.recv_timeout(Duration::from_millis(50));
        assert!(result.is_none());
        assert!(start.elapsed() >= Duration::from_millis(45));

        drop(tx);
    }

    #[test]
    fn test_try_iter_drains_in_order() {
        let (tx, rx) = mpsc::channel();
        let iter = EventIterator::new(rx);

        tx.send(PlayerEvent::Opening).unwrap();
        tx.send(PlayerEvent::Playing).unwrap();

        let events: Vec<_> = iter.try_iter().collect();
        assert_eq!(events, vec![PlayerEvent::Opening, PlayerEvent::Playing]);
    }

    #[test]
    fn test_closed_channel() {
        let (tx, rx) = mpsc::channel::<PlayerEvent>();
        let iter = EventIterator::new(rx);
        drop(tx);

        assert!(iter.recv().is_none());
        assert_eq!(iter.next_event(), Err(EventManagerError::ChannelClosed));
    }

    #[test]
    fn test_clones_share_stream() {
        let (tx, rx) = mpsc::channel();
        let iter1 = EventIterator::new(rx);
        let iter2 = iter1.clone();

        tx.send(PlayerEvent::Paused).unwrap();
        assert_eq!(iter2.try_recv(), Some(PlayerEvent::Paused));
        assert!(iter1.try_recv().is_none());
    }
}
