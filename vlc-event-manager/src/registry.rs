//! Native callback registry for one media player
//!
//! The registry is the sole owner of the callback identities attached to a
//! player's native event manager. Every identity stays retained from the
//! moment it is attached until it has been detached again, so detaching is a
//! table lookup and always passes the exact `Arc` that was attached.
//!
//! Native callbacks run on engine threads. They enter through the shared
//! [`Dispatcher`], which checks an `active` guard flag before touching any
//! subscriber; `unregister_all` clears the flag before detaching.

use std::collections::BTreeSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{mpsc, Arc};

use dashmap::DashMap;
use parking_lot::Mutex;
use vlc_api::{EventKind, EventManagerHandle, NativeCallback, PlayerHandle, RawEvent, VlcManager};

use crate::error::{EventManagerError, Result};
use crate::event::PlayerEvent;
use crate::iter::EventIterator;

/// Unique identifier for a subscriber
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Get the raw ID value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Managed subscriber invoked on the native callback thread
pub type EventHandler = Arc<dyn Fn(&PlayerEvent) + Send + Sync>;

/// Subscriber table shared by every native callback of one registry
struct Dispatcher {
    active: AtomicBool,
    next_id: AtomicU64,
    subscribers: DashMap<EventKind, Vec<(SubscriptionId, EventHandler)>>,
    sinks: Mutex<Vec<mpsc::Sender<PlayerEvent>>>,
}

impl Dispatcher {
    fn new() -> Self {
        Self {
            active: AtomicBool::new(false),
            next_id: AtomicU64::new(1),
            subscribers: DashMap::new(),
            sinks: Mutex::new(Vec::new()),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Entry point of every native callback
    fn dispatch(&self, kind: EventKind, raw: &RawEvent) {
        if !self.active.load(Ordering::Acquire) {
            tracing::trace!("Dropping {} event: registry inactive", kind);
            return;
        }

        let event = match PlayerEvent::decode(kind, raw) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!("Dropping undecodable event: {}", e);
                return;
            }
        };

        // Snapshot the handlers so a subscriber may (un)subscribe reentrantly.
        let handlers: Vec<(SubscriptionId, EventHandler)> = self
            .subscribers
            .get(&kind)
            .map(|entry| entry.value().clone())
            .unwrap_or_default();

        for (id, handler) in handlers {
            if panic::catch_unwind(AssertUnwindSafe(|| handler(&event))).is_err() {
                tracing::error!("Subscriber {} panicked handling {} event", id, kind);
            }
        }

        self.sinks.lock().retain(|tx| tx.send(event.clone()).is_ok());
    }
}

/// Retained callback identities and the event manager they are attached to
#[derive(Default)]
struct Retained {
    event_manager: EventManagerHandle,
    callbacks: Vec<(EventKind, NativeCallback)>,
}

/// Event subscription registry for one media player
///
/// # Example
///
/// ```rust,ignore
/// use vlc_api::EventKind;
/// use vlc_event_manager::{EventRegistry, PlayerEvent};
///
/// let registry = EventRegistry::new();
/// registry.register_all(&manager, player)?;
///
/// registry.subscribe(EventKind::TimeChanged, |event| {
///     if let PlayerEvent::TimeChanged { time } = event {
///         println!("at {} ms", time);
///     }
/// });
///
/// for event in registry.iter() {
///     println!("{:?}", event);
/// }
///
/// registry.unregister_all(&manager);
/// ```
pub struct EventRegistry {
    dispatcher: Arc<Dispatcher>,
    retained: Mutex<Retained>,
}

impl EventRegistry {
    /// Create an empty, inactive registry
    pub fn new() -> Self {
        Self {
            dispatcher: Arc::new(Dispatcher::new()),
            retained: Mutex::new(Retained::default()),
        }
    }

    /// Attach one callback per event kind to the player's event manager
    ///
    /// A kind whose attach fails is logged and skipped; the remaining kinds
    /// are still attached. Failing to obtain the event manager itself is an
    /// error.
    pub fn register_all(
        &self,
        manager: &VlcManager,
        player: PlayerHandle,
    ) -> Result<EventManagerHandle> {
        let mut retained = self.retained.lock();
        if !retained.event_manager.is_null() {
            return Err(EventManagerError::AlreadyRegistered);
        }

        let event_manager = manager.player_event_manager(player)?;

        for kind in EventKind::ALL {
            let dispatcher = Arc::clone(&self.dispatcher);
            let callback: NativeCallback =
                Arc::new(move |event: &RawEvent| dispatcher.dispatch(kind, event));

            match manager.attach_event(event_manager, kind, &callback) {
                Ok(()) => retained.callbacks.push((kind, callback)),
                Err(e) => tracing::warn!("Skipping {} events on {}: {}", kind, player, e),
            }
        }

        retained.event_manager = event_manager;
        self.dispatcher.active.store(true, Ordering::Release);

        tracing::debug!(
            "Registered {}/{} event kinds on {}",
            retained.callbacks.len(),
            EventKind::ALL.len(),
            player
        );

        Ok(event_manager)
    }

    /// Detach every retained callback, in registration order, and release
    /// the event manager
    ///
    /// Never fails; detach failures are logged. Calling this on a registry
    /// that is not registered is a no-op. Returns the number of callbacks
    /// detached successfully.
    pub fn unregister_all(&self, manager: &VlcManager) -> usize {
        let mut retained = self.retained.lock();
        if retained.event_manager.is_null() {
            return 0;
        }

        self.dispatcher.active.store(false, Ordering::Release);

        let event_manager = retained.event_manager;
        let mut detached = 0;
        for (kind, callback) in retained.callbacks.drain(..) {
            match manager.detach_event(event_manager, kind, &callback) {
                Ok(()) => detached += 1,
                Err(e) => tracing::warn!("Ignoring detach failure: {}", e),
            }
        }

        manager.release_event_manager(event_manager);
        retained.event_manager = EventManagerHandle::NULL;

        // Ends every blocking iterator.
        self.dispatcher.sinks.lock().clear();

        tracing::debug!("Unregistered {} event callbacks", detached);
        detached
    }

    /// Add a subscriber for one event kind
    pub fn subscribe<F>(&self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: Fn(&PlayerEvent) + Send + Sync + 'static,
    {
        let id = self.dispatcher.next_id();
        let handler: EventHandler = Arc::new(handler);
        self.dispatcher
            .subscribers
            .entry(kind)
            .or_default()
            .push((id, handler));
        id
    }

    /// Add one subscriber for every event kind
    pub fn subscribe_all<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&PlayerEvent) + Send + Sync + 'static,
    {
        let id = self.dispatcher.next_id();
        let handler: EventHandler = Arc::new(handler);
        for kind in EventKind::ALL {
            self.dispatcher
                .subscribers
                .entry(kind)
                .or_default()
                .push((id, Arc::clone(&handler)));
        }
        id
    }

    /// Remove a subscriber; `false` if the id was unknown
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut removed = false;
        for mut entry in self.dispatcher.subscribers.iter_mut() {
            let before = entry.len();
            entry.retain(|(sub, _)| *sub != id);
            removed |= entry.len() != before;
        }
        removed
    }

    /// Number of distinct subscribers
    pub fn subscriber_count(&self) -> usize {
        let ids: BTreeSet<SubscriptionId> = self
            .dispatcher
            .subscribers
            .iter()
            .flat_map(|entry| entry.value().iter().map(|(id, _)| *id).collect::<Vec<_>>())
            .collect();
        ids.len()
    }

    /// Get a blocking iterator over events delivered from now on
    ///
    /// The iterator ends when the registry is unregistered or dropped.
    pub fn iter(&self) -> EventIterator {
        let (tx, rx) = mpsc::channel();
        self.dispatcher.sinks.lock().push(tx);
        EventIterator::new(rx)
    }

    /// Kinds with a retained, attached callback, in registration order
    pub fn registered_kinds(&self) -> Vec<EventKind> {
        self.retained
            .lock()
            .callbacks
            .iter()
            .map(|(kind, _)| *kind)
            .collect()
    }

    /// Number of retained callback identities
    pub fn retained_count(&self) -> usize {
        self.retained.lock().callbacks.len()
    }

    /// The attached event manager, if registered
    pub fn event_manager(&self) -> Option<EventManagerHandle> {
        let handle = self.retained.lock().event_manager;
        (!handle.is_null()).then_some(handle)
    }

    /// Whether native callbacks are currently delivered to subscribers
    pub fn is_active(&self) -> bool {
        self.dispatcher.active.load(Ordering::Acquire)
    }
}

impl Default for EventRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for EventRegistry {
    fn drop(&mut self) {
        let retained = self.retained.get_mut();
        if !retained.callbacks.is_empty() {
            // Without the manager nothing can be detached; callbacks stay
            // inert once the guard flag is cleared.
            self.dispatcher.active.store(false, Ordering::Release);
            tracing::warn!(
                "EventRegistry dropped with {} callbacks still attached",
                retained.callbacks.len()
            );
        }
    }
}

impl std::fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let retained = self.retained.lock();
        f.debug_struct("EventRegistry")
            .field("event_manager", &retained.event_manager)
            .field("retained", &retained.callbacks.len())
            .field("active", &self.is_active())
            .finish()
    }
}
