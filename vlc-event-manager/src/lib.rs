//! # VLC Event Manager
//!
//! Bridges native media player callbacks into typed, managed events.
//!
//! ## Overview
//!
//! A native media player reports state changes by invoking callbacks that
//! were attached to its event manager, one per event kind, from engine
//! threads. [`EventRegistry`] owns those callback identities for the
//! player's whole lifetime and reverses every attach in lockstep on
//! teardown.
//!
//! ## Key Features
//!
//! - **Retained identities**: each attached callback is kept in a table
//!   keyed by event kind, so detaching passes the exact same identity
//! - **Best-effort registration**: an event kind that fails to attach is
//!   logged and skipped without aborting the others
//! - **Guarded dispatch**: a flag checked on every callback stops delivery
//!   as soon as unregistration starts
//! - **Typed events**: raw native payloads are decoded into [`PlayerEvent`]
//! - **Sync iteration**: [`EventIterator`] offers blocking, timed and
//!   non-blocking consumption without callbacks
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vlc_api::{EventKind, VlcManager};
//! use vlc_event_manager::{EventRegistry, PlayerEvent};
//!
//! let registry = EventRegistry::new();
//! registry.register_all(&manager, player)?;
//!
//! registry.subscribe(EventKind::EndReached, |_| println!("done"));
//!
//! let events = registry.iter();
//! while let Some(event) = events.recv_timeout(std::time::Duration::from_secs(1)) {
//!     println!("{:?}", event);
//! }
//!
//! registry.unregister_all(&manager);
//! ```

pub mod error;
pub mod event;
pub mod iter;
pub mod registry;

pub use error::{EventManagerError, Result};
pub use event::PlayerEvent;
pub use iter::EventIterator;
pub use registry::{EventHandler, EventRegistry, SubscriptionId};

// Re-export commonly used types from dependencies
pub use vlc_api::{EventKind, TrackType};
