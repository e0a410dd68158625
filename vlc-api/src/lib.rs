//! Handle-safe access to the native libvlc media player surface
//!
//! This crate wraps a [`NativeEngine`] (the raw call surface exposed by a
//! binding layer) in a [`VlcManager`] that validates handles, turns null
//! constructor results into typed errors and owns every native release call.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::path::Path;
//! use vlc_api::VlcManager;
//!
//! let manager = VlcManager::new(engine);
//! let context = manager.acquire_context(&["--quiet".to_string()])?;
//! let player = manager.create_player(context)?;
//!
//! let media = manager.new_media_path(context, Path::new("movie.mkv"))?;
//! manager.set_media(player, media)?;
//! manager.play(player)?;
//!
//! for filter in manager.video_filters()? {
//!     println!("{}: {}", filter.name, filter.long_name);
//! }
//! ```
//!
//! Higher-level ownership (media bookkeeping, events, disposal) lives in the
//! `vlc-sdk` crate.

pub mod engine;
pub mod error;
pub mod event;
pub mod filter;
pub mod handle;
pub mod manager;
pub mod snapshot;
pub mod types;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use engine::NativeEngine;
pub use error::{Result, VlcError};
pub use event::{EventKind, NativeCallback, RawEvent, RawPayload};
pub use filter::{FilterCategory, FilterModule, ModuleNode};
pub use handle::{
    ContextHandle, DialogHandle, EventManagerHandle, MediaHandle, ModuleListHandle, NativeHandle,
    PlayerHandle,
};
pub use manager::VlcManager;
pub use snapshot::SnapshotSize;
pub use types::{DialogAction, MediaState, NavigateMode, TrackType};
