//! # VLC SDK - deterministic media player facade
//!
//! Provides a sync-first media player API over a native libvlc binding:
//!
//! ```rust,ignore
//! use vlc_sdk::{EventKind, PlayerEvent, VlcSystem};
//!
//! fn main() -> Result<(), vlc_sdk::SdkError> {
//!     vlc_sdk::logging::init_logging_from_env().ok();
//!
//!     let system = VlcSystem::new(engine);
//!     let player = system.create_player()?;
//!
//!     player.events().subscribe(EventKind::TimeChanged, |event| {
//!         if let PlayerEvent::TimeChanged { time } = event {
//!             println!("{} ms", time);
//!         }
//!     });
//!
//!     player.play_source("file:///movies/big_buck_bunny.mp4", &[])?;
//!     player.take_snapshot("/tmp/frame.png")?;
//!
//!     player.dispose();
//!     Ok(())
//! }
//! ```
//!
//! ## Key Features
//!
//! - **Single owner per native handle**: a player's handle, event callbacks
//!   and loaded media are released exactly once, by `dispose` or on drop
//! - **Ordered teardown**: events are detached before playback is stopped,
//!   media is disposed before the player, the player before the context
//! - **Capability views**: chapters, subtitles, video, audio and dialogs are
//!   borrowed views that cannot outlive their player
//! - **Typed events**: native callbacks decoded into [`PlayerEvent`], via
//!   subscribers or a blocking iterator
//!
//! ## Architecture
//!
//! ```text
//! vlc-sdk (VlcSystem, MediaPlayer, Media, MediaLedger)
//!     ↓
//! vlc-event-manager (EventRegistry)
//!     ↓
//! vlc-api (VlcManager over a NativeEngine)
//! ```

pub mod config;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod management;
pub mod media;
pub mod player;
pub mod system;

// Main exports
pub use config::PlayerConfig;
pub use error::{Result, SdkError};
pub use ledger::{MediaLedger, PlayerId};
pub use management::{Audio, Chapters, Dialogs, SubTitles, Video};
pub use media::{Media, MediaSource};
pub use player::MediaPlayer;
pub use system::VlcSystem;

// Re-export commonly used types from the lower layers
pub use vlc_api::{
    DialogAction, EventKind, FilterModule, MediaState, NativeEngine, NavigateMode, SnapshotSize,
    TrackType,
};
pub use vlc_event_manager::{EventIterator, EventRegistry, PlayerEvent, SubscriptionId};

#[cfg(feature = "test-support")]
pub use vlc_api::testing;
