//! MediaPlayer - the player facade
//!
//! Owns one native player handle from construction until [`dispose`]
//! (or drop), together with the event registry attached to it and a lease on
//! the engine context.
//!
//! [`dispose`]: MediaPlayer::dispose

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use vlc_api::{
    ContextHandle, FilterModule, MediaState, NavigateMode, PlayerHandle, VlcError, VlcManager,
};
use vlc_event_manager::EventRegistry;

use crate::config::PlayerConfig;
use crate::error::{Result, SdkError};
use crate::ledger::{MediaLedger, PlayerId};
use crate::management::{Audio, Chapters, Dialogs, SubTitles, Video};
use crate::media::{Media, MediaSource};

/// A native media player with deterministic teardown
///
/// All methods are synchronous and forward straight to the native layer;
/// nothing is cached, so [`state`](MediaPlayer::state) and friends are always
/// live queries. After [`dispose`](MediaPlayer::dispose) every native
/// operation fails with an invalid-handle error.
///
/// # Example
///
/// ```rust,ignore
/// use vlc_sdk::{PlayerEvent, VlcSystem};
/// use vlc_api::EventKind;
///
/// let system = VlcSystem::new(engine);
/// let player = system.create_player()?;
///
/// player.events().subscribe(EventKind::EndReached, |_| println!("finished"));
/// player.play_source("https://example.com/clip.mp4", &[])?;
///
/// player.audio().set_volume(80)?;
/// println!("state: {:?}", player.state()?);
///
/// player.dispose();
/// ```
pub struct MediaPlayer {
    id: PlayerId,
    /// Raw player handle; zero once disposal has started
    handle: AtomicUsize,
    /// Shared by media changes, exclusive for the native half of `dispose`
    teardown: RwLock<()>,
    context: ContextHandle,
    manager: Arc<VlcManager>,
    ledger: Arc<MediaLedger>,
    events: EventRegistry,
    config: PlayerConfig,
}

impl MediaPlayer {
    /// Acquire the context, create the player, then register its events
    ///
    /// Whatever was acquired before a failing step is released again.
    pub(crate) fn new(
        manager: Arc<VlcManager>,
        ledger: Arc<MediaLedger>,
        config: PlayerConfig,
    ) -> Result<Self> {
        config.validate()?;

        let context = manager.acquire_context(&config.options)?;

        let player = match manager.create_player(context) {
            Ok(player) => player,
            Err(e) => {
                manager.release_context(context);
                return Err(e.into());
            }
        };

        let events = EventRegistry::new();
        if let Err(e) = events.register_all(&manager, player) {
            manager.release_player(player);
            manager.release_context(context);
            return Err(e.into());
        }

        let id = PlayerId::next();
        tracing::debug!("Created {} on {}", id, player);

        Ok(Self {
            id,
            handle: AtomicUsize::new(player.raw()),
            teardown: RwLock::new(()),
            context,
            manager,
            ledger,
            events,
            config,
        })
    }

    /// Process-unique identity of this player
    pub fn id(&self) -> PlayerId {
        self.id
    }

    /// The owned native handle, null once disposed
    pub fn handle(&self) -> PlayerHandle {
        PlayerHandle::from_raw(self.handle.load(Ordering::Acquire))
    }

    pub fn is_disposed(&self) -> bool {
        self.handle().is_null()
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub(crate) fn manager(&self) -> &VlcManager {
        &self.manager
    }

    /// Event registry of this player, for subscribing or iterating
    pub fn events(&self) -> &EventRegistry {
        &self.events
    }

    // ========================================================================
    // Capability views
    // ========================================================================

    pub fn chapters(&self) -> Chapters<'_> {
        Chapters::new(self)
    }

    pub fn subtitles(&self) -> SubTitles<'_> {
        SubTitles::new(self)
    }

    pub fn video(&self) -> Video<'_> {
        Video::new(self)
    }

    pub fn audio(&self) -> Audio<'_> {
        Audio::new(self)
    }

    pub fn dialogs(&self) -> Dialogs<'_> {
        Dialogs::new(self)
    }

    // ========================================================================
    // Media
    // ========================================================================

    /// Create a media on this player's engine context without attaching it
    pub fn new_media(&self, source: impl Into<MediaSource>, options: &[String]) -> Result<Media> {
        if self.is_disposed() {
            return Err(SdkError::Disposed);
        }
        Media::create(&self.manager, self.context, source.into(), options)
    }

    /// Attach a media, disposing the previously attached one if it differs
    ///
    /// The previous media is compared by native handle. Re-attaching the
    /// media that is already attached disposes nothing.
    pub fn set_media(&self, media: &Media) -> Result<()> {
        let _live = self.teardown.read();
        let player = self.handle();
        if player.is_null() {
            return Err(VlcError::invalid_handle("set_media").into());
        }
        if media.is_disposed() {
            return Err(VlcError::invalid_handle("set_media").into());
        }

        if let Some(current) = self.manager.get_media(player)? {
            // get_media hands out a reference of its own
            self.manager.release_media(current);

            if current != media.handle() {
                if let Some(previous) = self.ledger.untrack(self.id, current) {
                    tracing::debug!("{} replacing media {}", self.id, current);
                    previous.dispose();
                }
            }
        }

        self.manager.set_media(player, media.handle())?;
        self.ledger.track(self.id, media);
        Ok(())
    }

    /// Create a media from `source` with `options` and attach it
    pub fn set_media_source(
        &self,
        source: impl Into<MediaSource>,
        options: &[String],
    ) -> Result<Media> {
        let media = self.new_media(source, options)?;
        self.set_media(&media)?;
        Ok(media)
    }

    /// The currently attached media, if any
    ///
    /// A tracked wrapper that was disposed while still attached is replaced
    /// by a fresh one owning the reference handed out by the native layer.
    pub fn media(&self) -> Result<Option<Media>> {
        let _live = self.teardown.read();
        let Some(handle) = self.manager.get_media(self.handle())? else {
            return Ok(None);
        };

        if let Some(tracked) = self.ledger.find(self.id, handle) {
            if !tracked.is_disposed() {
                self.manager.release_media(handle);
                return Ok(Some(tracked));
            }
            self.ledger.untrack(self.id, handle);
        }

        let media = Media::adopt(&self.manager, handle);
        self.ledger.track(self.id, &media);
        Ok(Some(media))
    }

    // ========================================================================
    // Playback control
    // ========================================================================

    /// Start playback; `false` if the native layer refused
    pub fn play(&self) -> Result<bool> {
        Ok(self.manager.play(self.handle())?)
    }

    /// Attach a media from `source`, then start playback
    pub fn play_source(&self, source: impl Into<MediaSource>, options: &[String]) -> Result<bool> {
        self.set_media_source(source, options)?;
        self.play()
    }

    /// Attach `media`, then start playback
    pub fn play_media(&self, media: &Media) -> Result<bool> {
        self.set_media(media)?;
        self.play()
    }

    pub fn pause(&self) -> Result<()> {
        Ok(self.manager.pause(self.handle())?)
    }

    pub fn stop(&self) -> Result<()> {
        Ok(self.manager.stop(self.handle())?)
    }

    pub fn next_frame(&self) -> Result<()> {
        Ok(self.manager.next_frame(self.handle())?)
    }

    /// Navigate a DVD-style menu
    pub fn navigate(&self, mode: NavigateMode) -> Result<()> {
        Ok(self.manager.navigate(self.handle(), mode)?)
    }

    // ========================================================================
    // Playback queries and properties
    // ========================================================================

    pub fn is_playing(&self) -> Result<bool> {
        Ok(self.manager.is_playing(self.handle())?)
    }

    pub fn is_pausable(&self) -> Result<bool> {
        Ok(self.manager.is_pausable(self.handle())?)
    }

    pub fn is_seekable(&self) -> Result<bool> {
        Ok(self.manager.is_seekable(self.handle())?)
    }

    /// Whether the player is able to play
    pub fn could_play(&self) -> Result<bool> {
        Ok(self.manager.could_play(self.handle())?)
    }

    /// Live playback state
    pub fn state(&self) -> Result<MediaState> {
        Ok(self.manager.state(self.handle())?)
    }

    /// Position as a fraction of the length, 0.0 to 1.0
    pub fn position(&self) -> Result<f32> {
        Ok(self.manager.position(self.handle())?)
    }

    pub fn set_position(&self, position: f32) -> Result<()> {
        Ok(self.manager.set_position(self.handle(), position)?)
    }

    pub fn rate(&self) -> Result<f32> {
        Ok(self.manager.rate(self.handle())?)
    }

    /// Set the playback rate; `false` if unsupported
    pub fn set_rate(&self, rate: f32) -> Result<bool> {
        Ok(self.manager.set_rate(self.handle(), rate)?)
    }

    /// Milliseconds
    pub fn time(&self) -> Result<i64> {
        Ok(self.manager.time(self.handle())?)
    }

    pub fn set_time(&self, time: i64) -> Result<()> {
        Ok(self.manager.set_time(self.handle(), time)?)
    }

    /// Milliseconds, -1 when unknown
    pub fn length(&self) -> Result<i64> {
        Ok(self.manager.length(self.handle())?)
    }

    pub fn fps(&self) -> Result<f32> {
        Ok(self.manager.fps(self.handle())?)
    }

    /// Current subtitle track id, -1 when disabled
    pub fn spu(&self) -> Result<i32> {
        Ok(self.manager.spu(self.handle())?)
    }

    pub fn set_spu(&self, spu: i32) -> Result<bool> {
        Ok(self.manager.set_spu(self.handle(), spu)?)
    }

    // ========================================================================
    // Snapshots and filters
    // ========================================================================

    /// Snapshot of the first video output at its original size
    pub fn take_snapshot(&self, path: impl AsRef<Path>) -> Result<bool> {
        self.take_snapshot_to(0, path, 0, 0)
    }

    /// Snapshot of video output `output`
    ///
    /// Zero width and height keep the original size; a single zero keeps the
    /// aspect ratio.
    pub fn take_snapshot_to(
        &self,
        output: u32,
        path: impl AsRef<Path>,
        width: u32,
        height: u32,
    ) -> Result<bool> {
        Ok(self
            .manager
            .take_snapshot(self.handle(), output, path.as_ref(), width, height)?)
    }

    pub fn audio_filters(&self) -> Result<Vec<FilterModule>> {
        if self.is_disposed() {
            return Err(SdkError::Disposed);
        }
        Ok(self.manager.audio_filters()?)
    }

    pub fn video_filters(&self) -> Result<Vec<FilterModule>> {
        if self.is_disposed() {
            return Err(SdkError::Disposed);
        }
        Ok(self.manager.video_filters()?)
    }

    // ========================================================================
    // Teardown
    // ========================================================================

    /// Release the player and everything it owns
    ///
    /// Only the first call has any effect. The sequence is: detach every
    /// event callback, stop playback if still playing, dispose the media in
    /// this player's ledger entry, release the native player, then drop this
    /// player's lease on the engine context. Failures are logged and never
    /// interrupt the sequence.
    ///
    /// A media change already in progress on another thread completes before
    /// the player is stopped, and its media is disposed with the rest.
    pub fn dispose(&self) {
        let raw = self.handle.swap(0, Ordering::AcqRel);
        if raw == 0 {
            return;
        }
        let player = PlayerHandle::from_raw(raw);
        tracing::debug!("Disposing {} ({})", self.id, player);

        self.events.unregister_all(&self.manager);

        let _teardown = self.teardown.write();

        if self.config.stop_on_dispose {
            match self.manager.is_playing(player) {
                Ok(true) => {
                    if let Err(e) = self.manager.stop(player) {
                        tracing::error!("Failed to stop {} during dispose: {}", self.id, e);
                    }
                }
                Ok(false) => {}
                Err(e) => tracing::error!("Failed to query {} during dispose: {}", self.id, e),
            }
        }

        let media = self.ledger.take(self.id);
        for m in &media {
            m.dispose();
        }

        self.manager.release_player(player);
        self.manager.release_context(self.context);

        tracing::debug!("Disposed {} with {} media", self.id, media.len());
    }
}

impl Drop for MediaPlayer {
    fn drop(&mut self) {
        if !self.is_disposed() {
            tracing::debug!("{} dropped without dispose", self.id);
        }
        self.dispose();
    }
}

impl std::fmt::Debug for MediaPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaPlayer")
            .field("id", &self.id)
            .field("handle", &self.handle())
            .field("context", &self.context)
            .finish()
    }
}
