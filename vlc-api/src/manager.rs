//! Resource manager over the native engine
//!
//! `VlcManager` is the only place native release functions are invoked. It
//! owns the engine context (shared by every player created from it through a
//! lease count), validates every handle before forwarding a call, and turns
//! null results from native constructors into typed errors.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::engine::NativeEngine;
use crate::error::{Result, VlcError};
use crate::event::{EventKind, NativeCallback};
use crate::filter::{FilterCategory, FilterModule};
use crate::handle::{
    ContextHandle, DialogHandle, EventManagerHandle, MediaHandle, ModuleListHandle, PlayerHandle,
};
use crate::snapshot::SnapshotSize;
use crate::types::{DialogAction, MediaState, NavigateMode};

/// The live engine context and how many owners currently hold it
#[derive(Debug, Default)]
struct ContextSlot {
    handle: ContextHandle,
    options: Vec<String>,
    leases: usize,
}

/// Resource manager for one native engine
///
/// All methods are synchronous and forward directly to the engine. Getters
/// and setters keep no state; only the context slot is mutable.
///
/// # Example
///
/// ```rust,ignore
/// use vlc_api::VlcManager;
///
/// let manager = VlcManager::new(engine);
/// let context = manager.acquire_context(&["--quiet".to_string()])?;
/// let player = manager.create_player(context)?;
///
/// manager.play(player)?;
/// println!("state: {:?}", manager.state(player)?);
///
/// manager.release_player(player);
/// manager.release_context(context);
/// ```
pub struct VlcManager {
    engine: Arc<dyn NativeEngine>,
    context: Mutex<ContextSlot>,
}

fn check_player(player: PlayerHandle, operation: &'static str) -> Result<PlayerHandle> {
    if player.is_null() {
        return Err(VlcError::invalid_handle(operation));
    }
    Ok(player)
}

fn check_media(media: MediaHandle, operation: &'static str) -> Result<MediaHandle> {
    if media.is_null() {
        return Err(VlcError::invalid_handle(operation));
    }
    Ok(media)
}

impl VlcManager {
    /// Create a manager over the given engine
    ///
    /// No native call is made until a context is acquired.
    pub fn new(engine: Arc<dyn NativeEngine>) -> Self {
        Self {
            engine,
            context: Mutex::new(ContextSlot::default()),
        }
    }

    /// Low-level access to the native engine
    ///
    /// Calls made through this bypass handle validation and lifetime
    /// tracking.
    pub fn engine(&self) -> &Arc<dyn NativeEngine> {
        &self.engine
    }

    // ========================================================================
    // Context lifetime
    // ========================================================================

    /// Acquire a lease on the engine context, creating it on first use
    ///
    /// A manager that already holds a live context reuses it and never
    /// initializes the engine twice; `options` only apply to the first
    /// acquisition.
    pub fn acquire_context(&self, options: &[String]) -> Result<ContextHandle> {
        let mut slot = self.context.lock();

        if !slot.handle.is_null() {
            slot.leases += 1;
            if slot.options != options {
                tracing::debug!(
                    "Reusing context {} created with {:?}; ignoring options {:?}",
                    slot.handle,
                    slot.options,
                    options
                );
            }
            tracing::debug!("Context {} leases: {}", slot.handle, slot.leases);
            return Ok(slot.handle);
        }

        let handle = self.engine.new_context(options);
        if handle.is_null() {
            return Err(VlcError::Initialization {
                options: options.to_vec(),
            });
        }

        tracing::debug!("Created context {} with options {:?}", handle, options);
        *slot = ContextSlot {
            handle,
            options: options.to_vec(),
            leases: 1,
        };
        Ok(handle)
    }

    /// Drop one lease on the engine context
    ///
    /// The native context is released when the last lease goes. Releasing a
    /// stale or already-released handle is a no-op.
    pub fn release_context(&self, context: ContextHandle) {
        let mut slot = self.context.lock();

        if context.is_null() || slot.handle != context {
            tracing::debug!("Ignoring release of stale context {}", context);
            return;
        }

        slot.leases = slot.leases.saturating_sub(1);
        tracing::debug!("Context {} leases: {}", context, slot.leases);

        if slot.leases == 0 {
            self.engine.release_context(context);
            *slot = ContextSlot::default();
            tracing::debug!("Released context {}", context);
        }
    }

    /// The live context, if any
    pub fn context(&self) -> Option<ContextHandle> {
        let slot = self.context.lock();
        (!slot.handle.is_null()).then_some(slot.handle)
    }

    /// Number of outstanding context leases
    pub fn context_leases(&self) -> usize {
        self.context.lock().leases
    }

    // ========================================================================
    // Player lifetime
    // ========================================================================

    /// Create a native player on a live context
    pub fn create_player(&self, context: ContextHandle) -> Result<PlayerHandle> {
        if context.is_null() {
            return Err(VlcError::invalid_handle("create_player"));
        }
        let player = self.engine.new_player(context);
        if player.is_null() {
            return Err(VlcError::Creation {
                object: "media player",
            });
        }
        tracing::debug!("Created player {}", player);
        Ok(player)
    }

    /// Release a native player; null is a no-op
    ///
    /// Callers must release each live handle exactly once.
    pub fn release_player(&self, player: PlayerHandle) {
        if player.is_null() {
            tracing::debug!("Ignoring release of null player");
            return;
        }
        self.engine.release_player(player);
        tracing::debug!("Released player {}", player);
    }

    // ========================================================================
    // Media
    // ========================================================================

    /// Create a native media from a local file path
    pub fn new_media_path(&self, context: ContextHandle, path: &Path) -> Result<MediaHandle> {
        self.new_media(context, |engine| engine.new_media_path(context, path))
    }

    /// Create a native media from a URI or raw media resource locator
    pub fn new_media_location(&self, context: ContextHandle, mrl: &str) -> Result<MediaHandle> {
        self.new_media(context, |engine| engine.new_media_location(context, mrl))
    }

    /// Create a native media reading from a byte stream
    pub fn new_media_stream(
        &self,
        context: ContextHandle,
        stream: Box<dyn Read + Send>,
    ) -> Result<MediaHandle> {
        self.new_media(context, |engine| engine.new_media_stream(context, stream))
    }

    fn new_media(
        &self,
        context: ContextHandle,
        create: impl FnOnce(&dyn NativeEngine) -> MediaHandle,
    ) -> Result<MediaHandle> {
        if context.is_null() {
            return Err(VlcError::invalid_handle("new_media"));
        }
        let media = create(self.engine.as_ref());
        if media.is_null() {
            return Err(VlcError::Creation { object: "media" });
        }
        Ok(media)
    }

    /// Add a per-media option such as `:start-time=10`
    pub fn add_media_option(&self, media: MediaHandle, option: &str) -> Result<()> {
        let media = check_media(media, "add_media_option")?;
        self.engine.add_media_option(media, option);
        Ok(())
    }

    /// Release one reference on a native media; null is a no-op
    pub fn release_media(&self, media: MediaHandle) {
        if media.is_null() {
            return;
        }
        self.engine.release_media(media);
        tracing::debug!("Released media {}", media);
    }

    /// Attach a media to a player
    pub fn set_media(&self, player: PlayerHandle, media: MediaHandle) -> Result<()> {
        let player = check_player(player, "set_media")?;
        let media = check_media(media, "set_media")?;
        self.engine.set_media(player, media);
        Ok(())
    }

    /// The media currently attached to a player
    ///
    /// A returned handle carries a new native reference that the caller must
    /// release.
    pub fn get_media(&self, player: PlayerHandle) -> Result<Option<MediaHandle>> {
        let player = check_player(player, "get_media")?;
        let media = self.engine.get_media(player);
        Ok((!media.is_null()).then_some(media))
    }

    // ========================================================================
    // Playback control
    // ========================================================================

    /// Start playback; `false` if the native layer refused
    pub fn play(&self, player: PlayerHandle) -> Result<bool> {
        let player = check_player(player, "play")?;
        Ok(self.engine.play(player) == 0)
    }

    pub fn pause(&self, player: PlayerHandle) -> Result<()> {
        let player = check_player(player, "pause")?;
        self.engine.pause(player);
        Ok(())
    }

    pub fn stop(&self, player: PlayerHandle) -> Result<()> {
        let player = check_player(player, "stop")?;
        self.engine.stop(player);
        Ok(())
    }

    pub fn next_frame(&self, player: PlayerHandle) -> Result<()> {
        let player = check_player(player, "next_frame")?;
        self.engine.next_frame(player);
        Ok(())
    }

    pub fn navigate(&self, player: PlayerHandle, mode: NavigateMode) -> Result<()> {
        let player = check_player(player, "navigate")?;
        self.engine.navigate(player, mode.to_native());
        Ok(())
    }

    // ========================================================================
    // Playback queries
    // ========================================================================

    pub fn could_play(&self, player: PlayerHandle) -> Result<bool> {
        Ok(self.engine.will_play(check_player(player, "could_play")?))
    }

    pub fn is_playing(&self, player: PlayerHandle) -> Result<bool> {
        Ok(self.engine.is_playing(check_player(player, "is_playing")?))
    }

    pub fn is_seekable(&self, player: PlayerHandle) -> Result<bool> {
        Ok(self.engine.is_seekable(check_player(player, "is_seekable")?))
    }

    pub fn is_pausable(&self, player: PlayerHandle) -> Result<bool> {
        Ok(self.engine.can_pause(check_player(player, "is_pausable")?))
    }

    /// Live playback state
    pub fn state(&self, player: PlayerHandle) -> Result<MediaState> {
        let raw = self.engine.state(check_player(player, "state")?);
        Ok(MediaState::from_native(raw))
    }

    pub fn position(&self, player: PlayerHandle) -> Result<f32> {
        Ok(self.engine.position(check_player(player, "position")?))
    }

    pub fn set_position(&self, player: PlayerHandle, position: f32) -> Result<()> {
        let player = check_player(player, "set_position")?;
        self.engine.set_position(player, position);
        Ok(())
    }

    pub fn rate(&self, player: PlayerHandle) -> Result<f32> {
        Ok(self.engine.rate(check_player(player, "rate")?))
    }

    /// Set the playback rate; `false` if the rate is not supported
    pub fn set_rate(&self, player: PlayerHandle, rate: f32) -> Result<bool> {
        let player = check_player(player, "set_rate")?;
        Ok(self.engine.set_rate(player, rate) == 0)
    }

    /// Current time in milliseconds
    pub fn time(&self, player: PlayerHandle) -> Result<i64> {
        Ok(self.engine.time(check_player(player, "time")?))
    }

    pub fn set_time(&self, player: PlayerHandle, time: i64) -> Result<()> {
        let player = check_player(player, "set_time")?;
        self.engine.set_time(player, time);
        Ok(())
    }

    /// Media length in milliseconds, -1 when unknown
    pub fn length(&self, player: PlayerHandle) -> Result<i64> {
        Ok(self.engine.length(check_player(player, "length")?))
    }

    pub fn fps(&self, player: PlayerHandle) -> Result<f32> {
        Ok(self.engine.fps(check_player(player, "fps")?))
    }

    // ========================================================================
    // Chapters and subtitles
    // ========================================================================

    pub fn chapter(&self, player: PlayerHandle) -> Result<i32> {
        Ok(self.engine.chapter(check_player(player, "chapter")?))
    }

    pub fn set_chapter(&self, player: PlayerHandle, chapter: i32) -> Result<()> {
        let player = check_player(player, "set_chapter")?;
        self.engine.set_chapter(player, chapter);
        Ok(())
    }

    pub fn chapter_count(&self, player: PlayerHandle) -> Result<i32> {
        Ok(self.engine.chapter_count(check_player(player, "chapter_count")?))
    }

    pub fn next_chapter(&self, player: PlayerHandle) -> Result<()> {
        let player = check_player(player, "next_chapter")?;
        self.engine.next_chapter(player);
        Ok(())
    }

    pub fn previous_chapter(&self, player: PlayerHandle) -> Result<()> {
        let player = check_player(player, "previous_chapter")?;
        self.engine.previous_chapter(player);
        Ok(())
    }

    /// Current subtitle track id, -1 when disabled
    pub fn spu(&self, player: PlayerHandle) -> Result<i32> {
        Ok(self.engine.spu(check_player(player, "spu")?))
    }

    pub fn set_spu(&self, player: PlayerHandle, spu: i32) -> Result<bool> {
        let player = check_player(player, "set_spu")?;
        Ok(self.engine.set_spu(player, spu) == 0)
    }

    pub fn spu_count(&self, player: PlayerHandle) -> Result<i32> {
        Ok(self.engine.spu_count(check_player(player, "spu_count")?))
    }

    pub fn spu_delay(&self, player: PlayerHandle) -> Result<i64> {
        Ok(self.engine.spu_delay(check_player(player, "spu_delay")?))
    }

    pub fn set_spu_delay(&self, player: PlayerHandle, delay: i64) -> Result<bool> {
        let player = check_player(player, "set_spu_delay")?;
        Ok(self.engine.set_spu_delay(player, delay) == 0)
    }

    // ========================================================================
    // Video
    // ========================================================================

    pub fn video_scale(&self, player: PlayerHandle) -> Result<f32> {
        Ok(self.engine.video_scale(check_player(player, "video_scale")?))
    }

    pub fn set_video_scale(&self, player: PlayerHandle, scale: f32) -> Result<()> {
        let player = check_player(player, "set_video_scale")?;
        self.engine.set_video_scale(player, scale);
        Ok(())
    }

    pub fn aspect_ratio(&self, player: PlayerHandle) -> Result<Option<String>> {
        Ok(self.engine.aspect_ratio(check_player(player, "aspect_ratio")?))
    }

    pub fn set_aspect_ratio(&self, player: PlayerHandle, aspect: Option<&str>) -> Result<()> {
        let player = check_player(player, "set_aspect_ratio")?;
        self.engine.set_aspect_ratio(player, aspect);
        Ok(())
    }

    pub fn video_track(&self, player: PlayerHandle) -> Result<i32> {
        Ok(self.engine.video_track(check_player(player, "video_track")?))
    }

    pub fn set_video_track(&self, player: PlayerHandle, track: i32) -> Result<bool> {
        let player = check_player(player, "set_video_track")?;
        Ok(self.engine.set_video_track(player, track) == 0)
    }

    pub fn video_track_count(&self, player: PlayerHandle) -> Result<i32> {
        Ok(self.engine.video_track_count(check_player(player, "video_track_count")?))
    }

    // ========================================================================
    // Audio
    // ========================================================================

    pub fn volume(&self, player: PlayerHandle) -> Result<i32> {
        Ok(self.engine.volume(check_player(player, "volume")?))
    }

    pub fn set_volume(&self, player: PlayerHandle, volume: i32) -> Result<bool> {
        let player = check_player(player, "set_volume")?;
        Ok(self.engine.set_volume(player, volume) == 0)
    }

    /// Mute state; `None` when no audio output exists
    pub fn is_muted(&self, player: PlayerHandle) -> Result<Option<bool>> {
        let raw = self.engine.mute(check_player(player, "is_muted")?);
        Ok(match raw {
            0 => Some(false),
            1 => Some(true),
            _ => None,
        })
    }

    pub fn set_mute(&self, player: PlayerHandle, muted: bool) -> Result<()> {
        let player = check_player(player, "set_mute")?;
        self.engine.set_mute(player, muted);
        Ok(())
    }

    pub fn toggle_mute(&self, player: PlayerHandle) -> Result<()> {
        let player = check_player(player, "toggle_mute")?;
        self.engine.toggle_mute(player);
        Ok(())
    }

    pub fn audio_track(&self, player: PlayerHandle) -> Result<i32> {
        Ok(self.engine.audio_track(check_player(player, "audio_track")?))
    }

    pub fn set_audio_track(&self, player: PlayerHandle, track: i32) -> Result<bool> {
        let player = check_player(player, "set_audio_track")?;
        Ok(self.engine.set_audio_track(player, track) == 0)
    }

    pub fn audio_track_count(&self, player: PlayerHandle) -> Result<i32> {
        Ok(self.engine.audio_track_count(check_player(player, "audio_track_count")?))
    }

    pub fn audio_delay(&self, player: PlayerHandle) -> Result<i64> {
        Ok(self.engine.audio_delay(check_player(player, "audio_delay")?))
    }

    pub fn set_audio_delay(&self, player: PlayerHandle, delay: i64) -> Result<bool> {
        let player = check_player(player, "set_audio_delay")?;
        Ok(self.engine.set_audio_delay(player, delay) == 0)
    }

    // ========================================================================
    // Dialogs
    // ========================================================================

    pub fn dismiss_dialog(&self, dialog: DialogHandle) -> Result<bool> {
        if dialog.is_null() {
            return Err(VlcError::invalid_handle("dismiss_dialog"));
        }
        Ok(self.engine.dialog_dismiss(dialog) == 0)
    }

    pub fn post_dialog_action(&self, dialog: DialogHandle, action: DialogAction) -> Result<bool> {
        if dialog.is_null() {
            return Err(VlcError::invalid_handle("post_dialog_action"));
        }
        Ok(self.engine.dialog_post_action(dialog, action.to_native()) == 0)
    }

    // ========================================================================
    // Snapshots and filters
    // ========================================================================

    /// Save a snapshot of a video output to `path`
    ///
    /// `width` and `height` follow [`SnapshotSize`]: both zero keeps the
    /// original size, one zero keeps the aspect ratio. The path is not
    /// checked locally. Returns whether the native layer reported success.
    pub fn take_snapshot(
        &self,
        player: PlayerHandle,
        output: u32,
        path: &Path,
        width: u32,
        height: u32,
    ) -> Result<bool> {
        let player = check_player(player, "take_snapshot")?;
        let size = SnapshotSize::from_dimensions(width, height);
        let (width, height) = size.dimensions();

        tracing::debug!(
            "Snapshot of output {} on {} to {} at {}{}",
            output,
            player,
            path.display(),
            size,
            if size.preserves_aspect_ratio() { ", aspect kept" } else { "" }
        );

        let status = self
            .engine
            .take_snapshot(player, output, &path.to_string_lossy(), width, height);
        if status != 0 {
            tracing::warn!("Snapshot to {} failed with status {}", path.display(), status);
        }
        Ok(status == 0)
    }

    /// Audio filter modules available in the engine
    pub fn audio_filters(&self) -> Result<Vec<FilterModule>> {
        self.filters(FilterCategory::Audio)
    }

    /// Video filter modules available in the engine
    pub fn video_filters(&self) -> Result<Vec<FilterModule>> {
        self.filters(FilterCategory::Video)
    }

    /// Copy a native filter list out and release it exactly once
    fn filters(&self, category: FilterCategory) -> Result<Vec<FilterModule>> {
        // Held for the whole walk so the context cannot be released underneath it.
        let slot = self.context.lock();
        if slot.handle.is_null() {
            return Err(VlcError::invalid_handle("filters"));
        }

        let head = match category {
            FilterCategory::Audio => self.engine.audio_filter_list(slot.handle),
            FilterCategory::Video => self.engine.video_filter_list(slot.handle),
        };

        let modules = self.collect_modules(head);
        self.engine.release_module_list(head);

        tracing::debug!("Read {} {:?} filter modules", modules.len(), category);
        Ok(modules)
    }

    fn collect_modules(&self, head: ModuleListHandle) -> Vec<FilterModule> {
        let mut modules = Vec::new();
        let mut cursor = head;

        while !cursor.is_null() {
            let Some(node) = self.engine.module_node(cursor) else {
                tracing::warn!("Unreadable module list node {}", cursor);
                break;
            };
            match FilterModule::from_node(&node) {
                Some(module) => modules.push(module),
                None => break,
            }
            cursor = node.next;
        }

        modules
    }

    // ========================================================================
    // Event manager
    // ========================================================================

    /// Get the native event manager of a player
    pub fn player_event_manager(&self, player: PlayerHandle) -> Result<EventManagerHandle> {
        let player = check_player(player, "player_event_manager")?;
        let event_manager = self.engine.player_event_manager(player);
        if event_manager.is_null() {
            return Err(VlcError::Creation {
                object: "event manager",
            });
        }
        Ok(event_manager)
    }

    /// Release an event manager reference; null is a no-op
    pub fn release_event_manager(&self, event_manager: EventManagerHandle) {
        if event_manager.is_null() {
            return;
        }
        self.engine.release_event_manager(event_manager);
    }

    /// Attach a callback for one event kind
    pub fn attach_event(
        &self,
        event_manager: EventManagerHandle,
        kind: EventKind,
        callback: &NativeCallback,
    ) -> Result<()> {
        if event_manager.is_null() {
            return Err(VlcError::invalid_handle("attach_event"));
        }
        match self.engine.attach_event(event_manager, kind, callback) {
            0 => Ok(()),
            code => Err(VlcError::Attach { kind, code }),
        }
    }

    /// Detach a previously attached callback
    ///
    /// `callback` must be the same `Arc` that was attached.
    pub fn detach_event(
        &self,
        event_manager: EventManagerHandle,
        kind: EventKind,
        callback: &NativeCallback,
    ) -> Result<()> {
        if event_manager.is_null() {
            return Err(VlcError::invalid_handle("detach_event"));
        }
        if self.engine.detach_event(event_manager, kind, callback) {
            Ok(())
        } else {
            Err(VlcError::Detach { kind })
        }
    }
}

impl std::fmt::Debug for VlcManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slot = self.context.lock();
        f.debug_struct("VlcManager")
            .field("context", &slot.handle)
            .field("leases", &slot.leases)
            .finish()
    }
}
