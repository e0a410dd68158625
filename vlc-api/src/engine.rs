//! Native engine collaborator contract
//!
//! `NativeEngine` is the raw call surface of the native media library as
//! exposed by a binding layer. Implementations forward each call verbatim:
//! they do no validation, keep no state of their own and report failures the
//! way the native API does (null handles, negative status codes).
//!
//! The [`VlcManager`](crate::VlcManager) is the only intended caller; it
//! validates handles first and owns every release call.

use std::io::Read;
use std::path::Path;

use crate::event::{EventKind, NativeCallback};
use crate::filter::ModuleNode;
use crate::handle::{
    ContextHandle, DialogHandle, EventManagerHandle, MediaHandle, ModuleListHandle, PlayerHandle,
};

/// Raw call surface of the native media library
pub trait NativeEngine: Send + Sync {
    // ========================================================================
    // Context and player lifetime
    // ========================================================================

    /// `libvlc_new`; null on failure
    fn new_context(&self, options: &[String]) -> ContextHandle;
    /// `libvlc_release`
    fn release_context(&self, context: ContextHandle);
    /// `libvlc_media_player_new`; null on failure
    fn new_player(&self, context: ContextHandle) -> PlayerHandle;
    /// `libvlc_media_player_release`
    fn release_player(&self, player: PlayerHandle);

    // ========================================================================
    // Media
    // ========================================================================

    /// `libvlc_media_new_path`; null on failure
    fn new_media_path(&self, context: ContextHandle, path: &Path) -> MediaHandle;
    /// `libvlc_media_new_location`; null on failure
    fn new_media_location(&self, context: ContextHandle, mrl: &str) -> MediaHandle;
    /// `libvlc_media_new_callbacks` over a byte stream; null on failure
    fn new_media_stream(&self, context: ContextHandle, stream: Box<dyn Read + Send>) -> MediaHandle;
    /// `libvlc_media_add_option`
    fn add_media_option(&self, media: MediaHandle, option: &str);
    /// `libvlc_media_release`
    fn release_media(&self, media: MediaHandle);
    /// `libvlc_media_player_set_media`
    fn set_media(&self, player: PlayerHandle, media: MediaHandle);
    /// `libvlc_media_player_get_media`; the returned reference is retained
    fn get_media(&self, player: PlayerHandle) -> MediaHandle;

    // ========================================================================
    // Playback control and queries
    // ========================================================================

    /// `libvlc_media_player_play`; 0 on success, -1 on error
    fn play(&self, player: PlayerHandle) -> i32;
    fn pause(&self, player: PlayerHandle);
    fn stop(&self, player: PlayerHandle);
    fn next_frame(&self, player: PlayerHandle);
    fn navigate(&self, player: PlayerHandle, mode: u32);
    fn will_play(&self, player: PlayerHandle) -> bool;
    fn is_playing(&self, player: PlayerHandle) -> bool;
    fn is_seekable(&self, player: PlayerHandle) -> bool;
    fn can_pause(&self, player: PlayerHandle) -> bool;
    /// `libvlc_media_player_get_state` as the raw `libvlc_state_t`
    fn state(&self, player: PlayerHandle) -> i32;
    fn position(&self, player: PlayerHandle) -> f32;
    fn set_position(&self, player: PlayerHandle, position: f32);
    fn rate(&self, player: PlayerHandle) -> f32;
    /// 0 on success, -1 if the rate is not supported
    fn set_rate(&self, player: PlayerHandle, rate: f32) -> i32;
    /// Milliseconds
    fn time(&self, player: PlayerHandle) -> i64;
    fn set_time(&self, player: PlayerHandle, time: i64);
    /// Milliseconds, -1 when unknown
    fn length(&self, player: PlayerHandle) -> i64;
    fn fps(&self, player: PlayerHandle) -> f32;

    // ========================================================================
    // Chapters and subtitles
    // ========================================================================

    fn chapter(&self, player: PlayerHandle) -> i32;
    fn set_chapter(&self, player: PlayerHandle, chapter: i32);
    fn chapter_count(&self, player: PlayerHandle) -> i32;
    fn next_chapter(&self, player: PlayerHandle);
    fn previous_chapter(&self, player: PlayerHandle);
    fn spu(&self, player: PlayerHandle) -> i32;
    /// 0 on success, -1 on error
    fn set_spu(&self, player: PlayerHandle, spu: i32) -> i32;
    fn spu_count(&self, player: PlayerHandle) -> i32;
    /// Microseconds
    fn spu_delay(&self, player: PlayerHandle) -> i64;
    fn set_spu_delay(&self, player: PlayerHandle, delay: i64) -> i32;

    // ========================================================================
    // Video and audio
    // ========================================================================

    fn video_scale(&self, player: PlayerHandle) -> f32;
    fn set_video_scale(&self, player: PlayerHandle, scale: f32);
    fn aspect_ratio(&self, player: PlayerHandle) -> Option<String>;
    fn set_aspect_ratio(&self, player: PlayerHandle, aspect: Option<&str>);
    fn video_track(&self, player: PlayerHandle) -> i32;
    fn set_video_track(&self, player: PlayerHandle, track: i32) -> i32;
    fn video_track_count(&self, player: PlayerHandle) -> i32;
    fn volume(&self, player: PlayerHandle) -> i32;
    fn set_volume(&self, player: PlayerHandle, volume: i32) -> i32;
    /// 1 muted, 0 unmuted, -1 undefined
    fn mute(&self, player: PlayerHandle) -> i32;
    fn set_mute(&self, player: PlayerHandle, muted: bool);
    fn toggle_mute(&self, player: PlayerHandle);
    fn audio_track(&self, player: PlayerHandle) -> i32;
    fn set_audio_track(&self, player: PlayerHandle, track: i32) -> i32;
    fn audio_track_count(&self, player: PlayerHandle) -> i32;
    /// Microseconds
    fn audio_delay(&self, player: PlayerHandle) -> i64;
    fn set_audio_delay(&self, player: PlayerHandle, delay: i64) -> i32;

    // ========================================================================
    // Dialogs and snapshots
    // ========================================================================

    fn dialog_dismiss(&self, dialog: DialogHandle) -> i32;
    fn dialog_post_action(&self, dialog: DialogHandle, action: i32) -> i32;
    /// `libvlc_video_take_snapshot`; 0 on success, -1 on error
    fn take_snapshot(
        &self,
        player: PlayerHandle,
        output: u32,
        path: &str,
        width: u32,
        height: u32,
    ) -> i32;

    // ========================================================================
    // Filter module lists
    // ========================================================================

    /// Head of the audio filter list; null when empty
    fn audio_filter_list(&self, context: ContextHandle) -> ModuleListHandle;
    /// Head of the video filter list; null when empty
    fn video_filter_list(&self, context: ContextHandle) -> ModuleListHandle;
    /// Read one node of a module list
    fn module_node(&self, node: ModuleListHandle) -> Option<ModuleNode>;
    /// `libvlc_module_description_list_release`; accepts null
    fn release_module_list(&self, head: ModuleListHandle);

    // ========================================================================
    // Events
    // ========================================================================

    /// `libvlc_media_player_event_manager`; null on failure
    fn player_event_manager(&self, player: PlayerHandle) -> EventManagerHandle;
    /// Drop the binding's reference to an event manager
    fn release_event_manager(&self, event_manager: EventManagerHandle);
    /// `libvlc_event_attach`; 0 on success
    fn attach_event(
        &self,
        event_manager: EventManagerHandle,
        kind: EventKind,
        callback: &NativeCallback,
    ) -> i32;
    /// `libvlc_event_detach`; false if no matching registration was found
    ///
    /// Once this returns, the native layer guarantees the callback is not
    /// running and will not be invoked again.
    fn detach_event(
        &self,
        event_manager: EventManagerHandle,
        kind: EventKind,
        callback: &NativeCallback,
    ) -> bool;
}
