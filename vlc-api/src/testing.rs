//! In-memory native engine for tests
//!
//! `FakeEngine` implements [`NativeEngine`] without a native library. It
//! hands out distinct non-null handles, keeps native-style reference counts
//! for media, records every lifetime call in order and keeps attached
//! callbacks so tests can fire native events from any thread. Detaching
//! waits for in-flight `emit` calls, the way libvlc's detach does.

use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::engine::NativeEngine;
use crate::event::{EventKind, NativeCallback, RawEvent, RawPayload};
use crate::filter::ModuleNode;
use crate::handle::{
    ContextHandle, DialogHandle, EventManagerHandle, MediaHandle, ModuleListHandle, PlayerHandle,
};
use crate::types::MediaState;

/// A recorded native call
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    NewContext(Vec<String>),
    ReleaseContext(ContextHandle),
    NewPlayer(ContextHandle),
    ReleasePlayer(PlayerHandle),
    NewMedia(MediaHandle),
    AddMediaOption(MediaHandle, String),
    ReleaseMedia(MediaHandle),
    SetMedia(PlayerHandle, MediaHandle),
    GetMedia(PlayerHandle),
    Play(PlayerHandle),
    Pause(PlayerHandle),
    Stop(PlayerHandle),
    TakeSnapshot {
        player: PlayerHandle,
        output: u32,
        path: String,
        width: u32,
        height: u32,
    },
    FilterList(ModuleListHandle),
    ReleaseModuleList(ModuleListHandle),
    PlayerEventManager(PlayerHandle),
    ReleaseEventManager(EventManagerHandle),
    Attach(EventKind),
    Detach(EventKind),
    DialogDismiss(DialogHandle),
    DialogPostAction(DialogHandle, i32),
    /// Any other forwarded call, by name
    Other(&'static str),
}

#[derive(Debug, Clone)]
struct FakePlayer {
    media: MediaHandle,
    playing: bool,
    state: MediaState,
    position: f32,
    rate: f32,
    time: i64,
    length: i64,
    fps: f32,
    seekable: bool,
    pausable: bool,
    chapter: i32,
    chapter_count: i32,
    spu: i32,
    spu_count: i32,
    spu_delay: i64,
    scale: f32,
    aspect_ratio: Option<String>,
    video_track: i32,
    volume: i32,
    muted: bool,
    audio_track: i32,
    audio_delay: i64,
}

impl Default for FakePlayer {
    fn default() -> Self {
        Self {
            media: MediaHandle::NULL,
            playing: false,
            state: MediaState::NothingSpecial,
            position: 0.0,
            rate: 1.0,
            time: 0,
            length: -1,
            fps: 0.0,
            seekable: true,
            pausable: true,
            chapter: -1,
            chapter_count: 0,
            spu: -1,
            spu_count: 0,
            spu_delay: 0,
            scale: 0.0,
            aspect_ratio: None,
            video_track: -1,
            volume: 100,
            muted: false,
            audio_track: -1,
            audio_delay: 0,
        }
    }
}

#[derive(Default)]
struct FakeState {
    next_handle: usize,
    calls: Vec<Call>,
    contexts: HashSet<ContextHandle>,
    players: HashMap<PlayerHandle, FakePlayer>,
    media_refs: HashMap<MediaHandle, usize>,
    event_managers: HashMap<EventManagerHandle, PlayerHandle>,
    attached: Vec<(EventManagerHandle, EventKind, NativeCallback)>,
    attach_counts: HashMap<EventKind, usize>,
    detach_counts: HashMap<EventKind, usize>,
    invalid_releases: usize,
    module_nodes: HashMap<ModuleListHandle, ModuleNode>,
    audio_filters: Vec<String>,
    video_filters: Vec<String>,
    snapshot_status: i32,
    fail_context: bool,
    fail_player: bool,
    fail_media: bool,
    fail_event_manager: bool,
    fail_attach: HashSet<EventKind>,
}

impl FakeState {
    fn allocate(&mut self) -> usize {
        self.next_handle += 0x10;
        0x1000 + self.next_handle
    }

    fn player_mut(&mut self, player: PlayerHandle) -> Option<&mut FakePlayer> {
        self.players.get_mut(&player)
    }

    fn retain_media(&mut self, media: MediaHandle) {
        if let Some(count) = self.media_refs.get_mut(&media) {
            *count += 1;
        }
    }

    fn release_media_ref(&mut self, media: MediaHandle) {
        match self.media_refs.get_mut(&media) {
            Some(count) if *count > 0 => {
                *count -= 1;
                if *count == 0 {
                    self.media_refs.remove(&media);
                }
            }
            _ => self.invalid_releases += 1,
        }
    }

    fn build_list(&mut self, names: &[String]) -> ModuleListHandle {
        let handles: Vec<ModuleListHandle> = names
            .iter()
            .map(|_| ModuleListHandle::from_raw(self.allocate()))
            .collect();
        for (index, name) in names.iter().enumerate() {
            let next = handles.get(index + 1).copied().unwrap_or(ModuleListHandle::NULL);
            self.module_nodes.insert(
                handles[index],
                ModuleNode {
                    name: Some(name.clone()),
                    short_name: Some(name.to_uppercase()),
                    long_name: Some(format!("{} filter", name)),
                    help: None,
                    next,
                },
            );
        }
        handles.first().copied().unwrap_or(ModuleListHandle::NULL)
    }
}

/// Hook run inside `get_media` with the player handle, outside the engine lock
pub type GetMediaHook = Arc<dyn Fn(PlayerHandle) + Send + Sync>;

/// In-memory [`NativeEngine`] with call recording and failure injection
#[derive(Default)]
pub struct FakeEngine {
    state: Mutex<FakeState>,
    /// Held shared by every `emit`, exclusively by `detach_event`
    dispatching: RwLock<()>,
    get_media_hook: Mutex<Option<GetMediaHook>>,
}

impl FakeEngine {
    /// Create a new fake engine
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new fake engine behind an `Arc`
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    // ========================================================================
    // Failure injection and fixtures
    // ========================================================================

    /// Make `new_context` return null
    pub fn fail_context_creation(&self) {
        self.state.lock().fail_context = true;
    }

    /// Make `new_player` return null
    pub fn fail_player_creation(&self) {
        self.state.lock().fail_player = true;
    }

    /// Make every media constructor return null
    pub fn fail_media_creation(&self) {
        self.state.lock().fail_media = true;
    }

    /// Make `player_event_manager` return null
    pub fn fail_event_manager(&self) {
        self.state.lock().fail_event_manager = true;
    }

    /// Make attaching callbacks for `kind` fail
    pub fn fail_attach(&self, kind: EventKind) {
        self.state.lock().fail_attach.insert(kind);
    }

    /// Set the filter names served by `audio_filter_list`
    pub fn set_audio_filters(&self, names: &[&str]) {
        self.state.lock().audio_filters = names.iter().map(|n| n.to_string()).collect();
    }

    /// Set the filter names served by `video_filter_list`
    pub fn set_video_filters(&self, names: &[&str]) {
        self.state.lock().video_filters = names.iter().map(|n| n.to_string()).collect();
    }

    /// Set the status code returned by `take_snapshot`
    pub fn set_snapshot_status(&self, status: i32) {
        self.state.lock().snapshot_status = status;
    }

    /// Force the reported state of a player
    /// Run `hook` on every `get_media` call, before the engine answers
    pub fn on_get_media(&self, hook: impl Fn(PlayerHandle) + Send + Sync + 'static) {
        *self.get_media_hook.lock() = Some(Arc::new(hook));
    }

    pub fn set_state(&self, player: PlayerHandle, state: MediaState) {
        if let Some(p) = self.state.lock().player_mut(player) {
            p.state = state;
            p.playing = state == MediaState::Playing;
        }
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    /// Every recorded call, in order
    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    /// Forget recorded calls
    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    /// Number of recorded calls equal to `call`
    pub fn count(&self, call: &Call) -> usize {
        self.state.lock().calls.iter().filter(|c| *c == call).count()
    }

    /// Position of the first recorded call equal to `call`
    pub fn position_of(&self, call: &Call) -> Option<usize> {
        self.state.lock().calls.iter().position(|c| c == call)
    }

    /// Number of successful attach calls for `kind`
    pub fn attach_count(&self, kind: EventKind) -> usize {
        self.state.lock().attach_counts.get(&kind).copied().unwrap_or(0)
    }

    /// Number of successful detach calls for `kind`
    pub fn detach_count(&self, kind: EventKind) -> usize {
        self.state.lock().detach_counts.get(&kind).copied().unwrap_or(0)
    }

    /// Number of callbacks currently attached
    pub fn attached_count(&self) -> usize {
        self.state.lock().attached.len()
    }

    /// Number of release calls on handles that were not live
    pub fn invalid_releases(&self) -> usize {
        self.state.lock().invalid_releases
    }

    /// Number of live contexts
    pub fn live_contexts(&self) -> usize {
        self.state.lock().contexts.len()
    }

    /// Number of live players
    pub fn live_players(&self) -> usize {
        self.state.lock().players.len()
    }

    /// Native reference count of a media, 0 once fully released
    pub fn media_refcount(&self, media: MediaHandle) -> usize {
        self.state.lock().media_refs.get(&media).copied().unwrap_or(0)
    }

    /// Media currently set on a player
    pub fn player_media(&self, player: PlayerHandle) -> MediaHandle {
        self.state
            .lock()
            .players
            .get(&player)
            .map(|p| p.media)
            .unwrap_or(MediaHandle::NULL)
    }

    /// The first live player handle, if any
    pub fn any_player(&self) -> Option<PlayerHandle> {
        self.state.lock().players.keys().next().copied()
    }

    /// Fire a native event on every callback attached for its kind
    ///
    /// Callbacks run on the calling thread, outside the engine lock, the way
    /// libvlc invokes them from its own threads. Returns how many callbacks
    /// were invoked.
    pub fn emit(&self, kind: EventKind, payload: RawPayload) -> usize {
        let _dispatching = self.dispatching.read();
        let callbacks: Vec<NativeCallback> = self
            .state
            .lock()
            .attached
            .iter()
            .filter(|(_, k, _)| *k == kind)
            .map(|(_, _, cb)| Arc::clone(cb))
            .collect();

        let event = RawEvent::new(kind, payload);
        for callback in &callbacks {
            callback(&event);
        }
        callbacks.len()
    }

    fn record(&self, call: Call) {
        self.state.lock().calls.push(call);
    }

    fn query<T>(&self, player: PlayerHandle, name: &'static str, f: impl FnOnce(&FakePlayer) -> T) -> T
    where
        T: Default,
    {
        let mut state = self.state.lock();
        state.calls.push(Call::Other(name));
        state.players.get(&player).map(f).unwrap_or_default()
    }

    fn update(&self, player: PlayerHandle, name: &'static str, f: impl FnOnce(&mut FakePlayer)) {
        let mut state = self.state.lock();
        state.calls.push(Call::Other(name));
        if let Some(p) = state.player_mut(player) {
            f(p);
        }
    }

    fn new_media(&self) -> MediaHandle {
        let mut state = self.state.lock();
        if state.fail_media {
            return MediaHandle::NULL;
        }
        let media = MediaHandle::from_raw(state.allocate());
        state.media_refs.insert(media, 1);
        state.calls.push(Call::NewMedia(media));
        media
    }
}

impl NativeEngine for FakeEngine {
    fn new_context(&self, options: &[String]) -> ContextHandle {
        let mut state = self.state.lock();
        state.calls.push(Call::NewContext(options.to_vec()));
        if state.fail_context {
            return ContextHandle::NULL;
        }
        let context = ContextHandle::from_raw(state.allocate());
        state.contexts.insert(context);
        context
    }

    fn release_context(&self, context: ContextHandle) {
        let mut state = self.state.lock();
        state.calls.push(Call::ReleaseContext(context));
        if !state.contexts.remove(&context) {
            state.invalid_releases += 1;
        }
    }

    fn new_player(&self, context: ContextHandle) -> PlayerHandle {
        let mut state = self.state.lock();
        state.calls.push(Call::NewPlayer(context));
        if state.fail_player || !state.contexts.contains(&context) {
            return PlayerHandle::NULL;
        }
        let player = PlayerHandle::from_raw(state.allocate());
        state.players.insert(player, FakePlayer::default());
        player
    }

    fn release_player(&self, player: PlayerHandle) {
        let mut state = self.state.lock();
        state.calls.push(Call::ReleasePlayer(player));
        match state.players.remove(&player) {
            Some(p) => {
                if !p.media.is_null() {
                    state.release_media_ref(p.media);
                }
            }
            None => state.invalid_releases += 1,
        }
    }

    fn new_media_path(&self, _context: ContextHandle, _path: &Path) -> MediaHandle {
        self.new_media()
    }

    fn new_media_location(&self, _context: ContextHandle, _mrl: &str) -> MediaHandle {
        self.new_media()
    }

    fn new_media_stream(&self, _context: ContextHandle, _stream: Box<dyn Read + Send>) -> MediaHandle {
        self.new_media()
    }

    fn add_media_option(&self, media: MediaHandle, option: &str) {
        self.record(Call::AddMediaOption(media, option.to_string()));
    }

    fn release_media(&self, media: MediaHandle) {
        let mut state = self.state.lock();
        state.calls.push(Call::ReleaseMedia(media));
        state.release_media_ref(media);
    }

    fn set_media(&self, player: PlayerHandle, media: MediaHandle) {
        let mut state = self.state.lock();
        state.calls.push(Call::SetMedia(player, media));
        let previous = match state.player_mut(player) {
            Some(p) => std::mem::replace(&mut p.media, media),
            None => return,
        };
        state.retain_media(media);
        if !previous.is_null() {
            state.release_media_ref(previous);
        }
    }

    fn get_media(&self, player: PlayerHandle) -> MediaHandle {
        let hook = self.get_media_hook.lock().clone();
        if let Some(hook) = hook {
            hook(player);
        }

        let mut state = self.state.lock();
        state.calls.push(Call::GetMedia(player));
        let media = state
            .players
            .get(&player)
            .map(|p| p.media)
            .unwrap_or(MediaHandle::NULL);
        if !media.is_null() {
            state.retain_media(media);
        }
        media
    }

    fn play(&self, player: PlayerHandle) -> i32 {
        let mut state = self.state.lock();
        state.calls.push(Call::Play(player));
        match state.player_mut(player) {
            Some(p) if !p.media.is_null() => {
                p.playing = true;
                p.state = MediaState::Playing;
                0
            }
            _ => -1,
        }
    }

    fn pause(&self, player: PlayerHandle) {
        let mut state = self.state.lock();
        state.calls.push(Call::Pause(player));
        if let Some(p) = state.player_mut(player) {
            if p.playing && p.pausable {
                p.playing = false;
                p.state = MediaState::Paused;
            }
        }
    }

    fn stop(&self, player: PlayerHandle) {
        let mut state = self.state.lock();
        state.calls.push(Call::Stop(player));
        if let Some(p) = state.player_mut(player) {
            p.playing = false;
            p.state = MediaState::Stopped;
        }
    }

    fn next_frame(&self, player: PlayerHandle) {
        self.update(player, "next_frame", |p| p.time += 40);
    }

    fn navigate(&self, player: PlayerHandle, _mode: u32) {
        self.update(player, "navigate", |_| {});
    }

    fn will_play(&self, player: PlayerHandle) -> bool {
        self.query(player, "will_play", |p| !p.media.is_null())
    }

    fn is_playing(&self, player: PlayerHandle) -> bool {
        self.query(player, "is_playing", |p| p.playing)
    }

    fn is_seekable(&self, player: PlayerHandle) -> bool {
        self.query(player, "is_seekable", |p| p.seekable)
    }

    fn can_pause(&self, player: PlayerHandle) -> bool {
        self.query(player, "can_pause", |p| p.pausable)
    }

    fn state(&self, player: PlayerHandle) -> i32 {
        self.query(player, "state", |p| p.state.to_native())
    }

    fn position(&self, player: PlayerHandle) -> f32 {
        self.query(player, "position", |p| p.position)
    }

    fn set_position(&self, player: PlayerHandle, position: f32) {
        self.update(player, "set_position", |p| p.position = position);
    }

    fn rate(&self, player: PlayerHandle) -> f32 {
        self.query(player, "rate", |p| p.rate)
    }

    fn set_rate(&self, player: PlayerHandle, rate: f32) -> i32 {
        if rate <= 0.0 {
            self.record(Call::Other("set_rate"));
            return -1;
        }
        self.update(player, "set_rate", |p| p.rate = rate);
        0
    }

    fn time(&self, player: PlayerHandle) -> i64 {
        self.query(player, "time", |p| p.time)
    }

    fn set_time(&self, player: PlayerHandle, time: i64) {
        self.update(player, "set_time", |p| p.time = time);
    }

    fn length(&self, player: PlayerHandle) -> i64 {
        self.query(player, "length", |p| p.length)
    }

    fn fps(&self, player: PlayerHandle) -> f32 {
        self.query(player, "fps", |p| p.fps)
    }

    fn chapter(&self, player: PlayerHandle) -> i32 {
        self.query(player, "chapter", |p| p.chapter)
    }

    fn set_chapter(&self, player: PlayerHandle, chapter: i32) {
        self.update(player, "set_chapter", |p| p.chapter = chapter);
    }

    fn chapter_count(&self, player: PlayerHandle) -> i32 {
        self.query(player, "chapter_count", |p| p.chapter_count)
    }

    fn next_chapter(&self, player: PlayerHandle) {
        self.update(player, "next_chapter", |p| {
            if p.chapter + 1 < p.chapter_count {
                p.chapter += 1;
            }
        });
    }

    fn previous_chapter(&self, player: PlayerHandle) {
        self.update(player, "previous_chapter", |p| {
            if p.chapter > 0 {
                p.chapter -= 1;
            }
        });
    }

    fn spu(&self, player: PlayerHandle) -> i32 {
        self.query(player, "spu", |p| p.spu)
    }

    fn set_spu(&self, player: PlayerHandle, spu: i32) -> i32 {
        self.update(player, "set_spu", |p| p.spu = spu);
        0
    }

    fn spu_count(&self, player: PlayerHandle) -> i32 {
        self.query(player, "spu_count", |p| p.spu_count)
    }

    fn spu_delay(&self, player: PlayerHandle) -> i64 {
        self.query(player, "spu_delay", |p| p.spu_delay)
    }

    fn set_spu_delay(&self, player: PlayerHandle, delay: i64) -> i32 {
        self.update(player, "set_spu_delay", |p| p.spu_delay = delay);
        0
    }

    fn video_scale(&self, player: PlayerHandle) -> f32 {
        self.query(player, "video_scale", |p| p.scale)
    }

    fn set_video_scale(&self, player: PlayerHandle, scale: f32) {
        self.update(player, "set_video_scale", |p| p.scale = scale);
    }

    fn aspect_ratio(&self, player: PlayerHandle) -> Option<String> {
        self.query(player, "aspect_ratio", |p| p.aspect_ratio.clone())
    }

    fn set_aspect_ratio(&self, player: PlayerHandle, aspect: Option<&str>) {
        let aspect = aspect.map(str::to_string);
        self.update(player, "set_aspect_ratio", |p| p.aspect_ratio = aspect);
    }

    fn video_track(&self, player: PlayerHandle) -> i32 {
        self.query(player, "video_track", |p| p.video_track)
    }

    fn set_video_track(&self, player: PlayerHandle, track: i32) -> i32 {
        self.update(player, "set_video_track", |p| p.video_track = track);
        0
    }

    fn video_track_count(&self, player: PlayerHandle) -> i32 {
        self.query(player, "video_track_count", |p| i32::from(!p.media.is_null()))
    }

    fn volume(&self, player: PlayerHandle) -> i32 {
        self.query(player, "volume", |p| p.volume)
    }

    fn set_volume(&self, player: PlayerHandle, volume: i32) -> i32 {
        if !(0..=200).contains(&volume) {
            self.record(Call::Other("set_volume"));
            return -1;
        }
        self.update(player, "set_volume", |p| p.volume = volume);
        0
    }

    fn mute(&self, player: PlayerHandle) -> i32 {
        self.query(player, "mute", |p| i32::from(p.muted))
    }

    fn set_mute(&self, player: PlayerHandle, muted: bool) {
        self.update(player, "set_mute", |p| p.muted = muted);
    }

    fn toggle_mute(&self, player: PlayerHandle) {
        self.update(player, "toggle_mute", |p| p.muted = !p.muted);
    }

    fn audio_track(&self, player: PlayerHandle) -> i32 {
        self.query(player, "audio_track", |p| p.audio_track)
    }

    fn set_audio_track(&self, player: PlayerHandle, track: i32) -> i32 {
        self.update(player, "set_audio_track", |p| p.audio_track = track);
        0
    }

    fn audio_track_count(&self, player: PlayerHandle) -> i32 {
        self.query(player, "audio_track_count", |p| i32::from(!p.media.is_null()))
    }

    fn audio_delay(&self, player: PlayerHandle) -> i64 {
        self.query(player, "audio_delay", |p| p.audio_delay)
    }

    fn set_audio_delay(&self, player: PlayerHandle, delay: i64) -> i32 {
        self.update(player, "set_audio_delay", |p| p.audio_delay = delay);
        0
    }

    fn dialog_dismiss(&self, dialog: DialogHandle) -> i32 {
        self.record(Call::DialogDismiss(dialog));
        0
    }

    fn dialog_post_action(&self, dialog: DialogHandle, action: i32) -> i32 {
        self.record(Call::DialogPostAction(dialog, action));
        0
    }

    fn take_snapshot(
        &self,
        player: PlayerHandle,
        output: u32,
        path: &str,
        width: u32,
        height: u32,
    ) -> i32 {
        let mut state = self.state.lock();
        state.calls.push(Call::TakeSnapshot {
            player,
            output,
            path: path.to_string(),
            width,
            height,
        });
        state.snapshot_status
    }

    fn audio_filter_list(&self, _context: ContextHandle) -> ModuleListHandle {
        let mut state = self.state.lock();
        let names = state.audio_filters.clone();
        let head = state.build_list(&names);
        state.calls.push(Call::FilterList(head));
        head
    }

    fn video_filter_list(&self, _context: ContextHandle) -> ModuleListHandle {
        let mut state = self.state.lock();
        let names = state.video_filters.clone();
        let head = state.build_list(&names);
        state.calls.push(Call::FilterList(head));
        head
    }

    fn module_node(&self, node: ModuleListHandle) -> Option<ModuleNode> {
        self.state.lock().module_nodes.get(&node).cloned()
    }

    fn release_module_list(&self, head: ModuleListHandle) {
        let mut state = self.state.lock();
        state.calls.push(Call::ReleaseModuleList(head));
        let mut cursor = head;
        while let Some(node) = state.module_nodes.remove(&cursor) {
            cursor = node.next;
        }
    }

    fn player_event_manager(&self, player: PlayerHandle) -> EventManagerHandle {
        let mut state = self.state.lock();
        state.calls.push(Call::PlayerEventManager(player));
        if state.fail_event_manager || !state.players.contains_key(&player) {
            return EventManagerHandle::NULL;
        }
        let event_manager = EventManagerHandle::from_raw(state.allocate());
        state.event_managers.insert(event_manager, player);
        event_manager
    }

    fn release_event_manager(&self, event_manager: EventManagerHandle) {
        let mut state = self.state.lock();
        state.calls.push(Call::ReleaseEventManager(event_manager));
        if state.event_managers.remove(&event_manager).is_none() {
            state.invalid_releases += 1;
        }
    }

    fn attach_event(
        &self,
        event_manager: EventManagerHandle,
        kind: EventKind,
        callback: &NativeCallback,
    ) -> i32 {
        let mut state = self.state.lock();
        state.calls.push(Call::Attach(kind));
        if state.fail_attach.contains(&kind) || !state.event_managers.contains_key(&event_manager) {
            return -1;
        }
        state
            .attached
            .push((event_manager, kind, Arc::clone(callback)));
        *state.attach_counts.entry(kind).or_insert(0) += 1;
        0
    }

    fn detach_event(
        &self,
        event_manager: EventManagerHandle,
        kind: EventKind,
        callback: &NativeCallback,
    ) -> bool {
        let detached = {
            let mut state = self.state.lock();
            state.calls.push(Call::Detach(kind));
            let found = state.attached.iter().position(|(em, k, cb)| {
                *em == event_manager && *k == kind && Arc::ptr_eq(cb, callback)
            });
            match found {
                Some(index) => {
                    state.attached.remove(index);
                    *state.detach_counts.entry(kind).or_insert(0) += 1;
                    true
                }
                None => false,
            }
        };

        // wait out emits that picked up the callback before it was removed
        drop(self.dispatching.write());
        detached
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_are_distinct_and_non_null() {
        let engine = FakeEngine::new();
        let context = engine.new_context(&[]);
        let a = engine.new_player(context);
        let b = engine.new_player(context);
        assert!(!a.is_null());
        assert_ne!(a, b);
        assert_eq!(engine.live_players(), 2);
    }

    #[test]
    fn test_media_refcounts_follow_native_rules() {
        let engine = FakeEngine::new();
        let context = engine.new_context(&[]);
        let player = engine.new_player(context);
        let media = engine.new_media_location(context, "file:///a.mkv");
        assert_eq!(engine.media_refcount(media), 1);

        engine.set_media(player, media);
        assert_eq!(engine.media_refcount(media), 2);

        engine.release_media(media);
        engine.release_player(player);
        assert_eq!(engine.media_refcount(media), 0);
        assert_eq!(engine.invalid_releases(), 0);
    }

    #[test]
    fn test_double_release_is_counted() {
        let engine = FakeEngine::new();
        let context = engine.new_context(&[]);
        engine.release_context(context);
        engine.release_context(context);
        assert_eq!(engine.invalid_releases(), 1);
    }

    #[test]
    fn test_emit_reaches_attached_callbacks_only() {
        let engine = FakeEngine::new();
        let context = engine.new_context(&[]);
        let player = engine.new_player(context);
        let em = engine.player_event_manager(player);

        let hits = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&hits);
        let callback: NativeCallback = Arc::new(move |_event: &RawEvent| *counter.lock() += 1);

        assert_eq!(engine.attach_event(em, EventKind::Playing, &callback), 0);
        assert_eq!(engine.emit(EventKind::Playing, RawPayload::Empty), 1);
        assert_eq!(engine.emit(EventKind::Paused, RawPayload::Empty), 0);

        assert!(engine.detach_event(em, EventKind::Playing, &callback));
        assert_eq!(engine.emit(EventKind::Playing, RawPayload::Empty), 0);
        assert_eq!(*hits.lock(), 1);
    }

    #[test]
    fn test_detach_waits_for_running_callback() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::mpsc;
        use std::time::Duration;

        let engine = FakeEngine::shared();
        let context = engine.new_context(&[]);
        let player = engine.new_player(context);
        let em = engine.player_event_manager(player);

        let (entered_tx, entered_rx) = mpsc::channel();
        let finished = Arc::new(AtomicBool::new(false));
        let done = Arc::clone(&finished);
        let callback: NativeCallback = Arc::new(move |_event: &RawEvent| {
            let _ = entered_tx.send(());
            std::thread::sleep(Duration::from_millis(50));
            done.store(true, Ordering::SeqCst);
        });
        engine.attach_event(em, EventKind::Opening, &callback);

        let emitter = {
            let engine = Arc::clone(&engine);
            std::thread::spawn(move || engine.emit(EventKind::Opening, RawPayload::Empty))
        };
        entered_rx.recv().unwrap();

        assert!(engine.detach_event(em, EventKind::Opening, &callback));
        assert!(finished.load(Ordering::SeqCst));
        assert_eq!(emitter.join().unwrap(), 1);
    }

    #[test]
    fn test_detach_requires_same_identity() {
        let engine = FakeEngine::new();
        let context = engine.new_context(&[]);
        let player = engine.new_player(context);
        let em = engine.player_event_manager(player);

        let attached: NativeCallback = Arc::new(|_event: &RawEvent| {});
        let other: NativeCallback = Arc::new(|_event: &RawEvent| {});
        engine.attach_event(em, EventKind::Stopped, &attached);

        assert!(!engine.detach_event(em, EventKind::Stopped, &other));
        assert!(engine.detach_event(em, EventKind::Stopped, &attached));
    }
}
