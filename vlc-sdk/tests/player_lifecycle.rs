//! Player lifecycle properties against the in-memory engine

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use proptest::prelude::*;
use rstest::rstest;
use vlc_api::testing::{Call, FakeEngine};
use vlc_api::{MediaState, RawPayload};
use vlc_sdk::{EventKind, MediaPlayer, PlayerConfig, PlayerEvent, SdkError, VlcSystem};

// ============================================================================
// Test Helpers
// ============================================================================

fn system() -> (Arc<FakeEngine>, VlcSystem) {
    let engine = FakeEngine::shared();
    let system = VlcSystem::with_config(engine.clone(), PlayerConfig::quiet());
    (engine, system)
}

fn release_count(engine: &FakeEngine, player: vlc_api::PlayerHandle) -> usize {
    engine.count(&Call::ReleasePlayer(player))
}

// ============================================================================
// Disposal
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn only_first_dispose_has_effect(extra in 1usize..6, with_media in any::<bool>()) {
        let (engine, system) = system();
        let player = system.create_player().unwrap();
        let handle = player.handle();
        if with_media {
            player.set_media_source("file:///a.mkv", &[]).unwrap();
        }

        player.dispose();
        let calls_after_first = engine.calls().len();

        for _ in 0..extra {
            player.dispose();
        }
        drop(player);

        prop_assert_eq!(engine.calls().len(), calls_after_first);
        prop_assert_eq!(release_count(&engine, handle), 1);
        prop_assert_eq!(engine.invalid_releases(), 0);
        prop_assert_eq!(engine.live_contexts(), 0);
    }
}

#[test]
fn dispose_cascades_to_every_tracked_media() {
    let (engine, system) = system();
    let player = system.create_player().unwrap();

    let a = player.set_media_source("a", &[]).unwrap();
    let extra = player.new_media("b", &[]).unwrap();
    system.ledger().track(player.id(), &extra);

    player.dispose();

    assert!(a.is_disposed());
    assert!(extra.is_disposed());
    assert!(system.ledger().media_for(player.id()).is_empty());
    assert_eq!(engine.media_refcount(a.handle()), 0);
    assert_eq!(engine.media_refcount(extra.handle()), 0);
}

#[test]
fn dispose_without_media_cascades_nothing() {
    let (engine, system) = system();
    let player = system.create_player().unwrap();

    player.dispose();

    let releases = engine
        .calls()
        .iter()
        .filter(|c| matches!(c, Call::ReleaseMedia(_)))
        .count();
    assert_eq!(releases, 0);
    assert_eq!(system.ledger().player_count(), 0);
}

#[test]
fn disposing_one_player_leaves_others_media_alone() {
    let (_engine, system) = system();
    let first = system.create_player().unwrap();
    let second = system.create_player().unwrap();
    let kept = second.set_media_source("kept", &[]).unwrap();
    first.set_media_source("gone", &[]).unwrap();

    first.dispose();

    assert!(!kept.is_disposed());
    assert_eq!(system.ledger().media_for(second.id()), vec![kept]);
}

// ============================================================================
// Media replacement
// ============================================================================

#[test]
fn replacing_media_disposes_previous_before_attaching() {
    let (engine, system) = system();
    let player = system.create_player().unwrap();
    let handle = player.handle();

    let a = player.set_media_source("a", &[]).unwrap();
    let b = player.new_media("b", &[]).unwrap();
    player.set_media(&b).unwrap();

    let disposed_a = engine.position_of(&Call::ReleaseMedia(a.handle())).unwrap();
    let attached_b = engine
        .position_of(&Call::SetMedia(handle, b.handle()))
        .unwrap();

    assert!(a.is_disposed());
    assert!(disposed_a < attached_b);
    assert_eq!(system.ledger().media_for(player.id()), vec![b.clone()]);
    assert_eq!(engine.player_media(handle), b.handle());
}

#[test]
fn reattaching_same_media_does_not_dispose_it() {
    let (engine, system) = system();
    let player = system.create_player().unwrap();

    let a = player.set_media_source("a", &[]).unwrap();
    player.set_media(&a).unwrap();

    assert!(!a.is_disposed());
    // ours + the player's
    assert_eq!(engine.media_refcount(a.handle()), 2);
    assert_eq!(system.ledger().media_for(player.id()), vec![a]);
}

#[test]
fn dispose_during_set_media_still_cascades() {
    let (engine, system) = system();
    let player = Arc::new(system.create_player().unwrap());
    let handle = player.handle();
    let media = player.new_media("late", &[]).unwrap();

    let entered = Arc::new(Barrier::new(2));
    let resume = Arc::new(Barrier::new(2));
    let fired = AtomicBool::new(false);
    {
        let entered = Arc::clone(&entered);
        let resume = Arc::clone(&resume);
        engine.on_get_media(move |_| {
            if !fired.swap(true, Ordering::SeqCst) {
                entered.wait();
                resume.wait();
            }
        });
    }

    let attach = {
        let player = Arc::clone(&player);
        let media = media.clone();
        thread::spawn(move || player.set_media(&media))
    };
    entered.wait();

    let teardown = {
        let player = Arc::clone(&player);
        thread::spawn(move || player.dispose())
    };
    thread::sleep(Duration::from_millis(50));
    resume.wait();

    assert!(attach.join().unwrap().is_ok());
    teardown.join().unwrap();

    let attached = engine.position_of(&Call::SetMedia(handle, media.handle())).unwrap();
    let released = engine.position_of(&Call::ReleasePlayer(handle)).unwrap();
    assert!(attached < released);
    assert!(media.is_disposed());
    assert_eq!(system.ledger().player_count(), 0);
    assert_eq!(engine.media_refcount(media.handle()), 0);
    assert_eq!(engine.invalid_releases(), 0);
}

#[test]
fn set_media_after_dispose_leaves_ledger_empty() {
    let (engine, system) = system();
    let player = system.create_player().unwrap();
    let media = player.new_media("a", &[]).unwrap();
    player.dispose();

    assert!(player.set_media(&media).unwrap_err().is_invalid_handle());
    assert!(player.media().unwrap_err().is_invalid_handle());
    assert_eq!(system.ledger().player_count(), 0);
    assert_eq!(engine.invalid_releases(), 0);
}

#[test]
fn disposed_media_cannot_be_attached() {
    let (_engine, system) = system();
    let player = system.create_player().unwrap();
    let media = player.new_media("a", &[]).unwrap();
    media.dispose();

    assert!(player.set_media(&media).unwrap_err().is_invalid_handle());
}

// ============================================================================
// Handle validity
// ============================================================================

#[rstest]
#[case::play("play")]
#[case::pause("pause")]
#[case::stop("stop")]
#[case::media("media")]
#[case::set_media("set_media")]
#[case::state("state")]
#[case::position("position")]
#[case::rate("rate")]
#[case::time("time")]
#[case::length("length")]
#[case::spu("spu")]
#[case::seekable("is_seekable")]
#[case::pausable("is_pausable")]
#[case::fps("fps")]
#[case::snapshot("take_snapshot")]
#[case::chapters("chapters")]
#[case::volume("volume")]
#[case::video("video_scale")]
#[case::subtitles("subtitles")]
fn disposed_player_never_reaches_engine(#[case] operation: &str) {
    let (engine, system) = system();
    let player = system.create_player().unwrap();
    let media = player.new_media("a", &[]).unwrap();
    player.dispose();
    engine.clear_calls();

    let err: SdkError = match operation {
        "play" => player.play().map(|_| ()),
        "pause" => player.pause(),
        "stop" => player.stop(),
        "media" => player.media().map(|_| ()),
        "set_media" => player.set_media(&media),
        "state" => player.state().map(|_| ()),
        "position" => player.position().map(|_| ()),
        "rate" => player.rate().map(|_| ()),
        "time" => player.time().map(|_| ()),
        "length" => player.length().map(|_| ()),
        "spu" => player.spu().map(|_| ()),
        "is_seekable" => player.is_seekable().map(|_| ()),
        "is_pausable" => player.is_pausable().map(|_| ()),
        "fps" => player.fps().map(|_| ()),
        "take_snapshot" => player.take_snapshot("/tmp/x.png").map(|_| ()),
        "chapters" => player.chapters().count().map(|_| ()),
        "volume" => player.audio().volume().map(|_| ()),
        "video_scale" => player.video().scale().map(|_| ()),
        "subtitles" => player.subtitles().count().map(|_| ()),
        other => panic!("unknown operation {}", other),
    }
    .unwrap_err();

    assert!(err.is_invalid_handle(), "{} gave {:?}", operation, err);
    assert!(engine.calls().is_empty(), "{} reached the engine", operation);
}

// ============================================================================
// Snapshots and filters
// ============================================================================

#[rstest]
#[case(0, 0)]
#[case(0, 10)]
#[case(10, 0)]
#[case(1280, 720)]
fn snapshot_dimensions_reach_engine_unchanged(#[case] width: u32, #[case] height: u32) {
    let (engine, system) = system();
    let player = system.create_player().unwrap();

    assert!(player.take_snapshot_to(1, "/tmp/shot.png", width, height).unwrap());

    assert_eq!(
        engine.count(&Call::TakeSnapshot {
            player: player.handle(),
            output: 1,
            path: "/tmp/shot.png".to_string(),
            width,
            height,
        }),
        1
    );
}

#[test]
fn default_snapshot_uses_first_output_at_original_size() {
    let (engine, system) = system();
    let player = system.create_player().unwrap();

    player.take_snapshot("/tmp/frame.png").unwrap();

    assert_eq!(
        engine.count(&Call::TakeSnapshot {
            player: player.handle(),
            output: 0,
            path: "/tmp/frame.png".to_string(),
            width: 0,
            height: 0,
        }),
        1
    );
}

#[test]
fn empty_filter_lists_release_once() {
    let (engine, system) = system();
    let player = system.create_player().unwrap();

    assert!(player.audio_filters().unwrap().is_empty());

    let releases = engine
        .calls()
        .iter()
        .filter(|c| matches!(c, Call::ReleaseModuleList(_)))
        .count();
    assert_eq!(releases, 1);
}

#[test]
fn filters_come_back_in_list_order() {
    let (engine, system) = system();
    engine.set_audio_filters(&["equalizer", "compressor", "spatializer"]);
    let player = system.create_player().unwrap();

    let names: Vec<String> = player
        .audio_filters()
        .unwrap()
        .into_iter()
        .map(|f| f.name)
        .collect();

    assert_eq!(names, vec!["equalizer", "compressor", "spatializer"]);
}

// ============================================================================
// Events and state
// ============================================================================

#[test]
fn state_is_a_live_query() {
    let (engine, system) = system();
    let player = system.create_player().unwrap();
    player.set_media_source("a", &[]).unwrap();

    assert_eq!(player.state().unwrap(), MediaState::NothingSpecial);
    player.play().unwrap();
    assert_eq!(player.state().unwrap(), MediaState::Playing);

    engine.set_state(player.handle(), MediaState::Ended);
    assert_eq!(player.state().unwrap(), MediaState::Ended);
}

#[test]
fn events_reach_subscribers_until_dispose() {
    let (engine, system) = system();
    let player = system.create_player().unwrap();

    let ended = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&ended);
    player.events().subscribe(EventKind::EndReached, move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let iter = player.events().iter();

    engine.emit(EventKind::EndReached, RawPayload::Empty);
    assert_eq!(ended.load(Ordering::SeqCst), 1);
    assert_eq!(iter.try_recv(), Some(PlayerEvent::EndReached));

    player.dispose();
    engine.emit(EventKind::EndReached, RawPayload::Empty);

    assert_eq!(ended.load(Ordering::SeqCst), 1);
    assert!(iter.recv().is_none());
    assert_eq!(engine.attached_count(), 0);
}

#[test]
fn attach_failures_do_not_abort_construction() {
    let engine = FakeEngine::shared();
    engine.fail_attach(EventKind::AudioDevice);
    engine.fail_attach(EventKind::ScrambledChanged);
    let system = VlcSystem::with_config(engine.clone(), PlayerConfig::quiet());

    let player = system.create_player().unwrap();
    assert_eq!(
        player.events().retained_count(),
        EventKind::ALL.len() - 2
    );

    player.dispose();
    assert_eq!(engine.detach_count(EventKind::AudioDevice), 0);
    assert_eq!(engine.attached_count(), 0);
}

// ============================================================================
// Capability views
// ============================================================================

#[test]
fn audio_view_reports_rejected_volume() {
    let (_engine, system) = system();
    let player = system.create_player().unwrap();
    let audio = player.audio();

    assert!(audio.set_volume(120).unwrap());
    assert_eq!(audio.volume().unwrap(), 120);
    assert!(!audio.set_volume(500).unwrap());
    assert_eq!(audio.volume().unwrap(), 120);
}

#[test]
fn dialogs_view_requires_live_player() {
    let (_engine, system) = system();
    let player = system.create_player().unwrap();
    player.dispose();

    let err = player
        .dialogs()
        .dismiss(vlc_api::DialogHandle::from_raw(0x99))
        .unwrap_err();
    assert_eq!(err, SdkError::Disposed);
}

#[test]
fn player_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<MediaPlayer>();
    assert_send_sync::<VlcSystem>();
}
