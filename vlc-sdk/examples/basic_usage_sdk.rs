//! Basic usage of the VLC SDK against the in-memory engine
//!
//! Shows the player lifecycle end to end:
//! - create a system and a player
//! - subscribe to events and iterate over them
//! - attach media, play, take a snapshot, list filters
//! - dispose, after which every call fails cleanly
//!
//! Run with: cargo run -p vlc-sdk --example basic_usage_sdk --features test-support

use std::time::Duration;

use vlc_api::{RawPayload, VlcError};
use vlc_sdk::testing::FakeEngine;
use vlc_sdk::{logging, EventKind, PlayerConfig, PlayerEvent, SdkError, VlcSystem};

fn main() -> Result<(), SdkError> {
    if let Err(e) = logging::init_logging_from_env() {
        eprintln!("Logging disabled: {}", e);
    }

    println!("VLC SDK - Player Lifecycle Example");
    println!("==================================");

    let engine = FakeEngine::shared();
    engine.set_video_filters(&["deinterlace", "sharpen", "grain"]);

    let system = VlcSystem::with_config(engine.clone(), PlayerConfig::from_env());
    let player = system.create_player()?;
    println!("Created {} with {} event kinds attached", player.id(), player.events().retained_count());

    player.events().subscribe(EventKind::TimeChanged, |event| {
        if let PlayerEvent::TimeChanged { time } = event {
            println!("   subscriber: time is now {} ms", time);
        }
    });
    let events = player.events().iter();

    println!("\nPlayback:");
    let media = player.set_media_source("file:///movies/big_buck_bunny.mp4", &[":start-time=5".to_string()])?;
    println!("   attached media {}", media.handle());
    VlcError::require(player.play()?, "play")?;
    println!("   state: {:?}", player.state()?);

    // Native callbacks normally arrive from engine threads.
    engine.emit(EventKind::Playing, RawPayload::Empty);
    engine.emit(EventKind::TimeChanged, RawPayload::Long(5_000));

    for event in events.timeout_iter(Duration::from_millis(10)) {
        println!("   iterator: {:?}", event);
    }

    println!("\nSnapshot and filters:");
    println!("   snapshot taken: {}", player.take_snapshot_to(0, "/tmp/frame.png", 640, 0)?);
    for filter in player.video_filters()? {
        println!("   video filter: {}", filter.name);
    }

    println!("\nAudio:");
    player.audio().set_volume(80)?;
    println!("   volume: {}", player.audio().volume()?);

    println!("\nTeardown:");
    player.dispose();
    println!("   media disposed: {}", media.is_disposed());
    match player.play() {
        Ok(_) => println!("   unexpected: play succeeded after dispose"),
        Err(e) => println!("   play after dispose: {}", e),
    }

    Ok(())
}
