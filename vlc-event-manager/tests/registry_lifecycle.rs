//! Registration lifecycle properties against the in-memory engine

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use proptest::prelude::*;
use vlc_api::testing::FakeEngine;
use vlc_api::{EventKind, RawPayload, VlcManager};
use vlc_event_manager::{EventRegistry, PlayerEvent};

fn player_on(engine: &Arc<FakeEngine>) -> (VlcManager, vlc_api::PlayerHandle) {
    let manager = VlcManager::new(engine.clone());
    let context = manager.acquire_context(&[]).unwrap();
    let player = manager.create_player(context).unwrap();
    (manager, player)
}

fn failing_kinds() -> impl Strategy<Value = BTreeSet<EventKind>> {
    proptest::sample::subsequence(EventKind::ALL.to_vec(), 0..=EventKind::ALL.len())
        .prop_map(|kinds| kinds.into_iter().collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn register_then_unregister_balances_every_kind(failing in failing_kinds()) {
        let engine = FakeEngine::shared();
        for kind in &failing {
            engine.fail_attach(*kind);
        }
        let (manager, player) = player_on(&engine);
        let registry = EventRegistry::new();

        registry.register_all(&manager, player).unwrap();
        prop_assert_eq!(registry.retained_count(), EventKind::ALL.len() - failing.len());

        registry.unregister_all(&manager);

        prop_assert_eq!(registry.retained_count(), 0);
        prop_assert_eq!(engine.attached_count(), 0);
        for kind in EventKind::ALL {
            prop_assert_eq!(engine.attach_count(kind), engine.detach_count(kind));
            let expected = if failing.contains(&kind) { 0 } else { 1 };
            prop_assert_eq!(engine.attach_count(kind), expected);
        }
    }

    #[test]
    fn repeated_cycles_stay_balanced(cycles in 1usize..5) {
        let engine = FakeEngine::shared();
        let (manager, player) = player_on(&engine);
        let registry = EventRegistry::new();

        for _ in 0..cycles {
            registry.register_all(&manager, player).unwrap();
            registry.unregister_all(&manager);
        }

        for kind in EventKind::ALL {
            prop_assert_eq!(engine.attach_count(kind), cycles);
            prop_assert_eq!(engine.detach_count(kind), cycles);
        }
        prop_assert_eq!(engine.invalid_releases(), 0);
    }
}

#[test]
fn callbacks_from_engine_threads_reach_subscribers() {
    let engine = FakeEngine::shared();
    let (manager, player) = player_on(&engine);
    let registry = EventRegistry::new();
    registry.register_all(&manager, player).unwrap();

    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    registry.subscribe(EventKind::PositionChanged, move |event| {
        if let PlayerEvent::PositionChanged { position } = event {
            assert!((0.0..=1.0).contains(position));
            counter.fetch_add(1, Ordering::SeqCst);
        }
    });

    let workers: Vec<_> = (0..4)
        .map(|i| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                for step in 0..25 {
                    let position = (i * 25 + step) as f32 / 100.0;
                    engine.emit(EventKind::PositionChanged, RawPayload::Float(position));
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(hits.load(Ordering::SeqCst), 100);
    registry.unregister_all(&manager);
}

#[test]
fn unregister_while_callbacks_fire() {
    let engine = FakeEngine::shared();
    let (manager, player) = player_on(&engine);
    let registry = Arc::new(EventRegistry::new());
    registry.register_all(&manager, player).unwrap();

    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    registry.subscribe_all(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let emitter = {
        let engine = Arc::clone(&engine);
        thread::spawn(move || {
            for _ in 0..200 {
                engine.emit(EventKind::TimeChanged, RawPayload::Long(10));
            }
        })
    };

    registry.unregister_all(&manager);
    let hits_at_unregister = hits.load(Ordering::SeqCst);
    emitter.join().unwrap();

    // nothing is delivered once unregister_all has returned
    assert_eq!(hits.load(Ordering::SeqCst), hits_at_unregister);
    assert!(!registry.is_active());
    assert_eq!(engine.attached_count(), 0);
    assert_eq!(engine.emit(EventKind::TimeChanged, RawPayload::Long(10)), 0);
    assert_eq!(hits.load(Ordering::SeqCst), hits_at_unregister);
}
