//! Attached-media ledger
//!
//! Records which media each player has loaded so that disposing a player can
//! cascade to its media. One ledger is owned by a [`VlcSystem`](crate::VlcSystem)
//! and shared with every player it creates.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use vlc_api::MediaHandle;

use crate::media::Media;

/// Identity of one media player for the lifetime of the process
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct PlayerId(u64);

impl PlayerId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "player-{}", self.0)
    }
}

/// Player to loaded-media table
#[derive(Debug, Default)]
pub struct MediaLedger {
    entries: Mutex<HashMap<PlayerId, Vec<Media>>>,
}

impl MediaLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `player` loaded `media`
    ///
    /// Returns `false` if a live media with the same handle was already
    /// tracked. A disposed one is replaced in place.
    pub fn track(&self, player: PlayerId, media: &Media) -> bool {
        let mut entries = self.entries.lock();
        let loaded = entries.entry(player).or_default();
        match loaded.iter_mut().find(|m| *m == media) {
            Some(existing) if existing.is_disposed() && !media.is_disposed() => {
                *existing = media.clone();
                true
            }
            Some(_) => false,
            None => {
                loaded.push(media.clone());
                true
            }
        }
    }

    /// Stop tracking one media of `player`
    pub fn untrack(&self, player: PlayerId, handle: MediaHandle) -> Option<Media> {
        let mut entries = self.entries.lock();
        let loaded = entries.get_mut(&player)?;
        let index = loaded.iter().position(|m| m.handle() == handle)?;
        let media = loaded.remove(index);
        if loaded.is_empty() {
            entries.remove(&player);
        }
        Some(media)
    }

    /// The tracked media of `player` with the given handle
    pub fn find(&self, player: PlayerId, handle: MediaHandle) -> Option<Media> {
        self.entries
            .lock()
            .get(&player)?
            .iter()
            .find(|m| m.handle() == handle)
            .cloned()
    }

    /// Media loaded by `player`, in load order
    pub fn media_for(&self, player: PlayerId) -> Vec<Media> {
        self.entries
            .lock()
            .get(&player)
            .cloned()
            .unwrap_or_default()
    }

    /// Remove the entry for `player` and hand back its media
    ///
    /// The entry is gone before the caller gets to dispose anything.
    pub fn take(&self, player: PlayerId) -> Vec<Media> {
        self.entries.lock().remove(&player).unwrap_or_default()
    }

    /// Number of players with tracked media
    pub fn player_count(&self) -> usize {
        self.entries.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use vlc_api::testing::FakeEngine;
    use vlc_api::VlcManager;

    fn media_pair() -> (Media, Media) {
        let manager = Arc::new(VlcManager::new(FakeEngine::shared()));
        let context = manager.acquire_context(&[]).unwrap();
        let a = Media::create(&manager, context, "a".into(), &[]).unwrap();
        let b = Media::create(&manager, context, "b".into(), &[]).unwrap();
        (a, b)
    }

    #[test]
    fn test_track_dedups_by_handle() {
        let ledger = MediaLedger::new();
        let player = PlayerId::next();
        let (a, b) = media_pair();

        assert!(ledger.track(player, &a));
        assert!(!ledger.track(player, &a.clone()));
        assert!(ledger.track(player, &b));

        assert_eq!(ledger.media_for(player), vec![a, b]);
    }

    #[test]
    fn test_track_replaces_disposed_wrapper() {
        let ledger = MediaLedger::new();
        let player = PlayerId::next();
        let manager = Arc::new(VlcManager::new(FakeEngine::shared()));
        let context = manager.acquire_context(&[]).unwrap();
        let stale = Media::create(&manager, context, "a".into(), &[]).unwrap();
        ledger.track(player, &stale);
        stale.dispose();

        let fresh = Media::adopt(&manager, stale.handle());
        assert!(ledger.track(player, &fresh));

        let tracked = ledger.media_for(player);
        assert_eq!(tracked.len(), 1);
        assert!(!tracked[0].is_disposed());
        assert!(!ledger.track(player, &fresh));
    }

    #[test]
    fn test_take_removes_entry() {
        let ledger = MediaLedger::new();
        let player = PlayerId::next();
        let other = PlayerId::next();
        let (a, b) = media_pair();
        ledger.track(player, &a);
        ledger.track(other, &b);

        let taken = ledger.take(player);

        assert_eq!(taken, vec![a]);
        assert!(ledger.media_for(player).is_empty());
        assert_eq!(ledger.player_count(), 1);
        assert!(ledger.take(player).is_empty());
    }

    #[test]
    fn test_untrack_last_media_drops_entry() {
        let ledger = MediaLedger::new();
        let player = PlayerId::next();
        let (a, _b) = media_pair();
        ledger.track(player, &a);

        assert_eq!(ledger.untrack(player, a.handle()), Some(a.clone()));
        assert_eq!(ledger.player_count(), 0);
        assert!(ledger.untrack(player, a.handle()).is_none());
    }

    #[test]
    fn test_player_ids_are_unique() {
        let a = PlayerId::next();
        let b = PlayerId::next();
        assert_ne!(a, b);
        assert_eq!(format!("{}", a), format!("player-{}", a.as_u64()));
    }
}
