//! VlcSystem - Main entry point for the SDK
//!
//! Owns the resource manager and the attached-media ledger shared by every
//! player it creates.

use std::sync::Arc;

use vlc_api::{NativeEngine, VlcManager};

use crate::config::PlayerConfig;
use crate::error::Result;
use crate::ledger::MediaLedger;
use crate::player::MediaPlayer;

/// Root of a player family
///
/// Players created from one system share its engine context: the first
/// player initializes it, the last disposed player releases it.
///
/// # Example
///
/// ```rust,ignore
/// use vlc_sdk::{PlayerConfig, VlcSystem};
///
/// let system = VlcSystem::with_config(engine, PlayerConfig::quiet());
///
/// let main = system.create_player()?;
/// let preview = system.create_player()?;
///
/// main.play_source("movie.mkv", &[])?;
/// ```
pub struct VlcSystem {
    manager: Arc<VlcManager>,
    ledger: Arc<MediaLedger>,
    config: PlayerConfig,
}

impl VlcSystem {
    /// Create a system over `engine` with the default configuration
    pub fn new(engine: Arc<dyn NativeEngine>) -> Self {
        Self::with_config(engine, PlayerConfig::default())
    }

    /// Create a system over `engine` whose players default to `config`
    pub fn with_config(engine: Arc<dyn NativeEngine>, config: PlayerConfig) -> Self {
        Self {
            manager: Arc::new(VlcManager::new(engine)),
            ledger: Arc::new(MediaLedger::new()),
            config,
        }
    }

    /// Create a player with the system configuration
    pub fn create_player(&self) -> Result<MediaPlayer> {
        self.create_player_with(self.config.clone())
    }

    /// Create a player with its own configuration
    ///
    /// Engine options only take effect for the player that initializes the
    /// shared context.
    pub fn create_player_with(&self, config: PlayerConfig) -> Result<MediaPlayer> {
        MediaPlayer::new(Arc::clone(&self.manager), Arc::clone(&self.ledger), config)
    }

    /// Get the attached-media ledger
    pub fn ledger(&self) -> &Arc<MediaLedger> {
        &self.ledger
    }

    /// Get the resource manager for advanced usage
    pub fn manager(&self) -> &Arc<VlcManager> {
        &self.manager
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }
}

impl Drop for VlcSystem {
    fn drop(&mut self) {
        tracing::debug!(
            "VlcSystem dropping, {} players with tracked media, {} context leases",
            self.ledger.player_count(),
            self.manager.context_leases()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vlc_api::testing::{Call, FakeEngine};

    #[test]
    fn test_players_share_one_context() {
        let engine = FakeEngine::shared();
        let system = VlcSystem::with_config(engine.clone(), PlayerConfig::quiet());

        let first = system.create_player().unwrap();
        let second = system.create_player().unwrap();

        assert_eq!(engine.count(&Call::NewContext(vec!["--quiet".to_string()])), 1);
        assert_eq!(system.manager().context_leases(), 2);
        assert_ne!(first.id(), second.id());

        first.dispose();
        assert_eq!(engine.live_contexts(), 1);
        second.dispose();
        assert_eq!(engine.live_contexts(), 0);
    }

    #[test]
    fn test_context_failure_surfaces() {
        let engine = FakeEngine::shared();
        engine.fail_context_creation();
        let system = VlcSystem::with_config(engine, PlayerConfig::quiet());

        let err = system.create_player().unwrap_err();
        assert!(matches!(
            err,
            crate::SdkError::Api(vlc_api::VlcError::Initialization { .. })
        ));
    }
}
