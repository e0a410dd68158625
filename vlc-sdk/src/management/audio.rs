use crate::error::Result;
use crate::MediaPlayer;

/// Volume, mute and audio track control
#[derive(Clone, Copy)]
pub struct Audio<'a> {
    player: &'a MediaPlayer,
}

impl<'a> Audio<'a> {
    pub(crate) fn new(player: &'a MediaPlayer) -> Self {
        Self { player }
    }

    /// Volume in percent, 0 to 200
    pub fn volume(&self) -> Result<i32> {
        Ok(self.player.manager().volume(self.player.handle())?)
    }

    /// Set the volume; `false` if out of range
    pub fn set_volume(&self, volume: i32) -> Result<bool> {
        Ok(self.player.manager().set_volume(self.player.handle(), volume)?)
    }

    /// `None` when there is no audio output to ask
    pub fn is_muted(&self) -> Result<Option<bool>> {
        Ok(self.player.manager().is_muted(self.player.handle())?)
    }

    pub fn set_mute(&self, muted: bool) -> Result<()> {
        Ok(self.player.manager().set_mute(self.player.handle(), muted)?)
    }

    pub fn toggle_mute(&self) -> Result<()> {
        Ok(self.player.manager().toggle_mute(self.player.handle())?)
    }

    pub fn track(&self) -> Result<i32> {
        Ok(self.player.manager().audio_track(self.player.handle())?)
    }

    pub fn set_track(&self, track: i32) -> Result<bool> {
        Ok(self.player.manager().set_audio_track(self.player.handle(), track)?)
    }

    pub fn track_count(&self) -> Result<i32> {
        Ok(self.player.manager().audio_track_count(self.player.handle())?)
    }

    /// Audio delay in microseconds
    pub fn delay(&self) -> Result<i64> {
        Ok(self.player.manager().audio_delay(self.player.handle())?)
    }

    pub fn set_delay(&self, delay: i64) -> Result<bool> {
        Ok(self.player.manager().set_audio_delay(self.player.handle(), delay)?)
    }
}
