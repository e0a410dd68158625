use crate::error::Result;
use crate::MediaPlayer;

/// Subtitle (SPU) track selection and timing
#[derive(Clone, Copy)]
pub struct SubTitles<'a> {
    player: &'a MediaPlayer,
}

impl<'a> SubTitles<'a> {
    pub(crate) fn new(player: &'a MediaPlayer) -> Self {
        Self { player }
    }

    /// Current subtitle track id, -1 when disabled
    pub fn current(&self) -> Result<i32> {
        Ok(self.player.manager().spu(self.player.handle())?)
    }

    /// Select a subtitle track; -1 disables subtitles
    pub fn set_current(&self, id: i32) -> Result<bool> {
        Ok(self.player.manager().set_spu(self.player.handle(), id)?)
    }

    pub fn count(&self) -> Result<i32> {
        Ok(self.player.manager().spu_count(self.player.handle())?)
    }

    /// Subtitle delay in microseconds
    pub fn delay(&self) -> Result<i64> {
        Ok(self.player.manager().spu_delay(self.player.handle())?)
    }

    pub fn set_delay(&self, delay: i64) -> Result<bool> {
        Ok(self.player.manager().set_spu_delay(self.player.handle(), delay)?)
    }
}
