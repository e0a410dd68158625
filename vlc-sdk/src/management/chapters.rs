use crate::error::Result;
use crate::MediaPlayer;

/// Chapter navigation
#[derive(Clone, Copy)]
pub struct Chapters<'a> {
    player: &'a MediaPlayer,
}

impl<'a> Chapters<'a> {
    pub(crate) fn new(player: &'a MediaPlayer) -> Self {
        Self { player }
    }

    /// Current chapter, -1 if the media has none
    pub fn current(&self) -> Result<i32> {
        Ok(self.player.manager().chapter(self.player.handle())?)
    }

    pub fn set_current(&self, chapter: i32) -> Result<()> {
        Ok(self.player.manager().set_chapter(self.player.handle(), chapter)?)
    }

    pub fn count(&self) -> Result<i32> {
        Ok(self.player.manager().chapter_count(self.player.handle())?)
    }

    pub fn next(&self) -> Result<()> {
        Ok(self.player.manager().next_chapter(self.player.handle())?)
    }

    pub fn previous(&self) -> Result<()> {
        Ok(self.player.manager().previous_chapter(self.player.handle())?)
    }
}
