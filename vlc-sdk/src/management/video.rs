use crate::error::Result;
use crate::MediaPlayer;

/// Video output settings and track selection
#[derive(Clone, Copy)]
pub struct Video<'a> {
    player: &'a MediaPlayer,
}

impl<'a> Video<'a> {
    pub(crate) fn new(player: &'a MediaPlayer) -> Self {
        Self { player }
    }

    /// Scale factor, 0 when the video fits its window
    pub fn scale(&self) -> Result<f32> {
        Ok(self.player.manager().video_scale(self.player.handle())?)
    }

    pub fn set_scale(&self, scale: f32) -> Result<()> {
        Ok(self.player.manager().set_video_scale(self.player.handle(), scale)?)
    }

    /// Forced aspect ratio such as `16:9`, `None` for the source default
    pub fn aspect_ratio(&self) -> Result<Option<String>> {
        Ok(self.player.manager().aspect_ratio(self.player.handle())?)
    }

    pub fn set_aspect_ratio(&self, aspect: Option<&str>) -> Result<()> {
        Ok(self
            .player
            .manager()
            .set_aspect_ratio(self.player.handle(), aspect)?)
    }

    pub fn track(&self) -> Result<i32> {
        Ok(self.player.manager().video_track(self.player.handle())?)
    }

    pub fn set_track(&self, track: i32) -> Result<bool> {
        Ok(self.player.manager().set_video_track(self.player.handle(), track)?)
    }

    pub fn track_count(&self) -> Result<i32> {
        Ok(self.player.manager().video_track_count(self.player.handle())?)
    }
}
