use vlc_api::{DialogAction, DialogHandle};

use crate::error::{Result, SdkError};
use crate::MediaPlayer;

/// Answers to native question and login dialogs
///
/// Dialog handles arrive through the engine's dialog callbacks; this view
/// only replies to them while the player is alive.
#[derive(Clone, Copy)]
pub struct Dialogs<'a> {
    player: &'a MediaPlayer,
}

impl<'a> Dialogs<'a> {
    pub(crate) fn new(player: &'a MediaPlayer) -> Self {
        Self { player }
    }

    /// Close a dialog without answering it
    pub fn dismiss(&self, dialog: DialogHandle) -> Result<bool> {
        if self.player.is_disposed() {
            return Err(SdkError::Disposed);
        }
        Ok(self.player.manager().dismiss_dialog(dialog)?)
    }

    /// Answer a question dialog with one of its two actions
    pub fn post_action(&self, dialog: DialogHandle, action: DialogAction) -> Result<bool> {
        if self.player.is_disposed() {
            return Err(SdkError::Disposed);
        }
        Ok(self.player.manager().post_dialog_action(dialog, action)?)
    }
}
