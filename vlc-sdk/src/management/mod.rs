//! Capability views over a media player
//!
//! Each view borrows the [`MediaPlayer`](crate::MediaPlayer) it was obtained
//! from and reads the player's handle on every call, so a view can never
//! outlive its player and every call on a disposed player fails with an
//! invalid-handle error.

mod audio;
mod chapters;
mod dialogs;
mod subtitles;
mod video;

pub use audio::Audio;
pub use chapters::Chapters;
pub use dialogs::Dialogs;
pub use subtitles::SubTitles;
pub use video::Video;
