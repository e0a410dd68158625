//! Playback enums shared by the resource manager and the SDK

use serde::{Deserialize, Serialize};

/// Coarse playback state of a native player
///
/// Always read live from the engine; never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaState {
    NothingSpecial,
    Opening,
    Buffering,
    Playing,
    Paused,
    Stopped,
    Ended,
    Error,
}

impl MediaState {
    /// Map a native `libvlc_state_t` value
    ///
    /// Unknown values are reported as `Error` rather than rejected.
    pub fn from_native(value: i32) -> Self {
        match value {
            0 => MediaState::NothingSpecial,
            1 => MediaState::Opening,
            2 => MediaState::Buffering,
            3 => MediaState::Playing,
            4 => MediaState::Paused,
            5 => MediaState::Stopped,
            6 => MediaState::Ended,
            _ => MediaState::Error,
        }
    }

    /// Native `libvlc_state_t` value
    pub fn to_native(&self) -> i32 {
        match self {
            MediaState::NothingSpecial => 0,
            MediaState::Opening => 1,
            MediaState::Buffering => 2,
            MediaState::Playing => 3,
            MediaState::Paused => 4,
            MediaState::Stopped => 5,
            MediaState::Ended => 6,
            MediaState::Error => 7,
        }
    }
}

/// DVD-style menu navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NavigateMode {
    Activate,
    Up,
    Down,
    Left,
    Right,
    Popup,
}

impl NavigateMode {
    /// Native `libvlc_navigate_mode_t` value
    pub fn to_native(&self) -> u32 {
        match self {
            NavigateMode::Activate => 0,
            NavigateMode::Up => 1,
            NavigateMode::Down => 2,
            NavigateMode::Left => 3,
            NavigateMode::Right => 4,
            NavigateMode::Popup => 5,
        }
    }
}

/// Elementary stream category carried by ES events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackType {
    Unknown,
    Audio,
    Video,
    Text,
}

impl TrackType {
    /// Map a native `libvlc_track_type_t` value
    pub fn from_native(value: i32) -> Self {
        match value {
            0 => TrackType::Audio,
            1 => TrackType::Video,
            2 => TrackType::Text,
            _ => TrackType::Unknown,
        }
    }
}

/// Action posted back to a native question dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialogAction {
    First,
    Second,
}

impl DialogAction {
    /// Native action index (1 or 2)
    pub fn to_native(&self) -> i32 {
        match self {
            DialogAction::First => 1,
            DialogAction::Second => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(MediaState::NothingSpecial)]
    #[case(MediaState::Opening)]
    #[case(MediaState::Buffering)]
    #[case(MediaState::Playing)]
    #[case(MediaState::Paused)]
    #[case(MediaState::Stopped)]
    #[case(MediaState::Ended)]
    #[case(MediaState::Error)]
    fn test_state_native_mapping(#[case] state: MediaState) {
        assert_eq!(MediaState::from_native(state.to_native()), state);
    }

    #[test]
    fn test_unknown_state_is_error() {
        assert_eq!(MediaState::from_native(42), MediaState::Error);
        assert_eq!(MediaState::from_native(-1), MediaState::Error);
    }

    #[test]
    fn test_track_type_mapping() {
        assert_eq!(TrackType::from_native(0), TrackType::Audio);
        assert_eq!(TrackType::from_native(2), TrackType::Text);
        assert_eq!(TrackType::from_native(-1), TrackType::Unknown);
    }
}
