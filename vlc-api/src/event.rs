//! Native media player event kinds and raw event payloads
//!
//! These types mirror the shape of `libvlc_event_t`: a numeric event type and
//! a union of per-kind primitive data. Decoding into typed events happens in
//! the event manager crate.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::handle::NativeHandle;

/// Callback attached to a native event manager
///
/// The `Arc` pointer is the callback's identity: detaching must pass a clone
/// of the very same `Arc` that was attached.
pub type NativeCallback = Arc<dyn Fn(&RawEvent) + Send + Sync>;

/// The fixed set of media player event kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventKind {
    MediaChanged,
    Opening,
    Buffering,
    Playing,
    Paused,
    Stopped,
    Forward,
    Backward,
    EndReached,
    EncounteredError,
    TimeChanged,
    PositionChanged,
    SeekableChanged,
    PausableChanged,
    TitleChanged,
    SnapshotTaken,
    LengthChanged,
    VideoOutChanged,
    ScrambledChanged,
    EsAdded,
    EsDeleted,
    EsSelected,
    Corked,
    Uncorked,
    Muted,
    Unmuted,
    AudioVolume,
    AudioDevice,
    ChapterChanged,
}

impl EventKind {
    /// Every kind, in the order the registry attaches them
    pub const ALL: [EventKind; 29] = [
        EventKind::Backward,
        EventKind::Buffering,
        EventKind::EncounteredError,
        EventKind::EndReached,
        EventKind::Forward,
        EventKind::LengthChanged,
        EventKind::MediaChanged,
        EventKind::Opening,
        EventKind::PausableChanged,
        EventKind::Paused,
        EventKind::Playing,
        EventKind::PositionChanged,
        EventKind::ScrambledChanged,
        EventKind::SeekableChanged,
        EventKind::SnapshotTaken,
        EventKind::Stopped,
        EventKind::TimeChanged,
        EventKind::TitleChanged,
        EventKind::VideoOutChanged,
        EventKind::EsAdded,
        EventKind::EsDeleted,
        EventKind::EsSelected,
        EventKind::Corked,
        EventKind::Uncorked,
        EventKind::Muted,
        EventKind::Unmuted,
        EventKind::AudioVolume,
        EventKind::AudioDevice,
        EventKind::ChapterChanged,
    ];

    /// Native `libvlc_event_e` value
    pub fn code(&self) -> u32 {
        match self {
            EventKind::MediaChanged => 0x100,
            EventKind::Opening => 0x102,
            EventKind::Buffering => 0x103,
            EventKind::Playing => 0x104,
            EventKind::Paused => 0x105,
            EventKind::Stopped => 0x106,
            EventKind::Forward => 0x107,
            EventKind::Backward => 0x108,
            EventKind::EndReached => 0x109,
            EventKind::EncounteredError => 0x10A,
            EventKind::TimeChanged => 0x10B,
            EventKind::PositionChanged => 0x10C,
            EventKind::SeekableChanged => 0x10D,
            EventKind::PausableChanged => 0x10E,
            EventKind::TitleChanged => 0x10F,
            EventKind::SnapshotTaken => 0x110,
            EventKind::LengthChanged => 0x111,
            EventKind::VideoOutChanged => 0x112,
            EventKind::ScrambledChanged => 0x113,
            EventKind::EsAdded => 0x114,
            EventKind::EsDeleted => 0x115,
            EventKind::EsSelected => 0x116,
            EventKind::Corked => 0x117,
            EventKind::Uncorked => 0x118,
            EventKind::Muted => 0x119,
            EventKind::Unmuted => 0x11A,
            EventKind::AudioVolume => 0x11B,
            EventKind::AudioDevice => 0x11C,
            EventKind::ChapterChanged => 0x11D,
        }
    }

    /// Look up a kind by its native value
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.code() == code)
    }

    /// Get the name of this kind as a string
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::MediaChanged => "MediaChanged",
            EventKind::Opening => "Opening",
            EventKind::Buffering => "Buffering",
            EventKind::Playing => "Playing",
            EventKind::Paused => "Paused",
            EventKind::Stopped => "Stopped",
            EventKind::Forward => "Forward",
            EventKind::Backward => "Backward",
            EventKind::EndReached => "EndReached",
            EventKind::EncounteredError => "EncounteredError",
            EventKind::TimeChanged => "TimeChanged",
            EventKind::PositionChanged => "PositionChanged",
            EventKind::SeekableChanged => "SeekableChanged",
            EventKind::PausableChanged => "PausableChanged",
            EventKind::TitleChanged => "TitleChanged",
            EventKind::SnapshotTaken => "SnapshotTaken",
            EventKind::LengthChanged => "LengthChanged",
            EventKind::VideoOutChanged => "VideoOutChanged",
            EventKind::ScrambledChanged => "ScrambledChanged",
            EventKind::EsAdded => "EsAdded",
            EventKind::EsDeleted => "EsDeleted",
            EventKind::EsSelected => "EsSelected",
            EventKind::Corked => "Corked",
            EventKind::Uncorked => "Uncorked",
            EventKind::Muted => "Muted",
            EventKind::Unmuted => "Unmuted",
            EventKind::AudioVolume => "AudioVolume",
            EventKind::AudioDevice => "AudioDevice",
            EventKind::ChapterChanged => "ChapterChanged",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-kind event data as delivered by the native layer
#[derive(Debug, Clone, PartialEq)]
pub enum RawPayload {
    /// No data (playing, paused, stopped, ...)
    Empty,
    /// `float` member (buffering cache, position, volume)
    Float(f32),
    /// `libvlc_time_t` member (time, length)
    Long(i64),
    /// `int` member (title, chapter, vout count)
    Int(i32),
    /// `int` used as a boolean (seekable, pausable, scrambled)
    Flag(i32),
    /// `const char *` member (snapshot file name, audio device)
    Text(String),
    /// Object pointer member (new media)
    Handle(NativeHandle),
    /// Elementary stream member (track type and id)
    Track { es_type: i32, id: i32 },
}

/// A single native event as handed to an attached callback
#[derive(Debug, Clone, PartialEq)]
pub struct RawEvent {
    /// Native `libvlc_event_e` value
    pub code: u32,
    /// Kind-specific data
    pub payload: RawPayload,
}

impl RawEvent {
    /// Create a raw event for the given kind
    pub fn new(kind: EventKind, payload: RawPayload) -> Self {
        Self {
            code: kind.code(),
            payload,
        }
    }

    /// The kind of this event, if the code is known
    pub fn kind(&self) -> Option<EventKind> {
        EventKind::from_code(self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_all_kinds_are_distinct() {
        let kinds: HashSet<_> = EventKind::ALL.iter().collect();
        assert_eq!(kinds.len(), EventKind::ALL.len());

        let codes: HashSet<_> = EventKind::ALL.iter().map(|k| k.code()).collect();
        assert_eq!(codes.len(), EventKind::ALL.len());
    }

    #[test]
    fn test_code_lookup() {
        for kind in EventKind::ALL {
            assert_eq!(EventKind::from_code(kind.code()), Some(kind));
        }
        // libvlc_MediaPlayerNothingSpecial is never attached
        assert_eq!(EventKind::from_code(0x101), None);
        assert_eq!(EventKind::from_code(0x999), None);
    }

    #[test]
    fn test_raw_event_kind() {
        let event = RawEvent::new(EventKind::TimeChanged, RawPayload::Long(1500));
        assert_eq!(event.code, 0x10B);
        assert_eq!(event.kind(), Some(EventKind::TimeChanged));
    }
}
