//! Typed player events decoded from native payloads

use vlc_api::{EventKind, MediaHandle, RawEvent, RawPayload, TrackType};

use crate::error::{EventManagerError, Result};

/// A media player event with its kind-specific data
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    MediaChanged { media: MediaHandle },
    Opening,
    /// Cache fill in percent
    Buffering { cache: f32 },
    Playing,
    Paused,
    Stopped,
    Forward,
    Backward,
    EndReached,
    EncounteredError,
    /// Milliseconds
    TimeChanged { time: i64 },
    PositionChanged { position: f32 },
    SeekableChanged { seekable: bool },
    PausableChanged { pausable: bool },
    TitleChanged { title: i32 },
    SnapshotTaken { path: String },
    /// Milliseconds
    LengthChanged { length: i64 },
    /// Number of video outputs
    VideoOutChanged { count: i32 },
    ScrambledChanged { scrambled: bool },
    EsAdded { track_type: TrackType, id: i32 },
    EsDeleted { track_type: TrackType, id: i32 },
    EsSelected { track_type: TrackType, id: i32 },
    Corked,
    Uncorked,
    Muted,
    Unmuted,
    AudioVolume { volume: f32 },
    AudioDevice { device: String },
    ChapterChanged { chapter: i32 },
}

fn mismatch(kind: EventKind, expected: &str, payload: &RawPayload) -> EventManagerError {
    EventManagerError::Decode {
        kind,
        reason: format!("expected {} payload, got {:?}", expected, payload),
    }
}

impl PlayerEvent {
    /// Decode a raw native event delivered to the callback bound to `kind`
    pub fn decode(kind: EventKind, raw: &RawEvent) -> Result<Self> {
        if raw.code != kind.code() {
            return Err(EventManagerError::Decode {
                kind,
                reason: format!("unexpected native code {:#x}", raw.code),
            });
        }

        let payload = &raw.payload;
        let float = |expected| match payload {
            RawPayload::Float(value) => Ok(*value),
            other => Err(mismatch(kind, expected, other)),
        };
        let long = |expected| match payload {
            RawPayload::Long(value) => Ok(*value),
            other => Err(mismatch(kind, expected, other)),
        };
        let int = |expected| match payload {
            RawPayload::Int(value) => Ok(*value),
            other => Err(mismatch(kind, expected, other)),
        };
        let flag = |expected| match payload {
            RawPayload::Flag(value) => Ok(*value != 0),
            other => Err(mismatch(kind, expected, other)),
        };
        let text = |expected| match payload {
            RawPayload::Text(value) => Ok(value.clone()),
            other => Err(mismatch(kind, expected, other)),
        };
        let track = || match payload {
            RawPayload::Track { es_type, id } => Ok((TrackType::from_native(*es_type), *id)),
            other => Err(mismatch(kind, "track", other)),
        };

        let event = match kind {
            EventKind::MediaChanged => match payload {
                RawPayload::Handle(handle) => PlayerEvent::MediaChanged {
                    media: MediaHandle::from(*handle),
                },
                other => return Err(mismatch(kind, "media handle", other)),
            },
            EventKind::Opening => PlayerEvent::Opening,
            EventKind::Buffering => PlayerEvent::Buffering {
                cache: float("cache")?,
            },
            EventKind::Playing => PlayerEvent::Playing,
            EventKind::Paused => PlayerEvent::Paused,
            EventKind::Stopped => PlayerEvent::Stopped,
            EventKind::Forward => PlayerEvent::Forward,
            EventKind::Backward => PlayerEvent::Backward,
            EventKind::EndReached => PlayerEvent::EndReached,
            EventKind::EncounteredError => PlayerEvent::EncounteredError,
            EventKind::TimeChanged => PlayerEvent::TimeChanged {
                time: long("time")?,
            },
            EventKind::PositionChanged => PlayerEvent::PositionChanged {
                position: float("position")?,
            },
            EventKind::SeekableChanged => PlayerEvent::SeekableChanged {
                seekable: flag("seekable flag")?,
            },
            EventKind::PausableChanged => PlayerEvent::PausableChanged {
                pausable: flag("pausable flag")?,
            },
            EventKind::TitleChanged => PlayerEvent::TitleChanged {
                title: int("title")?,
            },
            EventKind::SnapshotTaken => PlayerEvent::SnapshotTaken {
                path: text("file name")?,
            },
            EventKind::LengthChanged => PlayerEvent::LengthChanged {
                length: long("length")?,
            },
            EventKind::VideoOutChanged => PlayerEvent::VideoOutChanged {
                count: int("vout count")?,
            },
            EventKind::ScrambledChanged => PlayerEvent::ScrambledChanged {
                scrambled: flag("scrambled flag")?,
            },
            EventKind::EsAdded => {
                let (track_type, id) = track()?;
                PlayerEvent::EsAdded { track_type, id }
            }
            EventKind::EsDeleted => {
                let (track_type, id) = track()?;
                PlayerEvent::EsDeleted { track_type, id }
            }
            EventKind::EsSelected => {
                let (track_type, id) = track()?;
                PlayerEvent::EsSelected { track_type, id }
            }
            EventKind::Corked => PlayerEvent::Corked,
            EventKind::Uncorked => PlayerEvent::Uncorked,
            EventKind::Muted => PlayerEvent::Muted,
            EventKind::Unmuted => PlayerEvent::Unmuted,
            EventKind::AudioVolume => PlayerEvent::AudioVolume {
                volume: float("volume")?,
            },
            EventKind::AudioDevice => PlayerEvent::AudioDevice {
                device: text("device")?,
            },
            EventKind::ChapterChanged => PlayerEvent::ChapterChanged {
                chapter: int("chapter")?,
            },
        };

        Ok(event)
    }

    /// The kind this event belongs to
    pub fn kind(&self) -> EventKind {
        match self {
            PlayerEvent::MediaChanged { .. } => EventKind::MediaChanged,
            PlayerEvent::Opening => EventKind::Opening,
            PlayerEvent::Buffering { .. } => EventKind::Buffering,
            PlayerEvent::Playing => EventKind::Playing,
            PlayerEvent::Paused => EventKind::Paused,
            PlayerEvent::Stopped => EventKind::Stopped,
            PlayerEvent::Forward => EventKind::Forward,
            PlayerEvent::Backward => EventKind::Backward,
            PlayerEvent::EndReached => EventKind::EndReached,
            PlayerEvent::EncounteredError => EventKind::EncounteredError,
            PlayerEvent::TimeChanged { .. } => EventKind::TimeChanged,
            PlayerEvent::PositionChanged { .. } => EventKind::PositionChanged,
            PlayerEvent::SeekableChanged { .. } => EventKind::SeekableChanged,
            PlayerEvent::PausableChanged { .. } => EventKind::PausableChanged,
            PlayerEvent::TitleChanged { .. } => EventKind::TitleChanged,
            PlayerEvent::SnapshotTaken { .. } => EventKind::SnapshotTaken,
            PlayerEvent::LengthChanged { .. } => EventKind::LengthChanged,
            PlayerEvent::VideoOutChanged { .. } => EventKind::VideoOutChanged,
            PlayerEvent::ScrambledChanged { .. } => EventKind::ScrambledChanged,
            PlayerEvent::EsAdded { .. } => EventKind::EsAdded,
            PlayerEvent::EsDeleted { .. } => EventKind::EsDeleted,
            PlayerEvent::EsSelected { .. } => EventKind::EsSelected,
            PlayerEvent::Corked => EventKind::Corked,
            PlayerEvent::Uncorked => EventKind::Uncorked,
            PlayerEvent::Muted => EventKind::Muted,
            PlayerEvent::Unmuted => EventKind::Unmuted,
            PlayerEvent::AudioVolume { .. } => EventKind::AudioVolume,
            PlayerEvent::AudioDevice { .. } => EventKind::AudioDevice,
            PlayerEvent::ChapterChanged { .. } => EventKind::ChapterChanged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use vlc_api::NativeHandle;

    #[rstest]
    #[case(EventKind::Playing, RawPayload::Empty, PlayerEvent::Playing)]
    #[case(EventKind::Buffering, RawPayload::Float(42.0), PlayerEvent::Buffering { cache: 42.0 })]
    #[case(EventKind::TimeChanged, RawPayload::Long(1500), PlayerEvent::TimeChanged { time: 1500 })]
    #[case(EventKind::SeekableChanged, RawPayload::Flag(1), PlayerEvent::SeekableChanged { seekable: true })]
    #[case(EventKind::PausableChanged, RawPayload::Flag(0), PlayerEvent::PausableChanged { pausable: false })]
    #[case(EventKind::ChapterChanged, RawPayload::Int(3), PlayerEvent::ChapterChanged { chapter: 3 })]
    #[case(
        EventKind::EsSelected,
        RawPayload::Track { es_type: 2, id: 7 },
        PlayerEvent::EsSelected { track_type: TrackType::Text, id: 7 }
    )]
    #[case(
        EventKind::SnapshotTaken,
        RawPayload::Text("/tmp/a.png".to_string()),
        PlayerEvent::SnapshotTaken { path: "/tmp/a.png".to_string() }
    )]
    fn test_decode(#[case] kind: EventKind, #[case] payload: RawPayload, #[case] expected: PlayerEvent) {
        let event = PlayerEvent::decode(kind, &RawEvent::new(kind, payload)).unwrap();
        assert_eq!(event, expected);
        assert_eq!(event.kind(), kind);
    }

    #[test]
    fn test_decode_media_changed() {
        let raw = RawEvent::new(
            EventKind::MediaChanged,
            RawPayload::Handle(NativeHandle::from_raw(0x40)),
        );
        let event = PlayerEvent::decode(EventKind::MediaChanged, &raw).unwrap();
        assert_eq!(
            event,
            PlayerEvent::MediaChanged {
                media: MediaHandle::from_raw(0x40)
            }
        );
    }

    #[test]
    fn test_payload_mismatch() {
        let raw = RawEvent::new(EventKind::TimeChanged, RawPayload::Float(1.0));
        let err = PlayerEvent::decode(EventKind::TimeChanged, &raw).unwrap_err();
        assert!(matches!(
            err,
            EventManagerError::Decode {
                kind: EventKind::TimeChanged,
                ..
            }
        ));
    }

    #[test]
    fn test_code_mismatch() {
        let raw = RawEvent::new(EventKind::Paused, RawPayload::Empty);
        assert!(PlayerEvent::decode(EventKind::Playing, &raw).is_err());
    }
}
