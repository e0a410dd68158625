use thiserror::Error;
use vlc_api::{EventKind, VlcError};

/// Errors that can occur in the event registry
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EventManagerError {
    /// Error from the resource manager
    #[error(transparent)]
    Api(#[from] VlcError),

    /// `register_all` called again without an intervening `unregister_all`
    #[error("Player events are already registered")]
    AlreadyRegistered,

    /// A native payload did not match the shape expected for its kind
    #[error("Failed to decode {kind} event: {reason}")]
    Decode { kind: EventKind, reason: String },

    /// Event channel closed
    #[error("Event channel has been closed")]
    ChannelClosed,
}

/// Result type for event registry operations
pub type Result<T> = std::result::Result<T, EventManagerError>;
