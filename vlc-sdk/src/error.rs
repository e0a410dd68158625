use thiserror::Error;
use vlc_api::VlcError;
use vlc_event_manager::EventManagerError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SdkError {
    #[error("API error: {0}")]
    Api(#[from] VlcError),

    #[error("Event manager error: {0}")]
    EventManager(#[from] EventManagerError),

    #[error("Media player has been disposed")]
    Disposed,

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl SdkError {
    /// Whether the operation hit a null or already released native handle
    pub fn is_invalid_handle(&self) -> bool {
        match self {
            SdkError::Api(e) => e.is_invalid_handle(),
            SdkError::EventManager(EventManagerError::Api(e)) => e.is_invalid_handle(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, SdkError>;
