use thiserror::Error;

use crate::event::EventKind;

/// Errors raised by the resource manager over the native engine
///
/// Creation and handle-validity failures are fatal to the operation that hit
/// them. Attach failures are isolated per event kind and only ever logged by
/// the event registry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VlcError {
    /// The native engine context could not be initialized
    ///
    /// Returned when the context initializer hands back a null handle, most
    /// commonly because an option was rejected or plugins are missing.
    #[error("Failed to initialize native engine context with options {options:?}")]
    Initialization { options: Vec<String> },

    /// A native constructor returned a null handle
    #[error("Native engine failed to create {object}")]
    Creation { object: &'static str },

    /// An operation was attempted on a released or never-created handle
    #[error("Invalid native handle for {operation}")]
    InvalidHandle { operation: &'static str },

    /// Attaching a callback for one event kind failed
    #[error("Failed to attach {kind:?} callback: native status {code}")]
    Attach { kind: EventKind, code: i32 },

    /// Detaching a callback for one event kind failed
    #[error("Failed to detach {kind:?} callback: no matching registration")]
    Detach { kind: EventKind },

    /// A native call reported failure through its status code
    #[error("Native call {operation} failed")]
    NativeCall { operation: &'static str },
}

impl VlcError {
    /// Shorthand for [`VlcError::InvalidHandle`]
    pub fn invalid_handle(operation: &'static str) -> Self {
        Self::InvalidHandle { operation }
    }

    /// Turn a `false` native status into [`VlcError::NativeCall`]
    ///
    /// Status-returning operations report failure as `false`; this lets a
    /// caller that treats failure as fatal use `?` instead.
    pub fn require(ok: bool, operation: &'static str) -> Result<()> {
        if ok {
            Ok(())
        } else {
            Err(Self::NativeCall { operation })
        }
    }

    /// Whether this error means the handle is null or already released
    pub fn is_invalid_handle(&self) -> bool {
        matches!(self, Self::InvalidHandle { .. })
    }
}

/// Type alias for results that can return a VlcError
pub type Result<T> = std::result::Result<T, VlcError>;
