//! Opaque references to native libvlc objects
//!
//! A handle carries no ownership by itself. Exactly one owner (the resource
//! manager, a player or a media wrapper) is responsible for releasing the
//! object it points to; every other holder only borrows it.

use std::fmt;

/// Raw, address-sized reference to a native object
///
/// Two handles are equal iff their raw values are equal. The zero value is
/// the null sentinel returned by native constructors on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NativeHandle(usize);

impl NativeHandle {
    /// The null sentinel
    pub const NULL: NativeHandle = NativeHandle(0);

    /// Wrap a raw native address
    pub const fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    /// Get the raw native address
    pub const fn raw(&self) -> usize {
        self.0
    }

    /// Whether this is the null sentinel
    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for NativeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

macro_rules! typed_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $name(NativeHandle);

        impl $name {
            /// The null sentinel
            pub const NULL: $name = $name(NativeHandle::NULL);

            /// Wrap a raw native address
            pub const fn from_raw(raw: usize) -> Self {
                Self(NativeHandle::from_raw(raw))
            }

            /// Get the untyped handle
            pub const fn native(&self) -> NativeHandle {
                self.0
            }

            /// Get the raw native address
            pub const fn raw(&self) -> usize {
                self.0.raw()
            }

            /// Whether this is the null sentinel
            pub const fn is_null(&self) -> bool {
                self.0.is_null()
            }
        }

        impl From<NativeHandle> for $name {
            fn from(handle: NativeHandle) -> Self {
                Self(handle)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

typed_handle!(
    /// Native engine context (`libvlc_instance_t`)
    ContextHandle
);
typed_handle!(
    /// Native media player (`libvlc_media_player_t`)
    PlayerHandle
);
typed_handle!(
    /// Native media resource (`libvlc_media_t`)
    MediaHandle
);
typed_handle!(
    /// Native event manager of a player (`libvlc_event_manager_t`)
    EventManagerHandle
);
typed_handle!(
    /// Node of a native module description list (`libvlc_module_description_t`)
    ModuleListHandle
);
typed_handle!(
    /// Pending native dialog (`libvlc_dialog_id`)
    DialogHandle
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_sentinel() {
        assert!(NativeHandle::NULL.is_null());
        assert!(NativeHandle::default().is_null());
        assert!(!NativeHandle::from_raw(0x10).is_null());
        assert!(PlayerHandle::NULL.is_null());
        assert!(MediaHandle::default().is_null());
    }

    #[test]
    fn test_identity_equality() {
        let a = MediaHandle::from_raw(0x1000);
        let b = MediaHandle::from_raw(0x1000);
        let c = MediaHandle::from_raw(0x2000);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.native(), NativeHandle::from_raw(0x1000));
    }

    #[test]
    fn test_display() {
        assert_eq!(NativeHandle::from_raw(255).to_string(), "0xff");
        assert_eq!(PlayerHandle::from_raw(16).to_string(), "PlayerHandle(0x10)");
    }
}
