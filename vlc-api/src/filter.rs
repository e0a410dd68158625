//! Audio and video filter module descriptors
//!
//! The native layer returns filters as a singly linked list of
//! `libvlc_module_description_t` nodes which must be released as a whole
//! once the caller has copied the descriptors out.

use serde::{Deserialize, Serialize};

use crate::handle::ModuleListHandle;

/// One node of a native module description list, as read by the engine
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModuleNode {
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub help: Option<String>,
    /// Next node, or null at the end of the list
    pub next: ModuleListHandle,
}

/// Owned copy of a filter module descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterModule {
    /// Module name used in `--audio-filter` / `--video-filter`
    pub name: String,
    pub short_name: String,
    pub long_name: String,
    pub help: String,
}

impl FilterModule {
    /// Copy a descriptor out of a native node
    ///
    /// Nodes without a name do not describe a usable filter.
    pub fn from_node(node: &ModuleNode) -> Option<Self> {
        let name = node.name.clone()?;
        Some(Self {
            name,
            short_name: node.short_name.clone().unwrap_or_default(),
            long_name: node.long_name.clone().unwrap_or_default(),
            help: node.help.clone().unwrap_or_default(),
        })
    }
}

/// Which native filter list to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterCategory {
    Audio,
    Video,
}
