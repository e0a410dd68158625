//! Snapshot sizing rules

use std::fmt;

/// How the native layer should size a snapshot
///
/// Both dimensions zero keeps the original size; exactly one zero dimension
/// keeps the original aspect ratio and scales from the other one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapshotSize {
    Original,
    ScaleToWidth(u32),
    ScaleToHeight(u32),
    Exact { width: u32, height: u32 },
}

impl SnapshotSize {
    /// Classify a requested width and height
    pub fn from_dimensions(width: u32, height: u32) -> Self {
        match (width, height) {
            (0, 0) => SnapshotSize::Original,
            (width, 0) => SnapshotSize::ScaleToWidth(width),
            (0, height) => SnapshotSize::ScaleToHeight(height),
            (width, height) => SnapshotSize::Exact { width, height },
        }
    }

    /// Width and height as passed to the native snapshot call
    pub fn dimensions(&self) -> (u32, u32) {
        match *self {
            SnapshotSize::Original => (0, 0),
            SnapshotSize::ScaleToWidth(width) => (width, 0),
            SnapshotSize::ScaleToHeight(height) => (0, height),
            SnapshotSize::Exact { width, height } => (width, height),
        }
    }

    /// Whether the source aspect ratio is kept
    pub fn preserves_aspect_ratio(&self) -> bool {
        !matches!(self, SnapshotSize::Exact { .. })
    }
}

impl fmt::Display for SnapshotSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotSize::Original => write!(f, "original size"),
            SnapshotSize::ScaleToWidth(w) => write!(f, "width {}", w),
            SnapshotSize::ScaleToHeight(h) => write!(f, "height {}", h),
            SnapshotSize::Exact { width, height } => write!(f, "{}x{}", width, height),
        }
    }
}
