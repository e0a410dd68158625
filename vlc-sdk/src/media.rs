//! Media wrapper and media sources

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use url::Url;
use vlc_api::{ContextHandle, MediaHandle, VlcError, VlcManager};

use crate::error::Result;

/// Where a media is read from
pub enum MediaSource {
    /// Local file
    Path(PathBuf),
    /// URI or raw media resource locator (`file:///`, `http://`, `dvd://`, ...)
    Location(String),
    /// Arbitrary byte stream
    Stream(Box<dyn Read + Send>),
}

impl MediaSource {
    /// Wrap a byte stream
    pub fn stream(reader: impl Read + Send + 'static) -> Self {
        MediaSource::Stream(Box::new(reader))
    }
}

impl fmt::Debug for MediaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaSource::Path(path) => f.debug_tuple("Path").field(path).finish(),
            MediaSource::Location(mrl) => f.debug_tuple("Location").field(mrl).finish(),
            MediaSource::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

impl From<&Path> for MediaSource {
    fn from(path: &Path) -> Self {
        MediaSource::Path(path.to_path_buf())
    }
}

impl From<PathBuf> for MediaSource {
    fn from(path: PathBuf) -> Self {
        MediaSource::Path(path)
    }
}

impl From<&str> for MediaSource {
    fn from(mrl: &str) -> Self {
        MediaSource::Location(mrl.to_string())
    }
}

impl From<String> for MediaSource {
    fn from(mrl: String) -> Self {
        MediaSource::Location(mrl)
    }
}

impl From<Url> for MediaSource {
    fn from(url: Url) -> Self {
        MediaSource::Location(url.into())
    }
}

impl From<&Url> for MediaSource {
    fn from(url: &Url) -> Self {
        MediaSource::Location(url.as_str().to_string())
    }
}

struct MediaInner {
    manager: Arc<VlcManager>,
    handle: MediaHandle,
    disposed: AtomicBool,
}

impl MediaInner {
    fn release(&self) -> bool {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.manager.release_media(self.handle);
        true
    }
}

impl Drop for MediaInner {
    fn drop(&mut self) {
        if self.release() {
            tracing::debug!("Reclaimed undisposed media {}", self.handle);
        }
    }
}

/// A loaded media resource owning one native media reference
///
/// Clones share the same reference. Two `Media` are equal when they wrap the
/// same native handle. The reference is released by [`dispose`](Media::dispose)
/// or, failing that, when the last clone is dropped.
#[derive(Clone)]
pub struct Media {
    inner: Arc<MediaInner>,
}

impl Media {
    /// Create a native media from `source` on `context` and apply `options`
    pub(crate) fn create(
        manager: &Arc<VlcManager>,
        context: ContextHandle,
        source: MediaSource,
        options: &[String],
    ) -> Result<Self> {
        tracing::debug!("Creating media from {:?}", source);
        let handle = match source {
            MediaSource::Path(path) => manager.new_media_path(context, &path)?,
            MediaSource::Location(mrl) => manager.new_media_location(context, &mrl)?,
            MediaSource::Stream(stream) => manager.new_media_stream(context, stream)?,
        };

        let media = Self::adopt(manager, handle);
        for option in options {
            media.add_option(option)?;
        }
        Ok(media)
    }

    /// Take ownership of a native media reference
    pub(crate) fn adopt(manager: &Arc<VlcManager>, handle: MediaHandle) -> Self {
        Self {
            inner: Arc::new(MediaInner {
                manager: Arc::clone(manager),
                handle,
                disposed: AtomicBool::new(false),
            }),
        }
    }

    /// The native handle identifying this media
    pub fn handle(&self) -> MediaHandle {
        self.inner.handle
    }

    /// Add a per-media option such as `:start-time=30`
    pub fn add_option(&self, option: &str) -> Result<()> {
        if self.is_disposed() {
            return Err(VlcError::invalid_handle("add_media_option").into());
        }
        Ok(self.inner.manager.add_media_option(self.inner.handle, option)?)
    }

    /// Release the native media reference; later calls are no-ops
    pub fn dispose(&self) {
        if self.inner.release() {
            tracing::debug!("Disposed media {}", self.inner.handle);
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::Acquire)
    }
}

impl PartialEq for Media {
    fn eq(&self, other: &Self) -> bool {
        self.handle() == other.handle()
    }
}

impl Eq for Media {}

impl fmt::Debug for Media {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Media")
            .field("handle", &self.inner.handle)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vlc_api::testing::{Call, FakeEngine};

    fn setup() -> (Arc<FakeEngine>, Arc<VlcManager>, ContextHandle) {
        let engine = FakeEngine::shared();
        let manager = Arc::new(VlcManager::new(engine.clone()));
        let context = manager.acquire_context(&[]).unwrap();
        (engine, manager, context)
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let (engine, manager, context) = setup();
        let media = Media::create(&manager, context, "file:///a.mkv".into(), &[]).unwrap();
        let handle = media.handle();

        media.dispose();
        media.dispose();
        drop(media);

        assert_eq!(engine.count(&Call::ReleaseMedia(handle)), 1);
        assert_eq!(engine.media_refcount(handle), 0);
    }

    #[test]
    fn test_drop_of_last_clone_reclaims() {
        let (engine, manager, context) = setup();
        let media = Media::create(&manager, context, PathBuf::from("/a.mp4").into(), &[]).unwrap();
        let handle = media.handle();
        let clone = media.clone();

        drop(media);
        assert_eq!(engine.media_refcount(handle), 1);

        drop(clone);
        assert_eq!(engine.media_refcount(handle), 0);
    }

    #[test]
    fn test_options_applied_in_order() {
        let (engine, manager, context) = setup();
        let options = vec![":start-time=5".to_string(), ":no-audio".to_string()];
        let media = Media::create(&manager, context, "dvd://".into(), &options).unwrap();

        let calls = engine.calls();
        let applied: Vec<&str> = calls
            .iter()
            .filter_map(|c| match c {
                Call::AddMediaOption(h, o) if *h == media.handle() => Some(o.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(applied, vec![":start-time=5", ":no-audio"]);
    }

    #[test]
    fn test_stream_source() {
        let (_engine, manager, context) = setup();
        let bytes = std::io::Cursor::new(vec![0u8; 16]);
        let media = Media::create(&manager, context, MediaSource::stream(bytes), &[]).unwrap();
        assert!(!media.handle().is_null());
    }

    #[test]
    fn test_creation_failure() {
        let (engine, manager, context) = setup();
        engine.fail_media_creation();
        let err = Media::create(&manager, context, "bogus://".into(), &[]).unwrap_err();
        assert!(matches!(
            err,
            crate::SdkError::Api(VlcError::Creation { object: "media" })
        ));
    }

    #[test]
    fn test_url_source_is_location() {
        let url = Url::parse("https://example.com/stream.m3u8").unwrap();
        match MediaSource::from(url) {
            MediaSource::Location(mrl) => assert_eq!(mrl, "https://example.com/stream.m3u8"),
            other => panic!("unexpected source {:?}", other),
        }
    }

    #[test]
    fn test_equality_by_handle() {
        let (_engine, manager, context) = setup();
        let a = Media::create(&manager, context, "a".into(), &[]).unwrap();
        let b = Media::create(&manager, context, "b".into(), &[]).unwrap();
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }
}
