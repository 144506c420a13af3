use std::sync::Arc;

use futures::FutureExt;
use futures::future::{LocalBoxFuture, Shared};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::assets::blob::{Blob, BlobHandle, BlobStore};
use crate::assets::format::{MimeType, decode_image};
use crate::assets::io::{FileProvider, FileRequest};
use crate::errors::{DelegateError, Result};
use crate::resources::texture::Texture;

pub type TextureResult = Result<Arc<Texture>>;

/// A texture load that any number of callers can await.
pub type PendingTexture = Shared<LocalBoxFuture<'static, TextureResult>>;

struct TextureEntry {
    mime: MimeType,
    resource_path: String,
    blob: Option<BlobHandle>,
    texture: Option<Arc<Texture>>,
    pending: PendingTexture,
}

#[derive(Default)]
struct CacheInner {
    entries: FxHashMap<String, TextureEntry>,
    blobs: BlobStore,
}

/// Session-wide texture cache keyed by the requested filename.
///
/// The first request for a filename starts one fetch + decode; every later
/// request for the same filename, settled or not, shares that load. Failures
/// are cached too. Entries are never evicted.
///
/// Cloning is cheap and clones share the same entries.
#[derive(Clone)]
pub struct TextureCache {
    document_name: Arc<str>,
    provider: Arc<dyn FileProvider>,
    inner: Arc<Mutex<CacheInner>>,
}

impl TextureCache {
    pub fn new(document_name: &str, provider: Arc<dyn FileProvider>) -> Self {
        Self {
            document_name: Arc::from(document_name),
            provider,
            inner: Arc::new(Mutex::new(CacheInner::default())),
        }
    }

    #[inline]
    #[must_use]
    pub fn document_name(&self) -> &str {
        &self.document_name
    }

    /// Maps a texture filename to a path in the virtual file system.
    /// Absolute paths pass through; anything else lives inside the document.
    #[must_use]
    pub fn resource_path(&self, filename: &str) -> String {
        if filename.starts_with('/') {
            filename.to_string()
        } else {
            format!("{}[{}]", self.document_name, filename)
        }
    }

    /// Resolves `filename` to a decoded texture.
    ///
    /// Unsupported extensions fail here, before anything is fetched. Errors
    /// from fetching or decoding surface through the returned future.
    pub fn resolve(&self, filename: &str) -> Result<PendingTexture> {
        if let Some(entry) = self.inner.lock().entries.get(filename) {
            return Ok(entry.pending.clone());
        }

        let mime = MimeType::from_filename(filename)?;
        let resource_path = self.resource_path(filename);
        log::debug!("Loading texture {filename} from {resource_path}");

        let pending = Self::load(
            Arc::clone(&self.inner),
            Arc::clone(&self.provider),
            filename.to_string(),
            resource_path.clone(),
            mime,
        )
        .boxed_local()
        .shared();

        self.inner.lock().entries.insert(
            filename.to_string(),
            TextureEntry {
                mime,
                resource_path,
                blob: None,
                texture: None,
                pending: pending.clone(),
            },
        );

        Ok(pending)
    }

    async fn load(
        inner: Arc<Mutex<CacheInner>>,
        provider: Arc<dyn FileProvider>,
        filename: String,
        resource_path: String,
        mime: MimeType,
    ) -> TextureResult {
        // 1. IO: the only suspension point
        let bytes = provider
            .get_file(FileRequest::new(resource_path.as_str()))
            .await
            .ok_or_else(|| DelegateError::AssetNotFound(resource_path.clone()))?;

        // 2. Park the bytes behind a revocable handle
        let handle = {
            let mut guard = inner.lock();
            let handle = guard.blobs.create(Blob {
                mime,
                bytes: Arc::from(bytes),
            });
            if let Some(entry) = guard.entries.get_mut(&filename) {
                entry.blob = Some(handle);
            }
            handle
        };

        // 3. Decode through the handle
        let blob = inner
            .lock()
            .blobs
            .get(handle)
            .cloned()
            .ok_or_else(|| DelegateError::BlobRevoked(filename.clone()))?;
        let image = decode_image(&blob.bytes, blob.mime, &filename)?;

        // 4. Build the texture and remember it
        let texture = Arc::new(Texture::new(&filename, image));
        if let Some(entry) = inner.lock().entries.get_mut(&filename) {
            entry.texture = Some(Arc::clone(&texture));
        }
        log::debug!(
            "Texture {filename} ready ({}x{})",
            texture.width(),
            texture.height()
        );
        Ok(texture)
    }

    /// The decoded texture, if its load has already succeeded.
    #[must_use]
    pub fn get(&self, filename: &str) -> Option<Arc<Texture>> {
        self.inner
            .lock()
            .entries
            .get(filename)
            .and_then(|entry| entry.texture.clone())
    }

    #[must_use]
    pub fn contains(&self, filename: &str) -> bool {
        self.inner.lock().entries.contains_key(filename)
    }

    /// The MIME type and resource path recorded for `filename`.
    #[must_use]
    pub fn entry_info(&self, filename: &str) -> Option<(MimeType, String)> {
        self.inner
            .lock()
            .entries
            .get(filename)
            .map(|entry| (entry.mime, entry.resource_path.clone()))
    }

    #[must_use]
    pub fn blob_handle(&self, filename: &str) -> Option<BlobHandle> {
        self.inner
            .lock()
            .entries
            .get(filename)
            .and_then(|entry| entry.blob)
    }

    #[must_use]
    pub fn live_blob_count(&self) -> usize {
        self.inner.lock().blobs.len()
    }

    /// Releases every blob handle. Decoded textures stay cached; loads still
    /// waiting to decode fail with [`DelegateError::BlobRevoked`].
    pub fn revoke_blobs(&self) -> usize {
        let mut guard = self.inner.lock();
        for entry in guard.entries.values_mut() {
            entry.blob = None;
        }
        guard.blobs.revoke_all()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }
}
