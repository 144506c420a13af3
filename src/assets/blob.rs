use std::sync::Arc;

use slotmap::{SlotMap, new_key_type};

use crate::assets::format::MimeType;

new_key_type! {
    struct BlobKey;
}

/// Raw texture bytes tagged with their MIME type.
#[derive(Debug, Clone)]
pub struct Blob {
    pub mime: MimeType,
    pub bytes: Arc<[u8]>,
}

/// Revocable reference to a [`Blob`] held in a [`BlobStore`].
///
/// Handles are plain keys: copying one does not keep the bytes alive, and a
/// revoked handle simply stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlobHandle(BlobKey);

#[derive(Debug, Default)]
pub struct BlobStore {
    blobs: SlotMap<BlobKey, Blob>,
}

impl BlobStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, blob: Blob) -> BlobHandle {
        BlobHandle(self.blobs.insert(blob))
    }

    #[must_use]
    pub fn get(&self, handle: BlobHandle) -> Option<&Blob> {
        self.blobs.get(handle.0)
    }

    /// Releases the bytes behind `handle`. Returns false if it was already revoked.
    pub fn revoke(&mut self, handle: BlobHandle) -> bool {
        self.blobs.remove(handle.0).is_some()
    }

    pub fn revoke_all(&mut self) -> usize {
        let count = self.blobs.len();
        self.blobs.clear();
        count
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}
