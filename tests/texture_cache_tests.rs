//! Texture Cache Tests
//!
//! Tests for:
//! - Resource paths: document-scoped vs absolute filenames
//! - Format detection: unsupported extensions fail before any fetch
//! - Deduplication: one fetch per filename, shared by every caller
//! - Failure caching: missing assets and undecodable bytes
//! - Callback providers: pending callbacks, dropped callbacks
//! - Blob handles: creation and revocation

use std::cell::RefCell;
use std::io::Cursor;
use std::rc::Rc;
use std::sync::Arc;

use futures::executor::LocalPool;
use futures::task::LocalSpawnExt;
use myth_hydra::assets::{
    CallbackFileProvider, FileCallback, MemoryFileProvider, MimeType, TextureCache,
};
use myth_hydra::errors::DelegateError;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 100, 50, 255]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

fn memory_cache() -> (Arc<MemoryFileProvider>, TextureCache) {
    init_logger();
    let provider = Arc::new(MemoryFileProvider::new());
    let cache = TextureCache::new("scene.usdz", provider.clone());
    (provider, cache)
}

type PendingCallbacks = Rc<RefCell<Vec<(String, FileCallback)>>>;

/// A provider that parks every callback until the test releases it.
fn parked_cache() -> (PendingCallbacks, TextureCache) {
    init_logger();
    let parked: PendingCallbacks = Rc::new(RefCell::new(Vec::new()));
    let sink = parked.clone();
    let provider = CallbackFileProvider::new(move |path: &str, callback: FileCallback| {
        sink.borrow_mut().push((path.to_string(), callback));
    });
    let cache = TextureCache::new("scene.usdz", Arc::new(provider));
    (parked, cache)
}

// ============================================================================
// Resource Paths
// ============================================================================

#[test]
fn relative_filename_is_scoped_to_document() {
    let (_, cache) = memory_cache();
    assert_eq!(cache.resource_path("tex/wood.png"), "scene.usdz[tex/wood.png]");
}

#[test]
fn absolute_filename_passes_through() {
    let (_, cache) = memory_cache();
    assert_eq!(cache.resource_path("/assets/wood.png"), "/assets/wood.png");
}

// ============================================================================
// Format Detection
// ============================================================================

#[test]
fn unsupported_extension_fails_without_fetching() {
    let (provider, cache) = memory_cache();

    let err = cache.resolve("missing.bin").unwrap_err();

    assert_eq!(err, DelegateError::UnsupportedFormat("missing.bin".to_string()));
    assert_eq!(provider.total_fetches(), 0);
    assert!(!cache.contains("missing.bin"));
}

#[test]
fn entry_records_mime_and_path() {
    let (provider, cache) = memory_cache();
    provider.insert("scene.usdz[photo.JPG]", Vec::new());

    let _pending = cache.resolve("photo.JPG").unwrap();

    let (mime, path) = cache.entry_info("photo.JPG").unwrap();
    assert_eq!(mime, MimeType::Jpeg);
    assert_eq!(path, "scene.usdz[photo.JPG]");
}

// ============================================================================
// Loading & Deduplication
// ============================================================================

#[test]
fn resolve_decodes_png() {
    let (provider, cache) = memory_cache();
    provider.insert("scene.usdz[a.png]", png_bytes(4, 2));

    let texture = pollster::block_on(cache.resolve("a.png").unwrap()).unwrap();

    assert_eq!((texture.width(), texture.height()), (4, 2));
    assert_eq!(texture.image.data.len(), 4 * 2 * 4);
    assert_eq!(texture.name, "a.png");
    assert!(Arc::ptr_eq(&texture, &cache.get("a.png").unwrap()));
}

#[test]
fn repeated_resolves_share_one_fetch() {
    let (provider, cache) = memory_cache();
    provider.insert("scene.usdz[a.png]", png_bytes(1, 1));

    let first = cache.resolve("a.png").unwrap();
    let second = cache.resolve("a.png").unwrap();
    let a = pollster::block_on(first).unwrap();
    let b = pollster::block_on(second).unwrap();
    let c = pollster::block_on(cache.resolve("a.png").unwrap()).unwrap();

    assert_eq!(provider.fetch_count("scene.usdz[a.png]"), 1);
    assert!(Arc::ptr_eq(&a, &b));
    assert!(Arc::ptr_eq(&a, &c));
    assert_eq!(cache.len(), 1);
}

#[test]
fn concurrent_resolves_before_settling_share_one_fetch() {
    let (parked, cache) = parked_cache();
    let mut pool = LocalPool::new();
    let results = Rc::new(RefCell::new(Vec::new()));

    for _ in 0..3 {
        let pending = cache.resolve("a.png").unwrap();
        let results = results.clone();
        pool.spawner()
            .spawn_local(async move {
                let texture = pending.await;
                results.borrow_mut().push(texture);
            })
            .unwrap();
    }
    pool.run_until_stalled();

    // Everyone is waiting on the single parked request.
    assert_eq!(parked.borrow().len(), 1);
    assert!(results.borrow().is_empty());

    let (path, callback) = parked.borrow_mut().pop().unwrap();
    assert_eq!(path, "scene.usdz[a.png]");
    callback(Some(png_bytes(2, 2)));
    pool.run_until_stalled();

    let results = results.borrow();
    assert_eq!(results.len(), 3);
    let first = results[0].as_ref().unwrap();
    for result in results.iter() {
        assert!(Arc::ptr_eq(first, result.as_ref().unwrap()));
    }
    assert!(parked.borrow().is_empty());
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn missing_asset_fails_and_stays_failed() {
    let (provider, cache) = memory_cache();

    let err = pollster::block_on(cache.resolve("nope.png").unwrap()).unwrap_err();
    assert_eq!(err, DelegateError::AssetNotFound("scene.usdz[nope.png]".to_string()));

    // No retry: the cached failure is returned without another fetch.
    provider.insert("scene.usdz[nope.png]", png_bytes(1, 1));
    let again = pollster::block_on(cache.resolve("nope.png").unwrap());
    assert!(again.is_err());
    assert_eq!(provider.fetch_count("scene.usdz[nope.png]"), 1);
    assert!(cache.get("nope.png").is_none());
}

#[test]
fn undecodable_bytes_fail_with_decode_failure() {
    let (provider, cache) = memory_cache();
    provider.insert("scene.usdz[bad.png]", b"definitely not a png".to_vec());

    let err = pollster::block_on(cache.resolve("bad.png").unwrap()).unwrap_err();

    assert!(matches!(err, DelegateError::DecodeFailure { ref label, .. } if label == "bad.png"));
}

#[test]
fn dropped_callback_reads_as_not_found() {
    init_logger();
    let provider = CallbackFileProvider::new(|_path: &str, callback: FileCallback| {
        drop(callback);
    });
    let cache = TextureCache::new("scene.usdz", Arc::new(provider));

    let err = pollster::block_on(cache.resolve("a.png").unwrap()).unwrap_err();

    assert!(matches!(err, DelegateError::AssetNotFound(_)));
}

#[test]
fn callback_with_no_data_reads_as_not_found() {
    let (parked, cache) = parked_cache();
    let mut pool = LocalPool::new();
    let outcome = Rc::new(RefCell::new(None));

    let pending = cache.resolve("/abs/a.png").unwrap();
    let slot = outcome.clone();
    pool.spawner()
        .spawn_local(async move {
            *slot.borrow_mut() = Some(pending.await);
        })
        .unwrap();
    pool.run_until_stalled();

    let (path, callback) = parked.borrow_mut().pop().unwrap();
    assert_eq!(path, "/abs/a.png");
    callback(None);
    pool.run_until_stalled();

    let outcome = outcome.borrow_mut().take().unwrap();
    assert_eq!(outcome.unwrap_err(), DelegateError::AssetNotFound("/abs/a.png".to_string()));
}

// ============================================================================
// Blob Handles
// ============================================================================

#[test]
fn loaded_texture_keeps_a_live_blob() {
    let (provider, cache) = memory_cache();
    provider.insert("scene.usdz[a.png]", png_bytes(1, 1));
    provider.insert("scene.usdz[b.png]", png_bytes(1, 1));

    assert!(cache.blob_handle("a.png").is_none());
    pollster::block_on(cache.resolve("a.png").unwrap()).unwrap();
    pollster::block_on(cache.resolve("b.png").unwrap()).unwrap();

    assert!(cache.blob_handle("a.png").is_some());
    assert_ne!(cache.blob_handle("a.png"), cache.blob_handle("b.png"));
    assert_eq!(cache.live_blob_count(), 2);
}

#[test]
fn revoking_blobs_keeps_decoded_textures() {
    let (provider, cache) = memory_cache();
    provider.insert("scene.usdz[a.png]", png_bytes(1, 1));
    pollster::block_on(cache.resolve("a.png").unwrap()).unwrap();

    assert_eq!(cache.revoke_blobs(), 1);

    assert_eq!(cache.live_blob_count(), 0);
    assert!(cache.blob_handle("a.png").is_none());
    assert!(cache.get("a.png").is_some());
    assert_eq!(cache.revoke_blobs(), 0);
}

#[test]
fn cache_clones_share_entries() {
    let (provider, cache) = memory_cache();
    provider.insert("scene.usdz[a.png]", png_bytes(1, 1));
    let other = cache.clone();

    pollster::block_on(cache.resolve("a.png").unwrap()).unwrap();
    pollster::block_on(other.resolve("a.png").unwrap()).unwrap();

    assert!(other.contains("a.png"));
    assert_eq!(provider.total_fetches(), 1);
}
