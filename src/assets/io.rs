use std::sync::Arc;

use futures::FutureExt;
use futures::channel::oneshot;
use futures::future::LocalBoxFuture;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// A single fetch against the virtual file system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRequest {
    path: String,
}

impl FileRequest {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    #[inline]
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Asset reader trait for the scene engine's virtual file system.
///
/// Every request is exactly one suspension point; `None` means the path does
/// not exist.
pub trait FileProvider {
    fn get_file(&self, request: FileRequest) -> LocalBoxFuture<'static, Option<Vec<u8>>>;
}

// ============================================================================
// In-memory provider
// ============================================================================

/// Serves files from memory and counts how often each path is fetched.
#[derive(Default)]
pub struct MemoryFileProvider {
    files: RwLock<FxHashMap<String, Arc<Vec<u8>>>>,
    fetches: RwLock<FxHashMap<String, usize>>,
}

impl MemoryFileProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<String>, bytes: Vec<u8>) {
        self.files.write().insert(path.into(), Arc::new(bytes));
    }

    /// How many times `path` has been requested.
    #[must_use]
    pub fn fetch_count(&self, path: &str) -> usize {
        self.fetches.read().get(path).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn total_fetches(&self) -> usize {
        self.fetches.read().values().sum()
    }
}

impl FileProvider for MemoryFileProvider {
    fn get_file(&self, request: FileRequest) -> LocalBoxFuture<'static, Option<Vec<u8>>> {
        *self.fetches.write().entry(request.path().to_string()).or_insert(0) += 1;
        let data = self
            .files
            .read()
            .get(request.path())
            .map(|bytes| bytes.as_ref().clone());
        futures::future::ready(data).boxed_local()
    }
}

// ============================================================================
// Callback provider
// ============================================================================

/// Completion callback handed to a callback-style file getter.
pub type FileCallback = Box<dyn FnOnce(Option<Vec<u8>>)>;

/// Adapts a callback-style `get_file(path, callback)` entry point.
///
/// If the getter drops the callback without calling it, the request resolves
/// as not found.
pub struct CallbackFileProvider<F>
where
    F: Fn(&str, FileCallback),
{
    get_file: F,
}

impl<F> CallbackFileProvider<F>
where
    F: Fn(&str, FileCallback),
{
    pub fn new(get_file: F) -> Self {
        Self { get_file }
    }
}

impl<F> FileProvider for CallbackFileProvider<F>
where
    F: Fn(&str, FileCallback),
{
    fn get_file(&self, request: FileRequest) -> LocalBoxFuture<'static, Option<Vec<u8>>> {
        let (sender, receiver) = oneshot::channel();
        (self.get_file)(
            request.path(),
            Box::new(move |data| {
                sender.send(data).ok();
            }),
        );
        async move { receiver.await.ok().flatten() }.boxed_local()
    }
}
