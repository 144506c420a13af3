pub mod blob;
pub mod format;
pub mod io;
pub mod texture_cache;

pub use blob::{Blob, BlobHandle, BlobStore};
pub use format::{MimeType, decode_image};
pub use io::{CallbackFileProvider, FileCallback, FileProvider, FileRequest, MemoryFileProvider};
pub use texture_cache::{PendingTexture, TextureCache, TextureResult};
