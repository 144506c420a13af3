use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

// Global Image ID generator (uses u64 for cheap map lookups on the render side)
static NEXT_IMAGE_ID: AtomicU64 = AtomicU64::new(1);

/// Decoded pixel data, always tightly packed RGBA8.
#[derive(Debug, Clone)]
pub struct Image {
    pub id: u64,
    pub uuid: Uuid,
    pub label: String,
    pub width: u32,
    pub height: u32,
    pub format: wgpu::TextureFormat,
    pub data: Vec<u8>,
}

impl PartialEq for Image {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for Image {}

impl Image {
    #[must_use]
    pub fn new(
        label: &str,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
        data: Vec<u8>,
    ) -> Self {
        Self {
            id: NEXT_IMAGE_ID.fetch_add(1, Ordering::Relaxed),
            uuid: Uuid::new_v4(),
            label: label.to_string(),
            width,
            height,
            format,
            data,
        }
    }

    #[inline]
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}
