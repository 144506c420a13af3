use uuid::Uuid;

use crate::resources::image::Image;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureSampler {
    pub address_mode_u: wgpu::AddressMode,
    pub address_mode_v: wgpu::AddressMode,
    pub mag_filter: wgpu::FilterMode,
    pub min_filter: wgpu::FilterMode,
}

impl Default for TextureSampler {
    fn default() -> Self {
        Self {
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
        }
    }
}

/// A decoded texture ready to be bound to a material map slot.
///
/// Textures are shared between materials through `Arc<Texture>`; identity
/// comparisons go through [`Texture::uuid`].
#[derive(Debug, Clone)]
pub struct Texture {
    pub uuid: Uuid,
    pub name: String,
    pub image: Image,
    pub sampler: TextureSampler,
    pub generate_mipmaps: bool,
}

impl Texture {
    #[must_use]
    pub fn new(name: &str, image: Image) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.to_string(),
            image,
            sampler: TextureSampler::default(),
            generate_mipmaps: true,
        }
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height
    }
}
