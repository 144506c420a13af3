use std::path::Path;

use image::{GenericImageView, ImageFormat};

use crate::errors::{DelegateError, Result};
use crate::resources::image::Image;

/// Texture encodings the delegate can decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MimeType {
    Png,
    Jpeg,
}

impl MimeType {
    /// Picks the MIME type from the filename extension (case-insensitive).
    pub fn from_filename(filename: &str) -> Result<Self> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("png") => Ok(Self::Png),
            Some("jpg" | "jpeg") => Ok(Self::Jpeg),
            _ => Err(DelegateError::UnsupportedFormat(filename.to_string())),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    #[must_use]
    pub fn image_format(self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Jpeg => ImageFormat::Jpeg,
        }
    }
}

/// CPU image decoding, always to sRGB RGBA8.
pub fn decode_image(bytes: &[u8], mime: MimeType, label: &str) -> Result<Image> {
    let img = image::load_from_memory_with_format(bytes, mime.image_format()).map_err(|e| {
        DelegateError::DecodeFailure {
            label: label.to_string(),
            reason: e.to_string(),
        }
    })?;

    let (width, height) = img.dimensions();
    let rgba = img.to_rgba8();

    Ok(Image::new(
        label,
        width,
        height,
        wgpu::TextureFormat::Rgba8UnormSrgb,
        rgba.into_raw(),
    ))
}
