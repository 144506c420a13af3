//! Renderer-native resource definitions.
//!
//! Plain CPU-side data the renderer consumes, independent of any GPU backend:
//! - Geometry: non-indexed vertex attributes
//! - Material: Phong fallback and physical materials
//! - Texture / Image: decoded texture data

pub mod geometry;
pub mod image;
pub mod material;
pub mod texture;
pub mod version_tracker;

pub use geometry::{Attribute, BoundingBox, Geometry};
pub use image::Image;
pub use material::{
    MaterialData, MaterialRef, MeshPhongMaterial, MeshPhysicalMaterial, PhysicalFactor,
    PhysicalMap, Side,
};
pub use texture::{Texture, TextureSampler};
