use rustc_hash::FxHashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;
use wgpu::VertexFormat;
use glam::Vec3;

/// Attribute holds CPU-side vertex data (shared via `Arc`) and its layout.
#[derive(Debug, Clone)]
pub struct Attribute {
    /// CPU-side data, native-endian bytes
    pub data: Arc<Vec<u8>>,

    /// Data version for change detection
    pub version: u64,

    pub format: VertexFormat,
    pub count: u32,
    pub stride: u64,
}

static NEXT_ATTR_VERSION: AtomicU64 = AtomicU64::new(1);

/// Maps a per-vertex component count to the matching float vertex format.
#[must_use]
pub fn vertex_format_for_dimension(dimension: u32) -> Option<VertexFormat> {
    match dimension {
        1 => Some(VertexFormat::Float32),
        2 => Some(VertexFormat::Float32x2),
        3 => Some(VertexFormat::Float32x3),
        4 => Some(VertexFormat::Float32x4),
        _ => None,
    }
}

fn float_components(format: VertexFormat) -> usize {
    match format {
        VertexFormat::Float32x2 => 2,
        VertexFormat::Float32x3 => 3,
        VertexFormat::Float32x4 => 4,
        _ => 1,
    }
}

impl Attribute {
    /// Creates a planar (non-interleaved) attribute.
    pub fn new_planar<T: bytemuck::Pod>(data: &[T], format: VertexFormat) -> Self {
        let raw_data = bytemuck::cast_slice(data).to_vec();
        Self {
            data: Arc::new(raw_data),
            version: NEXT_ATTR_VERSION.fetch_add(1, Ordering::Relaxed),
            format,
            count: data.len() as u32,
            stride: std::mem::size_of::<T>() as u64,
        }
    }

    /// Creates a planar float attribute from a flat component buffer.
    /// Trailing components that do not fill a whole vertex are dropped.
    #[must_use]
    pub fn from_floats(data: &[f32], format: VertexFormat) -> Self {
        let components = float_components(format);
        let whole = data.len() - data.len() % components;
        let raw_data = bytemuck::cast_slice(&data[..whole]).to_vec();
        Self {
            data: Arc::new(raw_data),
            version: NEXT_ATTR_VERSION.fetch_add(1, Ordering::Relaxed),
            format,
            count: (whole / components) as u32,
            stride: (components * std::mem::size_of::<f32>()) as u64,
        }
    }

    #[inline]
    #[must_use]
    pub fn components(&self) -> usize {
        float_components(self.format)
    }

    /// Copies the attribute back out as floats.
    #[must_use]
    pub fn to_f32_vec(&self) -> Vec<f32> {
        self.data
            .chunks_exact(4)
            .map(|b| f32::from_ne_bytes([b[0], b[1], b[2], b[3]]))
            .collect()
    }

    #[must_use]
    pub fn read_vec3(&self, i: u32) -> Option<Vec3> {
        if self.format != VertexFormat::Float32x3 {
            return None;
        }
        let offset = (i as usize) * self.stride as usize;
        let bytes = self.data.get(offset..offset + 12)?;
        let mut vals = [0.0f32; 3];
        for (v, b) in vals.iter_mut().zip(bytes.chunks_exact(4)) {
            *v = f32::from_ne_bytes([b[0], b[1], b[2], b[3]]);
        }
        Some(Vec3::from_array(vals))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// Non-indexed vertex data as the renderer draws it: every attribute holds
/// one entry per draw vertex.
#[derive(Debug, Clone)]
pub struct Geometry {
    pub uuid: Uuid,

    // vertex layout versioning
    layout_version: u64,
    data_version: u64,

    attributes: FxHashMap<String, Attribute>,

    pub bounding_box: Option<BoundingBox>,
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new()
    }
}

impl Geometry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            uuid: Uuid::new_v4(),
            layout_version: 0,
            data_version: 0,
            attributes: FxHashMap::default(),
            bounding_box: None,
        }
    }

    // Version accessors
    #[must_use]
    pub fn layout_version(&self) -> u64 {
        self.layout_version
    }

    #[must_use]
    pub fn data_version(&self) -> u64 {
        self.data_version
    }

    #[must_use]
    pub fn attributes(&self) -> &FxHashMap<String, Attribute> {
        &self.attributes
    }

    pub fn set_attribute(&mut self, name: &str, attr: Attribute) {
        let layout_changed = self
            .attributes
            .get(name)
            .is_none_or(|old| old.format != attr.format);

        self.attributes.insert(name.to_string(), attr);

        if layout_changed {
            self.layout_version = self.layout_version.wrapping_add(1);
        }
        self.data_version = self.data_version.wrapping_add(1);
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<Attribute> {
        let removed = self.attributes.remove(name);
        if removed.is_some() {
            self.layout_version = self.layout_version.wrapping_add(1);
            self.data_version = self.data_version.wrapping_add(1);
        }
        removed
    }

    #[must_use]
    pub fn get_attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Number of draw vertices, taken from `position`.
    #[must_use]
    pub fn vertex_count(&self) -> u32 {
        self.attributes.get("position").map_or(0, |attr| attr.count)
    }

    pub fn compute_bounding_box(&mut self) {
        let Some(pos_attr) = self.attributes.get("position") else {
            self.bounding_box = None;
            return;
        };

        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        let mut valid_points_count = 0;

        for i in 0..pos_attr.count {
            let Some(p) = pos_attr.read_vec3(i) else { break };
            min = min.min(p);
            max = max.max(p);
            valid_points_count += 1;
        }

        self.bounding_box = (valid_points_count > 0).then_some(BoundingBox { min, max });
    }
}
