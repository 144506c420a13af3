use std::sync::Arc;

use bitflags::bitflags;
use glam::Mat4;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use wgpu::VertexFormat;

use crate::errors::{DelegateError, Result};
use crate::resources::geometry::{Attribute, Geometry, vertex_format_for_dimension};
use crate::resources::material::MaterialRef;
use crate::scene::{MeshKey, RenderMesh, SceneHandle};

bitflags! {
    /// Which parts of a mesh changed since its last commit.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct DirtyFlags: u8 {
        const GEOMETRY  = 1 << 0;
        const TRANSFORM = 1 << 1;
        const MATERIAL  = 1 << 2;
    }
}

/// Material id -> renderer-native material, shared by the registry with every mesh.
pub type MaterialTable = Arc<RwLock<FxHashMap<String, MaterialRef>>>;

/// Attributes stored indexed and expanded through the index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexedAttribute {
    Position,
    Normal,
}

impl IndexedAttribute {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Position => "position",
            Self::Normal => "normal",
        }
    }
}

/// Primvar names that never go through the generic attribute path.
const RESERVED_PRIMVARS: [&str; 4] = ["points", "normals", "position", "normal"];

/// Expands an indexed pool of 3-component vertices into one triple per index.
///
/// Returns `None` when `raw` is not a whole number of triples or an index
/// points past the end of the pool.
#[must_use]
pub fn expand_indexed(raw: &[f32], indices: &[u32]) -> Option<Vec<f32>> {
    if raw.len() % 3 != 0 {
        return None;
    }
    let vertex_count = raw.len() / 3;

    let mut values = Vec::with_capacity(indices.len() * 3);
    for &index in indices {
        let i = index as usize;
        if i >= vertex_count {
            return None;
        }
        values.extend_from_slice(&raw[3 * i..3 * i + 3]);
    }
    Some(values)
}

/// Delegate-side mesh prim.
///
/// Updates land in a staged [`Geometry`] immediately; [`Mesh::commit`]
/// publishes whatever is dirty to the shared render scene.
pub struct Mesh {
    id: String,
    scene: SceneHandle,
    key: MeshKey,
    materials: MaterialTable,

    points: Option<Vec<f32>>,
    normals: Option<Vec<f32>>,
    indices: Option<Vec<u32>>,

    geometry: Geometry,
    transform: Mat4,
    matrix_auto_update: bool,
    material: Option<MaterialRef>,
    material_id: Option<String>,

    dirty: DirtyFlags,
}

impl Mesh {
    /// Creates the mesh and registers its render object in `scene`.
    pub fn new(
        id: &str,
        scene: SceneHandle,
        materials: MaterialTable,
        fallback_material: MaterialRef,
    ) -> Self {
        let key = scene.write().add_mesh(RenderMesh::new(id, fallback_material));
        Self {
            id: id.to_string(),
            scene,
            key,
            materials,
            points: None,
            normals: None,
            indices: None,
            geometry: Geometry::new(),
            transform: Mat4::IDENTITY,
            matrix_auto_update: true,
            material: None,
            material_id: None,
            dirty: DirtyFlags::empty(),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    #[must_use]
    pub fn key(&self) -> MeshKey {
        self.key
    }

    /// Staged geometry, including updates not yet committed.
    #[must_use]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    #[must_use]
    pub fn indices(&self) -> Option<&[u32]> {
        self.indices.as_deref()
    }

    #[must_use]
    pub fn points(&self) -> Option<&[f32]> {
        self.points.as_deref()
    }

    #[must_use]
    pub fn normals(&self) -> Option<&[f32]> {
        self.normals.as_deref()
    }

    #[must_use]
    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    #[must_use]
    pub fn matrix_auto_update(&self) -> bool {
        self.matrix_auto_update
    }

    #[must_use]
    pub fn material(&self) -> Option<&MaterialRef> {
        self.material.as_ref()
    }

    #[must_use]
    pub fn material_id(&self) -> Option<&str> {
        self.material_id.as_deref()
    }

    #[must_use]
    pub fn dirty_flags(&self) -> DirtyFlags {
        self.dirty
    }

    // ========================================================================
    // Updates
    // ========================================================================

    /// Replaces the index buffer and re-derives `position` and `normal`.
    pub fn set_indices(&mut self, indices: &[u32]) {
        self.indices = Some(indices.to_vec());
        self.update_order(IndexedAttribute::Position);
        self.update_order(IndexedAttribute::Normal);
    }

    /// Stores the raw point pool. The flattened `position` attribute only
    /// exists once an index buffer has been set.
    pub fn set_points(&mut self, points: &[f32]) {
        self.points = Some(points.to_vec());
        self.update_order(IndexedAttribute::Position);
    }

    pub fn set_normals(&mut self, normals: &[f32]) {
        self.normals = Some(normals.to_vec());
        self.update_order(IndexedAttribute::Normal);
    }

    fn update_order(&mut self, attribute: IndexedAttribute) {
        let raw = match attribute {
            IndexedAttribute::Position => self.points.as_deref(),
            IndexedAttribute::Normal => self.normals.as_deref(),
        };
        let (Some(raw), Some(indices)) = (raw, self.indices.as_deref()) else {
            return;
        };

        let name = attribute.name();
        if let Some(values) = expand_indexed(raw, indices) {
            self.geometry
                .set_attribute(name, Attribute::from_floats(&values, VertexFormat::Float32x3));
        } else {
            log::warn!(
                "Mesh {}: {} does not match the index buffer ({} floats, {} indices), dropping it",
                self.id,
                name,
                raw.len(),
                indices.len()
            );
            self.geometry.remove_attribute(name);
        }
        self.dirty |= DirtyFlags::GEOMETRY;
    }

    /// Assigns an already unindexed vertex attribute. `st` is renamed to `uv`.
    pub fn set_generic_attribute(&mut self, name: &str, data: &[f32], dimension: u32) -> Result<()> {
        if RESERVED_PRIMVARS.contains(&name) {
            return Ok(());
        }

        let format = vertex_format_for_dimension(dimension).ok_or_else(|| {
            DelegateError::UnsupportedAttributeDimension {
                name: name.to_string(),
                dimension,
            }
        })?;

        let name = if name == "st" { "uv" } else { name };
        log::debug!("Mesh {}: setting primvar {name}", self.id);

        self.geometry.set_attribute(name, Attribute::from_floats(data, format));
        self.dirty |= DirtyFlags::GEOMETRY;
        Ok(())
    }

    /// Takes a row-major 4x4 matrix from the scene description.
    ///
    /// The source uses row vectors, so its row-major element order is already
    /// the column-major layout of the equivalent column-vector matrix.
    pub fn set_transform(&mut self, matrix: &[f32; 16]) {
        self.transform = Mat4::from_cols_array(matrix);
        self.matrix_auto_update = false;
        self.dirty |= DirtyFlags::TRANSFORM;
    }

    /// Binds a material by id. Unknown ids are ignored; the driver binds again
    /// once the material exists.
    pub fn set_material_binding(&mut self, material_id: &str) {
        log::debug!("Mesh {}: material {material_id}", self.id);
        let Some(material) = self.materials.read().get(material_id).cloned() else {
            return;
        };
        self.material = Some(material);
        self.material_id = Some(material_id.to_string());
        self.dirty |= DirtyFlags::MATERIAL;
    }

    // ========================================================================
    // Commit
    // ========================================================================

    /// Publishes dirty state to the render scene and clears the flags.
    /// A commit with nothing dirty does not touch the scene.
    pub fn commit(&mut self) {
        if self.dirty.is_empty() {
            return;
        }

        let mut scene = self.scene.write();
        let Some(target) = scene.get_mesh_mut(self.key) else {
            log::warn!("Mesh {} has no render object, skipping commit", self.id);
            return;
        };

        if self.dirty.contains(DirtyFlags::GEOMETRY) {
            self.geometry.compute_bounding_box();
            target.geometry = Some(Arc::new(self.geometry.clone()));
        }

        if self.dirty.contains(DirtyFlags::TRANSFORM) {
            target.matrix = self.transform;
            target.matrix_auto_update = self.matrix_auto_update;
        }

        if self.dirty.contains(DirtyFlags::MATERIAL)
            && let Some(material) = &self.material
        {
            target.material = Arc::clone(material);
        }

        self.dirty = DirtyFlags::empty();
    }
}
