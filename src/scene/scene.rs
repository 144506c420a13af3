use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use glam::Mat4;
use parking_lot::RwLock;
use slotmap::SlotMap;

use crate::resources::geometry::Geometry;
use crate::resources::material::MaterialRef;
use crate::scene::MeshKey;

static NEXT_SCENE_ID: AtomicU32 = AtomicU32::new(1);

/// A drawable as the renderer sees it.
#[derive(Debug, Clone)]
pub struct RenderMesh {
    pub name: String,

    /// Last committed geometry; `None` until the first geometry commit.
    pub geometry: Option<Arc<Geometry>>,
    pub material: MaterialRef,

    /// Column-major local-to-world matrix
    pub matrix: Mat4,
    /// When false the renderer must not recompose `matrix` from TRS.
    pub matrix_auto_update: bool,

    pub visible: bool,
}

impl RenderMesh {
    #[must_use]
    pub fn new(name: &str, material: MaterialRef) -> Self {
        Self {
            name: name.to_string(),
            geometry: None,
            material,
            matrix: Mat4::IDENTITY,
            matrix_auto_update: true,
            visible: true,
        }
    }
}

/// Flat container of everything the delegate has handed to the renderer.
pub struct RenderScene {
    pub id: u32,
    pub meshes: SlotMap<MeshKey, RenderMesh>,
}

impl Default for RenderScene {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderScene {
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: NEXT_SCENE_ID.fetch_add(1, Ordering::Relaxed),
            meshes: SlotMap::with_key(),
        }
    }

    pub fn add_mesh(&mut self, mesh: RenderMesh) -> MeshKey {
        self.meshes.insert(mesh)
    }

    pub fn remove_mesh(&mut self, key: MeshKey) -> Option<RenderMesh> {
        self.meshes.remove(key)
    }

    #[must_use]
    pub fn get_mesh(&self, key: MeshKey) -> Option<&RenderMesh> {
        self.meshes.get(key)
    }

    pub fn get_mesh_mut(&mut self, key: MeshKey) -> Option<&mut RenderMesh> {
        self.meshes.get_mut(key)
    }

    pub fn iter_meshes(&self) -> impl Iterator<Item = (MeshKey, &RenderMesh)> {
        self.meshes.iter()
    }

    #[must_use]
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }
}

/// Shared handle injected into every delegate mesh at construction.
pub type SceneHandle = Arc<RwLock<RenderScene>>;
