use std::sync::Arc;

use futures::executor::LocalPool;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::assets::{FileProvider, TextureCache};
use crate::delegate::material::Material;
use crate::delegate::mesh::{MaterialTable, Mesh};
use crate::delegate::prim::{BprimType, RprimType, SprimType};
use crate::resources::material::{MaterialData, MaterialRef, new_material_ref};
use crate::scene::{RenderScene, SceneHandle};
use crate::settings::DelegateSettings;

/// Entry point the scene engine drives.
///
/// Owns every delegate mesh and material by the scene engine's prim id, the
/// session texture cache, and the local executor texture loads run on. Nothing
/// here runs on its own: texture work only advances inside
/// [`RenderDelegate::poll_tasks`] or [`RenderDelegate::run_tasks`].
pub struct RenderDelegate {
    settings: DelegateSettings,
    scene: SceneHandle,
    textures: TextureCache,

    meshes: FxHashMap<String, Mesh>,
    materials: FxHashMap<String, Material>,
    material_table: MaterialTable,
    fallback_material: MaterialRef,

    executor: LocalPool,
}

impl RenderDelegate {
    /// Creates a delegate publishing into a fresh scene.
    pub fn new(settings: DelegateSettings, provider: Arc<dyn FileProvider>) -> Self {
        Self::with_scene(
            settings,
            provider,
            Arc::new(RwLock::new(RenderScene::new())),
        )
    }

    /// Creates a delegate publishing into a scene owned by the host.
    pub fn with_scene(
        settings: DelegateSettings,
        provider: Arc<dyn FileProvider>,
        scene: SceneHandle,
    ) -> Self {
        let textures = TextureCache::new(&settings.document_name, provider);
        let fallback_material =
            new_material_ref(MaterialData::fallback(settings.default_color(), settings.side));

        Self {
            settings,
            scene,
            textures,
            meshes: FxHashMap::default(),
            materials: FxHashMap::default(),
            material_table: Arc::new(RwLock::new(FxHashMap::default())),
            fallback_material,
            executor: LocalPool::new(),
        }
    }

    // ========================================================================
    // Prim creation
    // ========================================================================

    /// Creates a renderable prim. Only meshes are rendered; other types return
    /// `None`. Re-creating an existing id replaces the mesh and its render
    /// object.
    pub fn create_renderable_prim(
        &mut self,
        type_id: &str,
        id: &str,
        instancer_id: &str,
    ) -> Option<&mut Mesh> {
        match RprimType::from_type_id(type_id) {
            RprimType::Mesh => {
                log::debug!("Creating mesh {id} (instancer '{instancer_id}')");
                let mesh = Mesh::new(
                    id,
                    Arc::clone(&self.scene),
                    Arc::clone(&self.material_table),
                    Arc::clone(&self.fallback_material),
                );
                if let Some(old) = self.meshes.insert(id.to_string(), mesh) {
                    self.scene.write().remove_mesh(old.key());
                }
                self.meshes.get_mut(id)
            }
            RprimType::Unrecognized(other) => {
                log::debug!("Ignoring renderable prim {id} of type {other}");
                None
            }
        }
    }

    /// Buffer prims are acknowledged and dropped.
    pub fn create_buffer_prim(&mut self, type_id: &str, id: &str) {
        match BprimType::from_type_id(type_id) {
            BprimType::RenderBuffer | BprimType::RenderSettings => {
                log::debug!("Buffer prim {id} ({type_id}) has no renderer counterpart");
            }
            BprimType::Unrecognized(other) => {
                log::debug!("Ignoring buffer prim {id} of type {other}");
            }
        }
    }

    /// Creates a shading prim. Only materials are supported; other types
    /// return `None`.
    pub fn create_shading_prim(&mut self, type_id: &str, id: &str) -> Option<&mut Material> {
        match SprimType::from_type_id(type_id) {
            SprimType::Material => {
                log::debug!("Creating material {id}");
                let material = Material::new(
                    id,
                    self.textures.clone(),
                    self.executor.spawner(),
                    self.settings.default_color(),
                    self.settings.side,
                );
                self.material_table
                    .write()
                    .insert(id.to_string(), Arc::clone(material.handle()));
                self.materials.insert(id.to_string(), material);
                self.materials.get_mut(id)
            }
            SprimType::Unrecognized(other) => {
                log::debug!("Ignoring shading prim {id} of type {other}");
                None
            }
        }
    }

    // ========================================================================
    // Frame
    // ========================================================================

    /// End-of-frame flush: commits every mesh. Materials are resolved by
    /// their own finalize calls and are not visited here.
    pub fn commit_resources(&mut self) {
        for mesh in self.meshes.values_mut() {
            mesh.commit();
        }
    }

    /// Advances texture tasks as far as they can go without blocking.
    pub fn poll_tasks(&mut self) {
        self.executor.run_until_stalled();
    }

    /// Drives texture tasks until every one of them has finished.
    pub fn run_tasks(&mut self) {
        self.executor.run();
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    #[must_use]
    pub fn mesh(&self, id: &str) -> Option<&Mesh> {
        self.meshes.get(id)
    }

    pub fn mesh_mut(&mut self, id: &str) -> Option<&mut Mesh> {
        self.meshes.get_mut(id)
    }

    #[must_use]
    pub fn material(&self, id: &str) -> Option<&Material> {
        self.materials.get(id)
    }

    pub fn material_mut(&mut self, id: &str) -> Option<&mut Material> {
        self.materials.get_mut(id)
    }

    #[must_use]
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    #[must_use]
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    #[must_use]
    pub fn scene(&self) -> &SceneHandle {
        &self.scene
    }

    #[must_use]
    pub fn textures(&self) -> &TextureCache {
        &self.textures
    }

    #[must_use]
    pub fn settings(&self) -> &DelegateSettings {
        &self.settings
    }
}
