use std::sync::Arc;

use glam::{Vec3, Vec4};

use crate::resources::material::{MaterialSettings, Side};
use crate::resources::texture::Texture;
use crate::resources::version_tracker::ChangeTracker;

/// Texture map slots of the physical material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhysicalMap {
    Map,
    NormalMap,
    RoughnessMap,
    MetalnessMap,
    ClearcoatMap,
    ClearcoatRoughnessMap,
}

/// Scalar factors that scale a texture map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhysicalFactor {
    Roughness,
    Metalness,
    Clearcoat,
    ClearcoatRoughness,
}

#[derive(Clone, Default, Debug)]
pub struct MeshPhysicalTextureSet {
    pub map: Option<Arc<Texture>>,
    pub normal_map: Option<Arc<Texture>>,
    pub roughness_map: Option<Arc<Texture>>,
    pub metalness_map: Option<Arc<Texture>>,
    pub clearcoat_map: Option<Arc<Texture>>,
    pub clearcoat_roughness_map: Option<Arc<Texture>>,
}

impl MeshPhysicalTextureSet {
    fn slot_mut(&mut self, map: PhysicalMap) -> &mut Option<Arc<Texture>> {
        match map {
            PhysicalMap::Map => &mut self.map,
            PhysicalMap::NormalMap => &mut self.normal_map,
            PhysicalMap::RoughnessMap => &mut self.roughness_map,
            PhysicalMap::MetalnessMap => &mut self.metalness_map,
            PhysicalMap::ClearcoatMap => &mut self.clearcoat_map,
            PhysicalMap::ClearcoatRoughnessMap => &mut self.clearcoat_roughness_map,
        }
    }

    fn slot(&self, map: PhysicalMap) -> Option<&Arc<Texture>> {
        match map {
            PhysicalMap::Map => self.map.as_ref(),
            PhysicalMap::NormalMap => self.normal_map.as_ref(),
            PhysicalMap::RoughnessMap => self.roughness_map.as_ref(),
            PhysicalMap::MetalnessMap => self.metalness_map.as_ref(),
            PhysicalMap::ClearcoatMap => self.clearcoat_map.as_ref(),
            PhysicalMap::ClearcoatRoughnessMap => self.clearcoat_roughness_map.as_ref(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MeshPhysicalMaterial {
    pub(crate) color: Vec4,
    pub(crate) emissive: Vec3,
    pub(crate) opacity: f32,
    pub(crate) roughness: f32,
    pub(crate) metalness: f32,
    pub(crate) clearcoat: f32,
    pub(crate) clearcoat_roughness: f32,
    pub(crate) textures: MeshPhysicalTextureSet,
    pub(crate) settings: MaterialSettings,
    pub(crate) tracker: ChangeTracker,
}

impl MeshPhysicalMaterial {
    #[must_use]
    pub fn new(color: Vec4) -> Self {
        Self {
            color,
            emissive: Vec3::ZERO,
            opacity: 1.0,
            roughness: 1.0,
            metalness: 0.0,
            clearcoat: 0.0,
            clearcoat_roughness: 0.0,
            textures: MeshPhysicalTextureSet::default(),
            settings: MaterialSettings::default(),
            tracker: ChangeTracker::new(),
        }
    }

    // ==========================================
    // Uniform parameters
    // ==========================================

    #[must_use]
    pub fn color(&self) -> Vec4 {
        self.color
    }

    pub fn set_color(&mut self, color: Vec4) {
        self.color = color;
        self.tracker.changed();
    }

    #[must_use]
    pub fn emissive(&self) -> Vec3 {
        self.emissive
    }

    pub fn set_emissive(&mut self, emissive: Vec3) {
        self.emissive = emissive;
        self.tracker.changed();
    }

    #[must_use]
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Sets opacity; anything below one switches on alpha blending.
    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity;
        self.settings.transparent = opacity < 1.0;
        self.tracker.changed();
    }

    #[must_use]
    pub fn factor(&self, factor: PhysicalFactor) -> f32 {
        match factor {
            PhysicalFactor::Roughness => self.roughness,
            PhysicalFactor::Metalness => self.metalness,
            PhysicalFactor::Clearcoat => self.clearcoat,
            PhysicalFactor::ClearcoatRoughness => self.clearcoat_roughness,
        }
    }

    pub fn set_factor(&mut self, factor: PhysicalFactor, value: f32) {
        let field = match factor {
            PhysicalFactor::Roughness => &mut self.roughness,
            PhysicalFactor::Metalness => &mut self.metalness,
            PhysicalFactor::Clearcoat => &mut self.clearcoat,
            PhysicalFactor::ClearcoatRoughness => &mut self.clearcoat_roughness,
        };
        *field = value;
        self.tracker.changed();
    }

    #[must_use]
    pub fn roughness(&self) -> f32 {
        self.roughness
    }

    #[must_use]
    pub fn metalness(&self) -> f32 {
        self.metalness
    }

    #[must_use]
    pub fn clearcoat(&self) -> f32 {
        self.clearcoat
    }

    #[must_use]
    pub fn clearcoat_roughness(&self) -> f32 {
        self.clearcoat_roughness
    }

    // ==========================================
    // Texture maps
    // ==========================================

    #[must_use]
    pub fn texture(&self, map: PhysicalMap) -> Option<&Arc<Texture>> {
        self.textures.slot(map)
    }

    /// Assigns or clears a texture map. Reassigning the texture already in
    /// the slot leaves the version untouched.
    pub fn set_texture(&mut self, map: PhysicalMap, texture: Option<Arc<Texture>>) {
        let slot = self.textures.slot_mut(map);
        let unchanged = match (slot.as_ref(), texture.as_ref()) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        if !unchanged {
            *slot = texture;
            self.tracker.changed();
        }
    }

    #[must_use]
    pub fn textures(&self) -> &MeshPhysicalTextureSet {
        &self.textures
    }

    // ==========================================
    // Settings
    // ==========================================

    pub fn set_side(&mut self, side: Side) {
        if self.settings.side != side {
            self.settings.side = side;
            self.tracker.changed();
        }
    }

    #[must_use]
    pub fn side(&self) -> Side {
        self.settings.side
    }

    #[must_use]
    pub fn transparent(&self) -> bool {
        self.settings.transparent
    }

    #[must_use]
    pub fn settings(&self) -> &MaterialSettings {
        &self.settings
    }

    #[must_use]
    pub fn version(&self) -> u64 {
        self.tracker.version()
    }

    pub fn needs_update(&mut self) {
        self.tracker.changed();
    }
}

impl Default for MeshPhysicalMaterial {
    fn default() -> Self {
        Self::new(Vec4::ONE)
    }
}
