mod phong;
mod physical;

pub use phong::MeshPhongMaterial;
pub use physical::{MeshPhysicalMaterial, MeshPhysicalTextureSet, PhysicalFactor, PhysicalMap};

use std::sync::Arc;

use glam::Vec4;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

#[derive(PartialEq, Eq, Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub enum Side {
    Front,
    Back,
    #[default]
    Double,
}

/// Material settings - changes here invalidate the pipeline
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct MaterialSettings {
    pub transparent: bool,
    pub depth_write: bool,
    pub depth_test: bool,
    pub side: Side,
}

impl Default for MaterialSettings {
    fn default() -> Self {
        Self {
            transparent: false,
            depth_write: true,
            depth_test: true,
            side: Side::Double,
        }
    }
}

// ============================================================================
// Material Data Enum
// ============================================================================

/// Renderer-native material.
///
/// The delegate only ever produces two shading models: a Phong fallback for
/// prims without a recognised surface, and the physical model for resolved
/// preview surfaces.
#[derive(Debug, Clone)]
pub enum MaterialData {
    Phong(MeshPhongMaterial),
    Physical(MeshPhysicalMaterial),
}

impl MaterialData {
    /// The fallback material: untextured, vertex colours off.
    #[must_use]
    pub fn fallback(color: Vec4, side: Side) -> Self {
        let mut phong = MeshPhongMaterial::new(color);
        phong.set_side(side);
        Self::Phong(phong)
    }

    #[must_use]
    pub fn shader_name(&self) -> &'static str {
        match self {
            Self::Phong(_) => "mesh_phong",
            Self::Physical(_) => "mesh_physical",
        }
    }

    /// Version number; any change visible to the renderer bumps it.
    #[must_use]
    pub fn version(&self) -> u64 {
        match self {
            Self::Phong(m) => m.version(),
            Self::Physical(m) => m.version(),
        }
    }

    #[must_use]
    pub fn settings(&self) -> &MaterialSettings {
        match self {
            Self::Phong(m) => m.settings(),
            Self::Physical(m) => m.settings(),
        }
    }

    /// Flags the material for a renderer-side refresh.
    pub fn needs_update(&mut self) {
        match self {
            Self::Phong(m) => m.needs_update(),
            Self::Physical(m) => m.needs_update(),
        }
    }

    #[must_use]
    pub fn as_phong(&self) -> Option<&MeshPhongMaterial> {
        match self {
            Self::Phong(m) => Some(m),
            Self::Physical(_) => None,
        }
    }

    #[must_use]
    pub fn as_physical(&self) -> Option<&MeshPhysicalMaterial> {
        match self {
            Self::Physical(m) => Some(m),
            Self::Phong(_) => None,
        }
    }

    pub fn as_physical_mut(&mut self) -> Option<&mut MeshPhysicalMaterial> {
        match self {
            Self::Physical(m) => Some(m),
            Self::Phong(_) => None,
        }
    }
}

impl From<MeshPhongMaterial> for MaterialData {
    fn from(data: MeshPhongMaterial) -> Self {
        Self::Phong(data)
    }
}

impl From<MeshPhysicalMaterial> for MaterialData {
    fn from(data: MeshPhysicalMaterial) -> Self {
        Self::Physical(data)
    }
}

/// Shared handle to a renderer-native material.
///
/// The handle is stable for the lifetime of the delegate material that owns
/// it; resolving a material network replaces the contents, not the handle, so
/// meshes bound before resolution pick up the result.
pub type MaterialRef = Arc<RwLock<MaterialData>>;

#[must_use]
pub fn new_material_ref(data: impl Into<MaterialData>) -> MaterialRef {
    Arc::new(RwLock::new(data.into()))
}
