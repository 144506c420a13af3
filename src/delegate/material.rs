//! Delegate-side material prim.
//!
//! A [`Material`] collects shader nodes until the scene engine signals the
//! network is complete, then resolves it into a renderer-native material:
//!
//! 1. Wire relationships into a read-only view (dangling ids abort here).
//! 2. Pick the main surface node, the first exposing `diffuseColor`.
//! 3. Build a physical material from its constant inputs.
//! 4. Assign every [`SurfaceSlot`], starting async texture loads for slots fed
//!    by a texture reader.
//!
//! Slot loads settle independently and in any order. Each assignment takes a
//! sequence number from the material's ledger, and a late result is dropped
//! if a newer assignment to the same slot has already landed.

use std::sync::Arc;

use futures::executor::LocalSpawner;
use futures::task::LocalSpawnExt;
use glam::Vec4;
use parking_lot::Mutex;

use crate::assets::TextureCache;
use crate::delegate::network::{MaterialNetwork, NodeKey, ParamMap, Relationship};
use crate::errors::Result;
use crate::resources::material::{
    MaterialData, MaterialRef, MeshPhysicalMaterial, PhysicalFactor, PhysicalMap, Side,
    new_material_ref,
};
use crate::resources::texture::Texture;

/// The surface inputs mapped onto the physical material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceSlot {
    BaseColor,
    Clearcoat,
    ClearcoatRoughness,
    Roughness,
    Metallic,
    Normal,
}

impl SurfaceSlot {
    pub const ALL: [SurfaceSlot; 6] = [
        Self::BaseColor,
        Self::Clearcoat,
        Self::ClearcoatRoughness,
        Self::Roughness,
        Self::Metallic,
        Self::Normal,
    ];

    /// Parameter name on the surface node.
    #[must_use]
    pub fn parameter_name(self) -> &'static str {
        match self {
            Self::BaseColor => "diffuseColor",
            Self::Clearcoat => "clearcoat",
            Self::ClearcoatRoughness => "clearcoatRoughness",
            Self::Roughness => "roughness",
            Self::Metallic => "metallic",
            Self::Normal => "normal",
        }
    }

    #[must_use]
    pub fn map(self) -> PhysicalMap {
        match self {
            Self::BaseColor => PhysicalMap::Map,
            Self::Clearcoat => PhysicalMap::ClearcoatMap,
            Self::ClearcoatRoughness => PhysicalMap::ClearcoatRoughnessMap,
            Self::Roughness => PhysicalMap::RoughnessMap,
            Self::Metallic => PhysicalMap::MetalnessMap,
            Self::Normal => PhysicalMap::NormalMap,
        }
    }

    /// The scalar paired with this slot's map and the value it takes while
    /// the map is bound.
    #[must_use]
    pub fn factor(self) -> Option<(PhysicalFactor, f32)> {
        match self {
            Self::BaseColor | Self::Normal => None,
            Self::Clearcoat => Some((PhysicalFactor::Clearcoat, 1.0)),
            Self::ClearcoatRoughness => Some((PhysicalFactor::ClearcoatRoughness, 5.0)),
            Self::Roughness => Some((PhysicalFactor::Roughness, 1.5)),
            Self::Metallic => Some((PhysicalFactor::Metalness, 1.0)),
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Default)]
struct SlotLedger {
    next: u64,
    applied: [u64; SurfaceSlot::ALL.len()],
}

impl SlotLedger {
    fn issue(&mut self) -> u64 {
        self.next += 1;
        self.next
    }

    /// Records `seq` as applied unless something newer already is.
    fn try_apply(&mut self, slot: SurfaceSlot, seq: u64) -> bool {
        let applied = &mut self.applied[slot.index()];
        if seq > *applied {
            *applied = seq;
            true
        } else {
            false
        }
    }
}

/// Writes one slot. `None` clears the map and zeroes its paired factor.
fn write_slot(material: &mut MeshPhysicalMaterial, slot: SurfaceSlot, texture: Option<Arc<Texture>>) {
    let bound = texture.is_some();
    material.set_texture(slot.map(), texture);
    if let Some((factor, scale)) = slot.factor() {
        material.set_factor(factor, if bound { scale } else { 0.0 });
    }
}

pub struct Material {
    id: String,
    network: MaterialNetwork,
    handle: MaterialRef,
    textures: TextureCache,
    spawner: LocalSpawner,
    fallback_color: Vec4,
    side: Side,
    ledger: Arc<Mutex<SlotLedger>>,
    main_node: Option<String>,
}

impl Material {
    /// Creates an unresolved material. Until finalized it renders as the
    /// untextured fallback.
    pub fn new(
        id: &str,
        textures: TextureCache,
        spawner: LocalSpawner,
        fallback_color: Vec4,
        side: Side,
    ) -> Self {
        Self {
            id: id.to_string(),
            network: MaterialNetwork::new(),
            handle: new_material_ref(MaterialData::fallback(fallback_color, side)),
            textures,
            spawner,
            fallback_color,
            side,
            ledger: Arc::new(Mutex::new(SlotLedger::default())),
            main_node: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The renderer-native material. The handle never changes; finalize
    /// replaces what it points at.
    #[inline]
    #[must_use]
    pub fn handle(&self) -> &MaterialRef {
        &self.handle
    }

    #[must_use]
    pub fn network(&self) -> &MaterialNetwork {
        &self.network
    }

    /// Path of the surface node picked by the last finalize.
    #[must_use]
    pub fn main_node_path(&self) -> Option<&str> {
        self.main_node.as_deref()
    }

    pub fn add_or_update_node(&mut self, network_id: &str, path: &str, parameters: ParamMap) {
        log::debug!("Updating material node: {network_id} {path}");
        self.network.add_or_update_node(network_id, path, parameters);
    }

    /// Resolves the node network into the renderer material.
    ///
    /// A relationship naming an unknown node fails the whole call before the
    /// material is touched.
    pub fn finalize(&mut self, kind: &str, relationships: &[Relationship]) -> Result<()> {
        let wired = self.network.wire(relationships)?;
        log::debug!("Finalizing material {} ({kind})", self.id);

        let Some(main) = wired.find_node_exposing(SurfaceSlot::BaseColor.parameter_name()) else {
            self.main_node = None;
            *self.handle.write() = MaterialData::fallback(self.fallback_color, self.side);
            return Ok(());
        };

        let plan: Vec<(SurfaceSlot, Option<String>)> = SurfaceSlot::ALL
            .iter()
            .map(|&slot| {
                let file = wired.texture_file(main, slot.parameter_name());
                (slot, file.map(str::to_string))
            })
            .collect();

        let physical = self.build_physical(main);
        self.main_node = self.network.node(main).map(|node| node.path.clone());

        log::info!("Creating material {}", self.id);
        *self.handle.write() = MaterialData::Physical(physical);

        for (slot, file) in plan {
            if let Err(err) = self.assign_texture(slot, file.as_deref()) {
                log::warn!(
                    "Material {}: cannot resolve {} texture: {err}",
                    self.id,
                    slot.parameter_name()
                );
                self.assign_texture(slot, None)?;
            }
        }
        Ok(())
    }

    fn build_physical(&self, main: NodeKey) -> MeshPhysicalMaterial {
        let mut material = MeshPhysicalMaterial::new(Vec4::ONE);
        material.set_side(self.side);

        let Some(node) = self.network.node(main) else {
            return material;
        };
        let params = &node.parameters;

        if let Some(color) = params.get("diffuseColor").and_then(|v| v.as_vec3()) {
            material.set_color(color.extend(1.0));
        }
        if let Some(opacity) = params.get("opacity").and_then(|v| v.as_f32()) {
            material.set_opacity(opacity);
        }
        if let Some(emissive) = params.get("emissiveColor").and_then(|v| v.as_vec3()) {
            material.set_emissive(emissive);
        }
        material
    }

    /// Assigns one slot.
    ///
    /// With a file, the texture is loaded through the cache on the local
    /// executor and bound when it settles; its paired factor is set to the
    /// slot's scale. Without one, the slot is cleared immediately. An
    /// unsupported extension fails synchronously and leaves the slot as is.
    pub fn assign_texture(&self, slot: SurfaceSlot, file: Option<&str>) -> Result<()> {
        let Some(file) = file else {
            let mut ledger = self.ledger.lock();
            let seq = ledger.issue();
            if ledger.try_apply(slot, seq) {
                let mut data = self.handle.write();
                if let Some(material) = data.as_physical_mut() {
                    write_slot(material, slot, None);
                }
            }
            return Ok(());
        };

        let pending = self.textures.resolve(file)?;
        let seq = self.ledger.lock().issue();

        let handle = Arc::clone(&self.handle);
        let ledger = Arc::clone(&self.ledger);
        let id = self.id.clone();
        let file = file.to_string();

        self.spawner.spawn_local(async move {
            let texture = match pending.await {
                Ok(texture) => texture,
                Err(err) => {
                    log::warn!("Material {id}: texture {file} failed: {err}");
                    return;
                }
            };

            if !ledger.lock().try_apply(slot, seq) {
                log::debug!("Material {id}: dropping stale {file} for {slot:?}");
                return;
            }

            let mut data = handle.write();
            if let Some(material) = data.as_physical_mut() {
                write_slot(material, slot, Some(texture));
                material.needs_update();
            }
        })?;
        Ok(())
    }
}
