//! Hydra-facing side of the crate.
//!
//! The scene engine creates prims through [`RenderDelegate`], streams updates
//! into the returned [`Mesh`] and [`Material`] objects, and calls
//! [`RenderDelegate::commit_resources`] once per frame.

pub mod material;
pub mod mesh;
pub mod network;
pub mod prim;
pub mod registry;

pub use material::{Material, SurfaceSlot};
pub use mesh::{DirtyFlags, IndexedAttribute, MaterialTable, Mesh, expand_indexed};
pub use network::{MaterialNetwork, NodeKey, ParamMap, ParamValue, Relationship, WiredNetwork};
pub use prim::{BprimType, RprimType, SprimType};
pub use registry::RenderDelegate;
