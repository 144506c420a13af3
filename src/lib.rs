#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod assets;
pub mod delegate;
pub mod errors;
pub mod resources;
pub mod scene;
pub mod settings;

pub use assets::{CallbackFileProvider, FileProvider, FileRequest, MemoryFileProvider, TextureCache};
pub use delegate::{Material, Mesh, ParamMap, ParamValue, Relationship, RenderDelegate, SurfaceSlot};
pub use errors::{DelegateError, Result};
pub use resources::{Geometry, MaterialData, MaterialRef, MeshPhysicalMaterial, PhysicalMap, Side, Texture};
pub use scene::{RenderMesh, RenderScene, SceneHandle};
pub use settings::DelegateSettings;
