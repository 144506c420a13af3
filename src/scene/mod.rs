//! Renderer-side scene.
//!
//! The delegate publishes committed meshes here; the render loop reads them
//! every frame.

pub mod scene;

pub use scene::{RenderMesh, RenderScene, SceneHandle};

use slotmap::new_key_type;

new_key_type! {
    pub struct MeshKey;
}
