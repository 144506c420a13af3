use glam::Vec4;

use crate::resources::material::{MaterialSettings, Side};
use crate::resources::version_tracker::ChangeTracker;

#[derive(Debug, Clone)]
pub struct MeshPhongMaterial {
    pub(crate) color: Vec4,
    pub(crate) shininess: f32,
    pub(crate) vertex_colors: bool,
    pub(crate) settings: MaterialSettings,
    pub(crate) tracker: ChangeTracker,
}

impl MeshPhongMaterial {
    #[must_use]
    pub fn new(color: Vec4) -> Self {
        Self {
            color,
            shininess: 30.0,
            vertex_colors: false,
            settings: MaterialSettings::default(),
            tracker: ChangeTracker::new(),
        }
    }

    #[must_use]
    pub fn color(&self) -> Vec4 {
        self.color
    }

    pub fn set_color(&mut self, color: Vec4) {
        self.color = color;
        self.tracker.changed();
    }

    #[must_use]
    pub fn shininess(&self) -> f32 {
        self.shininess
    }

    #[must_use]
    pub fn vertex_colors(&self) -> bool {
        self.vertex_colors
    }

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

impl Default for MeshPhongMaterial {
    fn default() -> Self {
        Self::new(Vec4::ONE)
    }
}
