//! Delegate configuration.
//!
//! Settings are plain data and can be built in code or parsed from JSON
//! handed over by the host application:
//!
//! ```rust,ignore
//! let settings = DelegateSettings::from_json(r#"{ "document_name": "input.usdz" }"#)?;
//! let delegate = RenderDelegate::new(settings, provider);
//! ```

use glam::Vec4;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::resources::material::Side;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelegateSettings {
    /// Name of the loaded USD document. Relative texture paths are resolved
    /// inside it using the package path form `document[filename]`.
    pub document_name: String,

    /// Culling side for every material the delegate creates.
    pub side: Side,

    /// Colour of the non-textured fallback material.
    pub default_color: [f32; 4],
}

impl Default for DelegateSettings {
    fn default() -> Self {
        Self {
            document_name: String::new(),
            side: Side::Double,
            default_color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

impl DelegateSettings {
    #[must_use]
    pub fn new(document_name: impl Into<String>) -> Self {
        Self {
            document_name: document_name.into(),
            ..Default::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[inline]
    #[must_use]
    pub fn default_color(&self) -> Vec4 {
        Vec4::from_array(self.default_color)
    }
}
