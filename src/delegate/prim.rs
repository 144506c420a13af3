//! Prim type tags understood by the delegate.
//!
//! The scene engine names prim types with string tokens. Each category is
//! parsed once into a closed enum; tokens the delegate does not render map to
//! `Unrecognized` and are ignored without error.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RprimType {
    Mesh,
    Unrecognized(String),
}

impl RprimType {
    #[must_use]
    pub fn from_type_id(type_id: &str) -> Self {
        match type_id {
            "mesh" => Self::Mesh,
            other => Self::Unrecognized(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SprimType {
    Material,
    Unrecognized(String),
}

impl SprimType {
    #[must_use]
    pub fn from_type_id(type_id: &str) -> Self {
        match type_id {
            "material" => Self::Material,
            other => Self::Unrecognized(other.to_string()),
        }
    }
}

/// Buffer prims are recognised but none of them produce renderer objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BprimType {
    RenderBuffer,
    RenderSettings,
    Unrecognized(String),
}

impl BprimType {
    #[must_use]
    pub fn from_type_id(type_id: &str) -> Self {
        match type_id {
            "renderBuffer" => Self::RenderBuffer,
            "renderSettings" => Self::RenderSettings,
            other => Self::Unrecognized(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_tokens() {
        assert_eq!(RprimType::from_type_id("mesh"), RprimType::Mesh);
        assert_eq!(SprimType::from_type_id("material"), SprimType::Material);
        assert_eq!(BprimType::from_type_id("renderBuffer"), BprimType::RenderBuffer);
    }

    #[test]
    fn unknown_tokens_are_kept_for_logging() {
        assert_eq!(
            RprimType::from_type_id("basisCurves"),
            RprimType::Unrecognized("basisCurves".to_string())
        );
        assert_eq!(
            SprimType::from_type_id("camera"),
            SprimType::Unrecognized("camera".to_string())
        );
    }
}
