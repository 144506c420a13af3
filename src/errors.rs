//! Error Types
//!
//! This module defines the error types used throughout the delegate.
//!
//! # Overview
//!
//! The main error type [`DelegateError`] covers:
//! - Texture resolution failures (format, missing asset, decoding)
//! - Material network wiring errors
//! - Mesh attribute layout errors
//! - Configuration parsing errors
//!
//! # Usage
//!
//! All public APIs return [`Result<T>`] which is an alias for `std::result::Result<T, DelegateError>`.
//!
//! The error is `Clone`: a pending texture load is shared by every caller that
//! requested the same file, and each of them receives its own copy of the failure.

use thiserror::Error;

/// The main error type for the render delegate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DelegateError {
    // ========================================================================
    // Texture Errors
    // ========================================================================
    /// The texture filename has an extension no decoder is registered for.
    #[error("Unsupported texture format: {0}")]
    UnsupportedFormat(String),

    /// The virtual file provider returned no data for a resource path.
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    /// The image decoder rejected the fetched bytes.
    #[error("Failed to decode image {label}: {reason}")]
    DecodeFailure {
        /// Filename the bytes were fetched for
        label: String,
        /// Decoder message
        reason: String,
    },

    /// The blob handle for a texture was revoked before decoding finished.
    #[error("Blob handle revoked for texture: {0}")]
    BlobRevoked(String),

    // ========================================================================
    // Material Errors
    // ========================================================================
    /// A relationship references a node path that is not in the node table.
    #[error("Relationship {role} node not found: {node_id}")]
    DanglingRelationship {
        /// The missing node path
        node_id: String,
        /// Which endpoint was missing (`input` or `output`)
        role: &'static str,
    },

    // ========================================================================
    // Geometry Errors
    // ========================================================================
    /// A vertex attribute was supplied with a component count the renderer cannot lay out.
    #[error("Unsupported dimension {dimension} for attribute '{name}'")]
    UnsupportedAttributeDimension {
        /// Attribute name as supplied by the driver
        name: String,
        /// Requested components per vertex
        dimension: u32,
    },

    // ========================================================================
    // Async Errors
    // ========================================================================
    /// The local executor refused a texture task (it has been shut down).
    #[error("Task spawn error: {0}")]
    TaskSpawn(String),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Delegate settings could not be parsed.
    #[error("Config error: {0}")]
    Config(String),
}

// ============================================================================
// Convenient conversion implementations
// ============================================================================

impl From<futures::task::SpawnError> for DelegateError {
    fn from(err: futures::task::SpawnError) -> Self {
        DelegateError::TaskSpawn(err.to_string())
    }
}

impl From<serde_json::Error> for DelegateError {
    fn from(err: serde_json::Error) -> Self {
        DelegateError::Config(err.to_string())
    }
}

/// Alias for `Result<T, DelegateError>`.
pub type Result<T> = std::result::Result<T, DelegateError>;
