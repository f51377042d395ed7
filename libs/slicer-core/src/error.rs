//! # Slicer Errors
//!
//! Error types for slicing and mesh construction.
//!
//! ## Error Policy
//!
//! - Expected failures are returned as values, never as panics
//! - Validation failures are reported before any per-layer work starts
//! - Messages are human readable and carry the offending values

use config::constants::{MAX_LAYER_COUNT, MAX_LAYER_HEIGHT, MIN_LAYER_HEIGHT};
use thiserror::Error;

// =============================================================================
// SLICING ERRORS
// =============================================================================

/// Reasons a slice operation can fail.
///
/// When several conditions apply, the first in declaration order is
/// reported.
///
/// ## Example
///
/// ```rust
/// use slicer_core::{slice, Mesh, SlicingError, SlicingSettings};
///
/// match slice(&Mesh::new(), &SlicingSettings::default()) {
///     Err(SlicingError::EmptyMesh) => {}
///     other => panic!("unexpected outcome: {other:?}"),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SlicingError {
    /// The mesh has no triangles.
    #[error("Mesh contains no triangles")]
    EmptyMesh,

    /// The layer height lies outside the accepted range.
    #[error("Layer height must be between {min} and {max} mm, got {value}")]
    InvalidLayerHeight {
        /// Requested layer height
        value: f64,
        /// Smallest accepted value
        min: f64,
        /// Largest accepted value
        max: f64,
    },

    /// The Z range is empty or the layer count collapsed to zero.
    #[error("Invalid Z bounds: {reason}")]
    InvalidBounds {
        /// What was wrong with the range
        reason: String,
    },

    /// The computed layer count exceeds the safety ceiling.
    #[error("Layer count {count} exceeds maximum of {max}")]
    TooManyLayers {
        /// Layers the settings would have produced
        count: usize,
        /// Ceiling
        max: usize,
    },

    /// Every layer came back empty.
    #[error("No intersections found in {layer_count} layers")]
    NoIntersections {
        /// Number of cutting planes that were tested
        layer_count: usize,
    },
}

impl SlicingError {
    /// Creates an invalid layer height error for `value`.
    pub fn invalid_layer_height(value: f64) -> Self {
        Self::InvalidLayerHeight {
            value,
            min: MIN_LAYER_HEIGHT,
            max: MAX_LAYER_HEIGHT,
        }
    }

    /// Creates an invalid bounds error.
    pub fn invalid_bounds(reason: impl Into<String>) -> Self {
        Self::InvalidBounds {
            reason: reason.into(),
        }
    }

    /// Creates a too-many-layers error for `count`.
    pub fn too_many_layers(count: usize) -> Self {
        Self::TooManyLayers {
            count,
            max: MAX_LAYER_COUNT,
        }
    }
}

// =============================================================================
// MESH ERRORS
// =============================================================================

/// Errors raised while constructing meshes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
    /// Degenerate geometry
    #[error("Degenerate geometry: {message}")]
    DegenerateGeometry { message: String },
}

impl MeshError {
    /// Creates a degenerate geometry error.
    pub fn degenerate(message: impl Into<String>) -> Self {
        Self::DegenerateGeometry {
            message: message.into(),
        }
    }
}

/// Result type alias for mesh construction.
pub type MeshResult<T> = Result<T, MeshError>;

// =============================================================================
// TESTS
// =============================================================================
