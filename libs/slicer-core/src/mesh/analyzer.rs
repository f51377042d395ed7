//! # Mesh Analysis
//!
//! Whole-mesh statistics computed in a single pass.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Mesh;
use crate::geometry::{Aabb, Vec3};
use config::constants::WATERTIGHT_VOLUME_EPSILON;

/// Summary statistics for a mesh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshStatistics {
    /// Number of triangles
    pub triangle_count: usize,
    /// Vertex references (three per triangle, shared vertices counted again)
    pub vertex_count: usize,
    /// Bounding box
    pub bounds: Aabb,
    /// Size of the bounding box
    pub dimensions: Vec3,
    /// Sum of triangle areas
    pub surface_area: f64,
    /// Absolute enclosed volume from the divergence theorem
    pub volume: f64,
    /// Heuristic: the mesh encloses a non-zero volume
    pub is_watertight: bool,
    /// Mean of every vertex position
    pub center_of_mass: Vec3,
}

/// Computes statistics for `mesh`.
///
/// An empty mesh yields the all-zero default.
///
/// # Example
///
/// ```rust
/// use slicer_core::mesh::analyze;
/// use slicer_core::primitives::create_box;
/// use slicer_core::Vec3;
///
/// let stats = analyze(&create_box(Vec3::new(1.0, 2.0, 3.0), false).unwrap());
/// assert!((stats.volume - 6.0).abs() < 1e-9);
/// assert!((stats.surface_area - 22.0).abs() < 1e-9);
/// assert!(stats.is_watertight);
/// ```
pub fn analyze(mesh: &Mesh) -> MeshStatistics {
    if mesh.is_empty() {
        return MeshStatistics::default();
    }

    let mut surface_area = 0.0;
    let mut signed_volume = 0.0;
    let mut vertex_sum = Vec3::ZERO;

    for tri in mesh.triangles() {
        surface_area += tri.area();
        signed_volume += tri.signed_volume();
        vertex_sum += tri.v0 + tri.v1 + tri.v2;
    }

    let bounds = mesh.bounds();
    let vertex_count = mesh.triangle_count() * 3;

    let stats = MeshStatistics {
        triangle_count: mesh.triangle_count(),
        vertex_count,
        bounds,
        dimensions: bounds.size(),
        surface_area,
        volume: signed_volume.abs(),
        is_watertight: signed_volume.abs() > WATERTIGHT_VOLUME_EPSILON,
        center_of_mass: vertex_sum / vertex_count as f64,
    };

    debug!(
        triangles = stats.triangle_count,
        surface_area = stats.surface_area,
        volume = stats.volume,
        "Analyzed mesh"
    );

    stats
}
