//! # Plane–Triangle Intersection
//!
//! Classifies vertices against a horizontal plane and interpolates along
//! the edges that cross it.
//!
//! ## Tolerance Band
//!
//! A vertex within `EPSILON` of the plane counts as `On`. `On` vertices
//! emit no point of their own; a triangle touching the plane only through
//! `On` vertices can therefore still emit a segment via the interpolated
//! edges leaving them, or nothing at all. This keeps a single rule for
//! every case at the cost of zero-length segments at vertex contacts.

use crate::geometry::{Triangle, Vec3};
use config::constants::EPSILON;

use super::LineSegment;

/// Where a vertex lies relative to a cutting plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexPosition {
    Above,
    Below,
    On,
}

impl VertexPosition {
    /// Classifies `z` against `plane_z` with the `EPSILON` band.
    ///
    /// NaN compares false both ways and lands in `On`.
    #[inline]
    pub fn classify(z: f64, plane_z: f64) -> Self {
        if z > plane_z + EPSILON {
            Self::Above
        } else if z < plane_z - EPSILON {
            Self::Below
        } else {
            Self::On
        }
    }
}

/// Point where the edge `p1 → p2` crosses the plane at `z`.
///
/// Returns `None` for edges that are horizontal within `EPSILON`, or when
/// the crossing parameter falls outside `[-EPSILON, 1 + EPSILON]`. The
/// parameter is clamped to `[0, 1]` and the returned Z is exactly `z`.
///
/// # Example
///
/// ```rust
/// use slicer_core::slicing::interpolate_edge;
/// use slicer_core::Vec3;
///
/// let p = interpolate_edge(Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 2.0), 0.5).unwrap();
/// assert_eq!(p, Vec3::new(0.5, 0.0, 0.5));
/// ```
pub fn interpolate_edge(p1: Vec3, p2: Vec3, z: f64) -> Option<Vec3> {
    let dz = p2.z - p1.z;
    if dz.abs() < EPSILON {
        return None;
    }

    let t = (z - p1.z) / dz;
    if t < -EPSILON || t > 1.0 + EPSILON {
        return None;
    }

    let t = t.clamp(0.0, 1.0);
    Some(Vec3::new(p1.x + t * (p2.x - p1.x), p1.y + t * (p2.y - p1.y), z))
}

/// Segment where `tri` crosses the plane at `z`, if any.
///
/// Triangles with no vertex strictly above, or every vertex strictly above,
/// produce nothing. Otherwise the edges (v0, v1), (v1, v2), (v2, v0) are
/// tried in order wherever their endpoints classify differently, stopping
/// at two points.
///
/// # Example
///
/// ```rust
/// use slicer_core::slicing::intersect_triangle;
/// use slicer_core::{Triangle, Vec3};
///
/// let tri = Triangle::from_vertices(
///     Vec3::new(0.0, 0.0, 0.0),
///     Vec3::new(1.0, 0.0, 0.0),
///     Vec3::new(0.0, 0.0, 1.0),
/// );
/// let seg = intersect_triangle(&tri, 0.5).unwrap();
/// assert_eq!(seg.start.z, 0.5);
/// assert_eq!(seg.end.z, 0.5);
/// ```
pub fn intersect_triangle(tri: &Triangle, z: f64) -> Option<LineSegment> {
    let vertices = tri.vertices();
    let positions = vertices.map(|v| VertexPosition::classify(v.z, z));

    let above = positions
        .iter()
        .filter(|&&p| p == VertexPosition::Above)
        .count();
    if above == 0 || above == 3 {
        return None;
    }

    let mut points = [Vec3::ZERO; 2];
    let mut found = 0;

    for (a, b) in [(0, 1), (1, 2), (2, 0)] {
        if found == 2 {
            break;
        }
        if positions[a] == positions[b] {
            continue;
        }
        if let Some(point) = interpolate_edge(vertices[a], vertices[b], z) {
            points[found] = point;
            found += 1;
        }
    }

    (found == 2).then(|| LineSegment::new(points[0], points[1]))
}
