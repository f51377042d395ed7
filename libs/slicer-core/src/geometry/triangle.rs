//! # Triangle
//!
//! A facet with concrete vertex positions and a stored normal.

use serde::{Deserialize, Serialize};

use super::{normalize_or_up, Vec3};
use config::constants::NORMAL_LENGTH_EPSILON;

/// A triangle with three vertex positions and a facet normal.
///
/// The normal is carried as supplied by the loader; nothing checks that it
/// is unit length or perpendicular to the face. Slicing reads only the
/// vertex positions.
///
/// # Example
///
/// ```rust
/// use slicer_core::{Triangle, Vec3};
///
/// let tri = Triangle::from_vertices(
///     Vec3::new(0.0, 0.0, 0.0),
///     Vec3::new(1.0, 0.0, 0.0),
///     Vec3::new(0.0, 1.0, 0.0),
/// );
/// assert_eq!(tri.normal, Vec3::Z);
/// assert!((tri.area() - 0.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Triangle {
    /// First vertex
    pub v0: Vec3,
    /// Second vertex
    pub v1: Vec3,
    /// Third vertex
    pub v2: Vec3,
    /// Facet normal as supplied
    pub normal: Vec3,
}

impl Triangle {
    /// Creates a triangle with an explicit normal.
    #[inline]
    pub const fn new(v0: Vec3, v1: Vec3, v2: Vec3, normal: Vec3) -> Self {
        Self { v0, v1, v2, normal }
    }

    /// Creates a triangle whose normal is computed from the winding.
    ///
    /// Degenerate triangles get +Z.
    pub fn from_vertices(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        let mut tri = Self::new(v0, v1, v2, Vec3::ZERO);
        tri.normal = tri.face_normal();
        tri
    }

    /// Returns the vertices in winding order.
    #[inline]
    pub fn vertices(&self) -> [Vec3; 3] {
        [self.v0, self.v1, self.v2]
    }

    /// Lowest vertex Z.
    #[inline]
    pub fn min_z(&self) -> f64 {
        self.v0.z.min(self.v1.z).min(self.v2.z)
    }

    /// Highest vertex Z.
    #[inline]
    pub fn max_z(&self) -> f64 {
        self.v0.z.max(self.v1.z).max(self.v2.z)
    }

    /// Cross product of the two edges leaving `v0`.
    ///
    /// Its length is twice the area.
    #[inline]
    pub fn cross(&self) -> Vec3 {
        (self.v1 - self.v0).cross(self.v2 - self.v0)
    }

    /// Unit normal from the winding, +Z for degenerate faces.
    pub fn face_normal(&self) -> Vec3 {
        normalize_or_up(self.cross(), NORMAL_LENGTH_EPSILON)
    }

    /// Surface area.
    #[inline]
    pub fn area(&self) -> f64 {
        0.5 * self.cross().length()
    }

    /// Signed volume of the tetrahedron spanned with the origin.
    ///
    /// Summed over a closed mesh with outward winding this gives the
    /// enclosed volume.
    #[inline]
    pub fn signed_volume(&self) -> f64 {
        self.v0.dot(self.v1.cross(self.v2)) / 6.0
    }

    /// Returns `true` when all three vertices are finite.
    pub fn has_finite_vertices(&self) -> bool {
        self.vertices().iter().all(|v| v.is_finite())
    }

    /// Reverses the stored normal.
    #[inline]
    pub fn flip_normal(&mut self) {
        self.normal = -self.normal;
    }
}
