//! # Mesh Data Structure
//!
//! Triangle-soup mesh: an ordered list of triangles with concrete vertex
//! positions and a cached bounding box. No connectivity is stored, so a
//! closed surface repeats every shared vertex in each triangle using it.
//!
//! ## Tools
//!
//! - [`analyzer`]: statistics such as area, volume and centre of mass
//! - [`validator`]: non-destructive checks producing a report
//! - [`repair`]: in-place removal of bad triangles and vertex welding
//! - [`normals`]: recompute, smooth or flip facet normals

pub mod analyzer;
pub mod normals;
pub mod repair;
pub mod validator;

pub use analyzer::{analyze, MeshStatistics};
pub use normals::{NormalProcessor, NormalReport};
pub use repair::{MeshRepairer, RepairReport};
pub use validator::{MeshValidator, ValidationReport};

use serde::{Deserialize, Serialize};

use crate::geometry::{Aabb, Triangle, Vec3};

/// An ordered collection of triangles with a cached bounding box.
///
/// The bounds are kept current by every mutating method. For an empty mesh
/// they hold the zero-value sentinel.
///
/// # Example
///
/// ```rust
/// use slicer_core::{Mesh, Vec3};
///
/// let mut mesh = Mesh::new();
/// mesh.add_triangle(
///     Vec3::new(0.0, 0.0, 0.0),
///     Vec3::new(1.0, 0.0, 0.0),
///     Vec3::new(0.0, 1.0, 2.0),
///     Vec3::Z,
/// );
/// assert_eq!(mesh.triangle_count(), 1);
/// assert_eq!(mesh.bounds().max.z, 2.0);
/// ```
///
/// Only the triangles are serialized; the bounds are recomputed on load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "MeshData")]
pub struct Mesh {
    /// Triangles in insertion order
    triangles: Vec<Triangle>,
    /// Bounding box of every vertex
    #[serde(skip_serializing)]
    bounds: Aabb,
}

/// Serialized form of [`Mesh`].
#[derive(Deserialize)]
struct MeshData {
    triangles: Vec<Triangle>,
}

impl From<MeshData> for Mesh {
    fn from(data: MeshData) -> Self {
        Self::from_triangles(data.triangles)
    }
}

impl Mesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty mesh with room for `triangle_count` triangles.
    pub fn with_capacity(triangle_count: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(triangle_count),
            bounds: Aabb::default(),
        }
    }

    /// Creates a mesh from existing triangles and computes its bounds.
    pub fn from_triangles(triangles: Vec<Triangle>) -> Self {
        let mut mesh = Self {
            triangles,
            bounds: Aabb::default(),
        };
        mesh.compute_bounds();
        mesh
    }

    /// Appends a triangle built from its parts.
    pub fn add_triangle(&mut self, v0: Vec3, v1: Vec3, v2: Vec3, normal: Vec3) {
        self.push(Triangle::new(v0, v1, v2, normal));
    }

    /// Appends a triangle and grows the bounds to include it.
    pub fn push(&mut self, triangle: Triangle) {
        if self.triangles.is_empty() {
            self.bounds = Aabb::new(triangle.v0, triangle.v0);
        }
        for vertex in triangle.vertices() {
            self.bounds.expand_to_include(vertex);
        }
        self.triangles.push(triangle);
    }

    /// Reserves room for `additional` more triangles.
    pub fn reserve(&mut self, additional: usize) {
        self.triangles.reserve(additional);
    }

    /// Returns the triangles in insertion order.
    #[inline]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Returns the triangle at `index`.
    #[inline]
    pub fn triangle(&self, index: usize) -> Option<&Triangle> {
        self.triangles.get(index)
    }

    /// Returns the number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Returns true if the mesh has no triangles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Returns the cached bounding box.
    #[inline]
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Recomputes the bounding box from every vertex.
    ///
    /// Returns `false` and resets the bounds to the sentinel when the mesh
    /// is empty.
    pub fn compute_bounds(&mut self) -> bool {
        match Aabb::from_points(self.triangles.iter().flat_map(Triangle::vertices)) {
            Some(bounds) => {
                self.bounds = bounds;
                true
            }
            None => {
                self.bounds = Aabb::default();
                false
            }
        }
    }

    /// Lowest and highest vertex Z, scanned from the triangles.
    ///
    /// Returns `None` for an empty mesh.
    pub fn z_extent(&self) -> Option<(f64, f64)> {
        if self.triangles.is_empty() {
            return None;
        }
        let extent = self
            .triangles
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), tri| {
                (lo.min(tri.min_z()), hi.max(tri.max_z()))
            });
        Some(extent)
    }

    /// Consumes the mesh and returns its triangles.
    pub fn into_triangles(self) -> Vec<Triangle> {
        self.triangles
    }

    /// Mutable access for tools that keep vertex positions in place or
    /// call `compute_bounds` afterwards.
    pub(crate) fn triangles_mut(&mut self) -> &mut [Triangle] {
        &mut self.triangles
    }

    /// Keeps the triangles matching `keep`, then refreshes the bounds.
    ///
    /// Returns the number of triangles removed.
    pub(crate) fn retain_triangles<F>(&mut self, keep: F) -> usize
    where
        F: FnMut(&Triangle) -> bool,
    {
        let before = self.triangles.len();
        self.triangles.retain(keep);
        self.compute_bounds();
        before - self.triangles.len()
    }
}

impl FromIterator<Triangle> for Mesh {
    fn from_iter<I: IntoIterator<Item = Triangle>>(iter: I) -> Self {
        Self::from_triangles(iter.into_iter().collect())
    }
}
