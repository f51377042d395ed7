//! # Axis-Aligned Bounding Box

use serde::{Deserialize, Serialize};

use super::Vec3;

/// An axis-aligned bounding box.
///
/// The zero value (`Aabb::default()`) doubles as the "unset" box reported
/// for meshes without triangles.
///
/// # Example
///
/// ```rust
/// use slicer_core::{Aabb, Vec3};
///
/// let aabb = Aabb::from_points([Vec3::new(1.0, 5.0, 2.0), Vec3::new(-1.0, 0.0, 4.0)])
///     .unwrap();
/// assert_eq!(aabb.min, Vec3::new(-1.0, 0.0, 2.0));
/// assert_eq!(aabb.size(), Vec3::new(2.0, 5.0, 2.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Aabb {
    /// Smallest corner
    pub min: Vec3,
    /// Largest corner
    pub max: Vec3,
}

impl Aabb {
    /// Creates a box from two corners, ordering components per axis.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Creates the smallest box containing every point.
    ///
    /// Returns `None` for an empty iterator.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut aabb = Self {
            min: first,
            max: first,
        };
        for point in points {
            aabb.expand_to_include(point);
        }
        Some(aabb)
    }

    /// Grows the box to include `point`.
    #[inline]
    pub fn expand_to_include(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Returns the smallest box containing both boxes.
    #[inline]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Width, depth and height.
    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Center point.
    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Height along Z.
    #[inline]
    pub fn height(&self) -> f64 {
        self.max.z - self.min.z
    }

    /// Returns `true` if `point` lies inside or on the boundary.
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Returns `true` for the zero-value sentinel.
    #[inline]
    pub fn is_unset(&self) -> bool {
        *self == Self::default()
    }
}
