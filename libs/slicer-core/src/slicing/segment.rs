use serde::{Deserialize, Serialize};

use crate::geometry::Vec3;

/// A straight cut through one triangle at a layer height.
///
/// Both endpoints carry the layer's Z exactly. The two endpoints may
/// coincide when a triangle only touches the plane at a vertex.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LineSegment {
    pub start: Vec3,
    pub end: Vec3,
}

impl LineSegment {
    #[inline]
    pub const fn new(start: Vec3, end: Vec3) -> Self {
        Self { start, end }
    }

    /// Length in the XY plane.
    ///
    /// # Example
    ///
    /// ```rust
    /// use slicer_core::{LineSegment, Vec3};
    ///
    /// let seg = LineSegment::new(Vec3::new(0.0, 0.0, 1.0), Vec3::new(3.0, 4.0, 1.0));
    /// assert_eq!(seg.length(), 5.0);
    /// ```
    pub fn length(&self) -> f64 {
        self.start.truncate().distance(self.end.truncate())
    }

    /// Returns `true` when both endpoints are the same point.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }
}
