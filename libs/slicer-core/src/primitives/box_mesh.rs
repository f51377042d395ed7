//! # Box Primitive
//!
//! Generates a rectangular box as a 12-triangle soup.

use crate::error::{MeshError, MeshResult};
use crate::geometry::Vec3;
use crate::mesh::Mesh;

/// Corner-index triangles with their outward normals.
///
/// Corner ordering:
/// 0: (0, 0, 0) bottom-front-left
/// 1: (x, 0, 0) bottom-front-right
/// 2: (x, y, 0) bottom-back-right
/// 3: (0, y, 0) bottom-back-left
/// 4..7: the same corners on the top face
const FACES: [([usize; 3], Vec3); 12] = [
    // Bottom (z = 0)
    ([0, 2, 1], Vec3::NEG_Z),
    ([0, 3, 2], Vec3::NEG_Z),
    // Top (z = size.z)
    ([4, 5, 6], Vec3::Z),
    ([4, 6, 7], Vec3::Z),
    // Front (y = 0)
    ([0, 1, 5], Vec3::NEG_Y),
    ([0, 5, 4], Vec3::NEG_Y),
    // Back (y = size.y)
    ([2, 3, 7], Vec3::Y),
    ([2, 7, 6], Vec3::Y),
    // Left (x = 0)
    ([3, 0, 4], Vec3::NEG_X),
    ([3, 4, 7], Vec3::NEG_X),
    // Right (x = size.x)
    ([1, 2, 6], Vec3::X),
    ([1, 6, 5], Vec3::X),
];

/// Creates an axis-aligned box mesh.
///
/// # Arguments
///
/// * `size` - Dimensions [x, y, z]
/// * `center` - If true, center at origin; if false, corner at origin
///
/// # Returns
///
/// A mesh with 12 triangles wound counter-clockwise seen from outside.
///
/// # Example
///
/// ```rust
/// use slicer_core::primitives::create_box;
/// use slicer_core::Vec3;
///
/// let mesh = create_box(Vec3::splat(10.0), false).unwrap();
/// assert_eq!(mesh.triangle_count(), 12);
/// assert_eq!(mesh.bounds().max, Vec3::splat(10.0));
/// ```
pub fn create_box(size: Vec3, center: bool) -> MeshResult<Mesh> {
    if size.cmple(Vec3::ZERO).any() || !size.is_finite() {
        return Err(MeshError::degenerate(format!(
            "Box size must be positive: {:?}",
            size
        )));
    }

    let offset = if center { -size * 0.5 } else { Vec3::ZERO };

    let corners = [
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(size.x, 0.0, 0.0),
        Vec3::new(size.x, size.y, 0.0),
        Vec3::new(0.0, size.y, 0.0),
        Vec3::new(0.0, 0.0, size.z),
        Vec3::new(size.x, 0.0, size.z),
        Vec3::new(size.x, size.y, size.z),
        Vec3::new(0.0, size.y, size.z),
    ]
    .map(|corner| corner + offset);

    let mut mesh = Mesh::with_capacity(FACES.len());
    for ([a, b, c], normal) in FACES {
        mesh.add_triangle(corners[a], corners[b], corners[c], normal);
    }
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_box_has_12_triangles() {
        let mesh = create_box(Vec3::ONE, false).unwrap();
        assert_eq!(mesh.triangle_count(), 12);
    }

    #[test]
    fn test_box_bounds_non_centered() {
        let mesh = create_box(Vec3::new(2.0, 3.0, 4.0), false).unwrap();
        assert_eq!(mesh.bounds().min, Vec3::ZERO);
        assert_eq!(mesh.bounds().max, Vec3::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn test_box_bounds_centered() {
        let mesh = create_box(Vec3::splat(2.0), true).unwrap();
        assert_eq!(mesh.bounds().min, Vec3::splat(-1.0));
        assert_eq!(mesh.bounds().max, Vec3::splat(1.0));
    }

    /// Stored normals agree with the winding.
    #[test]
    fn test_box_normals_match_winding() {
        let mesh = create_box(Vec3::new(1.0, 2.0, 3.0), false).unwrap();
        for tri in mesh.triangles() {
            assert_relative_eq!(tri.face_normal().dot(tri.normal), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_box_rejects_non_positive_size() {
        assert!(create_box(Vec3::new(0.0, 1.0, 1.0), false).is_err());
        assert!(create_box(Vec3::new(1.0, -1.0, 1.0), false).is_err());
        assert!(create_box(Vec3::new(1.0, 1.0, f64::NAN), false).is_err());
    }
}
