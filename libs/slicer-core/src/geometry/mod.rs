//! # Geometry Primitives
//!
//! Value types shared by the mesh tools and the slicer.
//!
//! `Vec3` is a thin alias of `glam::DVec3` so that all geometry runs in f64;
//! the helpers here keep higher layers free of direct `glam` imports.

mod aabb;
mod triangle;

pub use aabb::Aabb;
pub use glam::DVec3 as Vec3;
pub use triangle::Triangle;

/// Normalizes `v`, falling back to +Z when its length is below `min_length`.
///
/// # Examples
/// ```
/// use slicer_core::geometry::{normalize_or_up, Vec3};
/// assert_eq!(normalize_or_up(Vec3::new(0.0, 3.0, 0.0), 1e-8), Vec3::Y);
/// assert_eq!(normalize_or_up(Vec3::ZERO, 1e-8), Vec3::Z);
/// ```
pub fn normalize_or_up(v: Vec3, min_length: f64) -> Vec3 {
    let length = v.length();
    if length < min_length || !length.is_finite() {
        Vec3::Z
    } else {
        v / length
    }
}

#[cfg(test)]
mod tests;
