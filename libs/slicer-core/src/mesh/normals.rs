//! # Normal Processing
//!
//! Recomputes, smooths or flips the stored facet normals. Vertex positions
//! are never touched, so the cached bounds stay valid.

use std::collections::HashMap;

use tracing::debug;

use super::Mesh;
use crate::geometry::{normalize_or_up, Vec3};
use config::constants::{NORMAL_LENGTH_EPSILON, NORMAL_SMOOTHING_KEY_SCALE};

/// Summary of a normal operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalReport {
    /// Normals replaced by the face normal
    pub normals_recalculated: usize,
    /// Normals averaged with at least one neighbour
    pub normals_smoothed: usize,
    /// Normals reversed
    pub normals_flipped: usize,
    /// False when the mesh was empty
    pub success: bool,
}

impl NormalReport {
    fn ok() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }
}

/// Operations on facet normals.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalProcessor;

impl NormalProcessor {
    /// Creates a processor.
    pub fn new() -> Self {
        Self
    }

    /// Replaces every normal with the normalized face normal.
    ///
    /// Degenerate triangles get +Z.
    pub fn recalculate_normals(&self, mesh: &mut Mesh) -> NormalReport {
        if mesh.is_empty() {
            return NormalReport::default();
        }
        let mut report = NormalReport::ok();
        for tri in mesh.triangles_mut() {
            tri.normal = tri.face_normal();
            report.normals_recalculated += 1;
        }
        report
    }

    /// Averages each normal with neighbours sharing a vertex position.
    ///
    /// A neighbour contributes only when the angle between the two stored
    /// normals is below `angle_threshold_deg`. Each neighbour is counted
    /// once even when it shares several vertices.
    ///
    /// # Example
    ///
    /// ```rust
    /// use slicer_core::mesh::NormalProcessor;
    /// use slicer_core::{Mesh, Triangle, Vec3};
    ///
    /// // Two faces meeting at a 20 degree crease.
    /// let tilt = Vec3::new(0.0, -(20f64.to_radians()).sin(), (20f64.to_radians()).cos());
    /// let mut mesh = Mesh::from_triangles(vec![
    ///     Triangle::new(Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z),
    ///     Triangle::new(Vec3::ZERO, Vec3::X, -Vec3::Y, tilt),
    /// ]);
    /// let report = NormalProcessor::new().smooth_normals(&mut mesh, 30.0);
    /// assert_eq!(report.normals_smoothed, 2);
    /// assert_eq!(mesh.triangles()[0].normal, mesh.triangles()[1].normal);
    /// ```
    pub fn smooth_normals(&self, mesh: &mut Mesh, angle_threshold_deg: f64) -> NormalReport {
        if mesh.is_empty() {
            return NormalReport::default();
        }

        let mut by_vertex: HashMap<(i64, i64, i64), Vec<usize>> = HashMap::new();
        for (index, tri) in mesh.triangles().iter().enumerate() {
            for vertex in tri.vertices() {
                by_vertex.entry(smoothing_key(vertex)).or_default().push(index);
            }
        }

        let triangles = mesh.triangles();
        let mut new_normals = Vec::with_capacity(triangles.len());
        let mut report = NormalReport::ok();
        let mut neighbours = Vec::new();

        for (index, tri) in triangles.iter().enumerate() {
            neighbours.clear();
            for vertex in tri.vertices() {
                if let Some(shared) = by_vertex.get(&smoothing_key(vertex)) {
                    neighbours.extend(shared.iter().copied().filter(|&n| n != index));
                }
            }
            neighbours.sort_unstable();
            neighbours.dedup();

            let mut sum = tri.normal;
            let mut count = 1usize;
            for &n in &neighbours {
                let other = triangles[n].normal;
                let angle = tri.normal.dot(other).clamp(-1.0, 1.0).acos().to_degrees();
                if angle < angle_threshold_deg {
                    sum += other;
                    count += 1;
                }
            }

            if count > 1 {
                new_normals.push(normalize_or_up(sum / count as f64, NORMAL_LENGTH_EPSILON));
                report.normals_smoothed += 1;
            } else {
                new_normals.push(tri.normal);
            }
        }

        for (tri, normal) in mesh.triangles_mut().iter_mut().zip(new_normals) {
            tri.normal = normal;
        }

        debug!(
            smoothed = report.normals_smoothed,
            threshold = angle_threshold_deg,
            "Smoothed normals"
        );
        report
    }

    /// Reverses every normal.
    pub fn flip_normals(&self, mesh: &mut Mesh) -> NormalReport {
        let mut report = NormalReport::ok();
        for tri in mesh.triangles_mut() {
            tri.flip_normal();
            report.normals_flipped += 1;
        }
        report
    }
}

fn smoothing_key(v: Vec3) -> (i64, i64, i64) {
    let scaled = v * NORMAL_SMOOTHING_KEY_SCALE;
    (scaled.x as i64, scaled.y as i64, scaled.z as i64)
}
