//! # Mesh Repair
//!
//! In-place clean-up operations. Each returns a [`RepairReport`] describing
//! what changed; bounds are refreshed after every mutation.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tracing::{info, warn};

use super::validator::quantize;
use super::Mesh;
use config::constants::{MIN_TRIANGLE_AREA, VERTEX_MERGE_TOLERANCE};

/// Summary of a repair operation.
#[derive(Debug, Clone, PartialEq)]
pub struct RepairReport {
    /// False when the operation had nothing to work on
    pub success: bool,
    /// Triangle count before the operation
    pub original_triangles: usize,
    /// Triangle count after the operation
    pub final_triangles: usize,
    /// Triangles dropped for non-finite coordinates
    pub invalid_triangles_removed: usize,
    /// Triangles dropped for falling below the area threshold
    pub degenerate_triangles_removed: usize,
    /// Vertex references snapped onto an earlier position
    pub vertices_merged: usize,
    /// Human-readable description of each change
    pub actions: Vec<String>,
}

impl RepairReport {
    fn starting_from(mesh: &Mesh) -> Self {
        Self {
            success: true,
            original_triangles: mesh.triangle_count(),
            final_triangles: mesh.triangle_count(),
            invalid_triangles_removed: 0,
            degenerate_triangles_removed: 0,
            vertices_merged: 0,
            actions: Vec::new(),
        }
    }

    /// Triangles removed overall.
    pub fn triangles_removed(&self) -> usize {
        self.original_triangles - self.final_triangles
    }
}

/// Applies repair operations to a mesh.
///
/// # Example
///
/// ```rust
/// use slicer_core::mesh::MeshRepairer;
/// use slicer_core::{Mesh, Triangle, Vec3};
///
/// let mut mesh = Mesh::from_triangles(vec![
///     Triangle::from_vertices(Vec3::ZERO, Vec3::X, Vec3::Y),
///     Triangle::from_vertices(Vec3::ZERO, Vec3::ZERO, Vec3::Y),
/// ]);
/// let report = MeshRepairer::new().repair(&mut mesh);
/// assert_eq!(report.degenerate_triangles_removed, 1);
/// assert_eq!(mesh.triangle_count(), 1);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MeshRepairer;

impl MeshRepairer {
    /// Creates a repairer.
    pub fn new() -> Self {
        Self
    }

    /// Runs every repair with default tolerances.
    ///
    /// Order: invalid triangles, degenerate triangles, duplicate vertices.
    pub fn repair(&self, mesh: &mut Mesh) -> RepairReport {
        let mut report = RepairReport::starting_from(mesh);

        let invalid = self.remove_invalid_triangles(mesh);
        report.invalid_triangles_removed = invalid.invalid_triangles_removed;

        let degenerate = self.remove_degenerate_triangles(mesh, MIN_TRIANGLE_AREA);
        report.degenerate_triangles_removed = degenerate.degenerate_triangles_removed;

        // An empty mesh has nothing to merge; that is not a failure here.
        let merged = self.merge_duplicate_vertices(mesh, VERTEX_MERGE_TOLERANCE);
        report.vertices_merged = merged.vertices_merged;

        report.actions = [invalid.actions, degenerate.actions, merged.actions].concat();
        report.final_triangles = mesh.triangle_count();

        if report.actions.is_empty() {
            report
                .actions
                .push("Mesh is already clean - no repairs needed".to_string());
        }

        info!(
            original = report.original_triangles,
            removed = report.triangles_removed(),
            merged = report.vertices_merged,
            "Repaired mesh"
        );

        report
    }

    /// Drops triangles with a NaN or infinite vertex or normal.
    pub fn remove_invalid_triangles(&self, mesh: &mut Mesh) -> RepairReport {
        let mut report = RepairReport::starting_from(mesh);
        let removed = mesh.retain_triangles(|tri| tri.has_finite_vertices() && tri.normal.is_finite());

        report.invalid_triangles_removed = removed;
        report.final_triangles = mesh.triangle_count();
        if removed > 0 {
            warn!(removed, "Removed triangles with non-finite coordinates");
            report
                .actions
                .push(format!("Removed {removed} invalid triangles (NaN/Inf)"));
        }
        report
    }

    /// Drops triangles whose area is below `min_area`.
    pub fn remove_degenerate_triangles(&self, mesh: &mut Mesh, min_area: f64) -> RepairReport {
        let mut report = RepairReport::starting_from(mesh);
        let removed = mesh.retain_triangles(|tri| tri.area() >= min_area);

        report.degenerate_triangles_removed = removed;
        report.final_triangles = mesh.triangle_count();
        if removed > 0 {
            report
                .actions
                .push(format!("Removed {removed} degenerate triangles (area ≈ 0)"));
        }
        report
    }

    /// Snaps every vertex onto the first position seen in its tolerance cell.
    ///
    /// Reports `success = false` for an empty mesh.
    pub fn merge_duplicate_vertices(&self, mesh: &mut Mesh, tolerance: f64) -> RepairReport {
        let mut report = RepairReport::starting_from(mesh);
        if mesh.is_empty() {
            report.success = false;
            return report;
        }

        let mut first_seen = HashMap::new();
        let mut merged = 0;

        for tri in mesh.triangles_mut() {
            for vertex in [&mut tri.v0, &mut tri.v1, &mut tri.v2] {
                match first_seen.entry(quantize(*vertex, tolerance)) {
                    Entry::Occupied(entry) => {
                        *vertex = *entry.get();
                        merged += 1;
                    }
                    Entry::Vacant(entry) => {
                        entry.insert(*vertex);
                    }
                }
            }
        }
        mesh.compute_bounds();

        report.vertices_merged = merged;
        if merged > 0 {
            report
                .actions
                .push(format!("Merged {merged} duplicate vertices"));
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Triangle, Vec3};
    use crate::primitives::create_box;

    fn unit_triangle(offset: Vec3) -> Triangle {
        Triangle::from_vertices(offset, offset + Vec3::X, offset + Vec3::Y)
    }

    #[test]
    fn test_remove_invalid_checks_normals_too() {
        let mut bad_normal = unit_triangle(Vec3::ZERO);
        bad_normal.normal = Vec3::new(0.0, f64::NAN, 1.0);
        let mut mesh = Mesh::from_triangles(vec![unit_triangle(Vec3::Z), bad_normal]);

        let report = MeshRepairer::new().remove_invalid_triangles(&mut mesh);
        assert_eq!(report.invalid_triangles_removed, 1);
        assert_eq!(report.final_triangles, 1);
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn test_removal_refreshes_bounds() {
        let far = unit_triangle(Vec3::new(0.0, 0.0, 100.0));
        let sliver = Triangle::new(far.v0, far.v0, far.v1, Vec3::Z);
        let mut mesh = Mesh::from_triangles(vec![unit_triangle(Vec3::ZERO), sliver]);
        assert_eq!(mesh.bounds().max.z, 100.0);

        MeshRepairer::new().remove_degenerate_triangles(&mut mesh, MIN_TRIANGLE_AREA);
        assert_eq!(mesh.bounds().max.z, 0.0);
    }

    #[test]
    fn test_merge_snaps_to_first_seen_position() {
        let a = unit_triangle(Vec3::ZERO);
        let b = unit_triangle(Vec3::new(1e-7, 0.0, 0.0));
        let mut mesh = Mesh::from_triangles(vec![a, b]);

        let report = MeshRepairer::new().merge_duplicate_vertices(&mut mesh, VERTEX_MERGE_TOLERANCE);
        assert_eq!(report.vertices_merged, 3);
        assert_eq!(mesh.triangles()[1].v0, Vec3::ZERO);
        assert_eq!(mesh.triangles()[1].v1, Vec3::X);
    }

    #[test]
    fn test_merge_on_empty_mesh_fails() {
        let report = MeshRepairer::new().merge_duplicate_vertices(&mut Mesh::new(), 1e-5);
        assert!(!report.success);
    }

    #[test]
    fn test_repair_reports_each_step() {
        let mut nan = unit_triangle(Vec3::ZERO);
        nan.v2.z = f64::INFINITY;
        let p = Vec3::splat(3.0);
        let degenerate = Triangle::new(p, p, p, Vec3::Z);
        let mut mesh = create_box(Vec3::ONE, false).unwrap();
        mesh.push(nan);
        mesh.push(degenerate);

        let report = MeshRepairer::new().repair(&mut mesh);
        assert_eq!(report.original_triangles, 14);
        assert_eq!(report.final_triangles, 12);
        assert_eq!(report.triangles_removed(), 2);
        assert_eq!(report.invalid_triangles_removed, 1);
        assert_eq!(report.degenerate_triangles_removed, 1);
        assert_eq!(report.vertices_merged, 28);
        assert_eq!(report.actions.len(), 3);
    }

    #[test]
    fn test_repair_clean_mesh() {
        let mut mesh = Mesh::from_triangles(vec![unit_triangle(Vec3::ZERO)]);
        let report = MeshRepairer::new().repair(&mut mesh);
        assert!(report.success);
        assert_eq!(
            report.actions,
            vec!["Mesh is already clean - no repairs needed".to_string()]
        );
    }
}
