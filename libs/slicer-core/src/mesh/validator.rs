//! # Mesh Validation
//!
//! Non-destructive checks run before slicing. Problems are collected in a
//! [`ValidationReport`]; nothing in the mesh is changed.
//!
//! ## Checks
//!
//! 1. Non-finite vertex coordinates (error)
//! 2. Triangles below the minimum area (warning)
//! 3. Share of duplicate vertex positions (warning above 10 %)

use std::collections::HashSet;

use tracing::{debug, warn};

use super::Mesh;
use crate::geometry::Vec3;
use config::constants::{MeshToleranceConfig, DUPLICATE_WARNING_RATIO};

/// Outcome of [`MeshValidator::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    /// False once any error has been recorded
    pub is_valid: bool,
    /// Problems that make the mesh unusable
    pub errors: Vec<String>,
    /// Problems worth reporting that slicing tolerates
    pub warnings: Vec<String>,
    /// Triangles below the minimum area
    pub degenerate_triangles: usize,
    /// Triangles with at least one NaN or infinite coordinate
    pub invalid_vertices: usize,
    /// Vertex references minus distinct positions
    pub duplicate_vertices: usize,
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            degenerate_triangles: 0,
            invalid_vertices: 0,
            duplicate_vertices: 0,
        }
    }
}

impl ValidationReport {
    fn add_error(&mut self, message: String) {
        self.is_valid = false;
        self.errors.push(message);
    }

    fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

/// Validates meshes against configurable tolerances.
///
/// # Example
///
/// ```rust
/// use slicer_core::mesh::MeshValidator;
/// use slicer_core::primitives::create_box;
/// use slicer_core::Vec3;
///
/// let mesh = create_box(Vec3::ONE, false).unwrap();
/// let report = MeshValidator::new().validate(&mesh);
/// assert!(report.is_valid);
/// assert_eq!(report.degenerate_triangles, 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshValidator {
    min_triangle_area: f64,
    vertex_tolerance: f64,
}

impl Default for MeshValidator {
    fn default() -> Self {
        MeshToleranceConfig::default().into()
    }
}

impl From<MeshToleranceConfig> for MeshValidator {
    fn from(config: MeshToleranceConfig) -> Self {
        Self {
            min_triangle_area: config.min_triangle_area,
            vertex_tolerance: config.vertex_tolerance,
        }
    }
}

impl MeshValidator {
    /// Creates a validator with the default tolerances.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the area below which a triangle counts as degenerate.
    pub fn with_min_triangle_area(mut self, area: f64) -> Self {
        self.min_triangle_area = area;
        self
    }

    /// Sets the cell size used to detect duplicate vertices.
    pub fn with_vertex_tolerance(mut self, tolerance: f64) -> Self {
        self.vertex_tolerance = tolerance;
        self
    }

    /// Area threshold for degenerate triangles.
    pub fn min_triangle_area(&self) -> f64 {
        self.min_triangle_area
    }

    /// Duplicate detection cell size.
    pub fn vertex_tolerance(&self) -> f64 {
        self.vertex_tolerance
    }

    /// Runs every check and returns the collected report.
    pub fn validate(&self, mesh: &Mesh) -> ValidationReport {
        let mut report = ValidationReport::default();

        if mesh.is_empty() {
            report.add_warning("Mesh is empty (no triangles)");
            return report;
        }

        for (index, tri) in mesh.triangles().iter().enumerate() {
            if !tri.has_finite_vertices() {
                report.invalid_vertices += 1;
                report.add_error(format!("Triangle {index} has invalid coordinates (NaN/Inf)"));
                continue;
            }

            if tri.area() < self.min_triangle_area {
                report.degenerate_triangles += 1;
                report.add_warning(format!("Triangle {index} is degenerate (area ≈ 0)"));
            }
        }

        let total_vertices = mesh.triangle_count() * 3;
        let unique: HashSet<(i64, i64, i64)> = mesh
            .triangles()
            .iter()
            .flat_map(|tri| tri.vertices())
            .map(|v| quantize(v, self.vertex_tolerance))
            .collect();
        report.duplicate_vertices = total_vertices - unique.len();

        if report.duplicate_vertices as f64 > total_vertices as f64 * DUPLICATE_WARNING_RATIO {
            report.add_warning(format!(
                "Many duplicate vertices detected: {}",
                report.duplicate_vertices
            ));
        }

        if !report.is_valid {
            warn!(
                errors = report.errors.len(),
                invalid = report.invalid_vertices,
                "Mesh validation failed"
            );
        } else if report.warnings.is_empty() {
            report.add_warning("Mesh validation passed with no issues");
        }

        debug!(
            triangles = mesh.triangle_count(),
            degenerate = report.degenerate_triangles,
            duplicates = report.duplicate_vertices,
            "Validated mesh"
        );

        report
    }
}

/// Maps a position to its integer cell at the given tolerance.
///
/// Non-finite coordinates saturate, which keeps them out of real cells.
pub(crate) fn quantize(v: Vec3, tolerance: f64) -> (i64, i64, i64) {
    let scale = 1.0 / tolerance;
    (
        (v.x * scale).round() as i64,
        (v.y * scale).round() as i64,
        (v.z * scale).round() as i64,
    )
}
