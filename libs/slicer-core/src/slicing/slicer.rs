//! Main slicing implementation.
//!
//! Validates the request, resolves the Z range and layer count, then cuts
//! the mesh plane by plane from the bottom up.

use tracing::{debug, info};

use super::intersect::intersect_triangle;
use super::{Layer, SlicingResult, SlicingSettings, ZIndex};
use crate::error::SlicingError;
use crate::geometry::Triangle;
use crate::mesh::Mesh;
use config::constants::{EPSILON, MAX_LAYER_COUNT};

/// Slices `mesh` into layers of `settings.layer_height`.
///
/// Plane `i` sits at `min_z + i * layer_height` for `i` in
/// `0..ceil((max_z - min_z) / layer_height)`, so the top of the range is
/// never cut. Layers without segments are dropped from the result.
///
/// # Errors
///
/// Checked in this order, first match wins:
///
/// - [`SlicingError::EmptyMesh`] when the mesh has no triangles
/// - [`SlicingError::InvalidLayerHeight`] outside `[0.01, 10.0]`
/// - [`SlicingError::InvalidBounds`] for a flat range
/// - [`SlicingError::TooManyLayers`] above 100 000 planes
/// - [`SlicingError::NoIntersections`] when every layer came back empty
///
/// # Example
///
/// ```
/// use slicer_core::primitives::create_box;
/// use slicer_core::{slice, SlicingSettings, Vec3};
///
/// let cube = create_box(Vec3::ONE, false).unwrap();
/// let result = slice(&cube, &SlicingSettings::new(0.25)).unwrap();
/// assert_eq!(result.layers.len(), 4);
/// assert_eq!(result.layers[1].z_height, 0.25);
/// ```
pub fn slice(mesh: &Mesh, settings: &SlicingSettings) -> Result<SlicingResult, SlicingError> {
    if mesh.is_empty() {
        return Err(SlicingError::EmptyMesh);
    }
    settings.validate()?;

    let (min_z, max_z) = resolve_z_range(mesh, settings)?;
    let layer_height = settings.layer_height;
    let total_height = max_z - min_z;
    let layer_count = layer_count(total_height, layer_height)?;

    info!(
        triangles = mesh.triangle_count(),
        total_height = format!("{:.3}", total_height),
        layer_height,
        layer_count,
        "Starting mesh slicing"
    );

    let index = if settings.use_spatial_index {
        let index = ZIndex::build(mesh, layer_height);
        let stats = index.stats();
        debug!(
            buckets = stats.total_buckets,
            references = stats.total_references,
            avg_per_bucket = format!("{:.1}", stats.avg_triangles_per_bucket),
            "Built Z index"
        );
        Some(index)
    } else {
        None
    };

    let mut layers = Vec::with_capacity(layer_count);
    let mut total_segments = 0;

    for i in 0..layer_count {
        let z = min_z + i as f64 * layer_height;
        let layer = match &index {
            Some(index) => slice_triangles(index.triangles_at_z(z), z),
            None => slice_triangles(mesh.triangles().iter(), z),
        };
        if !layer.is_empty() {
            total_segments += layer.segment_count();
            layers.push(layer);
        }
    }

    if layers.is_empty() {
        return Err(SlicingError::NoIntersections { layer_count });
    }

    info!(
        layers = layers.len(),
        segments = total_segments,
        "Slicing complete"
    );

    Ok(SlicingResult {
        layers,
        total_segments,
        total_height,
        layer_height,
    })
}

/// Cuts every triangle of `mesh` with the plane at `z`.
///
/// No validation happens here; a plane outside the mesh simply gives an
/// empty layer.
///
/// # Example
///
/// ```
/// use slicer_core::primitives::create_box;
/// use slicer_core::{slice_at_z, Vec3};
///
/// let cube = create_box(Vec3::ONE, false).unwrap();
/// assert_eq!(slice_at_z(&cube, 0.5).segment_count(), 8);
/// assert!(slice_at_z(&cube, 2.0).is_empty());
/// ```
pub fn slice_at_z(mesh: &Mesh, z: f64) -> Layer {
    slice_triangles(mesh.triangles().iter(), z)
}

/// Like [`slice_at_z`], visiting only the index's candidates for `z`.
pub fn slice_at_z_indexed(index: &ZIndex<'_>, z: f64) -> Layer {
    slice_triangles(index.triangles_at_z(z), z)
}

fn slice_triangles<'t>(triangles: impl Iterator<Item = &'t Triangle>, z: f64) -> Layer {
    let mut layer = Layer::new(z);
    for segment in triangles.filter_map(|tri| intersect_triangle(tri, z)) {
        layer.add_segment(segment);
    }
    layer
}

/// Explicit range from the settings, otherwise the mesh's Z extent.
fn resolve_z_range(mesh: &Mesh, settings: &SlicingSettings) -> Result<(f64, f64), SlicingError> {
    if settings.has_explicit_z_range() {
        return Ok((settings.min_z, settings.max_z));
    }

    let Some((min_z, max_z)) = mesh.z_extent() else {
        return Err(SlicingError::EmptyMesh);
    };
    let span = max_z - min_z;
    if span.is_nan() || span <= EPSILON {
        return Err(SlicingError::invalid_bounds("Mesh has zero or negative height"));
    }
    Ok((min_z, max_z))
}

fn layer_count(total_height: f64, layer_height: f64) -> Result<usize, SlicingError> {
    // Kept in f64 until range-checked; `as usize` saturates on infinity.
    let count = (total_height / layer_height).ceil();
    if count.is_nan() || count <= 0.0 {
        return Err(SlicingError::invalid_bounds(
            "Calculated layer count is zero or negative",
        ));
    }
    if count > MAX_LAYER_COUNT as f64 {
        return Err(SlicingError::too_many_layers(count as usize));
    }
    Ok(count as usize)
}
