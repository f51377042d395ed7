//! Batch slicing across meshes.
//!
//! Each mesh is one rayon task running the ordinary single-threaded
//! [`slice`]. Nothing is shared between tasks except the settings.

use rayon::prelude::*;
use tracing::info;

use super::{slice, SlicingResult, SlicingSettings};
use crate::error::SlicingError;
use crate::mesh::Mesh;

/// Slices every mesh with the same settings, in parallel.
///
/// Results come back in input order; one mesh failing does not affect the
/// others.
///
/// # Example
///
/// ```
/// use slicer_core::primitives::create_box;
/// use slicer_core::{slice_batch, Mesh, SlicingError, SlicingSettings, Vec3};
///
/// let meshes = vec![create_box(Vec3::ONE, false).unwrap(), Mesh::new()];
/// let results = slice_batch(&meshes, &SlicingSettings::new(0.25));
///
/// assert!(results[0].is_ok());
/// assert_eq!(results[1], Err(SlicingError::EmptyMesh));
/// ```
pub fn slice_batch(
    meshes: &[Mesh],
    settings: &SlicingSettings,
) -> Vec<Result<SlicingResult, SlicingError>> {
    let results: Vec<_> = meshes.par_iter().map(|mesh| slice(mesh, settings)).collect();

    let failed = results.iter().filter(|r| r.is_err()).count();
    info!(meshes = meshes.len(), failed, "Batch slicing complete");

    results
}
